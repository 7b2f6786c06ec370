use crate::api::{ApiClient, EnvConfig};
use crate::bootstrap::load_embedded_entries;
use crate::pages::{EntriesPage, EntryPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let config = EnvConfig::new();
    let entries = load_embedded_entries();
    provide_context(AppContext(AppState::new(
        ApiClient::new(config.api_url),
        config.bib_file,
        entries,
    )));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("entry/:key") view=EntryPage />
                <Route path=path!("") view=EntriesPage />
            </Routes>
        </Router>
    }
}
