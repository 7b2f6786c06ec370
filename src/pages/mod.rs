use crate::components::ui::{
    Alert, AlertDescription, Badge, Button, ButtonSize, ButtonVariant, Input, Table, TableBody,
    TableCell, TableHead, TableHeader, TableRow,
};
use crate::bib::{write_entry, write_str, BibItem};
use crate::editor::EntryFields;
use crate::list::{SortOrder, ValueName};
use crate::models::Entry;
use crate::state::AppContext;
use icons::{ChevronDown, ChevronUp, FileText, X};
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

pub(crate) fn entry_href(entry_key: &str) -> String {
    format!("/entry/{}", urlencoding::encode(entry_key))
}

/// Banner for the last failed background call. Dismissing it does not
/// touch the page's values.
#[component]
pub fn SyncErrorBanner() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;

    view! {
        <Show when=move || state.sync_error.get().is_some() fallback=|| ().into_view()>
            {move || {
                state.sync_error.get().map(|e| view! {
                    <Alert class="mb-4 border-destructive/30">
                        <AlertDescription class="text-destructive">{e}</AlertDescription>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Dismiss"
                            on:click=move |_| state.dismiss_error()
                        >
                            <X />
                        </Button>
                    </Alert>
                })
            }}
        </Show>
    }
}

#[component]
pub fn OpenFileButton(#[prop(into)] entry_key: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let entry_key = StoredValue::new(entry_key);

    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Icon
            attr:title="Open file"
            on:click=move |_| app_state.0.open_file(entry_key.get_value())
        >
            <FileText />
        </Button>
    }
}

#[component]
fn SortHeader(name: ValueName) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let list = app_state.0.list;

    let indicator = move || {
        list.query.with(|q| match q.sort {
            Some((n, SortOrder::Asc)) if n == name => view! { <ChevronUp /> }.into_any(),
            Some((n, SortOrder::Desc)) if n == name => view! { <ChevronDown /> }.into_any(),
            _ => ().into_any(),
        })
    };

    view! {
        <TableHead>
            <Button
                variant=ButtonVariant::Link
                size=ButtonSize::Sm
                class="sort px-0"
                attr:data-sort={name.to_string()}
                on:click=move |_| list.sort(name)
            >
                {name.to_string()}
                {indicator}
            </Button>
        </TableHead>
    }
}

#[component]
fn EntryRow(entry: Entry) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let list = app_state.0.list;

    let tag = ValueName::Tag.value_of(&entry).to_string();
    let href = entry_href(&entry.key);

    view! {
        <TableRow>
            <TableCell class="key font-mono text-xs">
                <A href=href>{entry.key.clone()}</A>
            </TableCell>
            <TableCell class="tag">
                {(!tag.is_empty()).then(move || {
                    let label = tag.clone();
                    view! {
                        <Badge on:click=move |_| list.filter(ValueName::Tag, &tag)>{label}</Badge>
                    }
                })}
            </TableCell>
            <TableCell class="author">{ValueName::Author.value_of(&entry).to_string()}</TableCell>
            <TableCell class="year">{ValueName::Year.value_of(&entry).to_string()}</TableCell>
            <TableCell class="title">{ValueName::Title.value_of(&entry).to_string()}</TableCell>
            <TableCell>
                <OpenFileButton entry_key=entry.key.clone() />
            </TableCell>
        </TableRow>
    }
}

#[component]
pub fn EntriesPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;
    let list = state.list;

    let title = state
        .bib_file
        .get_value()
        .unwrap_or_else(|| "Bibliography".to_string());

    let rows = move || state.entries.with(|entries| list.visible(entries));
    let total = move || state.entries.with(|entries| entries.len());

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
                <div class="mb-4 space-y-1">
                    <h1 class="text-xl font-semibold">{title}</h1>
                    <p class="text-xs text-muted-foreground">
                        {move || format!("{} of {} entries", rows().len(), total())}
                    </p>
                </div>

                <SyncErrorBanner />

                <div id={list.container_id}>
                    <div class="mb-4 flex items-center gap-2">
                        <Input
                            class="search max-w-sm"
                            placeholder="Search"
                            value={list.query.get_untracked().search}
                            on_input=Callback::new(move |q: String| list.search(q))
                        />
                        {move || {
                            list.query.with(|q| q.filter.clone()).map(|(name, value)| view! {
                                <Badge on:click=move |_| list.clear_filter()>
                                    {format!("{name}: {value}")}
                                    <X />
                                </Badge>
                            })
                        }}
                    </div>

                    <Table>
                        <TableHeader>
                            <TableRow>
                                {list
                                    .value_names()
                                    .into_iter()
                                    .map(|name| view! { <SortHeader name=name /> })
                                    .collect_view()}
                                <TableHead>""</TableHead>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            <For
                                each=rows
                                key=|e| e.clone()
                                children=|entry| view! { <EntryRow entry=entry /> }
                            />
                        </TableBody>
                    </Table>
                </div>

                <details class="mt-6 text-xs">
                    <summary class="cursor-pointer text-muted-foreground">"BibTeX of the listed entries"</summary>
                    <pre class="mt-2 overflow-x-auto rounded-md border p-3">
                        {move || {
                            let items: Vec<BibItem> = rows().into_iter().map(BibItem::Entry).collect();
                            write_str(&items)
                        }}
                    </pre>
                </details>
            </div>
        </div>
    }
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct EntryRouteParams {
    pub key: Option<String>,
}

#[component]
pub fn EntryPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;
    let params = use_params::<EntryRouteParams>();

    // Use closures so params access happens inside a reactive tracking context.
    let entry_key = move || params.get().ok().and_then(|p| p.key).unwrap_or_default();

    // Only key and type: field edits must not rebuild the open editors.
    let header = Memo::new(move |_| {
        let key = entry_key();
        state.entries.with(|list| {
            list.iter()
                .find(|e| e.key == key)
                .map(|e| (e.key.clone(), e.entry_type.clone()))
        })
    });
    let title = move || {
        let key = entry_key();
        state.entries.with(|list| {
            list.iter()
                .find(|e| e.key == key)
                .map(|e| ValueName::Title.value_of(e).to_string())
                .unwrap_or_default()
        })
    };
    let source = move || {
        let key = entry_key();
        state.entries.with(|list| {
            list.iter()
                .find(|e| e.key == key)
                .map(write_entry)
                .unwrap_or_default()
        })
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto w-full max-w-[860px] px-4 py-8">
                <div class="mb-4">
                    <A href="/">"All entries"</A>
                </div>

                <SyncErrorBanner />

                {move || match header.get() {
                    Some((key, entry_type)) => view! {
                        <div class="mb-4 flex items-center justify-between">
                            <div class="space-y-1">
                                <h1 class="text-xl font-semibold">{title}</h1>
                                <p class="text-xs text-muted-foreground">
                                    {format!("@{entry_type} {key}")}
                                </p>
                            </div>
                            <OpenFileButton entry_key=key.clone() />
                        </div>
                        <EntryFields entry_key=key />
                        <details class="mt-6 text-xs">
                            <summary class="cursor-pointer text-muted-foreground">"BibTeX"</summary>
                            <pre class="mt-2 overflow-x-auto rounded-md border p-3">{source}</pre>
                        </details>
                    }
                    .into_any(),
                    None => view! {
                        <div class="text-xs text-muted-foreground">
                            {format!("No entry named {:?}.", entry_key())}
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
