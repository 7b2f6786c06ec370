use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, FieldList, FieldName, FieldRow, Input, Textarea,
};
use crate::models::FieldSlot;
use crate::state::{AppContext, InputShape};
use icons::{Pencil, Trash};
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::request_animation_frame;

/// Every field of one entry, each with inline edit and remove triggers.
#[component]
pub fn EntryFields(#[prop(into)] entry_key: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let entry_key = StoredValue::new(entry_key);

    let field_names = move || {
        let key = entry_key.get_value();
        app_state.0.entries.with(|list| {
            list.iter()
                .find(|e| e.key == key)
                .map(|e| e.fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>())
                .unwrap_or_default()
        })
    };

    view! {
        <FieldList>
            <For
                each=field_names
                key=|name| name.clone()
                children=move |name| {
                    let slot = FieldSlot::new(entry_key.get_value(), name.clone());
                    view! {
                        <FieldName>{name}</FieldName>
                        <FieldView slot=slot />
                    }
                }
            />
        </FieldList>
    }
}

/// One field slot: read-only text, or an editor while a session is open.
///
/// The value element carries the id `{entry key}-{field}`; the row around it
/// is what removal takes off the page.
#[component]
pub(crate) fn FieldView(slot: FieldSlot) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = app_state.0;

    let shape = InputShape::for_field(&slot.field);
    let dom_id = slot.dom_id();
    let slot = StoredValue::new(slot);

    let input_ref: NodeRef<html::Input> = NodeRef::new();
    let area_ref: NodeRef<html::Textarea> = NodeRef::new();

    let editing = Memo::new(move |_| slot.with_value(|s| state.is_editing(s)));
    let value = move || slot.with_value(|s| state.field_value(s)).unwrap_or_default();

    // Focus the editor once it is mounted.
    Effect::new(move |_| {
        if !editing.get() {
            return;
        }
        match shape {
            InputShape::SingleLine => {
                if let Some(el) = input_ref.get() {
                    request_animation_frame(move || {
                        let _ = el.focus();
                    });
                }
            }
            InputShape::MultiLine => {
                if let Some(el) = area_ref.get() {
                    request_animation_frame(move || {
                        let _ = el.focus();
                    });
                }
            }
        }
    });

    let on_edit = move |_| {
        slot.with_value(|s| state.begin_edit(s));
    };

    let on_remove = move |_| state.remove_field(slot.get_value());

    let commit = Callback::new(move |v: String| {
        state.commit_edit(slot.get_value(), v);
    });

    view! {
        <FieldRow>
            <span id=dom_id class="field-value min-w-0 flex-1 whitespace-pre-wrap">
                {move || {
                    if !editing.get() {
                        return value().into_any();
                    }
                    // The displayed value seeds the editor; it does not follow later changes.
                    let seed = untrack(value);
                    match shape {
                        InputShape::MultiLine => view! {
                            <Textarea value=seed on_blur=commit node_ref=area_ref />
                        }
                        .into_any(),
                        InputShape::SingleLine => view! {
                            <Input value=seed on_blur=commit node_ref=input_ref />
                        }
                        .into_any(),
                    }
                }}
            </span>
            <Show when=move || !editing.get() fallback=|| ().into_view()>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:title="Edit"
                    on:click=on_edit
                >
                    <Pencil />
                </Button>
            </Show>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Remove"
                on:click=on_remove
            >
                <Trash />
            </Button>
        </FieldRow>
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::api::{ApiClient, EntryCall};
    use crate::models::Entry;
    use crate::state::AppState;
    use leptos::task::Executor;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> web_sys::Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("document")
    }

    /// Resolves on the next animation frame, after frame callbacks queued earlier.
    async fn next_frame() {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let _ = web_sys::window()
                .expect("window")
                .request_animation_frame(&resolve);
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    fn editor_input(dom_id: &str) -> web_sys::HtmlInputElement {
        document()
            .get_element_by_id(dom_id)
            .expect("value element")
            .query_selector("input")
            .expect("query")
            .expect("single-line editor")
            .dyn_into::<web_sys::HtmlInputElement>()
            .expect("input element")
    }

    fn blur(target: &web_sys::EventTarget) {
        let ev = web_sys::FocusEvent::new("blur").expect("blur event");
        target.dispatch_event(&ev).expect("dispatch blur");
    }

    fn mount_entry(entry: Entry) -> AppState {
        let _ = Executor::init_wasm_bindgen();
        // Port 9 (discard) so background calls fail without reaching a server.
        let state = AppState::new(
            ApiClient::new("http://127.0.0.1:9".to_string()),
            None,
            vec![entry.clone()],
        );
        let key = entry.key;
        leptos::mount::mount_to(document().body().expect("body"), move || {
            provide_context(AppContext(state));
            view! { <EntryFields entry_key=key.clone() /> }
        })
        .forget();
        state
    }

    #[wasm_bindgen_test]
    async fn test_edit_then_blur_commits_locally() {
        let state = mount_entry(
            Entry::new("bib42", "article")
                .with_field("author", "Doe")
                .with_field("review", "fine"),
        );
        Executor::tick().await;

        let slot = FieldSlot::new("bib42", "author");
        let el = document().get_element_by_id("bib42-author").expect("value element");
        assert_eq!(el.text_content().as_deref(), Some("Doe"));

        assert_eq!(state.begin_edit(&slot).as_deref(), Some("Doe"));
        Executor::tick().await;

        let input = el
            .query_selector("input")
            .expect("query")
            .expect("single-line editor")
            .dyn_into::<web_sys::HtmlInputElement>()
            .expect("input element");
        assert_eq!(input.value(), "Doe");

        state.commit_edit(slot.clone(), "Smith".to_string());
        Executor::tick().await;

        let el = document().get_element_by_id("bib42-author").expect("value element");
        assert!(el.query_selector("input").expect("query").is_none());
        assert_eq!(el.text_content().as_deref(), Some("Smith"));
        assert!(!state.is_editing(&slot));
    }

    #[wasm_bindgen_test]
    async fn test_review_field_gets_textarea() {
        let state = mount_entry(Entry::new("rev1", "misc").with_field("review", "long text"));
        Executor::tick().await;

        state.begin_edit(&FieldSlot::new("rev1", "review"));
        Executor::tick().await;

        let el = document().get_element_by_id("rev1-review").expect("value element");
        let area = el
            .query_selector("textarea")
            .expect("query")
            .expect("multi-line editor")
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .expect("textarea element");
        assert_eq!(area.value(), "long text");
    }

    #[wasm_bindgen_test]
    async fn test_remove_drops_the_row() {
        let state = mount_entry(Entry::new("gone1", "misc").with_field("year", "2001"));
        Executor::tick().await;
        assert!(document().get_element_by_id("gone1-year").is_some());

        state.remove_field(FieldSlot::new("gone1", "year"));
        Executor::tick().await;
        assert!(document().get_element_by_id("gone1-year").is_none());
    }

    #[wasm_bindgen_test]
    async fn test_editor_takes_focus() {
        let state = mount_entry(Entry::new("foc1", "misc").with_field("title", "T"));
        Executor::tick().await;

        state.begin_edit(&FieldSlot::new("foc1", "title"));
        Executor::tick().await;
        Executor::tick().await;
        next_frame().await;

        let input = editor_input("foc1-title");
        let active = document().active_element().expect("an element has focus");
        assert!(active.is_same_node(Some(input.as_ref())));
    }

    #[wasm_bindgen_test]
    async fn test_review_editor_takes_focus() {
        let state = mount_entry(Entry::new("foc2", "misc").with_field("review", "long"));
        Executor::tick().await;

        state.begin_edit(&FieldSlot::new("foc2", "review"));
        Executor::tick().await;
        Executor::tick().await;
        next_frame().await;

        let area = document()
            .get_element_by_id("foc2-review")
            .expect("value element")
            .query_selector("textarea")
            .expect("query")
            .expect("multi-line editor");
        let active = document().active_element().expect("an element has focus");
        assert!(active.is_same_node(Some(area.as_ref())));
    }

    #[wasm_bindgen_test]
    async fn test_blur_event_commits_typed_value() {
        let state = mount_entry(Entry::new("blur1", "article").with_field("author", "Doe"));
        Executor::tick().await;

        let slot = FieldSlot::new("blur1", "author");
        state.begin_edit(&slot);
        Executor::tick().await;

        let input = editor_input("blur1-author");
        input.set_value("Smith");
        blur(input.as_ref());
        Executor::tick().await;

        let el = document().get_element_by_id("blur1-author").expect("value element");
        assert!(el.query_selector("input").expect("query").is_none());
        assert_eq!(el.text_content().as_deref(), Some("Smith"));
        assert_eq!(state.field_value(&slot).as_deref(), Some("Smith"));
        assert!(!state.is_editing(&slot));
    }

    #[wasm_bindgen_test]
    async fn test_second_blur_does_not_commit_again() {
        let state = mount_entry(Entry::new("blur2", "article").with_field("author", "Doe"));
        Executor::tick().await;

        let slot = FieldSlot::new("blur2", "author");
        state.begin_edit(&slot);
        Executor::tick().await;

        // Both blurs reach the same mounted input before the view updates.
        let input = editor_input("blur2-author");
        input.set_value("Smith");
        blur(input.as_ref());
        assert!(!state.is_editing(&slot));
        input.set_value("Jones");
        blur(input.as_ref());
        Executor::tick().await;

        assert_eq!(state.field_value(&slot).as_deref(), Some("Smith"));
        assert!(!state.is_editing(&slot));
        let el = document().get_element_by_id("blur2-author").expect("value element");
        assert_eq!(el.text_content().as_deref(), Some("Smith"));
    }

    #[wasm_bindgen_test]
    async fn test_commit_sends_field_edit_for_the_slot() {
        let state = mount_entry(Entry::new("bib7", "article").with_field("year", "2001"));
        Executor::tick().await;

        let slot = FieldSlot::new("bib7", "year");
        state.begin_edit(&slot);
        Executor::tick().await;

        let call = state
            .commit_edit(slot.clone(), "2002".to_string())
            .expect("first commit sends a call");
        assert_eq!(call, EntryCall::field_edit("bib7", "year", "2002"));
        assert_eq!(
            state.api_client.get_value().url(&call),
            "http://127.0.0.1:9/entry/bib7/field-edit"
        );
        assert_eq!(call.form(), Some([("year", "2002")]));

        assert!(state.commit_edit(slot.clone(), "2003".to_string()).is_none());
        assert_eq!(state.field_value(&slot).as_deref(), Some("2002"));
    }
}
