use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;

const CONTROL_CLASS: &str = "form-control placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs outline-none md:text-sm focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2";

/// Single-line text input.
///
/// The element owns its value after the first render: `value` only seeds it.
/// Changes are reported through `on_input` (every keystroke) and `on_blur`
/// (value at the moment focus leaves).
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] value: String,
    #[prop(optional)] on_input: Option<Callback<String>>,
    #[prop(optional)] on_blur: Option<Callback<String>>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!("h-9", CONTROL_CLASS, class);

    view! {
        <input
            data-name="Input"
            type="text"
            class=merged_class
            placeholder=placeholder
            id=id
            prop:value=value
            on:input=move |ev| {
                if let Some(cb) = on_input {
                    cb.run(event_target_value(&ev));
                }
            }
            on:blur=move |ev| {
                if let Some(cb) = on_blur {
                    cb.run(event_target_value(&ev));
                }
            }
            node_ref=node_ref
        />
    }
}

/// Multi-line counterpart of [`Input`], same value ownership rules.
#[component]
pub fn Textarea(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] value: String,
    #[prop(optional)] on_blur: Option<Callback<String>>,
    #[prop(optional)] node_ref: NodeRef<html::Textarea>,
) -> impl IntoView {
    let merged_class = tw_merge!("min-h-24", CONTROL_CLASS, class);

    view! {
        <textarea
            data-name="Textarea"
            class=merged_class
            prop:value=value
            on:blur=move |ev| {
                if let Some(cb) = on_blur {
                    cb.run(event_target_value(&ev));
                }
            }
            node_ref=node_ref
        ></textarea>
    }
}
