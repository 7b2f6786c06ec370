use crate::api::{ApiClient, EntryCall};
use crate::list::ListController;
use crate::models::{Entry, FieldSlot};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeSet;

/// Field whose editor is a multi-line text area.
pub(crate) const REVIEW_FIELD: &str = "review";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputShape {
    SingleLine,
    MultiLine,
}

impl InputShape {
    pub fn for_field(field: &str) -> Self {
        if field == REVIEW_FIELD {
            InputShape::MultiLine
        } else {
            InputShape::SingleLine
        }
    }
}

/// Set a field's value in the local list. Returns false when the entry is unknown.
pub(crate) fn apply_field_edit(entries: &mut [Entry], slot: &FieldSlot, value: &str) -> bool {
    if let Some(e) = entries.iter_mut().find(|e| e.key == slot.entry_key) {
        e.set_field(&slot.field, value);
        true
    } else {
        false
    }
}

pub(crate) fn apply_field_remove(entries: &mut [Entry], slot: &FieldSlot) -> bool {
    entries
        .iter_mut()
        .find(|e| e.key == slot.entry_key)
        .map(|e| e.remove_field(&slot.field))
        .unwrap_or(false)
}

pub(crate) fn read_field(entries: &[Entry], slot: &FieldSlot) -> Option<String> {
    entries
        .iter()
        .find(|e| e.key == slot.entry_key)
        .and_then(|e| e.field(&slot.field))
        .map(str::to_string)
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: StoredValue<ApiClient>,
    pub bib_file: StoredValue<Option<String>>,

    /// Entries embedded in the page at load.
    pub entries: RwSignal<Vec<Entry>>,

    /// Slots with an open editor. One editor per slot; different slots may
    /// be edited at the same time.
    pub editing: RwSignal<BTreeSet<FieldSlot>>,

    /// Last background failure, shown until dismissed.
    pub sync_error: RwSignal<Option<String>>,

    pub list: ListController,
}

impl AppState {
    pub fn new(api_client: ApiClient, bib_file: Option<String>, entries: Vec<Entry>) -> Self {
        Self {
            api_client: StoredValue::new(api_client),
            bib_file: StoredValue::new(bib_file),
            entries: RwSignal::new(entries),
            editing: RwSignal::new(BTreeSet::new()),
            sync_error: RwSignal::new(None),
            list: ListController::default(),
        }
    }

    pub fn is_editing(&self, slot: &FieldSlot) -> bool {
        self.editing.with(|s| s.contains(slot))
    }

    pub fn field_value(&self, slot: &FieldSlot) -> Option<String> {
        self.entries.with(|list| read_field(list, slot))
    }

    /// Send `call` in the background. A failure is logged, and when
    /// `failure` names what was lost it is also shown to the user.
    fn dispatch(&self, call: EntryCall, failure: Option<String>) {
        let api_client = self.api_client.get_value();
        let sync_error = self.sync_error;
        spawn_local(async move {
            if let Err(e) = api_client.send(&call).await {
                warn!(
                    "{} for {} failed ({:?}): {e}",
                    call.action.as_ref(),
                    call.entry_key,
                    e.kind
                );
                if let Some(what) = failure {
                    sync_error.set(Some(format!("{what}: {e}")));
                }
            }
        });
    }

    /// Fire-and-forget request to open the entry's file on the server host.
    ///
    /// Nothing on the page changes, whatever the outcome.
    pub fn open_file(&self, entry_key: String) {
        self.dispatch(EntryCall::open_file(entry_key), None);
    }

    /// Swap the slot's text for an editor seeded with the current value.
    ///
    /// Returns the seed, or None when the slot does not exist.
    pub fn begin_edit(&self, slot: &FieldSlot) -> Option<String> {
        let seed = self.field_value(slot)?;
        self.editing.update(|s| {
            s.insert(slot.clone());
        });
        Some(seed)
    }

    /// Commit on blur: show the new value at once, then persist it in the background.
    ///
    /// Only the first blur of a session commits; a second one (e.g. fired
    /// while the editor unmounts) is a no-op and returns None. Otherwise
    /// returns the call that was sent.
    pub fn commit_edit(&self, slot: FieldSlot, value: String) -> Option<EntryCall> {
        let mut was_editing = false;
        self.editing.update(|s| {
            was_editing = s.remove(&slot);
        });
        if !was_editing {
            return None;
        }
        self.entries.update(|list| {
            apply_field_edit(list, &slot, &value);
        });

        let call = EntryCall::field_edit(&slot.entry_key, &slot.field, value);
        self.dispatch(
            call.clone(),
            Some(format!("Could not save {} of {}", slot.field, slot.entry_key)),
        );
        Some(call)
    }

    /// Drop the field from the page at once, then tell the server.
    pub fn remove_field(&self, slot: FieldSlot) {
        self.editing.update(|s| {
            s.remove(&slot);
        });
        self.entries.update(|list| {
            apply_field_remove(list, &slot);
        });

        self.dispatch(
            EntryCall::field_remove(&slot.entry_key, &slot.field),
            Some(format!("Could not remove {} of {}", slot.field, slot.entry_key)),
        );
    }

    pub fn dismiss_error(&self) {
        self.sync_error.set(None);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
