use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct EntryField {
    pub name: String,
    pub value: String,
}

/// A bibliographic record as rendered on the page.
///
/// Fields keep the order they were read in; the server writes them back in
/// the same order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Entry {
    pub key: String,

    #[serde(rename = "type")]
    pub entry_type: String,

    #[serde(default)]
    pub fields: Vec<EntryField>,
}

impl Entry {
    pub fn new(key: impl Into<String>, entry_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: entry_type.into(),
            fields: vec![],
        }
    }

    #[cfg(test)]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Overwrite an existing field in place, or append a new one.
    pub fn set_field(&mut self, name: &str, value: &str) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.name == name) {
            f.value = value.to_string();
        } else {
            self.fields.push(EntryField {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    pub fn remove_field(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        self.fields.len() != before
    }
}

/// Identity of one displayed field: `(entry key, field name)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct FieldSlot {
    pub entry_key: String,
    pub field: String,
}

impl FieldSlot {
    pub fn new(entry_key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            entry_key: entry_key.into(),
            field: field.into(),
        }
    }

    /// Element id the page uses for this field's value.
    pub fn dom_id(&self) -> String {
        format!("{}-{}", self.entry_key, self.field)
    }
}
