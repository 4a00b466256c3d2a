use serde::{Deserialize, Serialize};

/// Named list of values referenced by detector rules in the field config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupList {
    /// Name the field config refers to the list by.
    id: String,
    /// List entries, kept in insertion order.
    items: Vec<String>,
}

impl LookupList {
    /// Create a new list.
    pub fn new<I, S>(id: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the list id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the list entries.
    pub fn items(&self) -> &[String] {
        &self.items
    }
}
