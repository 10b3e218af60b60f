//! Groupcast audience filters.

use serde_json::{Value, json};

/// Tag filter matching devices that carry every listed tag.
///
/// Tags keep their input order and are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: Vec<String>,
}

impl TagFilter {
    /// Build a filter from a sequence of tags.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// An empty filter is a vacuous conjunction.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Render as `{"where": {"and": [{"tag": t1}, ...]}}`.
    pub fn to_value(&self) -> Value {
        let predicates: Vec<Value> = self.tags.iter().map(|tag| json!({ "tag": tag })).collect();
        json!({ "where": { "and": predicates } })
    }
}

impl From<&TagFilter> for Value {
    fn from(filter: &TagFilter) -> Self {
        filter.to_value()
    }
}
