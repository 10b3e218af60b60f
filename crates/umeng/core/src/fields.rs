//! Ordered field sets.

use serde_json::{Map, Value};

/// Ordered mapping of field names to JSON values.
///
/// Inserting a key that is already present replaces its value in place, so the
/// key keeps the position of its first occurrence. New keys are appended.
/// Values are never inspected.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldSet(Map<String, Value>);

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add a field, consuming and returning the set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a field, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a field as a string slice, if it holds a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Index of a key in insertion order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.0.keys().position(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Merge `overrides` into this set. Overrides win on key collisions.
    pub fn merge(&mut self, overrides: &FieldSet) {
        for (key, value) in &overrides.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Merge `overrides` over a copy of `defaults`.
    pub fn merged(defaults: &FieldSet, overrides: &FieldSet) -> FieldSet {
        let mut merged = defaults.clone();
        merged.merge(overrides);
        merged
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for FieldSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<FieldSet> for Value {
    fn from(fields: FieldSet) -> Self {
        Value::Object(fields.0)
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FieldSet::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
