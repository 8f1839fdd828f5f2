//! Read access to the classic app's preference store.

use std::collections::HashMap;

use serde_json::Value;

/// An untyped key-value store. Migration only ever reads from it, so the
/// legacy data survives for a later re-run.
pub trait LegacyStore: Send + Sync {
    fn value(&self, key: &str) -> Option<Value>;
}

/// Legacy store held in memory, typically loaded from an exported
/// preferences snapshot
#[derive(Clone, Debug, Default)]
pub struct InMemoryLegacyStore {
    values: HashMap<String, Value>,
}

impl InMemoryLegacyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON object whose top-level keys are preference keys
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let values: HashMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self { values })
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for InMemoryLegacyStore {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl LegacyStore for InMemoryLegacyStore {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_snapshot() {
        let store = InMemoryLegacyStore::from_json_str(
            r#"{ "OBAApplicationUserId": "abc", "mostRecentStops": ["1_1121"] }"#,
        )
        .unwrap();

        assert_eq!(store.value("OBAApplicationUserId"), Some(json!("abc")));
        assert_eq!(store.value("bookmarks"), None);
    }

    #[test]
    fn test_snapshot_must_be_an_object() {
        assert!(InMemoryLegacyStore::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_builders() {
        let store: InMemoryLegacyStore = vec![("a".to_string(), json!(1))].into_iter().collect();
        assert!(!store.is_empty());
        assert!(InMemoryLegacyStore::new().with_value("b", json!(true)).value("b").is_some());
    }
}
