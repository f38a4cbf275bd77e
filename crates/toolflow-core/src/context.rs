//! Caller-supplied execution context and the per-run result map.

use crate::step::StepId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Opaque key/value data supplied by the caller for one workflow run.
///
/// Every tool invocation receives the whole context under the reserved
/// `context` parameter.
///
/// # Examples
///
/// ```
/// use toolflow_core::ExecutionContext;
/// use serde_json::json;
///
/// let mut ctx = ExecutionContext::new();
/// ctx.insert("inquiry", "My order never arrived");
/// ctx.insert("priority", 2);
///
/// assert_eq!(ctx.get("inquiry"), Some(&json!("My order never arrived")));
/// assert_eq!(ctx.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionContext {
    data: Map<String, Value>,
}

impl ExecutionContext {
    /// Creates a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value with the given key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Returns `true` if the context contains the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the context is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the context as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

impl From<Map<String, Value>> for ExecutionContext {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

/// Outputs of the steps that reached a terminal outcome, keyed by step id.
///
/// A step id is recorded at most once. When a fallback ran, the fallback's
/// output is stored under the failing step's id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultMap {
    entries: BTreeMap<StepId, Value>,
}

impl ResultMap {
    /// Creates a new empty result map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the output of a step.
    ///
    /// Returns `false` and leaves the map untouched if the step already has
    /// an entry.
    pub fn record(&mut self, step_id: StepId, value: Value) -> bool {
        match self.entries.entry(step_id) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Returns the output recorded for a step.
    pub fn get(&self, step_id: &str) -> Option<&Value> {
        self.entries.get(step_id)
    }

    /// Returns `true` if the step reached a terminal outcome.
    pub fn contains(&self, step_id: &str) -> bool {
        self.entries.contains_key(step_id)
    }

    /// Returns the number of recorded steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over recorded steps in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &Value)> {
        self.entries.iter()
    }

    /// Returns the recorded outputs as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(id, value)| (id.to_string(), value.clone()))
                .collect(),
        )
    }
}

impl IntoIterator for ResultMap {
    type Item = (StepId, Value);
    type IntoIter = btree_map::IntoIter<StepId, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_data_operations() {
        let ctx = ExecutionContext::new().with("key1", "value1");
        assert_eq!(ctx.get("key1"), Some(&json!("value1")));
        assert_eq!(ctx.get("nonexistent"), None);
        assert!(ctx.contains_key("key1"));
        assert_eq!(ctx.to_value(), json!({ "key1": "value1" }));
    }

    #[test]
    fn test_context_from_map() {
        let mut map = Map::new();
        map.insert("n".to_string(), json!(1));
        let ctx = ExecutionContext::from(map);
        assert_eq!(ctx.len(), 1);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn test_result_map_records_once() {
        let mut results = ResultMap::new();
        assert!(results.record(StepId::new("a"), json!("first")));
        assert!(!results.record(StepId::new("a"), json!("second")));

        assert_eq!(results.len(), 1);
        assert_eq!(results.get("a"), Some(&json!("first")));
    }

    #[test]
    fn test_result_map_to_value() {
        let mut results = ResultMap::new();
        results.record(StepId::new("b"), json!(2));
        results.record(StepId::new("a"), json!({ "ok": true }));

        assert_eq!(results.to_value(), json!({ "a": { "ok": true }, "b": 2 }));
        let ids: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(results.contains("b"));
        assert!(!results.contains("c"));
    }
}
