//! Immutable read view over a decoded reply payload.

use crate::errors::ServerResponseError;
use serde::Serialize;
use std::ops::Index;

static NULL: serde_json::Value = serde_json::Value::Null;

/// A decoded API reply.
///
/// Built once and read-only afterwards. The `try_*` mutators exist so that
/// code written against a mutable map fails loudly instead of silently
/// diverging from what the server returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Response {
    data: serde_json::Value,
}

impl Response {
    /// Wraps a decoded payload.
    #[must_use]
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }

    /// Wraps a list of records.
    #[must_use]
    pub fn from_records(records: Vec<serde_json::Value>) -> Self {
        Self::new(serde_json::Value::Array(records))
    }

    /// Checks if a top-level key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.get(key).is_some()
    }

    /// Gets a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets an element of a list payload.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&serde_json::Value> {
        self.data.get(index)
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            serde_json::Value::Object(map) => map.len(),
            serde_json::Value::Array(items) => items.len(),
            serde_json::Value::Null => 0,
            _ => 1,
        }
    }

    /// Returns true if the payload has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The whole payload.
    #[must_use]
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Consumes the response, returning the payload.
    #[must_use]
    pub fn into_data(self) -> serde_json::Value {
        self.data
    }

    /// Always fails: responses cannot be written to.
    pub fn try_set(
        &self,
        key: &str,
        _value: serde_json::Value,
    ) -> Result<(), ServerResponseError> {
        Err(ServerResponseError::new(format!(
            "Response is read-only; cannot set '{key}'"
        )))
    }

    /// Always fails: responses cannot be deleted from.
    pub fn try_remove(&self, key: &str) -> Result<serde_json::Value, ServerResponseError> {
        Err(ServerResponseError::new(format!(
            "Response is read-only; cannot remove '{key}'"
        )))
    }
}

impl Index<&str> for Response {
    type Output = serde_json::Value;

    /// Returns `Null` for absent keys.
    fn index(&self, key: &str) -> &Self::Output {
        self.data.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Response {
    type Output = serde_json::Value;

    fn index(&self, index: usize) -> &Self::Output {
        self.data.get(index).unwrap_or(&NULL)
    }
}

impl From<serde_json::Value> for Response {
    fn from(data: serde_json::Value) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Response {
        Response::new(json!({"id": "ch_1", "amount": 100}))
    }

    #[test]
    fn test_reads() {
        let response = response();
        assert!(response.contains("id"));
        assert!(!response.contains("missing"));
        assert_eq!(response["amount"], json!(100));
        assert_eq!(response["missing"], json!(null));
        assert_eq!(response.get("id"), Some(&json!("ch_1")));
        assert_eq!(response.len(), 2);
    }

    #[test]
    fn test_writes_fail() {
        let response = response();
        let err = response.try_set("amount", json!(1)).unwrap_err();
        assert!(err.message.contains("amount"));
        assert!(response.try_remove("id").is_err());
        assert_eq!(response["amount"], json!(100));
    }

    #[test]
    fn test_list_payload() {
        let response = Response::from_records(vec![json!({"a": 1}), json!({"a": 2})]);
        assert_eq!(response.len(), 2);
        assert_eq!(response[1]["a"], json!(2));
        assert_eq!(response[5], json!(null));
        assert!(!response.contains("a"));
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_value(response()).unwrap();
        assert_eq!(json, json!({"id": "ch_1", "amount": 100}));
    }
}
