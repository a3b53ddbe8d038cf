//! In-memory session records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record key: a string, or an integer canonicalized to its decimal form.
///
/// The storage layout has a single flat string key space, so the key `7`
/// and the key `"7"` address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    /// The canonical string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<i64> for Key {
    fn from(key: i64) -> Self {
        Self(key.to_string())
    }
}

impl From<u64> for Key {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A session's key-value bundle.
///
/// Values are arbitrary JSON, so any scalar or array round-trips through
/// storage unchanged. Persisted as a single self-describing JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.0.get(key.into().as_str())
    }

    /// Insert or overwrite a value, returning the previous one if any.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into().0, value.into())
    }

    /// Remove a value by key, returning it if present.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.0.remove(key.into().as_str())
    }

    /// Whether the key is present.
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.0.contains_key(key.into().as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_keys_canonicalize() {
        let mut record = Record::new();
        record.insert(7i64, "seven");
        assert_eq!(record.get("7"), Some(&json!("seven")));
        assert!(record.contains(7u64));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut record = Record::new();
        assert_eq!(record.insert("k", 1), None);
        assert_eq!(record.insert("k", 2), Some(json!(1)));
        assert_eq!(record.get("k"), Some(&json!(2)));
    }

    #[test]
    fn test_remove() {
        let mut record = Record::new();
        record.insert("k", json!([1, 2, 3]));
        assert_eq!(record.remove("k"), Some(json!([1, 2, 3])));
        assert_eq!(record.remove("k"), None);
        assert!(record.is_empty());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut record = Record::new();
        record.insert("user", "ada");
        record.insert("visits", 3);
        record.insert("flags", json!(["a", "b"]));

        let blob = serde_json::to_vec(&record).unwrap();
        let decoded: Record = serde_json::from_slice(&blob).unwrap();
        assert_eq!(decoded, record);
    }
}
