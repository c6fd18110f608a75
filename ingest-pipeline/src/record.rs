//! Core data models used by the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A document to be embedded and stored.
///
/// `id` may be empty, in which case the converter/backend is free to assign one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a document without metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds one metadata entry (builder style).
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Position of a batch inside the input: `[start, start + len)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSpan {
    pub start: usize,
    pub len: usize,
}

impl BatchSpan {
    /// Exclusive end index.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A contiguous slice of the input processed as one unit.
#[derive(Clone, Debug)]
pub struct Batch {
    pub start_offset: usize,
    pub docs: Vec<Document>,
}

impl Batch {
    pub fn span(&self) -> BatchSpan {
        BatchSpan {
            start: self.start_offset,
            len: self.docs.len(),
        }
    }
}

/// Identifier returned or confirmed by a backend for one inserted row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointKey {
    Num(u64),
    Str(String),
}

impl From<u64> for PointKey {
    fn from(n: u64) -> Self {
        PointKey::Num(n)
    }
}

impl From<String> for PointKey {
    fn from(s: String) -> Self {
        PointKey::Str(s)
    }
}

impl From<&str> for PointKey {
    fn from(s: &str) -> Self {
        PointKey::Str(s.to_string())
    }
}

impl From<PointKey> for String {
    fn from(k: PointKey) -> Self {
        match k {
            PointKey::Num(n) => n.to_string(),
            PointKey::Str(s) => s,
        }
    }
}

/// Result of a single backend insert: one id per row, in submission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertResult {
    pub ids: Vec<PointKey>,
}

impl InsertResult {
    pub fn new(ids: impl IntoIterator<Item = impl Into<PointKey>>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Ids coerced to strings, preserving order.
    pub fn into_strings(self) -> Vec<String> {
        self.ids.into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_coerced() {
        let r = InsertResult {
            ids: vec![PointKey::Num(7), PointKey::Str("abc".into()), 42u64.into()],
        };
        assert_eq!(r.into_strings(), vec!["7", "abc", "42"]);
    }

    #[test]
    fn document_defaults_on_deserialize() {
        let d: Document = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
        assert!(d.id.is_empty());
        assert!(d.metadata.is_empty());
        assert_eq!(d.content, "hello");
    }
}
