use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-supplied diagnostic metadata attached to an error envelope
pub type ErrorContext = BTreeMap<String, ContextValue>;

/// A single context value.
///
/// Serialized untagged, so `{"user_id": "abc", "attempt": 2}` maps
/// straight onto `String` and `Integer` variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ContextValue>),
    Map(BTreeMap<String, ContextValue>),
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<uuid::Uuid> for ContextValue {
    fn from(value: uuid::Uuid) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, ContextValue>> for ContextValue {
    fn from(map: BTreeMap<String, ContextValue>) -> Self {
        Self::Map(map)
    }
}

/// Build an [`ErrorContext`] from key/value pairs
pub fn context<K, V, I>(pairs: I) -> ErrorContext
where
    K: Into<String>,
    V: Into<ContextValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
