//! Feature attribute values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single feature attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    Double(f64),
    String(String),
}

/// Feature attributes keyed by name.
pub type PropertyMap = BTreeMap<String, Value>;

/// Identifier attached to a feature by its tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureIdentifier {
    UInt(u64),
    Int(i64),
    Double(f64),
    String(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<u64> for FeatureIdentifier {
    fn from(v: u64) -> Self {
        FeatureIdentifier::UInt(v)
    }
}

impl From<&str> for FeatureIdentifier {
    fn from(v: &str) -> Self {
        FeatureIdentifier::String(v.to_string())
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::UInt(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_is_ordered_by_key() {
        let mut props = PropertyMap::new();
        props.insert("rank".into(), Value::UInt(3));
        props.insert("name".into(), "Cafe".into());
        props.insert("open".into(), true.into());

        let keys: Vec<&str> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "open", "rank"]);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Value::Int(-2).as_f64(), Some(-2.0));
        assert_eq!(Value::from("x").as_f64(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::default(), Value::Null);
    }
}
