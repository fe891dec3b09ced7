//! Property values and the closed domains abstract types declare for them.
//!
//! Property domains are static enumerations: an abstract type lists every
//! legal value up front, and computed property maps are checked against that
//! list. Values serialize untagged so manifests can write `true`, `3`, or
//! `"float"` directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Legal `dtype` values shared by the standard types.
pub const DTYPE_CHOICES: &[&str] = &["str", "float", "int", "bool"];

/// Computed or requested property values keyed by property name.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(untagged)]
/// A single closed-enumeration property value.
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Str(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
/// Finite, ordered, duplicate-free set of legal values for one property.
pub struct PropertyDomain(Vec<PropertyValue>);

impl PropertyDomain {
    /// Returns `None` when `values` is empty or repeats a value.
    pub fn new<I, V>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        let mut domain = Vec::new();
        for value in values {
            let value = value.into();
            if domain.contains(&value) {
                return None;
            }
            domain.push(value);
        }
        if domain.is_empty() {
            None
        } else {
            Some(Self(domain))
        }
    }

    /// Whether `value` is legal for this property.
    pub fn contains(&self, value: &PropertyValue) -> bool {
        self.0.contains(value)
    }

    /// Legal values in declaration order.
    pub fn values(&self) -> &[PropertyValue] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_rejects_empty_and_duplicate_values() {
        assert!(PropertyDomain::new(Vec::<bool>::new()).is_none());
        assert!(PropertyDomain::new(["int", "int"]).is_none());
        let domain = PropertyDomain::new(["int", "float"]).expect("valid domain");
        assert!(domain.contains(&PropertyValue::from("float")));
        assert!(!domain.contains(&PropertyValue::from("str")));
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            PropertyValue::Bool(true),
            PropertyValue::Int(3),
            PropertyValue::from("float"),
        ])
        .unwrap();
        assert_eq!(json, r#"[true,3,"float"]"#);
        let back: Vec<PropertyValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], PropertyValue::Bool(true));
        assert_eq!(back[2].as_str(), Some("float"));
    }
}
