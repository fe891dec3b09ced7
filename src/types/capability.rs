//! Named operations an abstract type requires of wrappers bound to it.
//!
//! A wrapper declares the capabilities it provides; satisfaction is a plain
//! set comparison, never inferred from how the wrapper is implemented.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RequiredCapability {
    Method(String),
    Property(String),
}

impl fmt::Display for RequiredCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredCapability::Method(name) => write!(f, "method {name}"),
            RequiredCapability::Property(name) => write!(f, "property {name}"),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered set of required or provided capabilities.
pub struct CapabilitySet(BTreeSet<RequiredCapability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, name: impl Into<String>) -> Self {
        self.0.insert(RequiredCapability::Method(name.into()));
        self
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.0.insert(RequiredCapability::Property(name.into()));
        self
    }

    pub fn insert(&mut self, capability: RequiredCapability) -> bool {
        self.0.insert(capability)
    }

    pub fn contains(&self, capability: &RequiredCapability) -> bool {
        self.0.contains(capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequiredCapability> {
        self.0.iter()
    }

    /// Capabilities in `self` that `provided` lacks.
    pub fn missing_from(&self, provided: &CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0.difference(&provided.0).cloned().collect())
    }
}

impl FromIterator<RequiredCapability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = RequiredCapability>>(iter: T) -> Self {
        CapabilitySet(iter.into_iter().collect())
    }
}
