//! The closed set of things a plugin namespace can export.
//!
//! Every declaration carries its discriminant from construction, so the
//! registry classifies by matching on these variants instead of probing what
//! an object looks like.

use crate::concrete::ConcreteType;
use crate::namespace::NamespaceId;
use crate::plugin::{AbstractAlgorithm, ConcreteAlgorithm, Translator};
use crate::types::AbstractType;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// The three type bases plugin types extend.
pub enum TypeBase {
    AbstractType,
    ConcreteType,
    Wrapper,
}

impl TypeBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeBase::AbstractType => "AbstractType",
            TypeBase::ConcreteType => "ConcreteType",
            TypeBase::Wrapper => "Wrapper",
        }
    }
}

#[derive(Clone, Debug)]
pub enum TypeEntity {
    /// One of the bases itself, typically re-exported for plugin authors.
    Base(TypeBase),
    Abstract(Arc<AbstractType>),
    /// Native concrete types and wrappers; [`ConcreteType::kind`] tells them apart.
    Concrete(Arc<ConcreteType>),
    /// A type extending none of the bases (helper structs, marker types).
    Plain(Arc<str>),
}

#[derive(Clone, Debug)]
pub enum Entity {
    Type(TypeEntity),
    Translator(Arc<Translator>),
    AbstractAlgorithm(Arc<AbstractAlgorithm>),
    ConcreteAlgorithm(Arc<ConcreteAlgorithm>),
    Namespace(NamespaceId),
    /// Any other exported value (constants, helper functions).
    Value(Arc<str>),
}

impl Entity {
    pub fn plain_type(name: &str) -> Self {
        Entity::Type(TypeEntity::Plain(Arc::from(name)))
    }

    pub fn value(description: &str) -> Self {
        Entity::Value(Arc::from(description))
    }

    /// Short human-readable description used in errors and logs.
    pub fn describe(&self) -> String {
        match self {
            Entity::Type(TypeEntity::Base(base)) => format!("type base {}", base.as_str()),
            Entity::Type(TypeEntity::Abstract(ty)) => format!("abstract type {}", ty.name()),
            Entity::Type(TypeEntity::Concrete(ty)) if ty.is_wrapper() => {
                format!("wrapper {}", ty.name())
            }
            Entity::Type(TypeEntity::Concrete(ty)) => format!("concrete type {}", ty.name()),
            Entity::Type(TypeEntity::Plain(name)) => format!("plain type {name}"),
            Entity::Translator(t) => format!("translator {}", t.name()),
            Entity::AbstractAlgorithm(a) => format!("abstract algorithm {}", a.path()),
            Entity::ConcreteAlgorithm(a) => format!("concrete algorithm {}", a.name()),
            Entity::Namespace(id) => format!("namespace {id}"),
            Entity::Value(description) => format!("value {description}"),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<TypeBase> for Entity {
    fn from(base: TypeBase) -> Self {
        Entity::Type(TypeEntity::Base(base))
    }
}

impl From<Arc<AbstractType>> for Entity {
    fn from(ty: Arc<AbstractType>) -> Self {
        Entity::Type(TypeEntity::Abstract(ty))
    }
}

impl From<Arc<ConcreteType>> for Entity {
    fn from(ty: Arc<ConcreteType>) -> Self {
        Entity::Type(TypeEntity::Concrete(ty))
    }
}

impl From<Arc<Translator>> for Entity {
    fn from(translator: Arc<Translator>) -> Self {
        Entity::Translator(translator)
    }
}

impl From<Arc<AbstractAlgorithm>> for Entity {
    fn from(algorithm: Arc<AbstractAlgorithm>) -> Self {
        Entity::AbstractAlgorithm(algorithm)
    }
}

impl From<Arc<ConcreteAlgorithm>> for Entity {
    fn from(algorithm: Arc<ConcreteAlgorithm>) -> Self {
        Entity::ConcreteAlgorithm(algorithm)
    }
}

impl From<NamespaceId> for Entity {
    fn from(id: NamespaceId) -> Self {
        Entity::Namespace(id)
    }
}
