//! Capability registry: six disjoint catalogs of plugin entities.
//!
//! `register` classifies a single entity by its variant; `register_many`
//! walks namespace trees and registers what they own. The registry is an
//! explicit value built once during startup discovery and handed to the
//! resolution engine by reference afterwards.

pub mod catalog;
pub mod discovery;
pub mod summary;
pub mod verify;

pub use catalog::Catalog;
pub use discovery::{DiscoveryOptions, DiscoveryReport, NamespaceVisit, RegisteredEntry};
pub use summary::RegistrySummary;

use crate::concrete::{ConcreteKind, ConcreteType};
use crate::entity::{Entity, TypeEntity};
use crate::error::{RegistryError, Result};
use crate::plugin::{AbstractAlgorithm, ConcreteAlgorithm, Translator};
use crate::types::AbstractType;
use catalog::address;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    AbstractTypes,
    ConcreteTypes,
    Wrappers,
    Translators,
    AbstractAlgorithms,
    ConcreteAlgorithms,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 6] = [
        CatalogKind::AbstractTypes,
        CatalogKind::ConcreteTypes,
        CatalogKind::Wrappers,
        CatalogKind::Translators,
        CatalogKind::AbstractAlgorithms,
        CatalogKind::ConcreteAlgorithms,
    ];

    /// Snake-case catalog name, as used in summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::AbstractTypes => "abstract_types",
            CatalogKind::ConcreteTypes => "concrete_types",
            CatalogKind::Wrappers => "wrappers",
            CatalogKind::Translators => "translators",
            CatalogKind::AbstractAlgorithms => "abstract_algorithms",
            CatalogKind::ConcreteAlgorithms => "concrete_algorithms",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
/// An entity that passed classification, tagged with its catalog.
pub enum Classified {
    AbstractType(Arc<AbstractType>),
    ConcreteType(Arc<ConcreteType>),
    Wrapper(Arc<ConcreteType>),
    Translator(Arc<Translator>),
    AbstractAlgorithm(Arc<AbstractAlgorithm>),
    ConcreteAlgorithm(Arc<ConcreteAlgorithm>),
}

impl Classified {
    /// The catalog this entity goes into.
    pub fn kind(&self) -> CatalogKind {
        match self {
            Classified::AbstractType(_) => CatalogKind::AbstractTypes,
            Classified::ConcreteType(_) => CatalogKind::ConcreteTypes,
            Classified::Wrapper(_) => CatalogKind::Wrappers,
            Classified::Translator(_) => CatalogKind::Translators,
            Classified::AbstractAlgorithm(_) => CatalogKind::AbstractAlgorithms,
            Classified::ConcreteAlgorithm(_) => CatalogKind::ConcreteAlgorithms,
        }
    }

    /// Display name; algorithm signatures use their path.
    pub fn name(&self) -> &str {
        match self {
            Classified::AbstractType(ty) => ty.name(),
            Classified::ConcreteType(ty) | Classified::Wrapper(ty) => ty.name(),
            Classified::Translator(t) => t.name(),
            Classified::AbstractAlgorithm(a) => a.path(),
            Classified::ConcreteAlgorithm(a) => a.name(),
        }
    }

    /// Catalog plus pointer identity; equal keys mean the same entity.
    pub(crate) fn key(&self) -> (CatalogKind, usize) {
        let address = match self {
            Classified::AbstractType(ty) => address(ty),
            Classified::ConcreteType(ty) | Classified::Wrapper(ty) => address(ty),
            Classified::Translator(t) => address(t),
            Classified::AbstractAlgorithm(a) => address(a),
            Classified::ConcreteAlgorithm(a) => address(a),
        };
        (self.kind(), address)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    abstract_types: Catalog<AbstractType>,
    concrete_types: Catalog<ConcreteType>,
    wrappers: Catalog<ConcreteType>,
    translators: Catalog<Translator>,
    abstract_algorithms: Catalog<AbstractAlgorithm>,
    concrete_algorithms: Catalog<ConcreteAlgorithm>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide which catalog `entity` belongs to without touching any catalog.
    ///
    /// Wrappers are checked against their abstract type's required
    /// capabilities here, so an incomplete wrapper never gets in.
    pub fn classify(entity: &Entity) -> Result<Classified> {
        let unclassifiable = |reason: &str| RegistryError::Classification {
            entity: entity.describe(),
            reason: reason.to_string(),
        };
        match entity {
            Entity::Type(TypeEntity::Abstract(ty)) => Ok(Classified::AbstractType(ty.clone())),
            Entity::Type(TypeEntity::Concrete(ty)) => match ty.kind() {
                ConcreteKind::Native => Ok(Classified::ConcreteType(ty.clone())),
                ConcreteKind::Wrapper(_) => {
                    let missing = ty.missing_capabilities();
                    if !missing.is_empty() {
                        return Err(RegistryError::MissingCapability {
                            wrapper: ty.name().to_string(),
                            missing: missing.iter().map(ToString::to_string).collect(),
                        });
                    }
                    Ok(Classified::Wrapper(ty.clone()))
                }
            },
            Entity::Type(TypeEntity::Base(_)) => {
                Err(unclassifiable("type bases themselves are not plugins"))
            }
            Entity::Type(TypeEntity::Plain(_)) => Err(unclassifiable(
                "extends none of AbstractType, ConcreteType, Wrapper",
            )),
            Entity::Translator(t) => Ok(Classified::Translator(t.clone())),
            Entity::AbstractAlgorithm(a) => Ok(Classified::AbstractAlgorithm(a.clone())),
            Entity::ConcreteAlgorithm(a) => Ok(Classified::ConcreteAlgorithm(a.clone())),
            Entity::Namespace(_) => Err(unclassifiable(
                "namespaces are scanned by register_many, not registered",
            )),
            Entity::Value(_) => Err(unclassifiable(
                "carries no translator or algorithm capability",
            )),
        }
    }

    /// Classify and insert one entity. Registering it again is a no-op.
    pub fn register(&mut self, entity: impl Into<Entity>) -> Result<CatalogKind> {
        let classified = Self::classify(&entity.into())?;
        let kind = classified.kind();
        self.insert(classified);
        Ok(kind)
    }

    /// Returns true when the entity was new to its catalog.
    pub(crate) fn insert(&mut self, classified: Classified) -> bool {
        let name = classified.name().to_string();
        let kind = classified.kind();
        let added = match classified {
            Classified::AbstractType(ty) => self.abstract_types.insert(ty),
            Classified::ConcreteType(ty) => self.concrete_types.insert(ty),
            Classified::Wrapper(ty) => self.wrappers.insert(ty),
            Classified::Translator(t) => self.translators.insert(t),
            Classified::AbstractAlgorithm(a) => self.abstract_algorithms.insert(a),
            Classified::ConcreteAlgorithm(a) => self.concrete_algorithms.insert(a),
        };
        if added {
            debug!(catalog = %kind, entity = %name, "registered plugin entity");
        }
        added
    }

    /// The catalog holding `entity`, if it has been registered.
    pub fn catalog_of(&self, entity: &Entity) -> Option<CatalogKind> {
        let classified = Self::classify(entity).ok()?;
        let present = match &classified {
            Classified::AbstractType(ty) => self.abstract_types.contains(ty),
            Classified::ConcreteType(ty) => self.concrete_types.contains(ty),
            Classified::Wrapper(ty) => self.wrappers.contains(ty),
            Classified::Translator(t) => self.translators.contains(t),
            Classified::AbstractAlgorithm(a) => self.abstract_algorithms.contains(a),
            Classified::ConcreteAlgorithm(a) => self.concrete_algorithms.contains(a),
        };
        present.then(|| classified.kind())
    }

    /// Registered abstract types in insertion order.
    pub fn abstract_types(&self) -> &Catalog<AbstractType> {
        &self.abstract_types
    }

    /// Registered native concrete types; wrappers live in [`Registry::wrappers`].
    pub fn concrete_types(&self) -> &Catalog<ConcreteType> {
        &self.concrete_types
    }

    /// Registered wrapper types.
    pub fn wrappers(&self) -> &Catalog<ConcreteType> {
        &self.wrappers
    }

    /// Registered translators.
    pub fn translators(&self) -> &Catalog<Translator> {
        &self.translators
    }

    /// Registered abstract algorithm signatures.
    pub fn abstract_algorithms(&self) -> &Catalog<AbstractAlgorithm> {
        &self.abstract_algorithms
    }

    /// Registered algorithm implementations.
    pub fn concrete_algorithms(&self) -> &Catalog<ConcreteAlgorithm> {
        &self.concrete_algorithms
    }

    /// Number of entries in one catalog.
    pub fn count(&self, kind: CatalogKind) -> usize {
        match kind {
            CatalogKind::AbstractTypes => self.abstract_types.len(),
            CatalogKind::ConcreteTypes => self.concrete_types.len(),
            CatalogKind::Wrappers => self.wrappers.len(),
            CatalogKind::Translators => self.translators.len(),
            CatalogKind::AbstractAlgorithms => self.abstract_algorithms.len(),
            CatalogKind::ConcreteAlgorithms => self.concrete_algorithms.len(),
        }
    }

    /// Total entries across all six catalogs.
    pub fn len(&self) -> usize {
        CatalogKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    /// True when no catalog holds anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concrete types and wrappers together, for lookups that accept either.
    pub fn all_concrete_types(&self) -> impl Iterator<Item = &Arc<ConcreteType>> {
        self.concrete_types.iter().chain(self.wrappers.iter())
    }
}
