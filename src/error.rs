//! Error taxonomy shared by the type model, concrete bindings, and registry.
//!
//! Every failure is surfaced synchronously to the caller; discovery and
//! declaration are one-shot startup steps, so nothing here is retried.
//! Plugin-authored code (representations, conversions) returns
//! `anyhow::Result`, which lands in [`RegistryError::Plugin`].

use crate::concrete::equality::{Aspect, Tolerance};
use crate::namespace::NamespaceId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid object for plugin registry: {entity} ({reason})")]
    Classification { entity: String, reason: String },

    #[error("expected one or more namespaces; argument {position} is {found}")]
    ArgumentType { position: usize, found: String },

    #[error("type {type_name} does not declare property '{property}'")]
    UnknownProperty { type_name: String, property: String },

    #[error("property '{property}' of {type_name} cannot take value {value}")]
    InvalidPropertyValue {
        type_name: String,
        property: String,
        value: String,
    },

    #[error("reduction {from} -> {to} would close a cycle: {}", cycle.join(" -> "))]
    ReductionCycle {
        from: String,
        to: String,
        cycle: Vec<String>,
    },

    #[error("reduction {from} -> {to} is ambiguous: {from} already reduces to {existing}")]
    AmbiguousReduction {
        from: String,
        to: String,
        existing: String,
    },

    #[error("unknown abstract type '{0}'")]
    UnknownAbstractType(String),

    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("namespace {0} does not belong to this namespace graph")]
    UnknownNamespace(NamespaceId),

    #[error("wrapper {wrapper} is missing required capabilities: {}", missing.join(", "))]
    MissingCapability {
        wrapper: String,
        missing: Vec<String>,
    },

    #[error("{concrete} expects instances of {expected}")]
    InstanceType { concrete: String, expected: String },

    #[error("{concrete} did not compute requested property '{property}'")]
    MissingProperty { concrete: String, property: String },

    #[error("values differ in {aspect}: {detail} ({tolerance})")]
    ValueMismatch {
        aspect: Aspect,
        detail: String,
        tolerance: Tolerance,
    },

    #[error("type manifest {}: {detail}", path.display())]
    Manifest { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("plugin error: {0:#}")]
    Plugin(#[from] anyhow::Error),
}

impl RegistryError {
    /// Build a [`RegistryError::ValueMismatch`] for `assert_equal` implementations.
    pub fn mismatch(aspect: Aspect, detail: impl Into<String>, tolerance: Tolerance) -> Self {
        RegistryError::ValueMismatch {
            aspect,
            detail: detail.into(),
            tolerance,
        }
    }
}
