//! Plugin capability registry.
//!
//! The crate models data structures abstractly ([`types`]), binds concrete
//! Rust representations to them ([`concrete`]), and collects plugin-provided
//! types, translators, and algorithms into a [`Registry`] by scanning a
//! namespace graph ([`namespace`]). The registry is built once at startup and
//! read afterwards by whatever resolves and dispatches algorithm calls.
//!
//! Discovery switches can be taken from the environment through
//! [`DiscoveryOptions::from_env`]; see [`registry::discovery`] for the
//! variables.

pub mod builtin;
pub mod concrete;
pub mod entity;
pub mod error;
pub mod namespace;
pub mod plugin;
pub mod registry;
pub mod types;

pub use builtin::{BuiltinNamespaces, EdgeListPlugin};
pub use concrete::equality::{Aspect, Tolerance};
pub use concrete::{ConcreteKind, ConcreteType, PropertyRequest, Representation, ValueType};
pub use entity::{Entity, TypeBase, TypeEntity};
pub use error::{RegistryError, Result};
pub use namespace::{Member, NamespaceId, Namespaces};
pub use plugin::{
    AbstractAlgorithm, ConcreteAlgorithm, ConcreteParamType, ParamType, ScalarKind, ScalarValue,
    Translator,
};
pub use registry::{
    CatalogKind, Classified, DiscoveryOptions, DiscoveryReport, Registry, RegistrySummary,
};
pub use types::{
    AbstractType, CapabilitySet, PropertyMap, PropertyValue, TypeDeclaration, TypeModel,
};

use tracing::info;

#[derive(Debug)]
/// Everything produced by a default startup.
pub struct Bootstrap {
    pub model: TypeModel,
    pub space: Namespaces,
    pub namespaces: BuiltinNamespaces,
    pub registry: Registry,
    pub report: DiscoveryReport,
    /// Output of [`Registry::verify`]; empty when the plugins agree.
    pub problems: Vec<String>,
}

/// Declare the standard types, install the bundled plugins, and discover them
/// into a fresh registry.
pub fn bootstrap(options: &DiscoveryOptions) -> Result<Bootstrap> {
    let model = types::standard::standard_model()?;
    let mut space = Namespaces::new();
    let namespaces = builtin::install(&mut space, &model)?;

    let mut registry = Registry::new();
    let report = registry.register_many(
        &space,
        &[
            Entity::Namespace(namespaces.core),
            Entity::Namespace(namespaces.edge_list),
        ],
        options,
    )?;
    let problems = registry.verify();
    info!(
        entities = registry.len(),
        problems = problems.len(),
        "bootstrapped plugin registry"
    );
    Ok(Bootstrap {
        model,
        space,
        namespaces,
        registry,
        report,
        problems,
    })
}
