//! Abstract type and property model.
//!
//! Abstract types name a data structure independently of representation.
//! Each declares closed property enumerations, the capabilities wrappers
//! must provide, and structural reductions to simpler types. `TypeModel`
//! owns the declared types and keeps the reduction graph acyclic and
//! unambiguous.

pub mod abstract_type;
pub mod capability;
pub mod manifest;
pub mod model;
pub mod property;
pub mod standard;

pub use abstract_type::{AbstractType, TypeDeclaration};
pub use capability::{CapabilitySet, RequiredCapability};
pub use manifest::{MANIFEST_SCHEMA_VERSION, ManifestType, TypeManifest};
pub use model::TypeModel;
pub use property::{DTYPE_CHOICES, PropertyDomain, PropertyMap, PropertyValue};
