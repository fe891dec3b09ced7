//! JSON manifests declaring abstract types.
//!
//! A manifest is validated against `schema/type_manifest.schema.json`
//! (embedded at build time) before it is deserialized, then declared into a
//! [`TypeModel`] in file order. Reduction targets must appear before the types
//! that reduce to them.

use crate::error::{RegistryError, Result};
use crate::types::abstract_type::{AbstractType, TypeDeclaration};
use crate::types::model::TypeModel;
use crate::types::property::PropertyValue;
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

pub const MANIFEST_SCHEMA_VERSION: &str = "type_manifest_v1";

const MANIFEST_SCHEMA: &str = include_str!("../../schema/type_manifest.schema.json");

#[derive(Clone, Debug, Deserialize)]
pub struct TypeManifest {
    pub schema_version: String,
    pub types: Vec<ManifestType>,
}

#[derive(Clone, Debug, Deserialize)]
/// One abstract type as written in a manifest.
pub struct ManifestType {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    #[serde(default)]
    pub subcomponents: Vec<String>,
    #[serde(default)]
    pub required_methods: Vec<String>,
    #[serde(default)]
    pub required_properties: Vec<String>,
}

impl ManifestType {
    fn declaration(&self) -> TypeDeclaration {
        let mut declaration = TypeDeclaration::new(self.name.clone());
        for (property, values) in &self.properties {
            declaration = declaration.property(property.clone(), values.iter().cloned());
        }
        for sub in &self.subcomponents {
            declaration = declaration.reduces_to(sub.clone());
        }
        for method in &self.required_methods {
            declaration = declaration.requires_method(method.clone());
        }
        for property in &self.required_properties {
            declaration = declaration.requires_property(property.clone());
        }
        declaration
    }
}

impl TypeManifest {
    /// Read, schema-validate, and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let value: Value =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| manifest_error(path, err))?;
        Self::from_value(path, value)
    }

    /// Validate an already-parsed manifest. `origin` is only used in errors.
    pub fn from_value(origin: &Path, value: Value) -> Result<Self> {
        let schema: Value = serde_json::from_str(MANIFEST_SCHEMA)?;
        let compiled =
            JSONSchema::compile(&schema).map_err(|err| manifest_error(origin, err))?;
        if let Err(errors) = compiled.validate(&value) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return Err(RegistryError::Manifest {
                path: origin.to_path_buf(),
                detail: format!("failed schema validation:\n{details}"),
            });
        }
        serde_json::from_value(value).map_err(|err| manifest_error(origin, err))
    }
}

impl TypeModel {
    /// Declare every type in `manifest`, stopping at the first failure.
    ///
    /// Types declared before the failing entry stay in the model.
    pub fn declare_manifest(&mut self, manifest: &TypeManifest) -> Result<Vec<Arc<AbstractType>>> {
        manifest
            .types
            .iter()
            .map(|entry| self.declare(entry.declaration()))
            .collect()
    }
}

fn manifest_error(path: &Path, err: impl std::fmt::Display) -> RegistryError {
    RegistryError::Manifest {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
