//! Abstract type descriptions and the declarations that produce them.

use crate::error::{RegistryError, Result};
use crate::types::capability::CapabilitySet;
use crate::types::property::{PropertyDomain, PropertyMap, PropertyValue};
use std::collections::BTreeMap;

#[derive(Debug)]
/// A named type with closed property enumerations.
///
/// Instances are created through [`crate::types::TypeModel::declare`], which
/// also records the type's reduction edges. The type itself is immutable and
/// shared by `Arc`; registry catalogs key it by identity.
pub struct AbstractType {
    name: String,
    properties: BTreeMap<String, PropertyDomain>,
    required: CapabilitySet,
}

impl AbstractType {
    pub(crate) fn from_declaration(declaration: &TypeDeclaration) -> Result<Self> {
        if declaration.name.trim().is_empty() {
            return Err(RegistryError::InvalidDeclaration(
                "abstract type name must not be empty".to_string(),
            ));
        }
        let mut properties = BTreeMap::new();
        for (property, values) in &declaration.properties {
            let domain = PropertyDomain::new(values.iter().cloned()).ok_or_else(|| {
                RegistryError::InvalidDeclaration(format!(
                    "property '{property}' of {} needs a non-empty set of distinct values",
                    declaration.name
                ))
            })?;
            if properties.insert(property.clone(), domain).is_some() {
                return Err(RegistryError::InvalidDeclaration(format!(
                    "property '{property}' declared twice on {}",
                    declaration.name
                )));
            }
        }
        Ok(Self {
            name: declaration.name.clone(),
            properties,
            required: declaration.required.clone(),
        })
    }

    /// Name the type was declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared properties and their legal values.
    pub fn properties(&self) -> &BTreeMap<String, PropertyDomain> {
        &self.properties
    }

    /// Legal values of one property.
    pub fn domain(&self, property: &str) -> Option<&PropertyDomain> {
        self.properties.get(property)
    }

    /// Capabilities a wrapper bound to this type must provide.
    pub fn required_capabilities(&self) -> &CapabilitySet {
        &self.required
    }

    /// Fail on the first requested name the type does not declare.
    pub fn validate_properties<'a, I>(&self, requested: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for property in requested {
            if !self.properties.contains_key(property) {
                return Err(RegistryError::UnknownProperty {
                    type_name: self.name.clone(),
                    property: property.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Check every declared property in `values` holds a legal value.
    ///
    /// Entries for properties the type does not declare are left alone.
    pub fn validate_values(&self, values: &PropertyMap) -> Result<()> {
        for (property, value) in values {
            if let Some(domain) = self.properties.get(property) {
                if !domain.contains(value) {
                    return Err(RegistryError::InvalidPropertyValue {
                        type_name: self.name.clone(),
                        property: property.clone(),
                        value: value.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Like [`Self::validate_values`] but also rejects undeclared names.
    pub fn validate_constraints(&self, constraints: &PropertyMap) -> Result<()> {
        self.validate_properties(constraints.keys().map(String::as_str))?;
        self.validate_values(constraints)
    }
}

#[derive(Clone, Debug, Default)]
/// Input to [`crate::types::TypeModel::declare`].
pub struct TypeDeclaration {
    pub(crate) name: String,
    pub(crate) properties: Vec<(String, Vec<PropertyValue>)>,
    pub(crate) subcomponents: Vec<String>,
    pub(crate) required: CapabilitySet,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn property<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        self.properties
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// Declare an unambiguous structural reduction to an existing type. A type
    /// has at most one target; naming a second fails at declaration.
    pub fn reduces_to(mut self, subcomponent: impl Into<String>) -> Self {
        self.subcomponents.push(subcomponent.into());
        self
    }

    pub fn requires_method(mut self, name: impl Into<String>) -> Self {
        self.required = self.required.with_method(name);
        self
    }

    pub fn requires_property(mut self, name: impl Into<String>) -> Self {
        self.required = self.required.with_property(name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
