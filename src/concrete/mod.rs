//! Concrete type bindings and the property-computation contract.
//!
//! A [`ConcreteType`] binds one Rust value type (the representation) to
//! exactly one [`AbstractType`]. It owns no instance data: callers hand
//! instances in as `&dyn Any` and the binding checks they are of the declared
//! representation before delegating to the plugin's [`Representation`].
//!
//! Wrappers are concrete types whose representation lacks operations the
//! abstract type requires; they list the capabilities they provide, and the
//! registry compares that list with the abstract type's requirements.

pub mod equality;

use crate::error::{RegistryError, Result};
use crate::types::{AbstractType, CapabilitySet, PropertyMap};
use equality::Tolerance;
use std::any::{Any, TypeId, type_name};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Plugin-side behavior for one representation.
pub trait Representation: Send + Sync + 'static {
    type Value: Any;

    /// Compute property values for `value`.
    ///
    /// Every property in `request` must be present in the result; extra
    /// values are allowed. Properties that need a scan of the instance data
    /// should only be computed when `request.wants` them.
    fn compute_properties(
        &self,
        value: &Self::Value,
        request: &PropertyRequest<'_>,
    ) -> anyhow::Result<PropertyMap>;

    /// Fail with [`RegistryError::ValueMismatch`] when the instances differ.
    fn assert_equal(&self, left: &Self::Value, right: &Self::Value, tolerance: Tolerance)
    -> Result<()>;
}

#[derive(Clone, Copy, Debug)]
/// The set of property names a caller asked for.
pub struct PropertyRequest<'a> {
    names: &'a BTreeSet<String>,
}

impl<'a> PropertyRequest<'a> {
    pub fn new(names: &'a BTreeSet<String>) -> Self {
        Self { names }
    }

    /// Whether `property` was requested; compute only what is wanted.
    pub fn wants(&self, property: &str) -> bool {
        self.names.contains(property)
    }

    /// Requested names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'a str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// Discriminant fixed when a concrete type is constructed.
pub enum ConcreteKind {
    Native,
    Wrapper(CapabilitySet),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
/// The Rust value type a concrete type interprets.
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, instance: &dyn Any) -> bool {
        instance.type_id() == self.id
    }
}

pub struct ConcreteType {
    name: String,
    abstract_type: Arc<AbstractType>,
    value_type: ValueType,
    kind: ConcreteKind,
    behavior: Box<dyn ErasedRepresentation>,
}

impl ConcreteType {
    /// A representation with native support for its abstract type.
    pub fn native<R: Representation>(
        name: impl Into<String>,
        abstract_type: Arc<AbstractType>,
        representation: R,
    ) -> Self {
        Self::build(name.into(), abstract_type, ConcreteKind::Native, representation)
    }

    /// A wrapper supplying `provides` on top of its representation.
    pub fn wrapper<R: Representation>(
        name: impl Into<String>,
        abstract_type: Arc<AbstractType>,
        provides: CapabilitySet,
        representation: R,
    ) -> Self {
        Self::build(
            name.into(),
            abstract_type,
            ConcreteKind::Wrapper(provides),
            representation,
        )
    }

    fn build<R: Representation>(
        name: String,
        abstract_type: Arc<AbstractType>,
        kind: ConcreteKind,
        representation: R,
    ) -> Self {
        Self {
            name,
            abstract_type,
            value_type: ValueType::of::<R::Value>(),
            kind,
            behavior: Box::new(representation),
        }
    }

    /// Name the type was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The abstract type this concrete type implements.
    pub fn abstract_type(&self) -> &Arc<AbstractType> {
        &self.abstract_type
    }

    /// The Rust value type instances must have.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Native or wrapper, fixed at construction.
    pub fn kind(&self) -> &ConcreteKind {
        &self.kind
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self.kind, ConcreteKind::Wrapper(_))
    }

    /// Whether `instance` has this type's value type.
    pub fn is_instance(&self, instance: &dyn Any) -> bool {
        self.value_type.matches(instance)
    }

    /// Required capabilities this type does not provide.
    ///
    /// Native types are taken to support their abstract type directly and
    /// never report anything missing.
    pub fn missing_capabilities(&self) -> CapabilitySet {
        match &self.kind {
            ConcreteKind::Native => CapabilitySet::new(),
            ConcreteKind::Wrapper(provides) => self
                .abstract_type
                .required_capabilities()
                .missing_from(provides),
        }
    }

    /// Compute the requested properties of `instance`.
    ///
    /// Requested names are validated against the abstract type before the
    /// representation runs, so an undeclared name never triggers computation.
    pub fn compute_properties(
        &self,
        instance: &dyn Any,
        requested: &BTreeSet<String>,
    ) -> Result<PropertyMap> {
        self.check_instance(instance)?;
        self.abstract_type
            .validate_properties(requested.iter().map(String::as_str))?;
        trace!(concrete = %self.name, ?requested, "computing properties");

        let computed = self
            .behavior
            .compute_properties(instance, &PropertyRequest::new(requested))?;
        for property in requested {
            if !computed.contains_key(property) {
                return Err(RegistryError::MissingProperty {
                    concrete: self.name.clone(),
                    property: property.clone(),
                });
            }
        }
        self.abstract_type.validate_values(&computed)?;
        Ok(computed)
    }

    /// Compare two instances, failing with `ValueMismatch` on the first difference.
    pub fn assert_equal(&self, left: &dyn Any, right: &dyn Any, tolerance: Tolerance) -> Result<()> {
        self.check_instance(left)?;
        self.check_instance(right)?;
        self.behavior.assert_equal(left, right, tolerance)
    }

    fn check_instance(&self, instance: &dyn Any) -> Result<()> {
        if self.is_instance(instance) {
            Ok(())
        } else {
            Err(RegistryError::InstanceType {
                concrete: self.name.clone(),
                expected: self.value_type.name().to_string(),
            })
        }
    }
}

impl fmt::Debug for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcreteType")
            .field("name", &self.name)
            .field("abstract_type", &self.abstract_type.name())
            .field("value_type", &self.value_type.name())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Object-safe view of a [`Representation`]; callers have already checked the
/// instance type, so a failed downcast is reported rather than trusted.
trait ErasedRepresentation: Send + Sync {
    fn compute_properties(
        &self,
        instance: &dyn Any,
        request: &PropertyRequest<'_>,
    ) -> Result<PropertyMap>;

    fn assert_equal(&self, left: &dyn Any, right: &dyn Any, tolerance: Tolerance) -> Result<()>;
}

impl<R: Representation> ErasedRepresentation for R {
    fn compute_properties(
        &self,
        instance: &dyn Any,
        request: &PropertyRequest<'_>,
    ) -> Result<PropertyMap> {
        let value = downcast::<R::Value>(instance)?;
        Ok(Representation::compute_properties(self, value, request)?)
    }

    fn assert_equal(&self, left: &dyn Any, right: &dyn Any, tolerance: Tolerance) -> Result<()> {
        let left = downcast::<R::Value>(left)?;
        let right = downcast::<R::Value>(right)?;
        Representation::assert_equal(self, left, right, tolerance)
    }
}

fn downcast<T: Any>(instance: &dyn Any) -> Result<&T> {
    instance
        .downcast_ref::<T>()
        .ok_or_else(|| RegistryError::InstanceType {
            concrete: type_name::<T>().to_string(),
            expected: type_name::<T>().to_string(),
        })
}
