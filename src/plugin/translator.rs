//! Directed conversion edges between concrete types.

use crate::concrete::{ConcreteType, ValueType};
use crate::error::{RegistryError, Result};
use crate::types::PropertyMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Conversion contract: an instance of the source representation plus
/// optional property hints in, an instance of the target representation out.
pub type Conversion =
    Arc<dyn Fn(&dyn Any, &PropertyMap) -> anyhow::Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

pub struct Translator {
    name: String,
    source: Arc<ConcreteType>,
    target: Arc<ConcreteType>,
    conversion: Conversion,
}

impl Translator {
    pub fn new(
        name: impl Into<String>,
        source: Arc<ConcreteType>,
        target: Arc<ConcreteType>,
        conversion: Conversion,
    ) -> Result<Self> {
        let name = name.into();
        if Arc::ptr_eq(&source, &target) {
            return Err(RegistryError::InvalidDeclaration(format!(
                "translator {name} converts {} into itself",
                source.name()
            )));
        }
        Ok(Self {
            name,
            source,
            target,
            conversion,
        })
    }

    /// Build a translator from a typed function.
    ///
    /// `S` and `T` must be the value types of `source` and `target`.
    pub fn from_fn<S, T, F>(
        name: impl Into<String>,
        source: Arc<ConcreteType>,
        target: Arc<ConcreteType>,
        convert: F,
    ) -> Result<Self>
    where
        S: Any,
        T: Any + Send + Sync,
        F: Fn(&S, &PropertyMap) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        for (side, concrete, expected) in [
            ("source", &source, ValueType::of::<S>()),
            ("target", &target, ValueType::of::<T>()),
        ] {
            if concrete.value_type() != expected {
                return Err(RegistryError::InvalidDeclaration(format!(
                    "translator {name}: {side} {} holds {}, not {}",
                    concrete.name(),
                    concrete.value_type().name(),
                    expected.name()
                )));
            }
        }
        let conversion: Conversion = Arc::new(
            move |instance: &dyn Any, hints: &PropertyMap| -> anyhow::Result<Box<dyn Any + Send + Sync>> {
                let value = instance
                    .downcast_ref::<S>()
                    .ok_or_else(|| anyhow::anyhow!("expected {}", std::any::type_name::<S>()))?;
                Ok(Box::new(convert(value, hints)?))
            },
        );
        Self::new(name, source, target, conversion)
    }

    /// Name the translator was exported under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete type converted from.
    pub fn source(&self) -> &Arc<ConcreteType> {
        &self.source
    }

    /// Concrete type converted to.
    pub fn target(&self) -> &Arc<ConcreteType> {
        &self.target
    }

    /// The conversion callable, for the engine that executes translation paths.
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("name", &self.name)
            .field("source", &self.source.name())
            .field("target", &self.target.name())
            .finish()
    }
}
