//! Abstract algorithm signatures and the concrete implementations bound to them.
//!
//! Abstract algorithms are typed over abstract types (optionally constrained
//! by property values); concrete algorithms repeat the signature over concrete
//! types. Matching the two is left to [`crate::Registry::verify`] and the
//! resolution engine.

use crate::concrete::ConcreteType;
use crate::error::{RegistryError, Result};
use crate::types::{AbstractType, PropertyMap};
use serde::Serialize;
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ScalarValue {
    /// Whether this value may default a parameter of `kind`.
    ///
    /// Integers are accepted for float parameters.
    pub fn fits(&self, kind: ScalarKind) -> bool {
        matches!(
            (self, kind),
            (ScalarValue::Bool(_), ScalarKind::Bool)
                | (ScalarValue::Int(_), ScalarKind::Int | ScalarKind::Float)
                | (ScalarValue::Float(_), ScalarKind::Float)
                | (ScalarValue::Str(_), ScalarKind::Str)
        )
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

#[derive(Clone, Debug)]
pub enum ParamType {
    /// An abstract type, optionally restricted to instances whose properties
    /// hold the given values.
    Abstract {
        ty: Arc<AbstractType>,
        constraints: PropertyMap,
    },
    Scalar(ScalarKind),
    NodeId,
}

impl ParamType {
    /// An unconstrained abstract parameter.
    pub fn of(ty: Arc<AbstractType>) -> Self {
        ParamType::Abstract {
            ty,
            constraints: PropertyMap::new(),
        }
    }

    /// An abstract parameter restricted to the given property values.
    pub fn constrained(ty: Arc<AbstractType>, constraints: PropertyMap) -> Self {
        ParamType::Abstract { ty, constraints }
    }

    pub fn describe(&self) -> String {
        match self {
            ParamType::Abstract { ty, constraints } if constraints.is_empty() => {
                ty.name().to_string()
            }
            ParamType::Abstract { ty, constraints } => {
                let rendered: Vec<String> = constraints
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                format!("{}({})", ty.name(), rendered.join(", "))
            }
            ParamType::Scalar(kind) => format!("{kind:?}").to_lowercase(),
            ParamType::NodeId => "NodeID".to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            ParamType::Abstract { ty, constraints } => ty.validate_constraints(constraints),
            ParamType::Scalar(_) | ParamType::NodeId => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub name: String,
    pub ty: ParamType,
    pub default: Option<ScalarValue>,
}

#[derive(Debug)]
pub struct AbstractAlgorithm {
    path: String,
    params: Vec<Parameter>,
    returns: ParamType,
}

impl AbstractAlgorithm {
    pub fn builder(path: impl Into<String>) -> AbstractAlgorithmBuilder {
        AbstractAlgorithmBuilder {
            path: path.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Dotted path such as `link_analysis.pagerank`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared parameters in order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Declared return type.
    pub fn returns(&self) -> &ParamType {
        &self.returns
    }
}

pub struct AbstractAlgorithmBuilder {
    path: String,
    params: Vec<Parameter>,
    returns: Option<ParamType>,
}

impl AbstractAlgorithmBuilder {
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    pub fn param_with_default(
        mut self,
        name: impl Into<String>,
        kind: ScalarKind,
        default: impl Into<ScalarValue>,
    ) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            ty: ParamType::Scalar(kind),
            default: Some(default.into()),
        });
        self
    }

    pub fn returns(mut self, ty: ParamType) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn build(self) -> Result<AbstractAlgorithm> {
        validate_path(&self.path)?;
        unique_names(&self.path, self.params.iter().map(|p| p.name.as_str()))?;
        for param in &self.params {
            param.ty.validate()?;
            if let Some(default) = &param.default {
                let ParamType::Scalar(kind) = &param.ty else {
                    return Err(invalid(&self.path, &param.name, "only scalar parameters take defaults"));
                };
                if !default.fits(*kind) {
                    return Err(invalid(
                        &self.path,
                        &param.name,
                        &format!("default {default:?} does not fit {kind:?}"),
                    ));
                }
            }
        }
        let returns = self.returns.ok_or_else(|| {
            RegistryError::InvalidDeclaration(format!("algorithm {} declares no return type", self.path))
        })?;
        returns.validate()?;
        Ok(AbstractAlgorithm {
            path: self.path,
            params: self.params,
            returns,
        })
    }
}

#[derive(Clone, Debug)]
pub enum ConcreteParamType {
    Concrete(Arc<ConcreteType>),
    Scalar(ScalarKind),
    NodeId,
}

impl ConcreteParamType {
    pub fn describe(&self) -> String {
        match self {
            ConcreteParamType::Concrete(concrete) => concrete.name().to_string(),
            ConcreteParamType::Scalar(kind) => format!("{kind:?}").to_lowercase(),
            ConcreteParamType::NodeId => "NodeID".to_string(),
        }
    }

    /// Whether this concrete parameter can stand in for `abstract_param`.
    pub fn implements(&self, abstract_param: &ParamType) -> bool {
        match (self, abstract_param) {
            (ConcreteParamType::Concrete(concrete), ParamType::Abstract { ty, .. }) => {
                Arc::ptr_eq(concrete.abstract_type(), ty)
            }
            (ConcreteParamType::Scalar(a), ParamType::Scalar(b)) => a == b,
            (ConcreteParamType::NodeId, ParamType::NodeId) => true,
            _ => false,
        }
    }
}

/// Callable supplied by the plugin; the resolution engine invokes it with
/// arguments already translated into the declared concrete types.
pub type Implementation =
    Arc<dyn Fn(&[&dyn Any]) -> anyhow::Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

pub struct ConcreteAlgorithm {
    abstract_path: String,
    name: String,
    params: Vec<(String, ConcreteParamType)>,
    returns: ConcreteParamType,
    implementation: Implementation,
}

impl ConcreteAlgorithm {
    pub fn builder(
        abstract_path: impl Into<String>,
        name: impl Into<String>,
    ) -> ConcreteAlgorithmBuilder {
        ConcreteAlgorithmBuilder {
            abstract_path: abstract_path.into(),
            name: name.into(),
            params: Vec::new(),
            returns: None,
        }
    }

    /// Path of the abstract algorithm this implements.
    pub fn abstract_path(&self) -> &str {
        &self.abstract_path
    }

    /// Name of this implementation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in the same order as the abstract signature.
    pub fn params(&self) -> &[(String, ConcreteParamType)] {
        &self.params
    }

    /// Concrete return type.
    pub fn returns(&self) -> &ConcreteParamType {
        &self.returns
    }

    /// The callable, for the engine that dispatches calls.
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }
}

impl fmt::Debug for ConcreteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcreteAlgorithm")
            .field("abstract_path", &self.abstract_path)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish()
    }
}

pub struct ConcreteAlgorithmBuilder {
    abstract_path: String,
    name: String,
    params: Vec<(String, ConcreteParamType)>,
    returns: Option<ConcreteParamType>,
}

impl ConcreteAlgorithmBuilder {
    pub fn param(mut self, name: impl Into<String>, ty: ConcreteParamType) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    pub fn returns(mut self, ty: ConcreteParamType) -> Self {
        self.returns = Some(ty);
        self
    }

    pub fn build(self, implementation: Implementation) -> Result<ConcreteAlgorithm> {
        validate_path(&self.abstract_path)?;
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidDeclaration(format!(
                "implementation of {} needs a name",
                self.abstract_path
            )));
        }
        unique_names(&self.name, self.params.iter().map(|(name, _)| name.as_str()))?;
        let returns = self.returns.ok_or_else(|| {
            RegistryError::InvalidDeclaration(format!("algorithm {} declares no return type", self.name))
        })?;
        Ok(ConcreteAlgorithm {
            abstract_path: self.abstract_path,
            name: self.name,
            params: self.params,
            returns,
            implementation,
        })
    }
}

fn validate_path(path: &str) -> Result<()> {
    let valid = !path.is_empty()
        && path.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(())
    } else {
        Err(RegistryError::InvalidDeclaration(format!(
            "algorithm path must be dotted identifiers, got '{path}'"
        )))
    }
}

fn unique_names<'a>(owner: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(invalid(owner, name, "parameter declared twice"));
        }
    }
    Ok(())
}

fn invalid(owner: &str, param: &str, detail: &str) -> RegistryError {
    RegistryError::InvalidDeclaration(format!("{owner}: parameter '{param}': {detail}"))
}
