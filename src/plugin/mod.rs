//! Instance-like plugin entities: translators and algorithms.
//!
//! These carry their capability in their Rust type, so the registry
//! classifies them without inspecting what they do.

pub mod algorithm;
pub mod translator;

pub use algorithm::{
    AbstractAlgorithm, AbstractAlgorithmBuilder, ConcreteAlgorithm, ConcreteAlgorithmBuilder,
    ConcreteParamType, Implementation, ParamType, Parameter, ScalarKind, ScalarValue,
};
pub use translator::{Conversion, Translator};
