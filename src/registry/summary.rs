//! Serializable snapshot of a registry's contents.
//!
//! Entries are listed in registration order; the implementation map is keyed
//! by abstract algorithm path so output is stable across runs.

use crate::plugin::{AbstractAlgorithm, ConcreteAlgorithm, ScalarValue};
use crate::registry::{CatalogKind, Registry};
use crate::types::PropertyValue;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct AbstractTypeEntry {
    pub name: String,
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcreteTypeEntry {
    pub name: String,
    pub abstract_type: String,
    pub value_type: String,
    pub wrapper: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslatorEntry {
    pub name: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize)]
/// An algorithm with its signature rendered as `(a: T, b: U) -> R`.
pub struct AlgorithmEntry {
    pub name: String,
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub counts: BTreeMap<CatalogKind, usize>,
    pub abstract_types: Vec<AbstractTypeEntry>,
    pub concrete_types: Vec<ConcreteTypeEntry>,
    pub translators: Vec<TranslatorEntry>,
    pub abstract_algorithms: Vec<AlgorithmEntry>,
    pub concrete_algorithms: Vec<AlgorithmEntry>,
    /// Abstract algorithm path to the names of its concrete implementations.
    /// Paths with no implementation map to an empty list.
    pub implementations: BTreeMap<String, Vec<String>>,
}

impl Registry {
    pub fn summary(&self) -> RegistrySummary {
        let counts = CatalogKind::ALL
            .iter()
            .map(|kind| (*kind, self.count(*kind)))
            .collect();

        let abstract_types = self
            .abstract_types()
            .iter()
            .map(|ty| AbstractTypeEntry {
                name: ty.name().to_string(),
                properties: ty
                    .properties()
                    .iter()
                    .map(|(name, domain)| (name.clone(), domain.values().to_vec()))
                    .collect(),
                required: ty
                    .required_capabilities()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();

        let concrete_types = self
            .all_concrete_types()
            .map(|ty| ConcreteTypeEntry {
                name: ty.name().to_string(),
                abstract_type: ty.abstract_type().name().to_string(),
                value_type: ty.value_type().name().to_string(),
                wrapper: ty.is_wrapper(),
            })
            .collect();

        let translators = self
            .translators()
            .iter()
            .map(|t| TranslatorEntry {
                name: t.name().to_string(),
                source: t.source().name().to_string(),
                target: t.target().name().to_string(),
            })
            .collect();

        let mut implementations: BTreeMap<String, Vec<String>> = self
            .abstract_algorithms()
            .iter()
            .map(|a| (a.path().to_string(), Vec::new()))
            .collect();
        for concrete in self.concrete_algorithms() {
            implementations
                .entry(concrete.abstract_path().to_string())
                .or_default()
                .push(concrete.name().to_string());
        }

        RegistrySummary {
            counts,
            abstract_types,
            concrete_types,
            translators,
            abstract_algorithms: self
                .abstract_algorithms()
                .iter()
                .map(|a| AlgorithmEntry {
                    name: a.path().to_string(),
                    signature: abstract_signature(a),
                })
                .collect(),
            concrete_algorithms: self
                .concrete_algorithms()
                .iter()
                .map(|a| AlgorithmEntry {
                    name: a.name().to_string(),
                    signature: concrete_signature(a),
                })
                .collect(),
            implementations,
        }
    }
}

fn abstract_signature(algorithm: &AbstractAlgorithm) -> String {
    let params: Vec<String> = algorithm
        .params()
        .iter()
        .map(|p| match &p.default {
            Some(default) => format!("{}: {} = {}", p.name, p.ty.describe(), render(default)),
            None => format!("{}: {}", p.name, p.ty.describe()),
        })
        .collect();
    format!("({}) -> {}", params.join(", "), algorithm.returns().describe())
}

fn concrete_signature(algorithm: &ConcreteAlgorithm) -> String {
    let params: Vec<String> = algorithm
        .params()
        .iter()
        .map(|(name, ty)| format!("{name}: {}", ty.describe()))
        .collect();
    format!("({}) -> {}", params.join(", "), algorithm.returns().describe())
}

fn render(value: &ScalarValue) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}
