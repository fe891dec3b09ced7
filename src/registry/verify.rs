//! Cross-checks between catalogs after discovery.
//!
//! Registration accepts each entity on its own; `verify` looks at how they
//! reference one another and reports every dangling or mismatched reference
//! at once rather than stopping at the first.

use crate::concrete::ConcreteType;
use crate::plugin::{AbstractAlgorithm, ConcreteAlgorithm, ConcreteParamType, ParamType};
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

impl Registry {
    /// Return one message per problem; an empty list means the catalogs are
    /// consistent with one another.
    pub fn verify(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut by_path: BTreeMap<&str, &Arc<AbstractAlgorithm>> = BTreeMap::new();
        for algorithm in self.abstract_algorithms() {
            if by_path.insert(algorithm.path(), algorithm).is_some() {
                errors.push(format!(
                    "abstract algorithm {} is registered more than once",
                    algorithm.path()
                ));
            }
            for param in algorithm.params() {
                self.check_abstract_param(
                    &mut errors,
                    algorithm.path(),
                    &param.name,
                    &param.ty,
                );
            }
            self.check_abstract_param(&mut errors, algorithm.path(), "return", algorithm.returns());
        }

        for ty in self.all_concrete_types() {
            if !self.abstract_types().contains(ty.abstract_type()) {
                errors.push(format!(
                    "concrete type {} binds unregistered abstract type {}",
                    ty.name(),
                    ty.abstract_type().name()
                ));
            }
        }

        for translator in self.translators() {
            for (side, endpoint) in [("source", translator.source()), ("target", translator.target())] {
                if !self.has_concrete(endpoint) {
                    errors.push(format!(
                        "translator {} has unregistered {side} {}",
                        translator.name(),
                        endpoint.name()
                    ));
                }
            }
        }

        for concrete in self.concrete_algorithms() {
            for (name, ty) in concrete.params() {
                self.check_concrete_param(&mut errors, concrete.name(), name, ty);
            }
            self.check_concrete_param(&mut errors, concrete.name(), "return", concrete.returns());
            match by_path.get(concrete.abstract_path()) {
                Some(signature) => check_signature(&mut errors, signature, concrete),
                None => errors.push(format!(
                    "concrete algorithm {} implements unregistered abstract algorithm {}",
                    concrete.name(),
                    concrete.abstract_path()
                )),
            }
        }

        for problem in &errors {
            warn!(problem = %problem, "registry verification");
        }
        errors
    }

    fn has_concrete(&self, ty: &Arc<ConcreteType>) -> bool {
        self.concrete_types().contains(ty) || self.wrappers().contains(ty)
    }

    fn check_abstract_param(
        &self,
        errors: &mut Vec<String>,
        owner: &str,
        param: &str,
        ty: &ParamType,
    ) {
        if let ParamType::Abstract { ty, .. } = ty {
            if !self.abstract_types().contains(ty) {
                errors.push(format!(
                    "{owner}: parameter '{param}' uses unregistered abstract type {}",
                    ty.name()
                ));
            }
        }
    }

    fn check_concrete_param(
        &self,
        errors: &mut Vec<String>,
        owner: &str,
        param: &str,
        ty: &ConcreteParamType,
    ) {
        if let ConcreteParamType::Concrete(concrete) = ty {
            if !self.has_concrete(concrete) {
                errors.push(format!(
                    "{owner}: parameter '{param}' uses unregistered concrete type {}",
                    concrete.name()
                ));
            }
        }
    }
}

fn check_signature(
    errors: &mut Vec<String>,
    signature: &AbstractAlgorithm,
    concrete: &ConcreteAlgorithm,
) {
    let owner = concrete.name();
    let expected = signature.params();
    let actual = concrete.params();
    if expected.len() != actual.len() {
        errors.push(format!(
            "{owner}: takes {} parameters but {} declares {}",
            actual.len(),
            signature.path(),
            expected.len()
        ));
        return;
    }
    for (declared, (name, ty)) in expected.iter().zip(actual) {
        if declared.name != *name {
            errors.push(format!(
                "{owner}: parameter '{name}' should be named '{}'",
                declared.name
            ));
        } else if !ty.implements(&declared.ty) {
            errors.push(format!(
                "{owner}: parameter '{name}' is {} but {} expects {}",
                ty.describe(),
                signature.path(),
                declared.ty.describe()
            ));
        }
    }
    if !concrete.returns().implements(signature.returns()) {
        errors.push(format!(
            "{owner}: returns {} but {} declares {}",
            concrete.returns().describe(),
            signature.path(),
            signature.returns().describe()
        ));
    }
}
