//! The set of declared abstract types and their reduction graph.
//!
//! Reduction edges ("subcomponents") say a type can be viewed as a simpler
//! one by discarding associated data. Each type reduces to at most one other
//! type and the graph stays acyclic, so every reduction chain is unique and a
//! downstream engine can downcast structurally without searching.

use crate::error::{RegistryError, Result};
use crate::types::abstract_type::{AbstractType, TypeDeclaration};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Reduction edges: each type maps to its single direct target.
type Edges = BTreeMap<String, String>;

#[derive(Debug, Default)]
pub struct TypeModel {
    types: BTreeMap<String, Arc<AbstractType>>,
    edges: Edges,
}

impl TypeModel {
    /// An empty model with no types declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new abstract type along with its reduction edge.
    ///
    /// The subcomponent must already be declared, and naming more than one
    /// distinct subcomponent fails with `AmbiguousReduction`. On failure the
    /// model is left unchanged.
    pub fn declare(&mut self, declaration: TypeDeclaration) -> Result<Arc<AbstractType>> {
        let name = declaration.name.clone();
        if self.types.contains_key(&name) {
            return Err(RegistryError::InvalidDeclaration(format!(
                "abstract type {name} is already declared"
            )));
        }
        let ty = AbstractType::from_declaration(&declaration)?;

        let mut target: Option<&String> = None;
        for sub in &declaration.subcomponents {
            if sub == &name {
                return Err(RegistryError::ReductionCycle {
                    from: name.clone(),
                    to: name.clone(),
                    cycle: vec![name.clone(), name.clone()],
                });
            }
            if !self.types.contains_key(sub) {
                return Err(RegistryError::UnknownAbstractType(sub.clone()));
            }
            if let Some(existing) = target.filter(|existing| *existing != sub) {
                return Err(RegistryError::AmbiguousReduction {
                    from: name.clone(),
                    to: sub.clone(),
                    existing: existing.clone(),
                });
            }
            target = Some(sub);
        }

        if let Some(target) = target {
            self.edges.insert(name.clone(), target.clone());
        }
        let ty = Arc::new(ty);
        self.types.insert(name.clone(), ty.clone());
        debug!(abstract_type = %name, "declared abstract type");
        Ok(ty)
    }

    /// Add a reduction edge between two declared types.
    ///
    /// Re-adding the current edge is a no-op. A type that already reduces to
    /// something else fails with `AmbiguousReduction`.
    pub fn add_subcomponent(&mut self, from: &str, to: &str) -> Result<()> {
        self.require(from)?;
        self.require(to)?;
        match self.edges.get(from) {
            Some(existing) if existing == to => return Ok(()),
            Some(existing) => {
                return Err(RegistryError::AmbiguousReduction {
                    from: from.to_string(),
                    to: to.to_string(),
                    existing: existing.clone(),
                });
            }
            None => {}
        }
        if let Some(back) = find_path(&self.edges, to, from) {
            let mut cycle = vec![from.to_string()];
            cycle.extend(back);
            return Err(RegistryError::ReductionCycle {
                from: from.to_string(),
                to: to.to_string(),
                cycle,
            });
        }

        self.edges.insert(from.to_string(), to.to_string());
        debug!(%from, %to, "added reduction edge");
        Ok(())
    }

    /// The declared type called `name`, if any.
    pub fn get(&self, name: &str) -> Option<Arc<AbstractType>> {
        self.types.get(name).cloned()
    }

    /// Like [`TypeModel::get`], failing with `UnknownAbstractType`.
    pub fn require(&self, name: &str) -> Result<Arc<AbstractType>> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownAbstractType(name.to_string()))
    }

    /// Declared types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AbstractType>> {
        self.types.values()
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Direct reduction target of `name`.
    pub fn subcomponent_of(&self, name: &str) -> Option<Arc<AbstractType>> {
        self.edges.get(name).and_then(|target| self.get(target))
    }

    /// The unique reduction chain from `from` to `to`, both ends included.
    pub fn reduction_path(&self, from: &str, to: &str) -> Option<Vec<Arc<AbstractType>>> {
        if !self.types.contains_key(from) || !self.types.contains_key(to) {
            return None;
        }
        let path = find_path(&self.edges, from, to)?;
        path.iter().map(|name| self.get(name)).collect()
    }

    /// True when `from` reduces to `to` in zero or more steps.
    pub fn reduces_to(&self, from: &str, to: &str) -> bool {
        self.reduction_path(from, to).is_some()
    }
}

/// Follow the chain `from -> ... -> to`, both ends included.
fn find_path(edges: &Edges, from: &str, to: &str) -> Option<Vec<String>> {
    let mut path = vec![from.to_string()];
    let mut current = from;
    while current != to {
        current = edges.get(current)?.as_str();
        if path.iter().any(|seen| seen == current) {
            return None;
        }
        path.push(current.to_string());
    }
    Some(path)
}
