//! Namespace graph scanned by discovery.
//!
//! Namespaces live in an arena and are referred to by [`NamespaceId`], so
//! re-export cycles are ordinary graph edges rather than ownership cycles.
//! Each namespace records the parent it was declared under; that declared
//! nesting (not reachability through re-exports) decides which namespaces and
//! types belong to a scan root. Ids are compared by identity, never by name:
//! two namespaces named `types` in different trees are unrelated.

use crate::entity::Entity;
use crate::error::{RegistryError, Result};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
/// Identity of one namespace within one [`Namespaces`] arena.
pub struct NamespaceId {
    arena: u32,
    index: u32,
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.arena, self.index)
    }
}

#[derive(Clone, Debug)]
/// An exported name: the entity plus the namespace it was declared in.
///
/// Re-exporting copies the member, so the origin survives imports.
pub struct Member {
    pub entity: Entity,
    pub origin: NamespaceId,
}

#[derive(Debug)]
struct NamespaceNode {
    name: String,
    parent: Option<NamespaceId>,
    members: Vec<(String, Member)>,
}

#[derive(Debug)]
pub struct Namespaces {
    arena: u32,
    nodes: Vec<NamespaceNode>,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespaces {
    /// An empty graph with its own arena id.
    pub fn new() -> Self {
        Self {
            arena: NEXT_ARENA.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }

    /// Create a top-level namespace.
    pub fn root(&mut self, name: impl Into<String>) -> NamespaceId {
        self.push(name.into(), None)
    }

    /// Create a namespace nested under `parent` and export it there by name.
    pub fn child(&mut self, parent: NamespaceId, name: impl Into<String>) -> Result<NamespaceId> {
        self.require(parent)?;
        let name = name.into();
        let id = self.push(name.clone(), Some(parent));
        self.declare(parent, name, Entity::Namespace(id))?;
        Ok(id)
    }

    fn push(&mut self, name: String, parent: Option<NamespaceId>) -> NamespaceId {
        let id = NamespaceId {
            arena: self.arena,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(NamespaceNode {
            name,
            parent,
            members: Vec::new(),
        });
        id
    }

    /// Declare `entity` in `ns`; `ns` becomes its origin.
    ///
    /// Rebinding an existing name replaces the previous member in place.
    /// Fails with `UnknownNamespace` when `ns` is not part of this graph.
    pub fn declare(
        &mut self,
        ns: NamespaceId,
        name: impl Into<String>,
        entity: impl Into<Entity>,
    ) -> Result<()> {
        let member = Member {
            entity: entity.into(),
            origin: ns,
        };
        self.bind(ns, name.into(), member)
    }

    /// Export an existing member from `ns` under `alias`, keeping its origin.
    pub fn reexport(
        &mut self,
        ns: NamespaceId,
        alias: impl Into<String>,
        member: Member,
    ) -> Result<()> {
        self.bind(ns, alias.into(), member)
    }

    /// Re-export `name` from `from` into `into` under the same name.
    pub fn import(&mut self, into: NamespaceId, from: NamespaceId, name: &str) -> Result<()> {
        self.require(from)?;
        let member = self.member(from, name).cloned().ok_or_else(|| {
            RegistryError::InvalidDeclaration(format!(
                "cannot import '{name}': {} has no such member",
                self.qualified_name(from)
            ))
        })?;
        self.reexport(into, name, member)
    }

    fn bind(&mut self, ns: NamespaceId, name: String, member: Member) -> Result<()> {
        let node = self.node_mut(ns).ok_or(RegistryError::UnknownNamespace(ns))?;
        match node.members.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = member,
            None => node.members.push((name, member)),
        }
        Ok(())
    }

    fn require(&self, ns: NamespaceId) -> Result<()> {
        if self.contains(ns) {
            Ok(())
        } else {
            Err(RegistryError::UnknownNamespace(ns))
        }
    }

    /// Whether `ns` was created by this graph.
    pub fn contains(&self, ns: NamespaceId) -> bool {
        self.node(ns).is_some()
    }

    /// The name `ns` was created with.
    pub fn name(&self, ns: NamespaceId) -> Option<&str> {
        self.node(ns).map(|node| node.name.as_str())
    }

    /// The namespace `ns` was declared under; `None` for roots.
    pub fn parent(&self, ns: NamespaceId) -> Option<NamespaceId> {
        self.node(ns).and_then(|node| node.parent)
    }

    /// The member exported from `ns` under `name`.
    pub fn member(&self, ns: NamespaceId, name: &str) -> Option<&Member> {
        self.node(ns)?
            .members
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, member)| member)
    }

    /// Members in declaration order.
    pub fn members(&self, ns: NamespaceId) -> impl Iterator<Item = (&str, &Member)> {
        self.node(ns)
            .into_iter()
            .flat_map(|node| node.members.iter())
            .map(|(name, member)| (name.as_str(), member))
    }

    /// Dotted name built from the declared parent chain, e.g. `pkg.types`.
    pub fn qualified_name(&self, ns: NamespaceId) -> String {
        let mut segments: Vec<&str> = self.ancestry(ns).filter_map(|id| self.name(id)).collect();
        segments.reverse();
        segments.join(".")
    }

    /// Number of declared ancestors; roots have depth 0.
    pub fn depth(&self, ns: NamespaceId) -> usize {
        self.ancestry(ns).count().saturating_sub(1)
    }

    /// Whether `ns` is `root` or declared somewhere beneath it.
    pub fn is_within(&self, ns: NamespaceId, root: NamespaceId) -> bool {
        self.ancestry(ns).any(|id| id == root)
    }

    /// `ns` followed by each declared parent up to its root.
    fn ancestry(&self, ns: NamespaceId) -> impl Iterator<Item = NamespaceId> + '_ {
        let start = self.contains(ns).then_some(ns);
        std::iter::successors(start, move |id| self.parent(*id))
    }

    fn node(&self, ns: NamespaceId) -> Option<&NamespaceNode> {
        if ns.arena != self.arena {
            return None;
        }
        self.nodes.get(ns.index as usize)
    }

    fn node_mut(&mut self, ns: NamespaceId) -> Option<&mut NamespaceNode> {
        if ns.arena != self.arena {
            return None;
        }
        self.nodes.get_mut(ns.index as usize)
    }
}
