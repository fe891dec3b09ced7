//! Bulk discovery over namespace trees.
//!
//! Scanning rules:
//! - names starting with the private prefix are skipped;
//! - types are registered only when declared inside the tree of the root
//!   being scanned, and never when they are one of the type bases;
//! - translators and algorithms are registered wherever they are found;
//! - sub-namespaces declared under the root are scanned once per call, which
//!   keeps re-export cycles finite.
//!
//! Roots are processed shallowest first, so a namespace reachable from
//! several roots is visited once, under the shallowest root that owns it.
//! Everything is classified before anything is inserted: a failing call
//! leaves the registry as it was.

use crate::entity::{Entity, TypeEntity};
use crate::error::{RegistryError, Result};
use crate::namespace::{Member, NamespaceId, Namespaces};
use crate::registry::{CatalogKind, Classified, Registry};
use serde::Serialize;
use std::collections::HashSet;
use std::env;
use tracing::{debug, info, trace};

pub const RECURSE_ENV: &str = "PLUGIN_REGISTRY_RECURSE";
pub const PRIVATE_PREFIX_ENV: &str = "PLUGIN_REGISTRY_PRIVATE_PREFIX";

const DEFAULT_PRIVATE_PREFIX: &str = "_";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiscoveryOptions {
    pub recurse: bool,
    pub private_prefix: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            private_prefix: DEFAULT_PRIVATE_PREFIX.to_string(),
        }
    }
}

impl DiscoveryOptions {
    /// Scan only the given roots, not their sub-namespaces.
    pub fn shallow() -> Self {
        Self {
            recurse: false,
            ..Self::default()
        }
    }

    /// Options from `PLUGIN_REGISTRY_RECURSE` / `PLUGIN_REGISTRY_PRIVATE_PREFIX`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Like [`Self::from_env`] with an explicit variable lookup.
    ///
    /// `RECURSE` disables recursion when set to an empty string, `0`, or
    /// `false`; an empty prefix falls back to the default.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(raw) = lookup(RECURSE_ENV) {
            let value = raw.trim();
            options.recurse =
                !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false");
        }
        if let Some(prefix) = lookup(PRIVATE_PREFIX_ENV) {
            if !prefix.is_empty() {
                options.private_prefix = prefix;
            }
        }
        options
    }

    fn is_private(&self, name: &str) -> bool {
        !self.private_prefix.is_empty() && name.starts_with(&self.private_prefix)
    }
}

#[derive(Clone, Debug, Serialize)]
/// One namespace scan and the root whose traversal performed it.
pub struct NamespaceVisit {
    pub namespace: NamespaceId,
    pub name: String,
    pub root: NamespaceId,
}

#[derive(Clone, Debug, Serialize)]
/// An entity this call added to the registry.
pub struct RegisteredEntry {
    pub name: String,
    pub catalog: CatalogKind,
    /// Namespace where the scan first met the entity.
    pub found_in: NamespaceId,
    /// Declaring namespace; only tracked for types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<NamespaceId>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DiscoveryReport {
    pub visited: Vec<NamespaceVisit>,
    pub registered: Vec<RegisteredEntry>,
}

impl DiscoveryReport {
    /// How many times `ns` was scanned.
    pub fn visits_of(&self, ns: NamespaceId) -> usize {
        self.visited.iter().filter(|v| v.namespace == ns).count()
    }

    /// The root under which `ns` was scanned, if it was.
    pub fn root_of(&self, ns: NamespaceId) -> Option<NamespaceId> {
        self.visited
            .iter()
            .find(|v| v.namespace == ns)
            .map(|v| v.root)
    }

    /// Names newly registered into `kind`, in discovery order.
    pub fn registered_in(&self, kind: CatalogKind) -> Vec<&str> {
        self.registered
            .iter()
            .filter(|entry| entry.catalog == kind)
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// First newly registered entry called `name`.
    pub fn entry(&self, name: &str) -> Option<&RegisteredEntry> {
        self.registered.iter().find(|entry| entry.name == name)
    }
}

impl Registry {
    /// Find and register every suitable entity within the given namespaces.
    ///
    /// Every root must be an [`Entity::Namespace`] known to `space`; otherwise
    /// the call fails with [`RegistryError::ArgumentType`] before anything is
    /// scanned.
    pub fn register_many(
        &mut self,
        space: &Namespaces,
        roots: &[Entity],
        options: &DiscoveryOptions,
    ) -> Result<DiscoveryReport> {
        let mut ordered: Vec<NamespaceId> = Vec::with_capacity(roots.len());
        for (position, root) in roots.iter().enumerate() {
            match root {
                Entity::Namespace(id) if space.contains(*id) => {
                    if !ordered.contains(id) {
                        ordered.push(*id);
                    }
                }
                Entity::Namespace(id) => {
                    return Err(RegistryError::ArgumentType {
                        position,
                        found: format!("namespace {id} from another arena"),
                    });
                }
                other => {
                    return Err(RegistryError::ArgumentType {
                        position,
                        found: other.describe(),
                    });
                }
            }
        }
        ordered.sort_by_key(|id| space.depth(*id));

        let mut scan = Scan {
            space,
            options,
            seen: HashSet::new(),
            staged: Vec::new(),
            staged_keys: HashSet::new(),
            visited: Vec::new(),
        };
        for root in ordered {
            if !scan.seen.insert(root) {
                debug!(
                    namespace = %space.qualified_name(root),
                    "root already scanned under a shallower root"
                );
                continue;
            }
            scan.visit(root, root)?;
        }

        let mut report = DiscoveryReport {
            visited: scan.visited,
            registered: Vec::new(),
        };
        for (classified, entry) in scan.staged {
            if self.insert(classified) {
                report.registered.push(entry);
            }
        }
        info!(
            namespaces = report.visited.len(),
            registered = report.registered.len(),
            "plugin discovery finished"
        );
        Ok(report)
    }
}

struct Scan<'a> {
    space: &'a Namespaces,
    options: &'a DiscoveryOptions,
    seen: HashSet<NamespaceId>,
    staged: Vec<(Classified, RegisteredEntry)>,
    staged_keys: HashSet<(CatalogKind, usize)>,
    visited: Vec<NamespaceVisit>,
}

impl Scan<'_> {
    fn visit(&mut self, ns: NamespaceId, root: NamespaceId) -> Result<()> {
        let space = self.space;
        let name = space.qualified_name(ns);
        debug!(namespace = %name, root = %space.qualified_name(root), "scanning namespace");
        self.visited.push(NamespaceVisit {
            namespace: ns,
            name,
            root,
        });

        for (member_name, member) in space.members(ns) {
            if self.options.is_private(member_name) {
                trace!(member = member_name, "skipping private member");
                continue;
            }
            match &member.entity {
                Entity::Type(TypeEntity::Base(_) | TypeEntity::Plain(_)) => {
                    trace!(member = member_name, "skipping non-plugin type");
                }
                Entity::Type(_) => {
                    if space.is_within(member.origin, root) {
                        self.stage(member, ns, Some(member.origin))?;
                    } else {
                        trace!(member = member_name, "skipping type declared outside root");
                    }
                }
                Entity::Translator(_)
                | Entity::AbstractAlgorithm(_)
                | Entity::ConcreteAlgorithm(_) => {
                    self.stage(member, ns, None)?;
                }
                Entity::Namespace(child) => {
                    if self.options.recurse
                        && space.is_within(*child, root)
                        && self.seen.insert(*child)
                    {
                        self.visit(*child, root)?;
                    }
                }
                Entity::Value(_) => {}
            }
        }
        Ok(())
    }

    fn stage(
        &mut self,
        member: &Member,
        found_in: NamespaceId,
        origin: Option<NamespaceId>,
    ) -> Result<()> {
        let classified = Registry::classify(&member.entity)?;
        if !self.staged_keys.insert(classified.key()) {
            return Ok(());
        }
        let entry = RegisteredEntry {
            name: classified.name().to_string(),
            catalog: classified.kind(),
            found_in,
            origin,
        };
        self.staged.push((classified, entry));
        Ok(())
    }
}
