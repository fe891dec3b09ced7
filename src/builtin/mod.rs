//! Plugins shipped with the crate.
//!
//! [`install`] lays out two trees in a namespace arena: `core`, which
//! declares the abstract types of a model along with the type bases, and
//! `edge_list`, a plugin that re-exports what it needs from `core` and
//! declares its own concrete types, translators, and algorithms.

pub mod edge_list;

pub use edge_list::EdgeListPlugin;

use crate::entity::{Entity, TypeBase};
use crate::error::Result;
use crate::namespace::{NamespaceId, Namespaces};
use crate::types::TypeModel;
use crate::types::standard::{EDGE_MAP, EDGE_SET, NODE_MAP};
use tracing::debug;

const BASES: [TypeBase; 3] = [TypeBase::AbstractType, TypeBase::ConcreteType, TypeBase::Wrapper];

#[derive(Clone, Copy, Debug)]
pub struct BuiltinNamespaces {
    pub core: NamespaceId,
    pub edge_list: NamespaceId,
}

/// Declare every abstract type in `model` plus the type bases under a new
/// root named `core`.
pub fn install_core(space: &mut Namespaces, model: &TypeModel) -> Result<NamespaceId> {
    let core = space.root("core");
    for base in BASES {
        space.declare(core, base.as_str(), base)?;
    }
    for ty in model.iter() {
        space.declare(core, ty.name(), ty.clone())?;
    }
    Ok(core)
}

/// Install `core` and the edge-list plugin. `model` must hold the standard
/// types; a missing one fails before anything is laid out.
pub fn install(space: &mut Namespaces, model: &TypeModel) -> Result<BuiltinNamespaces> {
    let plugin = EdgeListPlugin::new(model)?;
    let core = install_core(space, model)?;

    let root = space.root("edge_list");
    let types = space.child(root, "types")?;
    let translators = space.child(root, "translators")?;
    let algorithms = space.child(root, "algorithms")?;

    for name in [EDGE_SET, EDGE_MAP, NODE_MAP]
        .into_iter()
        .chain(BASES.iter().map(TypeBase::as_str))
    {
        space.import(types, core, name)?;
    }
    space.declare(types, "EdgeListSet", plugin.edge_list_set.clone())?;
    space.declare(types, "WeightedEdgeList", plugin.weighted_edge_list.clone())?;
    space.declare(types, "NodeValues", plugin.node_values.clone())?;
    space.declare(types, "_edge_key", Entity::value("fn(directed, src, dst) -> (u64, u64)"))?;
    // Parent link back to the plugin root.
    space.declare(types, "plugin", Entity::Namespace(root))?;

    space.declare(translators, "drop_weights", plugin.drop_weights.clone())?;
    space.import(translators, types, "WeightedEdgeList")?;
    space.import(translators, types, "EdgeListSet")?;

    space.declare(algorithms, "out_degree", plugin.out_degree.clone())?;
    space.declare(algorithms, "edge_list_out_degree", plugin.out_degree_impl.clone())?;
    space.import(algorithms, root, "types")?;

    for name in ["EdgeListSet", "WeightedEdgeList", "NodeValues"] {
        space.import(root, types, name)?;
    }
    space.import(root, translators, "drop_weights")?;

    debug!(
        core = %space.qualified_name(core),
        plugin = %space.qualified_name(root),
        "installed builtin plugins"
    );
    Ok(BuiltinNamespaces {
        core,
        edge_list: root,
    })
}
