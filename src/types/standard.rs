//! The standard abstract types shipped with the registry.
//!
//! Plugins bind concrete representations to these; they can also declare
//! their own types in the same model.

use crate::error::Result;
use crate::types::abstract_type::TypeDeclaration;
use crate::types::model::TypeModel;
use crate::types::property::DTYPE_CHOICES;

pub const VECTOR: &str = "Vector";
pub const MATRIX: &str = "Matrix";
pub const DATA_FRAME: &str = "DataFrame";
pub const NODE_SET: &str = "NodeSet";
pub const NODE_MAP: &str = "NodeMap";
pub const NODE_TABLE: &str = "NodeTable";
pub const EDGE_SET: &str = "EdgeSet";
pub const EDGE_MAP: &str = "EdgeMap";
pub const EDGE_TABLE: &str = "EdgeTable";

/// Declarations in dependency order (reduction targets first).
pub fn standard_declarations() -> Vec<TypeDeclaration> {
    vec![
        TypeDeclaration::new(VECTOR)
            .property("is_dense", [false, true])
            .property("dtype", DTYPE_CHOICES.iter().copied()),
        TypeDeclaration::new(MATRIX)
            .property("is_dense", [false, true])
            .property("is_square", [false, true])
            .property("dtype", DTYPE_CHOICES.iter().copied()),
        TypeDeclaration::new(DATA_FRAME),
        TypeDeclaration::new(NODE_SET),
        TypeDeclaration::new(NODE_MAP)
            .property("dtype", DTYPE_CHOICES.iter().copied())
            .reduces_to(NODE_SET)
            .requires_method("get_item")
            .requires_property("num_nodes"),
        TypeDeclaration::new(NODE_TABLE).reduces_to(NODE_SET),
        TypeDeclaration::new(EDGE_SET).property("is_directed", [true, false]),
        TypeDeclaration::new(EDGE_MAP)
            .property("is_directed", [true, false])
            .property("dtype", DTYPE_CHOICES.iter().copied())
            .property("has_negative_weights", [true, false])
            .reduces_to(EDGE_SET),
        TypeDeclaration::new(EDGE_TABLE)
            .property("is_directed", [true, false])
            .reduces_to(EDGE_SET),
    ]
}

/// Declare every standard type into `model`.
pub fn declare_standard_types(model: &mut TypeModel) -> Result<()> {
    for declaration in standard_declarations() {
        model.declare(declaration)?;
    }
    Ok(())
}

/// A fresh model holding only the standard types.
pub fn standard_model() -> Result<TypeModel> {
    let mut model = TypeModel::new();
    declare_standard_types(&mut model)?;
    Ok(model)
}
