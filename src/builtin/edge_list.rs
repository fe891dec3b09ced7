//! Edge-list representations of the standard graph types.
//!
//! Nodes are `u64` ids. Undirected edges are stored with the smaller id
//! first, so `(2, 1)` and `(1, 2)` are the same edge.

use crate::concrete::equality::{Tolerance, compare_keyed, expect_same_direction};
use crate::concrete::{ConcreteType, PropertyRequest, Representation};
use crate::error::{Result, RegistryError};
use crate::plugin::{
    AbstractAlgorithm, ConcreteAlgorithm, ConcreteParamType, Implementation, ParamType, Translator,
};
use crate::types::standard::{EDGE_MAP, EDGE_SET, NODE_MAP};
use crate::types::{CapabilitySet, PropertyMap, TypeModel};
use anyhow::anyhow;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const OUT_DEGREE: &str = "centrality.out_degree";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeList {
    pub directed: bool,
    pub edges: BTreeSet<(u64, u64)>,
}

impl EdgeList {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            edges: BTreeSet::new(),
        }
    }

    pub fn with_edge(mut self, src: u64, dst: u64) -> Self {
        self.edges.insert(edge_key(self.directed, src, dst));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightedEdgeList {
    pub directed: bool,
    pub weights: BTreeMap<(u64, u64), f64>,
}

impl WeightedEdgeList {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            weights: BTreeMap::new(),
        }
    }

    pub fn with_edge(mut self, src: u64, dst: u64, weight: f64) -> Self {
        self.weights.insert(edge_key(self.directed, src, dst), weight);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Per-node values. Lookup and size are inherent methods rather than part of
/// the storage, which is why its binding is a wrapper.
pub struct NodeValues {
    pub values: BTreeMap<u64, f64>,
}

impl NodeValues {
    pub fn get_item(&self, node: u64) -> Option<f64> {
        self.values.get(&node).copied()
    }

    pub fn num_nodes(&self) -> usize {
        self.values.len()
    }
}

fn edge_key(directed: bool, src: u64, dst: u64) -> (u64, u64) {
    if directed || src <= dst {
        (src, dst)
    } else {
        (dst, src)
    }
}

struct EdgeListSetRepr;

impl Representation for EdgeListSetRepr {
    type Value = EdgeList;

    fn compute_properties(
        &self,
        value: &EdgeList,
        _request: &PropertyRequest<'_>,
    ) -> anyhow::Result<PropertyMap> {
        Ok(PropertyMap::from([(
            "is_directed".to_string(),
            value.directed.into(),
        )]))
    }

    fn assert_equal(&self, left: &EdgeList, right: &EdgeList, tolerance: Tolerance) -> Result<()> {
        expect_same_direction(left.directed, right.directed, tolerance)?;
        compare_keyed(
            left.edges.iter().map(|edge| (*edge, 1.0)),
            right.edges.iter().map(|edge| (*edge, 1.0)),
            tolerance,
        )
    }
}

struct WeightedEdgeListRepr;

impl Representation for WeightedEdgeListRepr {
    type Value = WeightedEdgeList;

    fn compute_properties(
        &self,
        value: &WeightedEdgeList,
        request: &PropertyRequest<'_>,
    ) -> anyhow::Result<PropertyMap> {
        let mut props = PropertyMap::from([
            ("is_directed".to_string(), value.directed.into()),
            ("dtype".to_string(), "float".into()),
        ]);
        // Scans every weight.
        if request.wants("has_negative_weights") {
            let negative = value.weights.values().any(|w| *w < 0.0);
            props.insert("has_negative_weights".to_string(), negative.into());
        }
        Ok(props)
    }

    fn assert_equal(
        &self,
        left: &WeightedEdgeList,
        right: &WeightedEdgeList,
        tolerance: Tolerance,
    ) -> Result<()> {
        expect_same_direction(left.directed, right.directed, tolerance)?;
        compare_keyed(
            left.weights.iter().map(|(edge, w)| (*edge, *w)),
            right.weights.iter().map(|(edge, w)| (*edge, *w)),
            tolerance,
        )
    }
}

struct NodeValuesRepr;

impl Representation for NodeValuesRepr {
    type Value = NodeValues;

    fn compute_properties(
        &self,
        _value: &NodeValues,
        _request: &PropertyRequest<'_>,
    ) -> anyhow::Result<PropertyMap> {
        Ok(PropertyMap::from([("dtype".to_string(), "float".into())]))
    }

    fn assert_equal(&self, left: &NodeValues, right: &NodeValues, tolerance: Tolerance) -> Result<()> {
        compare_keyed(
            left.values.iter().map(|(node, v)| (*node, *v)),
            right.values.iter().map(|(node, v)| (*node, *v)),
            tolerance,
        )
    }
}

/// Out-degree of every node; undirected edges count for both endpoints.
pub fn out_degree(graph: &WeightedEdgeList) -> NodeValues {
    let mut values = BTreeMap::new();
    for (src, dst) in graph.weights.keys() {
        *values.entry(*src).or_insert(0.0) += 1.0;
        let other = values.entry(*dst).or_insert(0.0);
        if !graph.directed && src != dst {
            *other += 1.0;
        }
    }
    NodeValues { values }
}

#[derive(Clone, Debug)]
/// Every entity the edge-list plugin exports.
pub struct EdgeListPlugin {
    pub edge_list_set: Arc<ConcreteType>,
    pub weighted_edge_list: Arc<ConcreteType>,
    pub node_values: Arc<ConcreteType>,
    pub drop_weights: Arc<Translator>,
    pub out_degree: Arc<AbstractAlgorithm>,
    pub out_degree_impl: Arc<ConcreteAlgorithm>,
}

impl EdgeListPlugin {
    /// Bind the plugin to `model`, which must hold the standard types.
    pub fn new(model: &TypeModel) -> Result<Self> {
        let edge_set = model.require(EDGE_SET)?;
        let edge_map = model.require(EDGE_MAP)?;
        let node_map = model.require(NODE_MAP)?;

        let edge_list_set = Arc::new(ConcreteType::native(
            "EdgeListSet",
            edge_set,
            EdgeListSetRepr,
        ));
        let weighted_edge_list = Arc::new(ConcreteType::native(
            "WeightedEdgeList",
            edge_map.clone(),
            WeightedEdgeListRepr,
        ));
        let node_values = Arc::new(ConcreteType::wrapper(
            "NodeValues",
            node_map.clone(),
            CapabilitySet::new()
                .with_method("get_item")
                .with_property("num_nodes"),
            NodeValuesRepr,
        ));

        let drop_weights = Arc::new(Translator::from_fn(
            "weighted_edge_list_to_edge_list_set",
            weighted_edge_list.clone(),
            edge_list_set.clone(),
            |graph: &WeightedEdgeList, _hints: &PropertyMap| {
                Ok(EdgeList {
                    directed: graph.directed,
                    edges: graph.weights.keys().copied().collect(),
                })
            },
        )?);

        let out_degree_sig = Arc::new(
            AbstractAlgorithm::builder(OUT_DEGREE)
                .param("graph", ParamType::of(edge_map))
                .returns(ParamType::of(node_map))
                .build()?,
        );

        let implementation: Implementation = Arc::new(
            |args: &[&dyn Any]| -> anyhow::Result<Box<dyn Any + Send + Sync>> {
                let graph = args
                    .first()
                    .copied()
                    .and_then(|arg| arg.downcast_ref::<WeightedEdgeList>())
                    .ok_or_else(|| anyhow!("{OUT_DEGREE} expects a WeightedEdgeList argument"))?;
                Ok(Box::new(out_degree(graph)))
            },
        );
        let out_degree_impl = Arc::new(
            ConcreteAlgorithm::builder(OUT_DEGREE, "edge_list_out_degree")
                .param(
                    "graph",
                    ConcreteParamType::Concrete(weighted_edge_list.clone()),
                )
                .returns(ConcreteParamType::Concrete(node_values.clone()))
                .build(implementation)?,
        );

        Ok(Self {
            edge_list_set,
            weighted_edge_list,
            node_values,
            drop_weights,
            out_degree: out_degree_sig,
            out_degree_impl,
        })
    }

    /// Run the concrete out-degree implementation on `graph`.
    pub fn run_out_degree(&self, graph: &WeightedEdgeList) -> Result<NodeValues> {
        let output = (self.out_degree_impl.implementation())(&[graph as &dyn Any])?;
        output
            .downcast::<NodeValues>()
            .map(|boxed| *boxed)
            .map_err(|_| RegistryError::InstanceType {
                concrete: self.node_values.name().to_string(),
                expected: self.node_values.value_type().name().to_string(),
            })
    }
}
