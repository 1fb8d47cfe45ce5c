use nb2prod_protocol::DependencyEdge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dependencies of one unit after attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedUnit {
    pub index: usize,

    /// Backward edges nearest-first, then forward edges in increasing order
    pub edges: Vec<DependencyEdge>,

    /// External references no unit defines
    pub unattributed: BTreeSet<String>,
}

impl ResolvedUnit {
    /// The unit reads a symbol only a later unit defines
    pub fn has_backward_dependency(&self) -> bool {
        self.edges
            .iter()
            .any(DependencyEdge::is_execution_order_violation)
    }

    /// Indices of the units this one consumes from
    pub fn suppliers(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|edge| edge.to_unit)
    }
}

/// Node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitNode {
    pub index: usize,

    /// The analyzer derived at least one symbol fact
    pub has_symbols: bool,
}
