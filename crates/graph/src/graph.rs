use crate::error::{GraphError, Result};
use crate::types::{ResolvedUnit, UnitNode};
use nb2prod_protocol::DependencyEdge;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// Units as nodes, "consumes symbols from" as edges
pub struct DependencyGraph {
    /// Directed graph (consumer -> supplier)
    pub graph: DiGraph<UnitNode, DependencyEdge>,

    /// Unit index -> NodeIndex mapping
    unit_index: HashMap<usize, NodeIndex>,

    /// Per-unit resolution, sorted by unit index
    resolved: Vec<ResolvedUnit>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            unit_index: HashMap::new(),
            resolved: Vec::new(),
        }
    }

    pub(crate) fn add_unit(&mut self, node: UnitNode) -> NodeIndex {
        let index = node.index;
        let idx = self.graph.add_node(node);
        self.unit_index.insert(index, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, edge: DependencyEdge) -> Result<()> {
        let from = self.node_of(edge.from_unit)?;
        let to = self.node_of(edge.to_unit)?;
        self.graph.add_edge(from, to, edge);
        Ok(())
    }

    pub(crate) fn set_resolved(&mut self, resolved: Vec<ResolvedUnit>) {
        self.resolved = resolved;
    }

    fn node_of(&self, unit: usize) -> Result<NodeIndex> {
        self.unit_index
            .get(&unit)
            .copied()
            .ok_or(GraphError::UnitNotFound(unit))
    }

    /// Resolution record of one unit
    pub fn unit(&self, index: usize) -> Result<&ResolvedUnit> {
        self.resolved
            .binary_search_by_key(&index, |unit| unit.index)
            .map(|pos| &self.resolved[pos])
            .map_err(|_| GraphError::UnitNotFound(index))
    }

    /// All resolution records in index order
    pub fn units(&self) -> &[ResolvedUnit] {
        &self.resolved
    }

    /// Edges of `index`, nearest supplier first; empty for unknown units
    pub fn edges_of(&self, index: usize) -> &[DependencyEdge] {
        self.unit(index)
            .map(|unit| unit.edges.as_slice())
            .unwrap_or_default()
    }

    pub fn has_backward_dependency(&self, index: usize) -> bool {
        self.unit(index)
            .is_ok_and(ResolvedUnit::has_backward_dependency)
    }

    /// Units consuming symbols defined by `index`, ascending
    pub fn dependents_of(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Incoming)
    }

    /// Units `index` consumes symbols from, ascending
    pub fn suppliers_of(&self, index: usize) -> Vec<usize> {
        self.neighbors(index, Direction::Outgoing)
    }

    fn neighbors(&self, index: usize, direction: Direction) -> Vec<usize> {
        let Ok(node) = self.node_of(index) else {
            return Vec::new();
        };
        let units: BTreeSet<usize> = self
            .graph
            .neighbors_directed(node, direction)
            .filter_map(|n| self.graph.node_weight(n).map(|unit| unit.index))
            .collect();
        units.into_iter().collect()
    }

    /// Units with symbols that neither depend on nor supply any other unit
    pub fn isolated_units(&self) -> Vec<usize> {
        let mut isolated: Vec<usize> = self
            .graph
            .node_indices()
            .filter(|&idx| {
                self.graph.neighbors_undirected(idx).next().is_none()
                    && self.graph.node_weight(idx).is_some_and(|n| n.has_symbols)
            })
            .filter_map(|idx| self.graph.node_weight(idx).map(|n| n.index))
            .collect();
        isolated.sort_unstable();
        isolated
    }

    /// Share of units with at least one dependency edge
    pub fn dependency_coverage(&self) -> f64 {
        let dependent = self
            .resolved
            .iter()
            .filter(|unit| !unit.edges.is_empty())
            .count();
        dependent as f64 / self.resolved.len().max(1) as f64
    }

    /// Edges whose supplier sits after the consumer, sorted by (from, to)
    pub fn execution_order_violations(&self) -> Vec<&DependencyEdge> {
        let mut violations: Vec<&DependencyEdge> = self
            .resolved
            .iter()
            .flat_map(|unit| unit.edges.iter())
            .filter(|edge| edge.is_execution_order_violation())
            .collect();
        violations.sort_by_key(|edge| (edge.from_unit, edge.to_unit));
        violations
    }

    /// Get node count
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get edge count
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
