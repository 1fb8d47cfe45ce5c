use crate::error::Result;
use crate::graph::DependencyGraph;
use crate::resolver::{ordered_facts, resolve_at};
use crate::types::UnitNode;
use nb2prod_unit_analyzer::SymbolFacts;

/// Build the dependency graph from per-unit facts
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn build(facts: &[SymbolFacts]) -> Result<DependencyGraph> {
        let ordered = ordered_facts(facts)?;
        let mut graph = DependencyGraph::new();

        // Phase 1: one node per unit
        for unit in &ordered {
            graph.add_unit(UnitNode {
                index: unit.index,
                has_symbols: !unit.is_empty(),
            });
        }

        // Phase 2: attribute references and add edges
        let resolved: Vec<_> = (0..ordered.len())
            .map(|position| resolve_at(&ordered, position))
            .collect();
        for unit in &resolved {
            for edge in &unit.edges {
                graph.add_edge(edge.clone())?;
            }
        }
        graph.set_resolved(resolved);

        log::info!(
            "Built dependency graph: {} units, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}
