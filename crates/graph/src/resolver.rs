use crate::error::{GraphError, Result};
use crate::types::ResolvedUnit;
use nb2prod_protocol::DependencyEdge;
use nb2prod_unit_analyzer::SymbolFacts;
use std::collections::BTreeSet;

/// Attribute every unit's external references to the units that define them.
///
/// Facts may arrive in any order; unit index is the only ordering used. Output is sorted
/// by index.
pub fn resolve_dependencies(facts: &[SymbolFacts]) -> Result<Vec<ResolvedUnit>> {
    let ordered = ordered_facts(facts)?;
    Ok((0..ordered.len())
        .map(|position| resolve_at(&ordered, position))
        .collect())
}

pub(crate) fn ordered_facts(facts: &[SymbolFacts]) -> Result<Vec<&SymbolFacts>> {
    let mut ordered: Vec<&SymbolFacts> = facts.iter().collect();
    ordered.sort_by_key(|f| f.index);
    if let Some(pair) = ordered.windows(2).find(|pair| pair[0].index == pair[1].index) {
        return Err(GraphError::DuplicateUnit(pair[0].index));
    }
    Ok(ordered)
}

pub(crate) fn resolve_at(ordered: &[&SymbolFacts], position: usize) -> ResolvedUnit {
    let consumer = ordered[position];
    let mut remaining = consumer.external_references.clone();
    let mut edges = Vec::new();

    // Nearest earlier definition wins
    for supplier in ordered[..position].iter().rev() {
        if remaining.is_empty() {
            break;
        }
        attribute(consumer.index, supplier, &mut remaining, &mut edges);
    }

    // Whatever is left may come from a later unit: an execution-order violation
    for supplier in &ordered[position + 1..] {
        if remaining.is_empty() {
            break;
        }
        attribute(consumer.index, supplier, &mut remaining, &mut edges);
    }

    if !remaining.is_empty() {
        log::debug!(
            "Unit {}: unattributed references {:?}",
            consumer.index,
            remaining
        );
    }

    ResolvedUnit {
        index: consumer.index,
        edges,
        unattributed: remaining,
    }
}

fn attribute(
    consumer: usize,
    supplier: &SymbolFacts,
    remaining: &mut BTreeSet<String>,
    edges: &mut Vec<DependencyEdge>,
) {
    let shared: BTreeSet<String> = remaining
        .intersection(&supplier.defined_names)
        .cloned()
        .collect();
    if shared.is_empty() {
        return;
    }
    remaining.retain(|name| !shared.contains(name));
    edges.push(DependencyEdge::new(consumer, supplier.index, shared));
}
