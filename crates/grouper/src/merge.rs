use crate::config::GrouperConfig;
use crate::rules::{categorize, is_compatible};
use nb2prod_graph::DependencyGraph;
use nb2prod_protocol::Group;
use nb2prod_unit_analyzer::SymbolFacts;
use std::collections::BTreeMap;

/// Decides which adjacent groups may merge
pub(crate) struct MergePolicy<'a> {
    config: &'a GrouperConfig,
    facts: &'a BTreeMap<usize, &'a SymbolFacts>,
    graph: &'a DependencyGraph,
}

impl<'a> MergePolicy<'a> {
    pub fn new(
        config: &'a GrouperConfig,
        facts: &'a BTreeMap<usize, &'a SymbolFacts>,
        graph: &'a DependencyGraph,
    ) -> Self {
        Self {
            config,
            facts,
            graph,
        }
    }

    /// Singleton group for one unit
    pub fn seed(unit: &SymbolFacts) -> Group {
        Group {
            units: vec![unit.index],
            category: categorize(&unit.variable_names()),
            defined_names: unit.defined_names.clone(),
            external_references: unit.external_references.clone(),
        }
    }

    fn has_backward_dependency(&self, group: &Group) -> bool {
        group
            .units
            .iter()
            .any(|&unit| self.graph.has_backward_dependency(unit))
    }

    fn defines_functions(&self, group: &Group) -> bool {
        group
            .units
            .iter()
            .filter_map(|unit| self.facts.get(unit))
            .any(|facts| facts.defines_functions())
    }

    pub fn can_merge(&self, current: &Group, next: &Group) -> bool {
        if current.len() + next.len() > self.config.max_group_units {
            return false;
        }
        if next.min_unit().saturating_sub(current.max_unit()) > self.config.max_merge_gap {
            return false;
        }
        if self.has_backward_dependency(current) || self.has_backward_dependency(next) {
            return false;
        }
        if self.defines_functions(current) || self.defines_functions(next) {
            return false;
        }

        if current.category.is_utility()
            || next.category.is_utility()
            || current.category == next.category
        {
            return true;
        }

        let shares_symbol = next
            .external_references
            .iter()
            .any(|name| current.defined_names.contains(name));
        shares_symbol && is_compatible(current.category, next.category)
    }

    /// Fold the seeds left to right, merging each into the running group when allowed
    pub fn merge_all(&self, seeds: Vec<Group>) -> Vec<Group> {
        seeds.into_iter().fold(Vec::new(), |mut merged, next| {
            match merged.pop() {
                Some(current) if self.can_merge(&current, &next) => {
                    log::debug!(
                        "Merging unit(s) {:?} into group {:?}",
                        next.units,
                        current.units
                    );
                    merged.push(merge_pair(current, next));
                }
                Some(current) => {
                    merged.push(current);
                    merged.push(next);
                }
                None => merged.push(next),
            }
            merged
        })
    }
}

/// Union of two adjacent groups; a utility group adopts the more specific category
fn merge_pair(current: Group, next: Group) -> Group {
    let category = if current.category.is_utility() {
        next.category
    } else {
        current.category
    };

    let mut units = current.units;
    units.extend(next.units);

    let mut defined_names = current.defined_names;
    defined_names.extend(next.defined_names);

    let mut external_references = current.external_references;
    external_references.extend(next.external_references);

    Group {
        units,
        category,
        defined_names,
        external_references,
    }
}
