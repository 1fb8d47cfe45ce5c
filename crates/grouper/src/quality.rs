use crate::config::GrouperConfig;
use crate::signature::Signature;
use nb2prod_graph::DependencyGraph;
use nb2prod_protocol::{Group, RejectionReason};
use nb2prod_unit_analyzer::SymbolFacts;
use std::collections::{BTreeMap, BTreeSet};

/// Run the quality gates in order; the first failing gate is the rejection reason
pub(crate) fn check_quality(
    group: &Group,
    signature: &Signature,
    facts: &BTreeMap<usize, &SymbolFacts>,
    graph: &DependencyGraph,
    config: &GrouperConfig,
) -> Result<(), RejectionReason> {
    if group.len() < config.min_group_units {
        return Err(RejectionReason::TooFewUnits {
            units: group.len(),
            required: config.min_group_units,
        });
    }

    let members: Vec<&SymbolFacts> = group
        .units
        .iter()
        .filter_map(|unit| facts.get(unit).copied())
        .collect();

    let hardcoded: Vec<usize> = members
        .iter()
        .filter(|f| f.has_hardcoded_paths)
        .map(|f| f.index)
        .collect();
    if !hardcoded.is_empty() {
        return Err(RejectionReason::HardcodedPaths { units: hardcoded });
    }

    for unit in graph.units().iter().filter(|u| u.index < group.min_unit()) {
        if let Some(member) = unit.suppliers().find(|&s| group.contains(s)) {
            return Err(RejectionReason::ConsumedByEarlierUnit {
                unit: unit.index,
                member,
            });
        }
    }

    for &unit in &group.units {
        if let Some(edge) = graph
            .edges_of(unit)
            .iter()
            .find(|edge| edge.to_unit > unit && group.contains(edge.to_unit))
        {
            return Err(RejectionReason::BackwardDependency {
                unit,
                supplier: edge.to_unit,
            });
        }
    }

    if !signature.has_interface() {
        return Err(RejectionReason::NoInterface);
    }

    let variables: BTreeSet<String> = members.iter().flat_map(|f| f.variable_names()).collect();
    let read: BTreeSet<&String> = members.iter().flat_map(|f| &f.used_names).collect();
    let dead: Vec<String> = variables
        .iter()
        .filter(|name| !read.contains(name) && !signature.returns.contains(*name))
        .cloned()
        .collect();

    if !variables.is_empty() {
        let ratio = dead.len() as f64 / variables.len() as f64;
        if ratio > config.max_dead_symbol_ratio {
            return Err(RejectionReason::MostlyDeadSymbols { dead, ratio });
        }
    }

    let used = variables.len() - dead.len();
    if used < config.min_used_definitions {
        return Err(RejectionReason::TooFewUsedDefinitions {
            used,
            required: config.min_used_definitions,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nb2prod_graph::GraphBuilder;
    use nb2prod_protocol::Category;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn unit(index: usize, defined: &[&str], used: &[&str], external: &[&str]) -> SymbolFacts {
        SymbolFacts {
            defined_names: set(defined),
            used_names: set(used),
            external_references: set(external),
            ..SymbolFacts::empty(index)
        }
    }

    fn check(facts: &[SymbolFacts], members: &[usize], returns: &[&str]) -> Result<(), RejectionReason> {
        let graph = GraphBuilder::build(facts).unwrap();
        let by_index: BTreeMap<usize, &SymbolFacts> = facts.iter().map(|f| (f.index, f)).collect();
        let group = Group {
            units: members.to_vec(),
            category: Category::Data,
            defined_names: BTreeSet::new(),
            external_references: BTreeSet::new(),
        };
        let signature = Signature {
            name: "load_data".to_string(),
            parameters: Vec::new(),
            returns: returns.iter().map(|s| (*s).to_string()).collect(),
        };
        check_quality(&group, &signature, &by_index, &graph, &GrouperConfig::default())
    }

    #[test]
    fn singleton_is_too_small() {
        let facts = vec![unit(0, &["df"], &[], &[])];
        assert_eq!(
            check(&facts, &[0], &["df"]),
            Err(RejectionReason::TooFewUnits {
                units: 1,
                required: 2
            })
        );
    }

    #[test]
    fn hardcoded_member_rejects() {
        let mut loader = unit(0, &["path", "df"], &["path"], &[]);
        loader.has_hardcoded_paths = true;
        let facts = vec![loader, unit(1, &["clean"], &["df"], &["df"])];
        assert_eq!(
            check(&facts, &[0, 1], &["clean"]),
            Err(RejectionReason::HardcodedPaths { units: vec![0] })
        );
    }

    #[test]
    fn earlier_consumer_rejects() {
        let facts = vec![
            unit(0, &["report"], &["df"], &["df"]),
            unit(1, &["df"], &[], &[]),
            unit(2, &["clean"], &["df"], &["df"]),
        ];
        assert_eq!(
            check(&facts, &[1, 2], &["clean"]),
            Err(RejectionReason::ConsumedByEarlierUnit { unit: 0, member: 1 })
        );
    }

    #[test]
    fn mostly_dead_definitions_reject() {
        let facts = vec![
            unit(0, &["a", "b", "c", "e"], &[], &[]),
            unit(1, &["d"], &["a"], &["a"]),
        ];
        match check(&facts, &[0, 1], &["d"]) {
            Err(RejectionReason::MostlyDeadSymbols { dead, ratio }) => {
                assert_eq!(dead, vec!["b", "c", "e"]);
                assert!((ratio - 0.6).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn returned_names_count_as_used() {
        let facts = vec![
            unit(0, &["x"], &["load"], &["load"]),
            unit(1, &["model"], &["fit", "x"], &["fit", "x"]),
        ];
        assert_eq!(check(&facts, &[0, 1], &["model"]), Ok(()));
    }

    #[test]
    fn missing_interface_rejects() {
        let facts = vec![unit(0, &["a"], &[], &[]), unit(1, &["b"], &["a"], &["a"])];
        assert_eq!(check(&facts, &[0, 1], &[]), Err(RejectionReason::NoInterface));
    }
}
