use nb2prod_graph::DependencyGraph;
use nb2prod_protocol::{Issue, IssueKind};
use nb2prod_unit_analyzer::SymbolFacts;

/// Notebook-level findings: one issue per execution-order violation, then missing
/// functions, then hardcoded paths
pub(crate) fn collect_issues(facts: &[SymbolFacts], graph: &DependencyGraph) -> Vec<Issue> {
    let mut issues: Vec<Issue> = graph
        .execution_order_violations()
        .into_iter()
        .map(|edge| Issue {
            kind: IssueKind::ExecutionOrder,
            units: vec![edge.from_unit, edge.to_unit],
            message: format!(
                "Cell {} depends on cell {} which comes later",
                edge.from_unit, edge.to_unit
            ),
        })
        .collect();

    if !facts.is_empty() && !facts.iter().any(SymbolFacts::defines_functions) {
        issues.push(Issue {
            kind: IssueKind::NoFunctions,
            units: Vec::new(),
            message: "No functions defined - all code is in global scope".to_string(),
        });
    }

    let mut hardcoded: Vec<usize> = facts
        .iter()
        .filter(|f| f.has_hardcoded_paths)
        .map(|f| f.index)
        .collect();
    hardcoded.sort_unstable();
    if !hardcoded.is_empty() {
        issues.push(Issue {
            kind: IssueKind::HardcodedPaths,
            message: format!("{} cell(s) with hardcoded file paths", hardcoded.len()),
            units: hardcoded,
        });
    }

    issues
}
