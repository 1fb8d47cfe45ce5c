use crate::config::EducationalThresholds;
use nb2prod_graph::DependencyGraph;
use nb2prod_protocol::{EducationalSignals, NotebookStats};
use nb2prod_unit_analyzer::SymbolFacts;

/// Measure the signals of the educational-notebook gate
pub fn educational_signals(
    facts: &[SymbolFacts],
    graph: &DependencyGraph,
    stats: &NotebookStats,
    thresholds: &EducationalThresholds,
) -> EducationalSignals {
    EducationalSignals {
        markdown_ratio: stats.markdown_ratio(),
        variable_reuse: variable_reuse(facts, &thresholds.tutorial_names),
        dependency_coverage: graph.dependency_coverage(),
    }
}

/// Highest number of units assigning the same tutorial name
fn variable_reuse(facts: &[SymbolFacts], tutorial_names: &[String]) -> usize {
    let variables: Vec<_> = facts.iter().map(SymbolFacts::variable_names).collect();
    tutorial_names
        .iter()
        .map(|name| variables.iter().filter(|vars| vars.contains(name)).count())
        .max()
        .unwrap_or(0)
}

pub fn is_educational(signals: &EducationalSignals, thresholds: &EducationalThresholds) -> bool {
    signals.markdown_ratio > thresholds.max_markdown_ratio
        || signals.variable_reuse > thresholds.max_variable_reuse
        || signals.dependency_coverage < thresholds.min_dependency_coverage
}
