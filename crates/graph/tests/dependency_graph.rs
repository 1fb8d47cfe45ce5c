use nb2prod_graph::{DependencyGraph, GraphBuilder};
use nb2prod_protocol::CodeUnit;
use nb2prod_unit_analyzer::{analyze_units, AnalyzerConfig};
use pretty_assertions::assert_eq;

fn graph_for(sources: &[&str]) -> DependencyGraph {
    let units: Vec<CodeUnit> = sources
        .iter()
        .enumerate()
        .map(|(i, src)| CodeUnit::code(i, *src))
        .collect();
    let facts = analyze_units(&units, &AnalyzerConfig::default(), false).expect("analyze");
    GraphBuilder::build(&facts).expect("build graph")
}

#[test]
fn linear_pipeline_has_full_coverage() {
    let graph = graph_for(&[
        "import pandas as pd\nraw = pd.read_table(source)",
        "df = raw.dropna()",
        "model = fit(df)",
    ]);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.dependents_of(1), vec![2]);
    assert_eq!(graph.suppliers_of(2), vec![1]);
    assert!(graph.execution_order_violations().is_empty());
    assert!((graph.dependency_coverage() - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(graph.unit(0).unwrap().unattributed.len(), 1);
}

#[test]
fn use_before_definition_is_a_violation() {
    let graph = graph_for(&["summary = describe(df)", "df = load()"]);

    let violations = graph.execution_order_violations();
    assert_eq!(violations.len(), 1);
    assert_eq!((violations[0].from_unit, violations[0].to_unit), (0, 1));
    assert!(graph.has_backward_dependency(0));
    assert!(!graph.has_backward_dependency(1));
}

#[test]
fn isolated_units_skip_empty_facts() {
    let graph = graph_for(&["a = 1", "   ", "b = a", "print('done')"]);
    assert_eq!(graph.isolated_units(), Vec::<usize>::new());

    let graph = graph_for(&["a = 1", "c = 2", "b = a"]);
    assert_eq!(graph.isolated_units(), vec![1]);
}

#[test]
fn unknown_unit_has_no_edges() {
    let graph = graph_for(&["x = 1"]);
    assert!(graph.edges_of(42).is_empty());
    assert!(graph.unit(42).is_err());
    assert!(graph.dependents_of(42).is_empty());
}
