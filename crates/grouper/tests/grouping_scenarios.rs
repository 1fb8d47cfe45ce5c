use nb2prod_graph::GraphBuilder;
use nb2prod_grouper::{CohesionGrouper, GrouperConfig, GroupingOutcome};
use nb2prod_protocol::{Category, CodeUnit, NotebookStats, RejectionReason};
use nb2prod_unit_analyzer::{analyze_units, AnalyzerConfig};
use pretty_assertions::assert_eq;

fn group_sources(sources: &[&str], markdown_units: usize) -> GroupingOutcome {
    let units: Vec<CodeUnit> = sources
        .iter()
        .enumerate()
        .map(|(i, src)| CodeUnit::code(i, *src))
        .collect();
    let stats = NotebookStats {
        total_units: units.len() + markdown_units,
        code_units: units.len(),
        markdown_units,
        empty_units: 0,
    };
    let facts = analyze_units(&units, &AnalyzerConfig::default(), false).expect("analyze");
    let graph = GraphBuilder::build(&facts).expect("graph");
    CohesionGrouper::new(GrouperConfig::default())
        .expect("valid config")
        .group(&facts, &graph, &stats)
        .expect("grouping")
}

#[test]
fn load_then_fit_becomes_one_candidate() {
    let outcome = group_sources(
        &[
            "from lib import load, fit\nx = load()",
            "model = fit(x)",
            "fig = plot_history(model)",
        ],
        0,
    );

    assert!(!outcome.educational);
    assert_eq!(outcome.candidates.len(), 1);
    let candidate = &outcome.candidates[0];
    assert_eq!(candidate.units, vec![0, 1]);
    assert!(candidate.parameters.is_empty());
    assert_eq!(candidate.returns, vec!["model".to_string()]);
    assert_eq!(candidate.category, Category::Model);
    assert_eq!(candidate.name, "train_model");
}

#[test]
fn data_and_model_units_merge_with_return() {
    let outcome = group_sources(
        &[
            "from lib import load, fit",
            "df = load()",
            "model = fit(df)",
            "fig = plot(model)",
        ],
        0,
    );

    assert_eq!(outcome.candidates.len(), 1);
    let candidate = &outcome.candidates[0];
    assert_eq!(candidate.units, vec![1, 2]);
    assert_eq!(candidate.returns, vec!["model".to_string()]);
    assert!(candidate.parameters.is_empty());
    assert!(outcome
        .rejected
        .iter()
        .all(|rejected| !rejected.group.contains(0)));
}

#[test]
fn hardcoded_path_rejects_the_group() {
    let outcome = group_sources(
        &[
            "import pandas as pd\npath = \"/data/in.csv\"\ndf = pd.read_csv(path)",
            "df_clean = df.dropna()",
            "summary = df_clean.describe()",
        ],
        0,
    );

    assert!(outcome.candidates.is_empty());
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(
        outcome.rejected[0].reason,
        RejectionReason::HardcodedPaths { units: vec![0] }
    );
}

#[test]
fn markdown_heavy_notebook_yields_nothing() {
    let outcome = group_sources(
        &[
            "from lib import load, fit\nx = load()",
            "model = fit(x)",
            "fig = plot_history(model)",
        ],
        3,
    );

    assert!(outcome.educational);
    assert!((outcome.signals.markdown_ratio - 0.5).abs() < 1e-9);
    assert!(outcome.candidates.is_empty());
    assert!(outcome.rejected.is_empty());
}

#[test]
fn self_contained_examples_are_educational() {
    let outcome = group_sources(&["a = 1", "b = 2", "c = 3", "d = a"], 0);
    assert!(outcome.educational);
    assert!(outcome.signals.dependency_coverage < 0.3);
}

#[test]
fn gate_can_be_disabled() {
    let units: Vec<CodeUnit> = ["a = 1", "b = 2"]
        .iter()
        .enumerate()
        .map(|(i, src)| CodeUnit::code(i, *src))
        .collect();
    let facts = analyze_units(&units, &AnalyzerConfig::default(), false).unwrap();
    let graph = GraphBuilder::build(&facts).unwrap();
    let outcome = CohesionGrouper::new(GrouperConfig::without_educational_gate())
        .unwrap()
        .group(&facts, &graph, &NotebookStats::from_units(&units))
        .unwrap();

    assert!(!outcome.educational);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].reason, RejectionReason::NoInterface);
}
