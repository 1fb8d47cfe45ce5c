use nb2prod_pipeline::{render_function, Notebook, NotebookPipeline, PipelineConfig, PipelineError};
use nb2prod_protocol::{
    serialize_json_pretty, IssueKind, NoCandidateReason, NotebookAnalysis, RejectionReason,
};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn notebook_json(cells: &[(&str, &str)]) -> String {
    let cells: Vec<serde_json::Value> = cells
        .iter()
        .map(|(kind, source)| {
            serde_json::json!({
                "cell_type": kind,
                "metadata": {},
                "source": source,
            })
        })
        .collect();
    serde_json::json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": cells,
    })
    .to_string()
}

fn analyze(cells: &[(&str, &str)]) -> (Notebook, NotebookAnalysis) {
    let notebook = Notebook::from_json_str(&notebook_json(cells)).expect("valid notebook");
    let analysis = NotebookPipeline::new(PipelineConfig::default())
        .expect("valid config")
        .run_notebook(&notebook)
        .expect("analysis");
    (notebook, analysis)
}

#[test]
fn load_then_fit_across_markdown_becomes_a_function() {
    let (notebook, analysis) = analyze(&[
        ("code", "from lib import load, fit\nx = load()"),
        ("markdown", "## Training"),
        ("code", "model = fit(x)"),
        ("code", "fig = plot_history(model)"),
    ]);

    assert_eq!(analysis.candidates.len(), 1);
    let candidate = &analysis.candidates[0];
    assert_eq!(candidate.units, vec![0, 2]);
    assert!(candidate.parameters.is_empty());
    assert_eq!(candidate.returns, vec!["model".to_string()]);
    assert!(analysis.no_candidate_reasons.is_empty());

    let rendered = render_function(candidate, &notebook.units);
    let expected = r#"def train_model():
    """Train and evaluate model.

    Returns:
        model
    """
    from lib import load, fit
    x = load()

    model = fit(x)

    return model
"#;
    assert_eq!(rendered, expected);
}

#[test]
fn cell_reports_cover_analysed_units_only() {
    let (_, analysis) = analyze(&[
        ("markdown", "# Title"),
        ("code", "import os\nbase = os.getcwd()"),
        ("code", ""),
        ("code", "files = os.listdir(base)"),
    ]);

    let indices: Vec<usize> = analysis.cells.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 3]);
    assert_eq!(analysis.cells[0].imports, vec!["os".to_string()]);
    let edge = &analysis.cells[1].depends_on[0];
    assert_eq!((edge.from_unit, edge.to_unit), (3, 1));
    assert!(edge.shared_symbols.contains("base"));
}

#[test]
fn out_of_order_definition_is_an_issue() {
    let (_, analysis) = analyze(&[("code", "y = x + 1"), ("code", "x = 1")]);

    let execution: Vec<&Vec<usize>> = analysis
        .issues
        .iter()
        .filter(|issue| issue.kind == IssueKind::ExecutionOrder)
        .map(|issue| &issue.units)
        .collect();
    assert_eq!(execution, vec![&vec![0, 1]]);
    assert_eq!(
        analysis.issues[0].message,
        "Cell 0 depends on cell 1 which comes later"
    );
    assert!(analysis
        .issues
        .iter()
        .any(|issue| issue.kind == IssueKind::NoFunctions));
}

#[test]
fn hardcoded_path_blocks_extraction_and_is_explained() {
    let (_, analysis) = analyze(&[
        (
            "code",
            "import pandas as pd\npath = \"/data/in.csv\"\ndf = pd.read_csv(path)",
        ),
        ("code", "df_clean = df.dropna()"),
        ("code", "summary = df_clean.describe()"),
    ]);

    assert!(analysis.cells[0].hardcoded_path_flag);
    assert!(analysis.candidates.is_empty());
    assert_eq!(
        analysis.no_candidate_reasons,
        vec![
            NoCandidateReason::HardcodedPaths { units: vec![0] },
            NoCandidateReason::RejectedGroups { count: 1 },
        ]
    );
    let hardcoded = analysis
        .issues
        .iter()
        .find(|issue| issue.kind == IssueKind::HardcodedPaths)
        .expect("hardcoded issue");
    assert_eq!(hardcoded.units, vec![0]);
    assert_eq!(hardcoded.message, "1 cell(s) with hardcoded file paths");
}

#[test]
fn trailing_print_cell_joins_the_rejected_group() {
    let (_, analysis) = analyze(&[
        (
            "code",
            "import pandas as pd\npath = \"/data/in.csv\"\ndf = pd.read_csv(path)",
        ),
        ("code", "df2 = df.dropna()"),
        ("code", "print(df2.shape)"),
    ]);

    assert!(analysis.cells[0].hardcoded_path_flag);
    assert!(analysis.cells[2].defined_names.is_empty());
    assert_eq!(analysis.cells[2].depends_on[0].to_unit, 1);
    assert!(analysis.candidates.is_empty());

    assert_eq!(analysis.rejected_groups.len(), 1);
    let rejected = &analysis.rejected_groups[0];
    assert!(rejected.group.contains(0) && rejected.group.contains(1));
    assert_eq!(
        rejected.reason,
        RejectionReason::HardcodedPaths { units: vec![0] }
    );
}

#[test]
fn markdown_heavy_notebook_is_educational() {
    let (_, analysis) = analyze(&[
        ("markdown", "# Lesson"),
        ("code", "from lib import load, fit\nx = load()"),
        ("markdown", "Now fit"),
        ("code", "model = fit(x)"),
        ("markdown", "And plot"),
        ("code", "fig = plot_history(model)"),
    ]);

    assert!(analysis.candidates.is_empty());
    assert!(analysis.rejected_groups.is_empty());
    assert_eq!(analysis.no_candidate_reasons.len(), 1);
    assert!(matches!(
        analysis.no_candidate_reasons[0],
        NoCandidateReason::EducationalNotebook { .. }
    ));
}

#[test]
fn repeated_runs_serialize_identically() {
    let cells = [
        ("code", "import numpy as np\nfrom lib import load, fit"),
        ("code", "df = load()\nscaled = df / df.max()"),
        ("code", "model = fit(scaled)"),
        ("code", "%timeit model.score(scaled)\npreds = model.predict(scaled)"),
        ("code", "fig = plot(preds)"),
    ];
    let (_, first) = analyze(&cells);
    let (_, second) = analyze(&cells);
    assert_eq!(
        serialize_json_pretty(&first).unwrap(),
        serialize_json_pretty(&second).unwrap()
    );

    let notebook = Notebook::from_json_str(&notebook_json(&cells)).unwrap();
    let parallel = NotebookPipeline::new(PipelineConfig {
        parallel: true,
        ..PipelineConfig::default()
    })
    .unwrap()
    .run_notebook(&notebook)
    .unwrap();
    assert_eq!(parallel, first);
}

#[test]
fn notebook_and_config_load_from_disk() {
    let mut notebook_file = NamedTempFile::new().unwrap();
    notebook_file
        .write_all(notebook_json(&[("code", "a = 1"), ("code", "b = a + 1")]).as_bytes())
        .unwrap();
    let notebook = Notebook::from_path(notebook_file.path()).unwrap();
    assert_eq!(notebook.path.as_deref(), Some(notebook_file.path()));
    assert_eq!(notebook.stats.code_units, 2);

    let mut config_file = NamedTempFile::new().unwrap();
    config_file
        .write_all(b"parallel = true\n\n[grouper]\nmax_group_units = 6\n")
        .unwrap();
    let config = PipelineConfig::load(config_file.path()).unwrap();
    assert!(config.parallel);
    assert_eq!(config.grouper.max_group_units, 6);

    let mut broken = NamedTempFile::new().unwrap();
    broken.write_all(b"[grouper]\nmin_group_units = 0\n").unwrap();
    assert!(matches!(
        PipelineConfig::load(broken.path()),
        Err(PipelineError::InvalidConfig(_))
    ));
}
