use nb2prod_pipeline::{render_module, Notebook};
use nb2prod_protocol::{IssueKind, NotebookAnalysis};

/// Production-readiness score out of 10
pub fn readiness_score(analysis: &NotebookAnalysis) -> u32 {
    let mut score: i32 = 10;
    for issue in &analysis.issues {
        score -= match issue.kind {
            IssueKind::ExecutionOrder => 2,
            IssueKind::HardcodedPaths => 2,
            IssueKind::NoFunctions => 3,
        };
    }
    score.clamp(0, 10) as u32
}

pub fn readiness_verdict(score: u32) -> &'static str {
    if score >= 8 {
        "Excellent! This notebook is production-ready."
    } else if score >= 5 {
        "Moderate. Some improvements needed."
    } else {
        "Needs work. Multiple issues to address."
    }
}

pub fn render_analysis_report(
    notebook: &Notebook,
    analysis: &NotebookAnalysis,
    detailed: bool,
) -> String {
    let name = notebook
        .path
        .as_ref()
        .map_or_else(|| "<notebook>".to_string(), |p| p.display().to_string());
    let stats = &notebook.stats;

    let mut md = String::new();
    md.push_str(&format!("# Notebook analysis: `{name}`\n\n"));

    md.push_str("## Structure\n\n");
    md.push_str("| cells | code | markdown | empty |\n");
    md.push_str("|---:|---:|---:|---:|\n");
    md.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        stats.total_units, stats.code_units, stats.markdown_units, stats.empty_units
    ));

    if detailed {
        let mut imports: Vec<&str> = analysis
            .cells
            .iter()
            .flat_map(|cell| cell.imports.iter().map(String::as_str))
            .collect();
        imports.sort_unstable();
        imports.dedup();
        md.push_str("## Imports\n\n");
        if imports.is_empty() {
            md.push_str("_none_\n\n");
        } else {
            for module in imports {
                md.push_str(&format!("- `{module}`\n"));
            }
            md.push('\n');
        }

        md.push_str("## Cells\n\n");
        for cell in &analysis.cells {
            md.push_str(&format!("### Cell {}\n\n", cell.index));
            if !cell.imports.is_empty() {
                md.push_str(&format!("- Imports: {}\n", cell.imports.join(", ")));
            }
            if !cell.defined_names.is_empty() {
                md.push_str(&format!("- Defines: {}\n", join_names(&cell.defined_names)));
            }
            if !cell.functions_defined.is_empty() {
                md.push_str(&format!(
                    "- Functions: {}\n",
                    join_names(&cell.functions_defined)
                ));
            }
            if !cell.depends_on.is_empty() {
                let suppliers: Vec<String> = cell
                    .depends_on
                    .iter()
                    .map(|edge| edge.to_unit.to_string())
                    .collect();
                md.push_str(&format!("- Depends on cells: {}\n", suppliers.join(", ")));
            }
            if cell.hardcoded_path_flag {
                md.push_str("- Hardcoded paths\n");
            }
            md.push('\n');
        }
    }

    md.push_str("## Issues\n\n");
    if analysis.issues.is_empty() {
        md.push_str("No issues found.\n\n");
    } else {
        for issue in &analysis.issues {
            md.push_str(&format!("- {}\n", issue.message));
        }
        md.push('\n');
    }

    md.push_str("## Function candidates\n\n");
    if analysis.candidates.is_empty() {
        md.push_str("No function candidates.\n");
        for reason in &analysis.no_candidate_reasons {
            md.push_str(&format!("- {reason}\n"));
        }
        md.push('\n');
    } else {
        md.push_str("| name | category | cells | parameters | returns |\n");
        md.push_str("|---|---|---|---|---|\n");
        for candidate in &analysis.candidates {
            md.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                candidate.name,
                candidate.category,
                join_indices(&candidate.units),
                or_dash(&candidate.parameters.join(", ")),
                or_dash(&candidate.returns.join(", ")),
            ));
        }
        md.push('\n');
    }

    if !analysis.rejected_groups.is_empty() {
        md.push_str("## Rejected groups\n\n");
        for rejected in &analysis.rejected_groups {
            md.push_str(&format!(
                "- cells {}: {}\n",
                join_indices(&rejected.group.units),
                rejected.reason
            ));
        }
        md.push('\n');
    }

    let score = readiness_score(analysis);
    md.push_str(&format!("## Readiness: {score}/10\n\n"));
    md.push_str(readiness_verdict(score));
    md.push('\n');

    md
}

/// Python module holding every candidate, or comments explaining why there is none
pub fn render_extraction(notebook: &Notebook, analysis: &NotebookAnalysis) -> String {
    if analysis.candidates.is_empty() {
        let mut out = String::from("# No functions could be extracted\n");
        for reason in &analysis.no_candidate_reasons {
            out.push_str(&format!("# - {reason}\n"));
        }
        return out;
    }
    render_module(&analysis.candidates, &notebook.units)
}

fn join_indices(units: &[usize]) -> String {
    units
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nb2prod_protocol::{Issue, ANALYSIS_SCHEMA_VERSION};

    fn analysis_with(kinds: &[IssueKind]) -> NotebookAnalysis {
        NotebookAnalysis {
            schema_version: ANALYSIS_SCHEMA_VERSION,
            cells: Vec::new(),
            issues: kinds
                .iter()
                .map(|kind| Issue {
                    kind: *kind,
                    units: Vec::new(),
                    message: String::new(),
                })
                .collect(),
            candidates: Vec::new(),
            rejected_groups: Vec::new(),
            no_candidate_reasons: Vec::new(),
        }
    }

    #[test]
    fn score_deducts_per_issue_and_clamps() {
        assert_eq!(readiness_score(&analysis_with(&[])), 10);
        assert_eq!(
            readiness_score(&analysis_with(&[IssueKind::NoFunctions, IssueKind::HardcodedPaths])),
            5
        );
        let many = vec![IssueKind::ExecutionOrder; 6];
        assert_eq!(readiness_score(&analysis_with(&many)), 0);
    }

    #[test]
    fn verdict_tiers() {
        assert_eq!(readiness_verdict(8), "Excellent! This notebook is production-ready.");
        assert_eq!(readiness_verdict(5), "Moderate. Some improvements needed.");
        assert_eq!(readiness_verdict(4), "Needs work. Multiple issues to address.");
    }

    #[test]
    fn report_lists_structure_and_score() {
        let notebook = Notebook::from_json_str(
            r#"{"nbformat": 4, "cells": [{"cell_type": "code", "source": "x = 1"}]}"#,
        )
        .unwrap();
        let report = render_analysis_report(
            &notebook,
            &analysis_with(&[IssueKind::NoFunctions]),
            true,
        );
        assert!(report.contains("| 1 | 1 | 0 | 0 |"));
        assert!(report.contains("## Readiness: 7/10"));
        assert!(report.contains("Moderate. Some improvements needed."));
        assert!(report.contains("## Imports"));
    }
}
