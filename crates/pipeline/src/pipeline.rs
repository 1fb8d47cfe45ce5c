use crate::config::PipelineConfig;
use crate::error::Result;
use crate::explain::explain_no_candidates;
use crate::issues::collect_issues;
use crate::notebook::Notebook;
use nb2prod_graph::{DependencyGraph, GraphBuilder};
use nb2prod_grouper::CohesionGrouper;
use nb2prod_protocol::{
    CellReport, CodeUnit, NotebookAnalysis, NotebookStats, ANALYSIS_SCHEMA_VERSION,
};
use nb2prod_unit_analyzer::{analyze_units, SymbolFacts};

/// Runs analysis, resolution and grouping over one notebook
pub struct NotebookPipeline {
    config: PipelineConfig,
    grouper: CohesionGrouper,
}

impl NotebookPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let grouper = CohesionGrouper::new(config.grouper.clone())?;
        Ok(Self { config, grouper })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run_notebook(&self, notebook: &Notebook) -> Result<NotebookAnalysis> {
        self.run(&notebook.units, &notebook.stats)
    }

    /// Analyze `units`; non-code and blank units are skipped
    pub fn run(&self, units: &[CodeUnit], stats: &NotebookStats) -> Result<NotebookAnalysis> {
        let analyzable: Vec<CodeUnit> = units
            .iter()
            .filter(|unit| unit.is_analyzable())
            .cloned()
            .collect();

        let facts = analyze_units(&analyzable, &self.config.analyzer, self.config.parallel)?;
        let graph = GraphBuilder::build(&facts)?;
        let outcome = self.grouper.group(&facts, &graph, stats)?;

        let cells = cell_reports(&facts, &graph);
        let issues = collect_issues(&facts, &graph);
        let no_candidate_reasons = explain_no_candidates(&outcome, &facts, &graph);

        log::info!(
            "Analyzed {} of {} units: {} candidates, {} rejected groups, {} issues",
            facts.len(),
            units.len(),
            outcome.candidates.len(),
            outcome.rejected.len(),
            issues.len()
        );

        Ok(NotebookAnalysis {
            schema_version: ANALYSIS_SCHEMA_VERSION,
            cells,
            issues,
            candidates: outcome.candidates,
            rejected_groups: outcome.rejected,
            no_candidate_reasons,
        })
    }
}

fn cell_reports(facts: &[SymbolFacts], graph: &DependencyGraph) -> Vec<CellReport> {
    let mut cells: Vec<CellReport> = facts
        .iter()
        .map(|unit| CellReport {
            index: unit.index,
            imports: unit.imports.clone(),
            defined_names: unit.defined_names.clone(),
            external_references: unit.external_references.clone(),
            functions_defined: unit.function_names.clone(),
            hardcoded_path_flag: unit.has_hardcoded_paths,
            depends_on: graph.edges_of(unit.index).to_vec(),
        })
        .collect();
    cells.sort_by_key(|cell| cell.index);
    cells
}
