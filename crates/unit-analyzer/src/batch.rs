use crate::ast_analyzer::UnitAnalyzer;
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};
use crate::types::SymbolFacts;
use nb2prod_protocol::CodeUnit;
use rayon::prelude::*;

/// Analyze every unit, returning facts in input order.
///
/// With `parallel` set the work is spread over the rayon pool with one parser per worker;
/// the result is identical to the sequential run.
pub fn analyze_units(
    units: &[CodeUnit],
    config: &AnalyzerConfig,
    parallel: bool,
) -> Result<Vec<SymbolFacts>> {
    // Fail fast on grammar or config problems before fanning out
    let mut analyzer = UnitAnalyzer::new(config.clone())?;

    if !parallel || units.len() < 2 {
        return Ok(units.iter().map(|unit| analyzer.analyze(unit)).collect());
    }

    // Each worker builds its own parser; a setup failure fails the batch
    units
        .par_iter()
        .map_init(
            || UnitAnalyzer::new(config.clone()),
            |worker, unit| match worker {
                Ok(analyzer) => Ok(analyzer.analyze(unit)),
                Err(e) => Err(AnalyzerError::tree_sitter(format!(
                    "Worker setup failed for unit {}: {e}",
                    unit.index
                ))),
            },
        )
        .collect()
}
