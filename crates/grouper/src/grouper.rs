use crate::config::GrouperConfig;
use crate::educational::{educational_signals, is_educational};
use crate::error::Result;
use crate::merge::MergePolicy;
use crate::quality::check_quality;
use crate::signature::synthesize;
use nb2prod_graph::DependencyGraph;
use nb2prod_protocol::{
    EducationalSignals, FunctionCandidate, Group, NotebookStats, RejectedGroup,
};
use nb2prod_unit_analyzer::SymbolFacts;
use std::collections::BTreeMap;

/// Result of grouping one notebook
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingOutcome {
    /// Accepted groups in unit order
    pub candidates: Vec<FunctionCandidate>,

    /// Merged groups that failed a quality gate, in unit order
    pub rejected: Vec<RejectedGroup>,

    pub signals: EducationalSignals,

    /// The educational gate fired; nothing was grouped
    pub educational: bool,
}

/// Merges adjacent units into quality-gated function candidates
pub struct CohesionGrouper {
    config: GrouperConfig,
}

impl CohesionGrouper {
    pub fn new(config: GrouperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    pub fn group(
        &self,
        facts: &[SymbolFacts],
        graph: &DependencyGraph,
        stats: &NotebookStats,
    ) -> Result<GroupingOutcome> {
        for unit in facts {
            graph.unit(unit.index)?;
        }

        let signals = educational_signals(facts, graph, stats, &self.config.educational);
        let has_symbols = facts.iter().any(|f| !f.is_empty());
        if has_symbols && is_educational(&signals, &self.config.educational) {
            log::info!(
                "Notebook looks educational (markdown ratio {:.2}, variable reuse {}, dependency coverage {:.2}); skipping grouping",
                signals.markdown_ratio,
                signals.variable_reuse,
                signals.dependency_coverage
            );
            return Ok(GroupingOutcome {
                candidates: Vec::new(),
                rejected: Vec::new(),
                signals,
                educational: true,
            });
        }

        let by_index: BTreeMap<usize, &SymbolFacts> = facts.iter().map(|f| (f.index, f)).collect();

        // Import-only and empty units never enter a group
        let seeds: Vec<Group> = by_index
            .values()
            .filter(|f| !f.is_empty() && !f.is_import_only())
            .map(|f| MergePolicy::seed(f))
            .collect();

        let policy = MergePolicy::new(&self.config, &by_index, graph);
        let merged = policy.merge_all(seeds);
        let merged_count = merged.len();

        let mut candidates = Vec::new();
        let mut rejected = Vec::new();
        for group in merged {
            let signature = synthesize(&group, facts);
            match check_quality(&group, &signature, &by_index, graph, &self.config) {
                Ok(()) => candidates.push(FunctionCandidate {
                    name: signature.name,
                    category: group.category,
                    units: group.units.clone(),
                    parameters: signature.parameters,
                    returns: signature.returns,
                    group,
                }),
                Err(reason) => {
                    log::debug!("Rejected group {:?}: {reason}", group.units);
                    rejected.push(RejectedGroup { group, reason });
                }
            }
        }

        log::info!(
            "Grouped {} units into {} groups: {} candidates, {} rejected",
            by_index.len(),
            merged_count,
            candidates.len(),
            rejected.len()
        );

        Ok(GroupingOutcome {
            candidates,
            rejected,
            signals,
            educational: false,
        })
    }
}
