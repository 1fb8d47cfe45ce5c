use nb2prod_graph::DependencyGraph;
use nb2prod_grouper::GroupingOutcome;
use nb2prod_protocol::NoCandidateReason;
use nb2prod_unit_analyzer::SymbolFacts;

/// Why the candidate list is empty; nothing when there are candidates
pub(crate) fn explain_no_candidates(
    outcome: &GroupingOutcome,
    facts: &[SymbolFacts],
    graph: &DependencyGraph,
) -> Vec<NoCandidateReason> {
    if !outcome.candidates.is_empty() {
        return Vec::new();
    }

    if outcome.educational {
        return vec![NoCandidateReason::EducationalNotebook {
            signals: outcome.signals,
        }];
    }

    let mut reasons = Vec::new();

    let isolated = graph.isolated_units();
    if !isolated.is_empty() {
        reasons.push(NoCandidateReason::IsolatedUnits { units: isolated });
    }

    let mut hardcoded: Vec<usize> = facts
        .iter()
        .filter(|f| f.has_hardcoded_paths)
        .map(|f| f.index)
        .collect();
    hardcoded.sort_unstable();
    if !hardcoded.is_empty() {
        reasons.push(NoCandidateReason::HardcodedPaths { units: hardcoded });
    }

    if !outcome.rejected.is_empty() {
        reasons.push(NoCandidateReason::RejectedGroups {
            count: outcome.rejected.len(),
        });
    }

    if reasons.is_empty() {
        reasons.push(NoCandidateReason::NoMergeableUnits);
    }

    reasons
}
