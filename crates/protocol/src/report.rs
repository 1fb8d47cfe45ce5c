use crate::{DependencyEdge, FunctionCandidate, Group};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Per-unit analysis record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CellReport {
    pub index: usize,
    pub imports: Vec<String>,
    pub defined_names: BTreeSet<String>,
    pub external_references: BTreeSet<String>,
    pub functions_defined: BTreeSet<String>,
    pub hardcoded_path_flag: bool,
    /// Nearest supplier first
    pub depends_on: Vec<DependencyEdge>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ExecutionOrder,
    NoFunctions,
    HardcodedPaths,
}

/// Notebook-level finding for the reporting layer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Issue {
    pub kind: IssueKind,
    pub units: Vec<usize>,
    pub message: String,
}

/// Why a merged group did not become a function candidate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    TooFewUnits { units: usize, required: usize },
    HardcodedPaths { units: Vec<usize> },
    /// `unit` precedes the group yet reads a symbol defined by `member`
    ConsumedByEarlierUnit { unit: usize, member: usize },
    /// `unit` reads a symbol defined by the later member `supplier`
    BackwardDependency { unit: usize, supplier: usize },
    NoInterface,
    MostlyDeadSymbols { dead: Vec<String>, ratio: f64 },
    TooFewUsedDefinitions { used: usize, required: usize },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewUnits { units, required } => {
                write!(f, "only {units} unit(s), at least {required} required")
            }
            Self::HardcodedPaths { units } => {
                write!(f, "hardcoded paths in unit(s) {}", join_indices(units))
            }
            Self::ConsumedByEarlierUnit { unit, member } => {
                write!(f, "earlier unit {unit} depends on member {member}")
            }
            Self::BackwardDependency { unit, supplier } => {
                write!(f, "unit {unit} depends on later member {supplier}")
            }
            Self::NoInterface => f.write_str("no parameters and no return values"),
            Self::MostlyDeadSymbols { dead, ratio } => write!(
                f,
                "{:.0}% of definitions are never used ({})",
                ratio * 100.0,
                dead.join(", ")
            ),
            Self::TooFewUsedDefinitions { used, required } => {
                write!(f, "{used} used definition(s), at least {required} required")
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct RejectedGroup {
    pub group: Group,
    pub reason: RejectionReason,
}

/// Measurements behind the educational-notebook gate
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, JsonSchema)]
pub struct EducationalSignals {
    pub markdown_ratio: f64,
    pub variable_reuse: usize,
    pub dependency_coverage: f64,
}

/// Caller-facing explanation for an empty candidate list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoCandidateReason {
    EducationalNotebook { signals: EducationalSignals },
    IsolatedUnits { units: Vec<usize> },
    HardcodedPaths { units: Vec<usize> },
    RejectedGroups { count: usize },
    NoMergeableUnits,
}

impl fmt::Display for NoCandidateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EducationalNotebook { signals } => write!(
                f,
                "notebook looks educational (markdown ratio {:.2}, variable reuse {}, dependency coverage {:.2})",
                signals.markdown_ratio, signals.variable_reuse, signals.dependency_coverage
            ),
            Self::IsolatedUnits { units } => write!(
                f,
                "unit(s) {} neither depend on nor supply other units",
                join_indices(units)
            ),
            Self::HardcodedPaths { units } => write!(
                f,
                "hardcoded paths in unit(s) {} block extraction",
                join_indices(units)
            ),
            Self::RejectedGroups { count } => {
                write!(f, "{count} merged group(s) failed the quality gates")
            }
            Self::NoMergeableUnits => f.write_str("no adjacent units could be merged"),
        }
    }
}

/// Whole-notebook result: analysis records plus function candidates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct NotebookAnalysis {
    pub schema_version: u32,
    pub cells: Vec<CellReport>,
    pub issues: Vec<Issue>,
    pub candidates: Vec<FunctionCandidate>,
    #[serde(default)]
    pub rejected_groups: Vec<RejectedGroup>,
    #[serde(default)]
    pub no_candidate_reasons: Vec<NoCandidateReason>,
}

fn join_indices(units: &[usize]) -> String {
    units
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
