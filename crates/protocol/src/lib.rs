//! Shared data model for the nb2prod analysis pipeline.
//!
//! Everything that crosses a crate boundary lives here: the notebook units handed in by the
//! loading collaborator, the dependency edges produced by the resolver, the groups and
//! function candidates produced by the grouper, and the report records consumed by the
//! reporting and code-generation layers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

mod report;

pub use report::{
    CellReport, EducationalSignals, Issue, IssueKind, NoCandidateReason, NotebookAnalysis,
    RejectedGroup, RejectionReason,
};

pub const ANALYSIS_SCHEMA_VERSION: u32 = 1;

/// Kind of a notebook cell
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Code,
    Markdown,
    #[serde(alias = "raw")]
    Other,
}

impl UnitKind {
    /// Map an nbformat `cell_type` onto a unit kind
    pub fn from_cell_type(cell_type: &str) -> Self {
        match cell_type {
            "code" => Self::Code,
            "markdown" => Self::Markdown,
            _ => Self::Other,
        }
    }
}

/// One notebook cell at a fixed position
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CodeUnit {
    /// Zero-based position in the notebook; the only ordering authority
    pub index: usize,
    pub kind: UnitKind,
    pub source: String,
}

impl CodeUnit {
    pub fn new(index: usize, kind: UnitKind, source: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            source: source.into(),
        }
    }

    pub fn code(index: usize, source: impl Into<String>) -> Self {
        Self::new(index, UnitKind::Code, source)
    }

    pub fn markdown(index: usize, source: impl Into<String>) -> Self {
        Self::new(index, UnitKind::Markdown, source)
    }

    /// Code unit with non-blank source
    pub fn is_analyzable(&self) -> bool {
        self.kind == UnitKind::Code && !self.source.trim().is_empty()
    }
}

/// Aggregate counts over all units of a notebook
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
pub struct NotebookStats {
    pub total_units: usize,
    pub code_units: usize,
    pub markdown_units: usize,
    pub empty_units: usize,
}

impl NotebookStats {
    pub fn from_units(units: &[CodeUnit]) -> Self {
        let mut stats = Self {
            total_units: units.len(),
            ..Self::default()
        };
        for unit in units {
            match unit.kind {
                UnitKind::Code => stats.code_units += 1,
                UnitKind::Markdown => stats.markdown_units += 1,
                UnitKind::Other => {}
            }
            if unit.source.trim().is_empty() {
                stats.empty_units += 1;
            }
        }
        stats
    }

    pub fn markdown_ratio(&self) -> f64 {
        self.markdown_units as f64 / self.total_units.max(1) as f64
    }
}

/// `from_unit` consumes `shared_symbols` defined in `to_unit`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct DependencyEdge {
    pub from_unit: usize,
    pub to_unit: usize,
    pub shared_symbols: BTreeSet<String>,
}

impl DependencyEdge {
    pub fn new(from_unit: usize, to_unit: usize, shared_symbols: BTreeSet<String>) -> Self {
        Self {
            from_unit,
            to_unit,
            shared_symbols,
        }
    }

    /// The supplying unit sits after the consumer
    pub fn is_execution_order_violation(&self) -> bool {
        self.to_unit > self.from_unit
    }
}

/// Functional area a group of units belongs to
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Data,
    Feature,
    Model,
    Visualization,
    Utility,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Data,
        Category::Feature,
        Category::Model,
        Category::Visualization,
        Category::Utility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Feature => "feature",
            Category::Model => "model",
            Category::Visualization => "visualization",
            Category::Utility => "utility",
        }
    }

    pub fn is_utility(self) -> bool {
        self == Category::Utility
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run of units proposed as the body of one function
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Group {
    /// Member indices in ascending order (never empty)
    pub units: Vec<usize>,
    pub category: Category,
    pub defined_names: BTreeSet<String>,
    pub external_references: BTreeSet<String>,
}

impl Group {
    pub fn min_unit(&self) -> usize {
        self.units.first().copied().unwrap_or_default()
    }

    pub fn max_unit(&self) -> usize {
        self.units.last().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.units.binary_search(&index).is_ok()
    }
}

/// Accepted group with its inferred signature
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct FunctionCandidate {
    /// Suggested function name
    pub name: String,
    pub category: Category,
    pub units: Vec<usize>,
    pub parameters: Vec<String>,
    pub returns: Vec<String>,
    pub group: Group,
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stats_count_kinds_and_blank_units() {
        let units = vec![
            CodeUnit::code(0, "x = 1"),
            CodeUnit::markdown(1, "# Title"),
            CodeUnit::code(2, "   \n"),
            CodeUnit::new(3, UnitKind::Other, "raw"),
        ];
        let stats = NotebookStats::from_units(&units);
        assert_eq!(
            stats,
            NotebookStats {
                total_units: 4,
                code_units: 2,
                markdown_units: 1,
                empty_units: 1,
            }
        );
        assert!((stats.markdown_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn markdown_ratio_of_empty_notebook_is_zero() {
        assert_eq!(NotebookStats::default().markdown_ratio(), 0.0);
    }

    #[test]
    fn only_nonblank_code_is_analyzable() {
        assert!(CodeUnit::code(0, "print(1)").is_analyzable());
        assert!(!CodeUnit::code(0, "  ").is_analyzable());
        assert!(!CodeUnit::markdown(0, "text").is_analyzable());
    }

    #[test]
    fn forward_edge_is_violation() {
        let edge = DependencyEdge::new(1, 3, BTreeSet::from(["df".to_string()]));
        assert!(edge.is_execution_order_violation());
        let edge = DependencyEdge::new(3, 1, BTreeSet::new());
        assert!(!edge.is_execution_order_violation());
    }

    #[test]
    fn unit_kind_serializes_snake_case() {
        let json = serde_json::to_string(&UnitKind::Markdown).unwrap();
        assert_eq!(json, "\"markdown\"");
        let kind: UnitKind = serde_json::from_str("\"raw\"").unwrap();
        assert_eq!(kind, UnitKind::Other);
    }
}
