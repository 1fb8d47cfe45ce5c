use crate::error::{GrouperError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds of the educational-notebook gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationalThresholds {
    /// Markdown share above which a notebook reads as a tutorial
    pub max_markdown_ratio: f64,

    /// Most units allowed to assign the same tutorial name
    pub max_variable_reuse: usize,

    /// Share of units with dependencies below which units are self-contained examples
    pub min_dependency_coverage: f64,

    /// Variable names typical for parallel tutorial examples
    pub tutorial_names: Vec<String>,
}

impl Default for EducationalThresholds {
    fn default() -> Self {
        Self {
            max_markdown_ratio: 0.4,
            max_variable_reuse: 3,
            min_dependency_coverage: 0.3,
            tutorial_names: ["x", "y", "X", "data", "model"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Configuration for cohesion grouping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperConfig {
    /// Largest group the merge step may build
    pub max_group_units: usize,

    /// Largest index distance between a group and the next unit
    pub max_merge_gap: usize,

    /// Smallest group worth extracting
    pub min_group_units: usize,

    pub educational: EducationalThresholds,

    /// Share of never-used definitions above which a group is dead code
    pub max_dead_symbol_ratio: f64,

    /// Fewest definitions a group must actually use
    pub min_used_definitions: usize,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            max_group_units: 4,
            max_merge_gap: 2,
            min_group_units: 2,
            educational: EducationalThresholds::default(),
            max_dead_symbol_ratio: 0.5,
            min_used_definitions: 2,
        }
    }
}

impl GrouperConfig {
    /// Config that never classifies a notebook as educational
    pub fn without_educational_gate() -> Self {
        Self {
            educational: EducationalThresholds {
                max_markdown_ratio: 1.0,
                max_variable_reuse: usize::MAX,
                min_dependency_coverage: 0.0,
                ..EducationalThresholds::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.min_group_units == 0 {
            return Err(GrouperError::invalid_config("min_group_units must be > 0"));
        }

        if self.min_group_units > self.max_group_units {
            return Err(GrouperError::invalid_config(format!(
                "min_group_units ({}) cannot exceed max_group_units ({})",
                self.min_group_units, self.max_group_units
            )));
        }

        let ratios = [
            ("educational.max_markdown_ratio", self.educational.max_markdown_ratio),
            (
                "educational.min_dependency_coverage",
                self.educational.min_dependency_coverage,
            ),
            ("max_dead_symbol_ratio", self.max_dead_symbol_ratio),
        ];
        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(GrouperError::invalid_config(format!(
                    "{name} must be within 0.0..=1.0, got {value}"
                )));
            }
        }

        Ok(())
    }
}
