use crate::error::{PipelineError, Result};
use nb2prod_grouper::GrouperConfig;
use nb2prod_unit_analyzer::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a whole analysis run
///
/// Loadable from TOML; missing keys fall back to defaults:
///
/// ```toml
/// parallel = true
///
/// [analyzer]
/// strip_magics = false
///
/// [grouper.educational]
/// max_markdown_ratio = 0.6
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub analyzer: AnalyzerConfig,
    pub grouper: GrouperConfig,

    /// Analyze units on the rayon pool
    pub parallel: bool,
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.analyzer
            .validate()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        self.grouper
            .validate()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        Ok(())
    }
}
