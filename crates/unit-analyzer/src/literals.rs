use crate::error::{AnalyzerError, Result};
use regex::Regex;

/// Decides whether a string literal looks like a file path
#[derive(Debug, Clone)]
pub(crate) struct PathHeuristic {
    extension: Option<Regex>,
}

impl PathHeuristic {
    pub fn new(extensions: &[String]) -> Result<Self> {
        if extensions.is_empty() {
            return Ok(Self { extension: None });
        }

        let alternation = extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect::<Vec<_>>()
            .join("|");
        let extension = Regex::new(&format!(r"(?i)\.(?:{alternation})\b"))
            .map_err(|e| AnalyzerError::invalid_config(format!("data file extensions: {e}")))?;

        Ok(Self {
            extension: Some(extension),
        })
    }

    pub fn looks_like_path(&self, value: &str) -> bool {
        value.contains('/')
            || value.contains('\\')
            || self
                .extension
                .as_ref()
                .is_some_and(|re| re.is_match(value))
    }
}
