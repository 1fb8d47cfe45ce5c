use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Notebook not found: {0}")]
    NotebookNotFound(PathBuf),

    #[error("Invalid notebook {path}: {reason}")]
    InvalidNotebook { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Analyzer(#[from] nb2prod_unit_analyzer::AnalyzerError),

    #[error(transparent)]
    Graph(#[from] nb2prod_graph::GraphError),

    #[error(transparent)]
    Grouper(#[from] nb2prod_grouper::GrouperError),
}

impl PipelineError {
    pub fn invalid_notebook(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNotebook {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
