use thiserror::Error;

/// Result type for grouping operations
pub type Result<T> = std::result::Result<T, GrouperError>;

#[derive(Error, Debug)]
pub enum GrouperError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Facts and dependency graph disagree
    #[error(transparent)]
    Graph(#[from] nb2prod_graph::GraphError),
}

impl GrouperError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
