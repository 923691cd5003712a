//! Error types for the query workbench

use thiserror::Error;

/// Error reported by a collaborator or by the workbench facade.
///
/// Nothing here is fatal to the process: every variant ends up attached to
/// the tab or request that triggered it.
#[derive(Error, Debug)]
pub enum WorkbenchError {
    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Explain error: {0}")]
    Explain(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("No connection bound to this tab")]
    NotConnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl WorkbenchError {
    /// The bare message carried by the error, without the category prefix.
    ///
    /// Collaborator messages are shown to the user verbatim on the tab, so the
    /// prefix added by `Display` is dropped here.
    pub fn message(&self) -> String {
        match self {
            Self::Execution(msg)
            | Self::Explain(msg)
            | Self::Schema(msg)
            | Self::Format(msg)
            | Self::Configuration(msg)
            | Self::Other(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for workbench operations
pub type Result<T> = std::result::Result<T, WorkbenchError>;
