//! Error types for the CLI application.

use bizscore_connectors::ConnectorError;
use bizscore_pipeline::{ConfigError, RunFailure};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline configuration error
    #[error("{0}")]
    Pipeline(#[from] ConfigError),

    /// Connector setup error
    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A pipeline run failed
    #[error("{0}")]
    RunFailed(Box<RunFailure>),

    /// Some runs of a batch failed
    #[error("{failed} of {total} run(s) failed")]
    BatchFailed {
        /// Failed runs
        failed: usize,
        /// Runs attempted
        total: usize,
    },
}

impl CliError {
    /// Process exit code: 2 for failed runs, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::RunFailed(_) | CliError::BatchFailed { .. } => 2,
            _ => 1,
        }
    }
}

impl From<RunFailure> for CliError {
    fn from(failure: RunFailure) -> Self {
        CliError::RunFailed(Box::new(failure))
    }
}
