//! Error types for pipeline operations

use crate::context::ContextKey;
use crate::stage::StageId;
use bizscore_domain::DomainError;
use bizscore_gatekeeper::GatekeeperError;
use thiserror::Error;

/// Errors reported by external collaborators (retriever, renderer, sink)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// No data exists for the requested identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network or service failure
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with something unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Local I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors returned by a stage step
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// A context value the step reads is missing or has the wrong type
    #[error("required context value '{0}' is missing or has the wrong type")]
    MissingInput(ContextKey),

    /// A collaborator call failed
    #[error("{0}")]
    Collaborator(#[from] CollaboratorError),

    /// The step could not produce an output
    #[error("{0}")]
    Failed(String),
}

/// Why a single stage attempt did not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptError {
    /// The step returned an error
    #[error("step failed: {0}")]
    Step(#[from] StepError),

    /// The attempt exceeded its timeout
    #[error("attempt timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured per-attempt timeout
        timeout_ms: u64,
    },

    /// The step output failed its postcondition
    #[error("postcondition failed ({completion}% complete): {reason}")]
    Postcondition {
        /// Operator-readable rejection reasons
        reason: String,
        /// Share of individual checks that passed
        completion: u8,
    },
}

/// Terminal errors of a pipeline run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Required context keys were absent when the stage was reached (never retried)
    #[error("stage '{stage}' is missing required context: {}", join_keys(missing))]
    MissingPrecondition {
        /// Stage that could not start
        stage: StageId,
        /// Keys that were absent or empty
        missing: Vec<ContextKey>,
    },

    /// Every attempt of a stage failed
    #[error("stage '{stage}' failed after {attempts} attempt(s): {last_error}")]
    StageExhausted {
        /// Stage that gave up
        stage: StageId,
        /// Attempts consumed
        attempts: u32,
        /// Error of the final attempt
        #[source]
        last_error: Box<AttemptError>,
    },

    /// The caller cancelled the run before the stage began
    #[error("run cancelled before stage '{stage}'")]
    Cancelled {
        /// First stage that did not run
        stage: StageId,
    },

    /// A stage tried to overwrite a context value (never retried)
    #[error("stage '{stage}' tried to overwrite context value '{key}'")]
    ContextConflict {
        /// Offending stage
        stage: StageId,
        /// Key that already existed
        key: ContextKey,
        /// Attempts the stage consumed before its output was rejected
        attempts: u32,
    },
}

impl PipelineError {
    /// Stage the error is attributed to
    pub fn stage(&self) -> StageId {
        match self {
            PipelineError::MissingPrecondition { stage, .. }
            | PipelineError::StageExhausted { stage, .. }
            | PipelineError::Cancelled { stage }
            | PipelineError::ContextConflict { stage, .. } => *stage,
        }
    }

    /// Attempts consumed by the failing stage
    pub fn attempts(&self) -> u32 {
        match self {
            PipelineError::StageExhausted { attempts, .. }
            | PipelineError::ContextConflict { attempts, .. } => *attempts,
            PipelineError::MissingPrecondition { .. } | PipelineError::Cancelled { .. } => 0,
        }
    }
}

fn join_keys(keys: &[ContextKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read or written
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Scoring, benchmark or priority configuration is malformed
    #[error("Invalid scoring configuration: {0}")]
    Domain(#[from] DomainError),

    /// Validation configuration is malformed
    #[error("{0}")]
    Validation(#[from] GatekeeperError),

    /// Stage list is not executable as ordered
    #[error("Invalid stage order: {0}")]
    StageOrder(String),

    /// Any other invalid value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
