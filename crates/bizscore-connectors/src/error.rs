//! Error types for connector operations

use bizscore_pipeline::CollaboratorError;
use thiserror::Error;

/// Errors raised by the connectors
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// No record exists for the identifier
    #[error("no record for '{0}'")]
    NotFound(String),

    /// File access failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed before a response arrived
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an unexpected status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },
}

impl From<ConnectorError> for CollaboratorError {
    fn from(error: ConnectorError) -> Self {
        match &error {
            ConnectorError::NotFound(identifier) => CollaboratorError::NotFound(identifier.clone()),
            ConnectorError::Io { .. } => CollaboratorError::Io(error.to_string()),
            ConnectorError::Json(_) => CollaboratorError::InvalidResponse(error.to_string()),
            ConnectorError::Http(_) | ConnectorError::Status { .. } => {
                CollaboratorError::Unavailable(error.to_string())
            }
        }
    }
}
