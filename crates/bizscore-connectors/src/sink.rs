//! Result sinks

use crate::dto::EvaluationDto;
use crate::error::ConnectorError;
use async_trait::async_trait;
use bizscore_pipeline::{CollaboratorError, Evaluation, ResultSink};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Keeps delivered evaluations in memory
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<EvaluationDto>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluations delivered so far
    pub fn delivered(&self) -> Vec<EvaluationDto> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of evaluations delivered
    pub fn len(&self) -> usize {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// True when nothing was delivered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn deliver(&self, evaluation: &Evaluation) -> Result<(), CollaboratorError> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(EvaluationDto::from(evaluation));
        Ok(())
    }
}

/// Appends one JSON object per evaluation to a file
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
    include_report: bool,
}

impl JsonLinesSink {
    /// Create a sink appending to `path` (created if missing)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            include_report: false,
        }
    }

    /// Also write the rendered report into each line
    pub fn with_report(mut self) -> Self {
        self.include_report = true;
        self
    }

    /// Output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, evaluation: &Evaluation) -> Result<(), ConnectorError> {
        let mut dto = EvaluationDto::from(evaluation);
        if self.include_report {
            dto = dto.with_report(evaluation);
        }
        let mut line = serde_json::to_string(&dto)?;
        line.push('\n');

        let io_error = |source: std::io::Error| ConnectorError::Io {
            path: self.path.display().to_string(),
            source,
        };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_error)?;
        file.write_all(line.as_bytes()).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;

        debug!(path = %self.path.display(), run_id = %evaluation.run_id, "Evaluation appended");
        Ok(())
    }
}

#[async_trait]
impl ResultSink for JsonLinesSink {
    async fn deliver(&self, evaluation: &Evaluation) -> Result<(), CollaboratorError> {
        Ok(self.append(evaluation).await?)
    }
}
