//! Interfaces to the external collaborators a run depends on
//!
//! The pipeline only consumes these traits; implementations live in
//! `bizscore-connectors` (or in tests).

use crate::error::CollaboratorError;
use crate::evaluator::Evaluation;
use async_trait::async_trait;
use bizscore_domain::{
    BenchmarkResult, CompanyInfo, DiagnosisRecord, PriorityItem, RenderedReport, ScoreResult,
};

/// Fetches the diagnosis record for an identifier
#[async_trait]
pub trait DataRetriever: Send + Sync {
    /// Retrieve the record for `identifier`
    async fn retrieve(&self, identifier: &str) -> Result<DiagnosisRecord, CollaboratorError>;
}

/// Renders the report artifact
///
/// The rendered report must embed the company name, diagnosis id and total
/// score as the attributes defined in `bizscore_gatekeeper::markers`; the
/// quality check compares them with the source record.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render a report
    async fn render(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        priorities: &[PriorityItem],
        company: &CompanyInfo,
    ) -> Result<RenderedReport, CollaboratorError>;
}

/// Persists or forwards a finished evaluation
///
/// Called once per successful run. Failures are recorded on the evaluation
/// and never retried.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver an evaluation
    async fn deliver(&self, evaluation: &Evaluation) -> Result<(), CollaboratorError>;
}
