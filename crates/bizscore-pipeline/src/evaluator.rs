//! Run invocation surface: one identifier in, an evaluation or a failure out

use crate::collaborators::{DataRetriever, ReportRenderer, ResultSink};
use crate::config::PipelineSettings;
use crate::context::{ContextKey, RunContext};
use crate::error::{ConfigError, PipelineError};
use crate::metrics::RunMetrics;
use crate::orchestrator::{Orchestrator, PipelineRun};
use crate::stage::StageId;
use bizscore_domain::{BenchmarkResult, PriorityItem, RenderedReport, RunId, ScoreResult};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// What happened when the evaluation was handed to the result sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    /// No sink configured
    NotConfigured,
    /// The sink accepted the evaluation
    Delivered,
    /// The sink failed; the evaluation itself is still valid
    Failed(String),
}

impl fmt::Display for SinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkOutcome::NotConfigured => f.write_str("not configured"),
            SinkOutcome::Delivered => f.write_str("delivered"),
            SinkOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Run id
    pub run_id: RunId,

    /// Validated diagnosis identifier
    pub identifier: String,

    /// Company name from the source record
    pub company_name: String,

    /// Score result
    pub score: ScoreResult,

    /// Benchmark result
    pub benchmark: BenchmarkResult,

    /// Ranked priority items (possibly empty)
    pub priorities: Vec<PriorityItem>,

    /// Rendered report
    pub report: RenderedReport,

    /// Result sink outcome
    pub sink: SinkOutcome,

    /// Per-run metrics
    pub metrics: RunMetrics,
}

/// A run that did not succeed
#[derive(Error, Debug, Clone)]
#[error("run {run_id} for '{identifier}' failed at stage '{stage}' after {attempts_used} attempt(s): {reason}")]
pub struct RunFailure {
    /// Run id
    pub run_id: RunId,

    /// Identifier as supplied by the caller
    pub identifier: String,

    /// Stage the failure is attributed to
    pub stage: StageId,

    /// Attempts the failing stage consumed
    pub attempts_used: u32,

    /// Operator-readable reason
    pub reason: String,

    /// Underlying pipeline error
    #[source]
    pub error: PipelineError,

    /// Per-run metrics
    pub metrics: RunMetrics,
}

impl RunFailure {
    fn new(run_id: RunId, identifier: &str, error: PipelineError, metrics: RunMetrics) -> Self {
        let reason = match &error {
            PipelineError::StageExhausted { last_error, .. } => last_error.to_string(),
            other => other.to_string(),
        };

        Self {
            run_id,
            identifier: identifier.to_string(),
            stage: error.stage(),
            attempts_used: error.attempts(),
            reason,
            error,
            metrics,
        }
    }
}

/// Runs one identifier through the orchestrator and delivers the result
pub struct Evaluator {
    orchestrator: Arc<Orchestrator>,
    sink: Option<Arc<dyn ResultSink>>,
}

impl Evaluator {
    /// Create an evaluator without a result sink
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            sink: None,
        }
    }

    /// Evaluator over the standard stages
    pub fn standard(
        settings: &PipelineSettings,
        retriever: Arc<dyn DataRetriever>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Result<Self, ConfigError> {
        let orchestrator = Orchestrator::standard(settings, retriever, renderer)?;
        Ok(Self::new(Arc::new(orchestrator)))
    }

    /// Deliver successful evaluations to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Orchestrator used for every run
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Evaluate one diagnosis identifier
    pub async fn evaluate(&self, identifier: &str) -> Result<Evaluation, RunFailure> {
        self.evaluate_with_cancel(identifier, &CancellationToken::new())
            .await
    }

    /// Evaluate one identifier, stopping at the next stage boundary once `cancel` fires
    pub async fn evaluate_with_cancel(
        &self,
        identifier: &str,
        cancel: &CancellationToken,
    ) -> Result<Evaluation, RunFailure> {
        let run = self
            .orchestrator
            .run_with_cancel(RunContext::with_identifier(identifier), cancel)
            .await;
        let run_id = run.id();

        let mut evaluation = match self.collect(run) {
            Ok(evaluation) => evaluation,
            Err((error, metrics)) => {
                return Err(RunFailure::new(run_id, identifier, error, metrics));
            }
        };

        if let Some(sink) = &self.sink {
            evaluation.sink = match sink.deliver(&evaluation).await {
                Ok(()) => SinkOutcome::Delivered,
                Err(e) => {
                    warn!(run_id = %run_id, "Result delivery failed: {}", e);
                    SinkOutcome::Failed(e.to_string())
                }
            };
        }

        info!(
            run_id = %run_id,
            identifier = %evaluation.identifier,
            total = evaluation.score.total,
            grade = %evaluation.benchmark.grade,
            "Evaluation complete"
        );
        Ok(evaluation)
    }

    /// Turn a finished run into an evaluation or its terminal error
    fn collect(&self, run: PipelineRun) -> Result<Evaluation, (PipelineError, RunMetrics)> {
        let run_id = run.id();
        let (context, error, metrics) = run.into_parts();
        if let Some(error) = error {
            return Err((error, metrics));
        }

        let identifier = context.text(ContextKey::ValidatedIdentifier);
        let company_name = context.record().and_then(|r| r.company_name());
        match (
            identifier,
            company_name,
            context.score(),
            context.benchmark(),
            context.priorities(),
            context.report(),
        ) {
            (
                Some(identifier),
                Some(company_name),
                Some(score),
                Some(benchmark),
                Some(priorities),
                Some(report),
            ) => Ok(Evaluation {
                run_id,
                identifier: identifier.to_string(),
                company_name: company_name.to_string(),
                score: score.clone(),
                benchmark: benchmark.clone(),
                priorities: priorities.to_vec(),
                report: report.clone(),
                sink: SinkOutcome::NotConfigured,
                metrics,
            }),
            _ => {
                // A custom stage list that never produces the evaluation keys
                let missing = [
                    ContextKey::ValidatedIdentifier,
                    ContextKey::Record,
                    ContextKey::Score,
                    ContextKey::Benchmark,
                    ContextKey::Priorities,
                    ContextKey::Report,
                ]
                .into_iter()
                .filter(|key| context.get(*key).is_none())
                .collect();
                let stage = self
                    .orchestrator
                    .stages()
                    .last()
                    .map_or(StageId::QualityCheck, |s| s.config.id);
                Err((PipelineError::MissingPrecondition { stage, missing }, metrics))
            }
        }
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("orchestrator", &self.orchestrator)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
