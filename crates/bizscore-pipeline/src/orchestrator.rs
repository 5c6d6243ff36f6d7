//! Pipeline orchestrator: ordered stages, postconditions, bounded retries

use crate::collaborators::{DataRetriever, ReportRenderer};
use crate::config::PipelineSettings;
use crate::context::{ContextKey, RunContext, StageOutput};
use crate::error::{AttemptError, ConfigError, PipelineError};
use crate::metrics::RunMetrics;
use crate::stage::{StageDefinition, StageId};
use crate::steps;
use bizscore_domain::RunId;
use bizscore_gatekeeper::Postcondition;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Stages are still executing
    Running,
    /// Every stage passed its postcondition
    Succeeded,
    /// A stage could not complete (see [`PipelineRun::error`])
    Failed,
}

/// What happened to one stage in a run
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    /// Stage id
    pub stage: StageId,

    /// Attempts consumed
    pub attempts: u32,

    /// Whether the stage completed
    pub passed: bool,

    /// Completion reported by the last postcondition evaluated (0 if none ran)
    pub completion: u8,

    /// Error of the last failed attempt, if any
    pub last_error: Option<AttemptError>,

    /// Time spent in the stage, including retry delays
    pub elapsed: Duration,
}

/// State of one pipeline execution
///
/// Owned by the caller; only the orchestrator executing it mutates it.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    id: RunId,
    records: Vec<StageRecord>,
    current_stage: usize,
    status: RunStatus,
    context: RunContext,
    error: Option<PipelineError>,
    metrics: RunMetrics,
}

impl PipelineRun {
    /// Start a run over an initial context
    pub fn new(context: RunContext) -> Self {
        Self {
            id: RunId::new(),
            records: Vec::new(),
            current_stage: 0,
            status: RunStatus::Running,
            context,
            error: None,
            metrics: RunMetrics {
                runs: 1,
                ..Default::default()
            },
        }
    }

    /// Run id
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Stage records in execution order
    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    /// Index of the stage executing (or last executed)
    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    /// Current status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Accumulated context
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Terminal error of a failed run
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    /// Per-run metrics
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// True when the run succeeded
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// Consume the run, returning its context, error and metrics
    pub fn into_parts(self) -> (RunContext, Option<PipelineError>, RunMetrics) {
        (self.context, self.error, self.metrics)
    }

    fn fail(&mut self, error: PipelineError) {
        error!(run_id = %self.id, stage = %error.stage(), "Run failed: {}", error);
        self.status = RunStatus::Failed;
        self.error = Some(error);
    }
}

/// Runs a fixed, ordered list of stages
///
/// Immutable after construction and shareable across concurrent runs behind
/// an `Arc`; per-run state lives in [`PipelineRun`].
#[derive(Debug)]
pub struct Orchestrator {
    stages: Vec<StageDefinition>,
}

impl Orchestrator {
    /// Build an orchestrator, checking that the stage order is executable
    ///
    /// Every required key must be one of `initial_keys` or produced by an
    /// earlier stage, and no two stages may produce the same key.
    pub fn new(
        stages: Vec<StageDefinition>,
        initial_keys: &[ContextKey],
    ) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::StageOrder("no stages configured".to_string()));
        }

        let mut available: BTreeSet<ContextKey> = initial_keys.iter().copied().collect();
        let mut seen = BTreeSet::new();

        for stage in &stages {
            let config = &stage.config;
            if !seen.insert(config.id) {
                return Err(ConfigError::StageOrder(format!(
                    "stage '{}' appears more than once",
                    config.id
                )));
            }
            if let Some(key) = config.required_keys.iter().find(|k| !available.contains(k)) {
                return Err(ConfigError::StageOrder(format!(
                    "stage '{}' requires '{}' before any stage produces it",
                    config.id, key
                )));
            }
            for key in &config.produced_keys {
                if !available.insert(*key) {
                    return Err(ConfigError::StageOrder(format!(
                        "stage '{}' produces '{}' which is already provided",
                        config.id, key
                    )));
                }
            }
        }

        Ok(Self { stages })
    }

    /// The five standard stages wired to the given collaborators
    pub fn standard(
        settings: &PipelineSettings,
        retriever: Arc<dyn DataRetriever>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            steps::standard_stages(settings, retriever, renderer),
            &[ContextKey::RawIdentifier],
        )
    }

    /// Configured stages in execution order
    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    /// Run every stage over `context`
    pub async fn run(&self, context: RunContext) -> PipelineRun {
        self.run_with_cancel(context, &CancellationToken::new()).await
    }

    /// Run every stage, checking `cancel` before each stage starts
    ///
    /// An in-flight step is never interrupted; cancellation takes effect at
    /// the next stage boundary and fails the run with [`PipelineError::Cancelled`].
    pub async fn run_with_cancel(&self, context: RunContext, cancel: &CancellationToken) -> PipelineRun {
        let mut run = PipelineRun::new(context);
        let started = Instant::now();

        info!(run_id = %run.id, stages = self.stages.len(), "Pipeline run started");

        for (index, stage) in self.stages.iter().enumerate() {
            run.current_stage = index;
            let id = stage.config.id;

            if cancel.is_cancelled() {
                run.fail(PipelineError::Cancelled { stage: id });
                break;
            }

            let missing: Vec<ContextKey> = stage
                .config
                .required_keys
                .iter()
                .copied()
                .filter(|key| !run.context.is_present(*key))
                .collect();
            if !missing.is_empty() {
                run.fail(PipelineError::MissingPrecondition { stage: id, missing });
                break;
            }

            info!(run_id = %run.id, stage = %id, "Stage started");
            let (outcome, record) = self.run_stage(stage, &run.context, &mut run.metrics, run.id).await;
            let attempts = record.attempts;
            run.records.push(record);

            match outcome {
                Ok(output) => {
                    if let Err(key) = merge(&mut run.context, output) {
                        run.fail(PipelineError::ContextConflict {
                            stage: id,
                            key,
                            attempts,
                        });
                        break;
                    }
                    run.metrics.record_stage_completed();
                    info!(run_id = %run.id, stage = %id, "Stage completed");
                }
                Err(error) => {
                    run.fail(error);
                    break;
                }
            }
        }

        if run.status == RunStatus::Running {
            run.status = RunStatus::Succeeded;
        }
        run.metrics.elapsed = started.elapsed();

        info!(
            run_id = %run.id,
            status = ?run.status,
            attempts = run.metrics.total_attempts(),
            elapsed_ms = run.metrics.elapsed.as_millis() as u64,
            "Pipeline run finished"
        );

        run
    }

    /// Attempt one stage until it passes or its retries are exhausted
    async fn run_stage(
        &self,
        stage: &StageDefinition,
        context: &RunContext,
        metrics: &mut RunMetrics,
        run_id: RunId,
    ) -> (Result<StageOutput, PipelineError>, StageRecord) {
        let config = &stage.config;
        let max_attempts = config.max_attempts();
        let started = Instant::now();
        let mut completion = 0;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            metrics.record_attempt(config.id);
            debug!(run_id = %run_id, stage = %config.id, attempt, max_attempts, "Attempt started");

            match self.attempt(stage, context).await {
                Ok((output, postcondition)) => {
                    let record = StageRecord {
                        stage: config.id,
                        attempts: attempt,
                        passed: true,
                        completion: postcondition.completion,
                        last_error,
                        elapsed: started.elapsed(),
                    };
                    return (Ok(output), record);
                }
                Err(error) => {
                    metrics.record_failure(config.id);
                    warn!(run_id = %run_id, stage = %config.id, attempt, "Attempt failed: {}", error);
                    if let AttemptError::Postcondition { completion: c, .. } = &error {
                        completion = *c;
                    }
                    last_error = Some(error);

                    if attempt < max_attempts {
                        metrics.record_retry(config.id);
                        sleep(config.retry_delay).await;
                    }
                }
            }
        }

        let last_error = last_error.unwrap_or(AttemptError::Timeout {
            timeout_ms: config.timeout.as_millis() as u64,
        });
        let record = StageRecord {
            stage: config.id,
            attempts: max_attempts,
            passed: false,
            completion,
            last_error: Some(last_error.clone()),
            elapsed: started.elapsed(),
        };
        let error = PipelineError::StageExhausted {
            stage: config.id,
            attempts: max_attempts,
            last_error: Box::new(last_error),
        };
        (Err(error), record)
    }

    /// One attempt: execute under the timeout, then check the postcondition
    async fn attempt(
        &self,
        stage: &StageDefinition,
        context: &RunContext,
    ) -> Result<(StageOutput, Postcondition), AttemptError> {
        let config = &stage.config;
        let output = match timeout(config.timeout, stage.step.execute(context)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AttemptError::Timeout {
                    timeout_ms: config.timeout.as_millis() as u64,
                })
            }
        };

        let postcondition = stage.step.postcondition(context, &output);
        if postcondition.passed() {
            Ok((output, postcondition))
        } else {
            Err(AttemptError::Postcondition {
                reason: postcondition.reason(),
                completion: postcondition.completion,
            })
        }
    }
}

fn merge(context: &mut RunContext, output: StageOutput) -> Result<(), ContextKey> {
    for (key, value) in output.into_values() {
        context.insert(key, value)?;
    }
    Ok(())
}
