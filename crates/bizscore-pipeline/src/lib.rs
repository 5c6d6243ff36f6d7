//! Bizscore Pipeline
//!
//! Staged evaluation of business-diagnosis submissions.
//!
//! # Overview
//!
//! A run takes one diagnosis identifier through five stages in a fixed order:
//!
//! | Stage | Produces | Postcondition |
//! |-------|----------|---------------|
//! | **validate-input** | validated identifier | prefix, length, character set |
//! | **retrieve-data** | diagnosis record | identifier matches, company name and answers present |
//! | **compute-score** | score, benchmark, priorities | every value in range, every category scored |
//! | **render-report** | rendered report | sections, size, company name and id mentioned |
//! | **quality-check** | verdict | embedded values match the source exactly, no placeholders |
//!
//! Each stage is retried up to its configured `max_retries` with a fixed
//! delay and a per-attempt timeout. A run either passes every stage in order
//! or fails with the stage, the attempts used and the last reason.
//!
//! # Usage
//!
//! ```no_run
//! use bizscore_pipeline::{DataRetriever, Evaluator, PipelineConfig, ReportRenderer};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     retriever: Arc<dyn DataRetriever>,
//! #     renderer: Arc<dyn ReportRenderer>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = PipelineConfig::default().build()?;
//! let evaluator = Evaluator::standard(&settings, retriever, renderer)?;
//!
//! match evaluator.evaluate("DX-20250301-0042").await {
//!     Ok(evaluation) => println!("{} scored {}", evaluation.company_name, evaluation.score.total),
//!     Err(failure) => eprintln!("{}", failure),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod orchestrator;
pub mod stage;
pub mod steps;

// Re-exports for convenience
pub use batch::{BatchItem, BatchRunner, BatchSummary};
pub use collaborators::{DataRetriever, ReportRenderer, ResultSink};
pub use config::{
    BatchConfig, BenchmarkConfig, CategoryConfig, GradeThresholds, ImportanceConfig,
    PipelineConfig, PipelineSettings, PriorityConfig, ScoringConfig, ScoringSettings,
    StagePolicy, StagesConfig, TierThresholds,
};
pub use context::{ContextKey, ContextValue, RunContext, StageOutput};
pub use error::{AttemptError, CollaboratorError, ConfigError, PipelineError, StepError};
pub use evaluator::{Evaluation, Evaluator, RunFailure, SinkOutcome};
pub use metrics::RunMetrics;
pub use orchestrator::{Orchestrator, PipelineRun, RunStatus, StageRecord};
pub use stage::{StageConfig, StageDefinition, StageId, StageStep};
