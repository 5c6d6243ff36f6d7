//! Stage identifiers, static stage configuration and the step seam

use crate::config::StagePolicy;
use crate::context::{ContextKey, RunContext, StageOutput};
use crate::error::StepError;
use async_trait::async_trait;
use bizscore_gatekeeper::Postcondition;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The fixed pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageId {
    /// Check the identifier format
    ValidateInput,
    /// Fetch the diagnosis record
    RetrieveData,
    /// Score, benchmark and prioritize
    ComputeScore,
    /// Render the report
    RenderReport,
    /// Compare the report with its sources
    QualityCheck,
}

impl StageId {
    /// All stages in execution order
    pub const ALL: [StageId; 5] = [
        StageId::ValidateInput,
        StageId::RetrieveData,
        StageId::ComputeScore,
        StageId::RenderReport,
        StageId::QualityCheck,
    ];

    /// Stable kebab-case id
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::ValidateInput => "validate-input",
            StageId::RetrieveData => "retrieve-data",
            StageId::ComputeScore => "compute-score",
            StageId::RenderReport => "render-report",
            StageId::QualityCheck => "quality-check",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            StageId::ValidateInput => "Input validation",
            StageId::RetrieveData => "Data retrieval",
            StageId::ComputeScore => "Score computation",
            StageId::RenderReport => "Report rendering",
            StageId::QualityCheck => "Quality check",
        }
    }

    /// Context keys the stage requires before it may start
    pub fn required_keys(&self) -> &'static [ContextKey] {
        match self {
            StageId::ValidateInput => &[ContextKey::RawIdentifier],
            StageId::RetrieveData => &[ContextKey::ValidatedIdentifier],
            StageId::ComputeScore => &[ContextKey::Record],
            StageId::RenderReport => &[
                ContextKey::Score,
                ContextKey::Benchmark,
                ContextKey::Priorities,
                ContextKey::Record,
            ],
            StageId::QualityCheck => &[ContextKey::Report, ContextKey::Record, ContextKey::Score],
        }
    }

    /// Context keys the stage produces
    pub fn produced_keys(&self) -> &'static [ContextKey] {
        match self {
            StageId::ValidateInput => &[ContextKey::ValidatedIdentifier],
            StageId::RetrieveData => &[ContextKey::Record],
            StageId::ComputeScore => &[
                ContextKey::Score,
                ContextKey::Benchmark,
                ContextKey::Priorities,
            ],
            StageId::RenderReport => &[ContextKey::Report],
            StageId::QualityCheck => &[ContextKey::QualityVerdict],
        }
    }

    /// Parse a kebab-case id
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration of one stage, loaded once
#[derive(Debug, Clone, PartialEq)]
pub struct StageConfig {
    /// Stage id
    pub id: StageId,

    /// Human-readable name
    pub display_name: String,

    /// Keys that must be present and non-empty before the stage starts
    pub required_keys: Vec<ContextKey>,

    /// Keys the stage adds to the context
    pub produced_keys: Vec<ContextKey>,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,

    /// Hard limit for a single attempt
    pub timeout: Duration,
}

impl StageConfig {
    /// Configuration for a standard stage with the given policy
    pub fn standard(id: StageId, policy: &StagePolicy) -> Self {
        Self {
            id,
            display_name: id.display_name().to_string(),
            required_keys: id.required_keys().to_vec(),
            produced_keys: id.produced_keys().to_vec(),
            max_retries: policy.max_retries,
            retry_delay: policy.retry_delay(),
            timeout: policy.timeout(),
        }
    }

    /// Total attempts allowed (first attempt plus retries)
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// One unit of stage work plus the postcondition that proves it complete
///
/// Implementations read the context and return new values; they never mutate
/// the context themselves. The orchestrator calls [`StageStep::postcondition`]
/// strictly after `execute` returns and before the next stage begins.
#[async_trait]
pub trait StageStep: Send + Sync {
    /// Perform one attempt
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError>;

    /// Decide whether the attempt's output is complete
    fn postcondition(&self, context: &RunContext, output: &StageOutput) -> Postcondition;
}

/// A stage configuration bound to its step implementation
#[derive(Clone)]
pub struct StageDefinition {
    /// Static configuration
    pub config: StageConfig,

    /// Step implementation
    pub step: Arc<dyn StageStep>,
}

impl StageDefinition {
    /// Bind a step to a configuration
    pub fn new(config: StageConfig, step: Arc<dyn StageStep>) -> Self {
        Self { config, step }
    }
}

impl fmt::Debug for StageDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageDefinition")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
