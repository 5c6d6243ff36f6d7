use crate::config::ScoringSettings;
use crate::context::{ContextKey, ContextValue, RunContext, StageOutput};
use crate::error::StepError;
use crate::stage::StageStep;
use async_trait::async_trait;
use bizscore_domain::{benchmark, prioritize, score};
use bizscore_gatekeeper::{Gatekeeper, Postcondition, RejectionReason};
use std::sync::Arc;
use tracing::debug;

/// compute-score: score, benchmark and prioritize the retrieved answers
pub struct ComputeScoreStep {
    scoring: Arc<ScoringSettings>,
    gatekeeper: Arc<Gatekeeper>,
}

impl ComputeScoreStep {
    /// Create the step
    pub fn new(scoring: Arc<ScoringSettings>, gatekeeper: Arc<Gatekeeper>) -> Self {
        Self {
            scoring,
            gatekeeper,
        }
    }
}

#[async_trait]
impl StageStep for ComputeScoreStep {
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError> {
        let record = context
            .record()
            .ok_or(StepError::MissingInput(ContextKey::Record))?;
        let answers = record
            .answer_vector(self.scoring.categories.question_count())
            .ok_or_else(|| StepError::Failed("record carries no answers".to_string()))?;

        let result = score(&answers, &self.scoring.categories);
        let bench = benchmark(&result, record.industry_type(), &self.scoring.benchmark);
        let priorities = prioritize(&result.category_scores, &self.scoring.priority);

        debug!(
            total = result.total,
            percentage = result.percentage,
            grade = bench.grade.as_str(),
            priorities = priorities.len(),
            "Score computed"
        );

        Ok(StageOutput::new()
            .with(ContextKey::Score, ContextValue::Score(result))
            .with(ContextKey::Benchmark, ContextValue::Benchmark(bench))
            .with(ContextKey::Priorities, ContextValue::Priorities(priorities)))
    }

    fn postcondition(&self, _context: &RunContext, output: &StageOutput) -> Postcondition {
        match (output.get(ContextKey::Score), output.get(ContextKey::Benchmark)) {
            (Some(ContextValue::Score(result)), Some(ContextValue::Benchmark(bench))) => self
                .gatekeeper
                .validate_score(result, bench, &self.scoring.categories),
            (Some(ContextValue::Score(_)), _) => Postcondition::rejected(
                RejectionReason::MissingField(ContextKey::Benchmark.to_string()),
            ),
            _ => Postcondition::rejected(RejectionReason::MissingField(
                ContextKey::Score.to_string(),
            )),
        }
    }
}
