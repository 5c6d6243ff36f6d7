use crate::collaborators::ReportRenderer;
use crate::context::{ContextKey, ContextValue, RunContext, StageOutput};
use crate::error::StepError;
use crate::stage::StageStep;
use async_trait::async_trait;
use bizscore_gatekeeper::{Gatekeeper, Postcondition, RejectionReason};
use std::sync::Arc;
use tracing::debug;

/// render-report: hands the scored result to the renderer
pub struct RenderReportStep {
    renderer: Arc<dyn ReportRenderer>,
    gatekeeper: Arc<Gatekeeper>,
}

impl RenderReportStep {
    /// Create the step
    pub fn new(renderer: Arc<dyn ReportRenderer>, gatekeeper: Arc<Gatekeeper>) -> Self {
        Self {
            renderer,
            gatekeeper,
        }
    }
}

#[async_trait]
impl StageStep for RenderReportStep {
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError> {
        let company = context
            .record()
            .and_then(|record| record.company_info())
            .ok_or(StepError::MissingInput(ContextKey::Record))?;
        let score = context
            .score()
            .ok_or(StepError::MissingInput(ContextKey::Score))?;
        let bench = context
            .benchmark()
            .ok_or(StepError::MissingInput(ContextKey::Benchmark))?;
        let priorities = context
            .priorities()
            .ok_or(StepError::MissingInput(ContextKey::Priorities))?;

        let report = self
            .renderer
            .render(score, bench, priorities, &company)
            .await?;
        debug!(bytes = report.len(), "Report rendered");

        Ok(StageOutput::new().with(ContextKey::Report, ContextValue::Report(report)))
    }

    fn postcondition(&self, _context: &RunContext, output: &StageOutput) -> Postcondition {
        match output.get(ContextKey::Report) {
            Some(ContextValue::Report(report)) => self.gatekeeper.validate_report(report),
            _ => Postcondition::rejected(RejectionReason::EmptyReport),
        }
    }
}
