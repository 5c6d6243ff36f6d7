use crate::context::{ContextKey, ContextValue, RunContext, StageOutput};
use crate::error::StepError;
use crate::stage::StageStep;
use async_trait::async_trait;
use bizscore_gatekeeper::{Gatekeeper, Postcondition, RejectionReason};
use std::sync::Arc;

/// validate-input: trims the raw identifier and checks its format
pub struct ValidateInputStep {
    gatekeeper: Arc<Gatekeeper>,
}

impl ValidateInputStep {
    /// Create the step
    pub fn new(gatekeeper: Arc<Gatekeeper>) -> Self {
        Self { gatekeeper }
    }
}

#[async_trait]
impl StageStep for ValidateInputStep {
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError> {
        let raw = context
            .text(ContextKey::RawIdentifier)
            .ok_or(StepError::MissingInput(ContextKey::RawIdentifier))?;

        Ok(StageOutput::new().with(
            ContextKey::ValidatedIdentifier,
            ContextValue::Text(raw.trim().to_string()),
        ))
    }

    fn postcondition(&self, _context: &RunContext, output: &StageOutput) -> Postcondition {
        match output.text(ContextKey::ValidatedIdentifier) {
            Some(identifier) => self.gatekeeper.validate_identifier(identifier),
            None => Postcondition::rejected(RejectionReason::MissingField(
                ContextKey::ValidatedIdentifier.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trims_and_validates() {
        let step = ValidateInputStep::new(Arc::new(Gatekeeper::default_config()));
        let context = RunContext::with_identifier("  DX-20250301-0042\n");

        let output = step.execute(&context).await.unwrap();
        assert_eq!(output.text(ContextKey::ValidatedIdentifier), Some("DX-20250301-0042"));
        assert!(step.postcondition(&context, &output).passed());
    }

    #[tokio::test]
    async fn test_rejects_malformed() {
        let step = ValidateInputStep::new(Arc::new(Gatekeeper::default_config()));
        let context = RunContext::with_identifier("order-42");

        let output = step.execute(&context).await.unwrap();
        let post = step.postcondition(&context, &output);
        assert!(!post.passed());
        assert!(post.reason().contains("does not start with 'DX-'"));
    }
}
