use crate::collaborators::DataRetriever;
use crate::context::{ContextKey, ContextValue, RunContext, StageOutput};
use crate::error::StepError;
use crate::stage::StageStep;
use async_trait::async_trait;
use bizscore_gatekeeper::{Gatekeeper, Postcondition, RejectionReason};
use std::sync::Arc;
use tracing::debug;

/// retrieve-data: fetches the record and checks it is usable for scoring
pub struct RetrieveDataStep {
    retriever: Arc<dyn DataRetriever>,
    gatekeeper: Arc<Gatekeeper>,
}

impl RetrieveDataStep {
    /// Create the step
    pub fn new(retriever: Arc<dyn DataRetriever>, gatekeeper: Arc<Gatekeeper>) -> Self {
        Self {
            retriever,
            gatekeeper,
        }
    }
}

#[async_trait]
impl StageStep for RetrieveDataStep {
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError> {
        let identifier = context
            .text(ContextKey::ValidatedIdentifier)
            .ok_or(StepError::MissingInput(ContextKey::ValidatedIdentifier))?;

        let record = self.retriever.retrieve(identifier).await?;
        debug!(identifier, answers = record.answers.as_ref().map_or(0, Vec::len), "Record retrieved");

        Ok(StageOutput::new().with(ContextKey::Record, ContextValue::Record(record)))
    }

    fn postcondition(&self, context: &RunContext, output: &StageOutput) -> Postcondition {
        let expected = context.text(ContextKey::ValidatedIdentifier).unwrap_or_default();
        match output.get(ContextKey::Record) {
            Some(ContextValue::Record(record)) => self.gatekeeper.validate_record(expected, record),
            _ => Postcondition::rejected(RejectionReason::MissingField(ContextKey::Record.to_string())),
        }
    }
}
