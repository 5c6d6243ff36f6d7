use crate::context::{ContextKey, ContextValue, RunContext, StageOutput};
use crate::error::StepError;
use crate::stage::StageStep;
use async_trait::async_trait;
use bizscore_gatekeeper::{Gatekeeper, Postcondition, RejectionReason};
use std::sync::Arc;

/// Verdict recorded when the final check passes
pub const PASSED_VERDICT: &str = "passed";

/// quality-check: cross-checks the report against the source record
///
/// All of the checking happens in the postcondition.
pub struct QualityCheckStep {
    gatekeeper: Arc<Gatekeeper>,
}

impl QualityCheckStep {
    /// Create the step
    pub fn new(gatekeeper: Arc<Gatekeeper>) -> Self {
        Self { gatekeeper }
    }
}

#[async_trait]
impl StageStep for QualityCheckStep {
    async fn execute(&self, context: &RunContext) -> Result<StageOutput, StepError> {
        for key in [ContextKey::Record, ContextKey::Score, ContextKey::Report] {
            if context.get(key).is_none() {
                return Err(StepError::MissingInput(key));
            }
        }

        Ok(StageOutput::new().with(
            ContextKey::QualityVerdict,
            ContextValue::Text(PASSED_VERDICT.to_string()),
        ))
    }

    fn postcondition(&self, context: &RunContext, _output: &StageOutput) -> Postcondition {
        match (context.report(), context.record(), context.score()) {
            (Some(report), Some(record), Some(score)) => {
                self.gatekeeper.validate_quality(report, record, score)
            }
            (None, _, _) => Postcondition::rejected(RejectionReason::EmptyReport),
            (_, None, _) => Postcondition::rejected(RejectionReason::MissingField(
                ContextKey::Record.to_string(),
            )),
            (_, _, None) => Postcondition::rejected(RejectionReason::MissingField(
                ContextKey::Score.to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizscore_domain::{score, AnswerVector, CategorySet, DiagnosisRecord, RenderedReport};
    use bizscore_gatekeeper::markers::{self, COMPANY_NAME_ATTR, DIAGNOSIS_ID_ATTR, TOTAL_SCORE_ATTR};

    const ID: &str = "DX-20250301-0042";

    fn report(name: &str, total: &str) -> RenderedReport {
        RenderedReport::new(format!(
            "<article {} {} {}><section>{}</section></article>",
            markers::attribute(COMPANY_NAME_ATTR, name),
            markers::attribute(DIAGNOSIS_ID_ATTR, ID),
            markers::attribute(TOTAL_SCORE_ATTR, total),
            markers::escape(name),
        ))
    }

    fn context(report: Option<RenderedReport>) -> RunContext {
        let mut context = RunContext::new();
        context
            .insert(
                ContextKey::Record,
                ContextValue::Record(
                    DiagnosisRecord::new(ID)
                        .with_company_name("Acme Tooling")
                        .with_answers(vec![3; 45]),
                ),
            )
            .unwrap();
        context
            .insert(
                ContextKey::Score,
                ContextValue::Score(score(&AnswerVector::uniform(3, 45), &CategorySet::standard())),
            )
            .unwrap();
        if let Some(report) = report {
            context.insert(ContextKey::Report, ContextValue::Report(report)).unwrap();
        }
        context
    }

    fn step() -> QualityCheckStep {
        QualityCheckStep::new(Arc::new(Gatekeeper::default_config()))
    }

    #[tokio::test]
    async fn test_matching_report_passes() {
        let context = context(Some(report("Acme Tooling", "135")));

        let output = step().execute(&context).await.unwrap();
        assert_eq!(output.text(ContextKey::QualityVerdict), Some(PASSED_VERDICT));
        assert!(step().postcondition(&context, &output).passed());
    }

    #[tokio::test]
    async fn test_unrelated_company_name_rejected() {
        let context = context(Some(report("Globex Corporation", "135")));

        let output = step().execute(&context).await.unwrap();
        let post = step().postcondition(&context, &output);
        assert_eq!(
            post.reason(),
            "report embeds company name 'Globex Corporation', source has 'Acme Tooling'"
        );
    }

    #[tokio::test]
    async fn test_missing_report() {
        let context = context(None);

        let result = step().execute(&context).await;
        assert_eq!(result, Err(StepError::MissingInput(ContextKey::Report)));

        let post = step().postcondition(&context, &StageOutput::new());
        assert_eq!(post.reasons, vec![RejectionReason::EmptyReport]);
    }
}
