//! Step implementations of the five standard stages

mod compute;
mod quality;
mod render;
mod retrieve;
mod validate;

pub use compute::ComputeScoreStep;
pub use quality::{QualityCheckStep, PASSED_VERDICT};
pub use render::RenderReportStep;
pub use retrieve::RetrieveDataStep;
pub use validate::ValidateInputStep;

use crate::collaborators::{DataRetriever, ReportRenderer};
use crate::config::PipelineSettings;
use crate::stage::{StageConfig, StageDefinition, StageId, StageStep};
use std::sync::Arc;

/// Bind the standard steps to their configured policies, in execution order
pub fn standard_stages(
    settings: &PipelineSettings,
    retriever: Arc<dyn DataRetriever>,
    renderer: Arc<dyn ReportRenderer>,
) -> Vec<StageDefinition> {
    let gatekeeper = Arc::new(settings.gatekeeper.clone());
    let scoring = Arc::new(settings.scoring.clone());

    StageId::ALL
        .into_iter()
        .map(|id| {
            let step: Arc<dyn StageStep> = match id {
                StageId::ValidateInput => Arc::new(ValidateInputStep::new(gatekeeper.clone())),
                StageId::RetrieveData => {
                    Arc::new(RetrieveDataStep::new(retriever.clone(), gatekeeper.clone()))
                }
                StageId::ComputeScore => {
                    Arc::new(ComputeScoreStep::new(scoring.clone(), gatekeeper.clone()))
                }
                StageId::RenderReport => {
                    Arc::new(RenderReportStep::new(renderer.clone(), gatekeeper.clone()))
                }
                StageId::QualityCheck => Arc::new(QualityCheckStep::new(gatekeeper.clone())),
            };
            StageDefinition::new(StageConfig::standard(id, settings.stages.policy(id)), step)
        })
        .collect()
}
