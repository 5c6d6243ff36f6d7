//! Run command implementation.

use super::{interrupt_token, retriever, sink};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use bizscore_connectors::PlainReportRenderer;
use bizscore_pipeline::Evaluator;
use std::sync::Arc;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let settings = config.pipeline.build()?;
    let mut evaluator = Evaluator::standard(
        &settings,
        retriever(&args.source)?,
        Arc::new(PlainReportRenderer::new()),
    )?;
    if let Some(sink) = sink(&args.source) {
        evaluator = evaluator.with_sink(sink);
    }

    let cancel = interrupt_token();
    match evaluator
        .evaluate_with_cancel(&args.identifier, &cancel)
        .await
    {
        Ok(evaluation) => {
            if let Some(path) = &args.report {
                tokio::fs::write(path, evaluation.report.as_str()).await?;
            }
            println!("{}", formatter.format_evaluation(&evaluation)?);
            Ok(())
        }
        Err(failure) => {
            println!("{}", formatter.format_failure(&failure)?);
            Err(failure.into())
        }
    }
}
