//! Batch command implementation.

use super::{interrupt_token, retriever, sink};
use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use bizscore_connectors::PlainReportRenderer;
use bizscore_pipeline::{BatchRunner, Evaluator};
use std::sync::Arc;
use tracing::info;

/// Execute the batch command.
pub async fn execute_batch(args: BatchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let identifiers = collect_identifiers(&args).await?;
    if identifiers.is_empty() {
        return Err(CliError::InvalidInput(
            "No diagnosis identifiers provided".to_string(),
        ));
    }

    let settings = config.pipeline.build()?;
    let mut evaluator = Evaluator::standard(
        &settings,
        retriever(&args.source)?,
        Arc::new(PlainReportRenderer::new()),
    )?;
    if let Some(sink) = sink(&args.source) {
        evaluator = evaluator.with_sink(sink);
    }

    let concurrency = args.concurrency.unwrap_or(settings.batch_concurrency);
    let runner = BatchRunner::new(Arc::new(evaluator), concurrency);
    info!(
        runs = identifiers.len(),
        concurrency = runner.concurrency(),
        "Starting batch"
    );

    let summary = runner
        .run_with_cancel(identifiers, &interrupt_token())
        .await;
    println!("{}", formatter.format_batch(&summary)?);

    let failed = summary.failed().count() + summary.aborted;
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: summary.items.len() + summary.aborted,
        });
    }
    Ok(())
}

/// Identifiers from the command line followed by those in `--ids-file`.
async fn collect_identifiers(args: &BatchArgs) -> Result<Vec<String>> {
    let mut identifiers = args.identifiers.clone();
    if let Some(path) = &args.ids_file {
        let contents = tokio::fs::read_to_string(path).await?;
        identifiers.extend(parse_identifiers(&contents));
    }
    Ok(identifiers)
}

/// One identifier per line; blank lines and `#` comments are skipped.
fn parse_identifiers(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}
