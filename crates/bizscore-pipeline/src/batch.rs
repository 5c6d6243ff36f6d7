//! Concurrent evaluation of many identifiers

use crate::evaluator::{Evaluation, Evaluator, RunFailure};
use crate::metrics::RunMetrics;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Outcome of one identifier in a batch
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Identifier as supplied
    pub identifier: String,

    /// Evaluation or failure
    pub result: Result<Evaluation, RunFailure>,
}

/// Aggregated results of a batch, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One entry per identifier whose task finished
    pub items: Vec<BatchItem>,

    /// Tasks that panicked or were aborted before producing a result
    pub aborted: usize,

    /// Per-run metrics merged across the batch
    pub metrics: RunMetrics,

    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Successful evaluations
    pub fn succeeded(&self) -> impl Iterator<Item = &Evaluation> {
        self.items.iter().filter_map(|item| item.result.as_ref().ok())
    }

    /// Failed runs
    pub fn failed(&self) -> impl Iterator<Item = &RunFailure> {
        self.items.iter().filter_map(|item| item.result.as_ref().err())
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Batch Summary\n=============\nRuns: {} succeeded, {} failed, {} aborted\nElapsed: {:.2}s\n",
            self.succeeded().count(),
            self.failed().count(),
            self.aborted,
            self.elapsed.as_secs_f64()
        );
        for failure in self.failed() {
            out.push_str(&format!(
                "  {} failed at {}: {}\n",
                failure.identifier, failure.stage, failure.reason
            ));
        }
        out.push('\n');
        out.push_str(&self.metrics.summary());
        out
    }
}

/// Runs identifiers concurrently, one task per run, with bounded parallelism
///
/// Runs share only the evaluator; each has its own context and metrics.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    evaluator: Arc<Evaluator>,
    concurrency: usize,
}

impl BatchRunner {
    /// Create a runner (a concurrency of 0 is treated as 1)
    pub fn new(evaluator: Arc<Evaluator>, concurrency: usize) -> Self {
        Self {
            evaluator,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum runs executing at once
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Evaluate every identifier
    pub async fn run(&self, identifiers: Vec<String>) -> BatchSummary {
        self.run_with_cancel(identifiers, &CancellationToken::new())
            .await
    }

    /// Evaluate every identifier; cancelling stops each run at its next stage boundary
    pub async fn run_with_cancel(
        &self,
        identifiers: Vec<String>,
        cancel: &CancellationToken,
    ) -> BatchSummary {
        let started = Instant::now();
        let total = identifiers.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();

        info!(runs = total, concurrency = self.concurrency, "Batch started");

        for (index, identifier) in identifiers.into_iter().enumerate() {
            let evaluator = self.evaluator.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            join_set.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let result = evaluator.evaluate_with_cancel(&identifier, &cancel).await;
                (index, BatchItem { identifier, result })
            });
        }

        let mut slots: Vec<Option<BatchItem>> = (0..total).map(|_| None).collect();
        let mut aborted = 0;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, item)) => slots[index] = Some(item),
                Err(e) => {
                    error!("Batch task did not finish: {}", e);
                    aborted += 1;
                }
            }
        }

        let items: Vec<BatchItem> = slots.into_iter().flatten().collect();
        let mut metrics = RunMetrics::new();
        for item in &items {
            match &item.result {
                Ok(evaluation) => metrics.merge(&evaluation.metrics),
                Err(failure) => metrics.merge(&failure.metrics),
            }
        }
        let elapsed = started.elapsed();
        metrics.elapsed = elapsed;

        let summary = BatchSummary {
            items,
            aborted,
            metrics,
            elapsed,
        };
        info!(
            succeeded = summary.succeeded().count(),
            failed = summary.failed().count(),
            aborted,
            "Batch finished"
        );
        summary
    }
}
