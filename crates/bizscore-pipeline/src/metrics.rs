//! Metrics collected during pipeline runs

use crate::stage::StageId;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-run counters
///
/// Owned by a single run; batches combine them with [`RunMetrics::merge`]
/// after every run has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Attempts started per stage
    pub attempts: BTreeMap<StageId, u32>,

    /// Retries (attempts after the first) per stage
    pub retries: BTreeMap<StageId, u32>,

    /// Failed attempts per stage
    pub failures: BTreeMap<StageId, u32>,

    /// Stages that completed with a passing postcondition
    pub stages_completed: usize,

    /// Runs these metrics cover (1 for a single run)
    pub runs: usize,

    /// Wall-clock time spent
    pub elapsed: Duration,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of an attempt
    pub fn record_attempt(&mut self, stage: StageId) {
        *self.attempts.entry(stage).or_insert(0) += 1;
    }

    /// Record a retry
    pub fn record_retry(&mut self, stage: StageId) {
        *self.retries.entry(stage).or_insert(0) += 1;
    }

    /// Record a failed attempt
    pub fn record_failure(&mut self, stage: StageId) {
        *self.failures.entry(stage).or_insert(0) += 1;
    }

    /// Record a completed stage
    pub fn record_stage_completed(&mut self) {
        self.stages_completed += 1;
    }

    /// Attempts across all stages
    pub fn total_attempts(&self) -> u32 {
        self.attempts.values().sum()
    }

    /// Retries across all stages
    pub fn total_retries(&self) -> u32 {
        self.retries.values().sum()
    }

    /// Failed attempts across all stages
    pub fn total_failures(&self) -> u32 {
        self.failures.values().sum()
    }

    /// Attempts made by one stage
    pub fn attempts_for(&self, stage: StageId) -> u32 {
        self.attempts.get(&stage).copied().unwrap_or(0)
    }

    /// Add another run's counters to these
    pub fn merge(&mut self, other: &RunMetrics) {
        for (stage, count) in &other.attempts {
            *self.attempts.entry(*stage).or_insert(0) += count;
        }
        for (stage, count) in &other.retries {
            *self.retries.entry(*stage).or_insert(0) += count;
        }
        for (stage, count) in &other.failures {
            *self.failures.entry(*stage).or_insert(0) += count;
        }
        self.stages_completed += other.stages_completed;
        self.runs += other.runs;
        self.elapsed += other.elapsed;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Runs: {}", self.runs),
            format!("Stages completed: {}", self.stages_completed),
            format!("Elapsed: {}ms", self.elapsed.as_millis()),
            String::new(),
        ];

        if !self.attempts.is_empty() {
            lines.push("Attempts by stage:".to_string());
            for (stage, count) in &self.attempts {
                let retries = self.retries.get(stage).copied().unwrap_or(0);
                let failures = self.failures.get(stage).copied().unwrap_or(0);
                lines.push(format!(
                    "  {}: {} attempts, {} retries, {} failures",
                    stage, count, retries, failures
                ));
            }
            lines.push(format!(
                "  Total: {} attempts, {} retries, {} failures",
                self.total_attempts(),
                self.total_retries(),
                self.total_failures()
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.total_attempts(), 0);
        assert_eq!(metrics.total_retries(), 0);
        assert_eq!(metrics.total_failures(), 0);
        assert_eq!(metrics.attempts_for(StageId::RetrieveData), 0);
    }

    #[test]
    fn test_record_and_totals() {
        let mut metrics = RunMetrics::new();
        metrics.record_attempt(StageId::RetrieveData);
        metrics.record_failure(StageId::RetrieveData);
        metrics.record_retry(StageId::RetrieveData);
        metrics.record_attempt(StageId::RetrieveData);
        metrics.record_attempt(StageId::ComputeScore);

        assert_eq!(metrics.attempts_for(StageId::RetrieveData), 2);
        assert_eq!(metrics.total_attempts(), 3);
        assert_eq!(metrics.total_retries(), 1);
        assert_eq!(metrics.total_failures(), 1);
    }

    #[test]
    fn test_merge() {
        let mut first = RunMetrics {
            runs: 1,
            elapsed: Duration::from_millis(40),
            ..Default::default()
        };
        first.record_attempt(StageId::ValidateInput);

        let mut second = RunMetrics {
            runs: 1,
            elapsed: Duration::from_millis(60),
            ..Default::default()
        };
        second.record_attempt(StageId::ValidateInput);
        second.record_failure(StageId::ValidateInput);
        second.record_stage_completed();

        first.merge(&second);
        assert_eq!(first.runs, 2);
        assert_eq!(first.attempts_for(StageId::ValidateInput), 2);
        assert_eq!(first.total_failures(), 1);
        assert_eq!(first.stages_completed, 1);
        assert_eq!(first.elapsed, Duration::from_millis(100));
    }

    #[test]
    fn test_summary() {
        let mut metrics = RunMetrics {
            runs: 1,
            elapsed: Duration::from_millis(120),
            ..Default::default()
        };
        metrics.record_attempt(StageId::RenderReport);
        metrics.record_failure(StageId::RenderReport);
        metrics.record_retry(StageId::RenderReport);
        metrics.record_attempt(StageId::RenderReport);

        let summary = metrics.summary();
        assert!(summary.contains("Runs: 1"));
        assert!(summary.contains("Elapsed: 120ms"));
        assert!(summary.contains("render-report: 2 attempts, 1 retries, 1 failures"));
    }
}
