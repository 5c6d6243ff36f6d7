//! Run-scoped, append-only context shared by the stages of one run

use bizscore_domain::{BenchmarkResult, DiagnosisRecord, PriorityItem, RenderedReport, ScoreResult};
use std::collections::BTreeMap;
use std::fmt;

/// Keys of the values stages read and produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContextKey {
    /// Identifier exactly as supplied by the caller
    RawIdentifier,
    /// Identifier after format validation
    ValidatedIdentifier,
    /// Retrieved diagnosis record
    Record,
    /// Score result
    Score,
    /// Benchmark result
    Benchmark,
    /// Ranked priority items
    Priorities,
    /// Rendered report
    Report,
    /// Outcome of the final quality check
    QualityVerdict,
}

impl ContextKey {
    /// Stable name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::RawIdentifier => "raw_identifier",
            ContextKey::ValidatedIdentifier => "validated_identifier",
            ContextKey::Record => "record",
            ContextKey::Score => "score",
            ContextKey::Benchmark => "benchmark",
            ContextKey::Priorities => "priorities",
            ContextKey::Report => "report",
            ContextKey::QualityVerdict => "quality_verdict",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed context values
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Plain text (identifiers, verdicts)
    Text(String),
    /// Retrieved record
    Record(DiagnosisRecord),
    /// Score result
    Score(ScoreResult),
    /// Benchmark result
    Benchmark(BenchmarkResult),
    /// Priority items (an empty list is a valid value)
    Priorities(Vec<PriorityItem>),
    /// Rendered report
    Report(RenderedReport),
}

impl ContextValue {
    /// True for blank text and blank reports
    pub fn is_empty(&self) -> bool {
        match self {
            ContextValue::Text(text) => text.trim().is_empty(),
            ContextValue::Report(report) => report.is_empty(),
            ContextValue::Record(_)
            | ContextValue::Score(_)
            | ContextValue::Benchmark(_)
            | ContextValue::Priorities(_) => false,
        }
    }
}

/// Values produced by one successful stage attempt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    values: Vec<(ContextKey, ContextValue)>,
}

impl StageOutput {
    /// Empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    pub fn with(mut self, key: ContextKey, value: ContextValue) -> Self {
        self.values.push((key, value));
        self
    }

    /// Look up a produced value
    pub fn get(&self, key: ContextKey) -> Option<&ContextValue> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Text value, if present
    pub fn text(&self, key: ContextKey) -> Option<&str> {
        match self.get(key) {
            Some(ContextValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Produced keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = ContextKey> + '_ {
        self.values.iter().map(|(k, _)| *k)
    }

    pub(crate) fn into_values(self) -> Vec<(ContextKey, ContextValue)> {
        self.values
    }
}

/// Accumulated values of one run
///
/// Append-only: a key can be set once and never overwritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunContext {
    values: BTreeMap<ContextKey, ContextValue>,
}

impl RunContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with the caller's raw identifier
    pub fn with_identifier(identifier: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(ContextKey::RawIdentifier, ContextValue::Text(identifier.into()));
        Self { values }
    }

    /// Insert a value, refusing to overwrite an existing key
    ///
    /// Returns the conflicting key on failure.
    pub fn insert(&mut self, key: ContextKey, value: ContextValue) -> Result<(), ContextKey> {
        if self.values.contains_key(&key) {
            return Err(key);
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Raw lookup
    pub fn get(&self, key: ContextKey) -> Option<&ContextValue> {
        self.values.get(&key)
    }

    /// True when the key exists and its value is not empty
    pub fn is_present(&self, key: ContextKey) -> bool {
        self.values.get(&key).is_some_and(|v| !v.is_empty())
    }

    /// Keys currently set
    pub fn keys(&self) -> impl Iterator<Item = ContextKey> + '_ {
        self.values.keys().copied()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text value
    pub fn text(&self, key: ContextKey) -> Option<&str> {
        match self.values.get(&key) {
            Some(ContextValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Retrieved record
    pub fn record(&self) -> Option<&DiagnosisRecord> {
        match self.values.get(&ContextKey::Record) {
            Some(ContextValue::Record(record)) => Some(record),
            _ => None,
        }
    }

    /// Score result
    pub fn score(&self) -> Option<&ScoreResult> {
        match self.values.get(&ContextKey::Score) {
            Some(ContextValue::Score(score)) => Some(score),
            _ => None,
        }
    }

    /// Benchmark result
    pub fn benchmark(&self) -> Option<&BenchmarkResult> {
        match self.values.get(&ContextKey::Benchmark) {
            Some(ContextValue::Benchmark(benchmark)) => Some(benchmark),
            _ => None,
        }
    }

    /// Priority items
    pub fn priorities(&self) -> Option<&[PriorityItem]> {
        match self.values.get(&ContextKey::Priorities) {
            Some(ContextValue::Priorities(items)) => Some(items),
            _ => None,
        }
    }

    /// Rendered report
    pub fn report(&self) -> Option<&RenderedReport> {
        match self.values.get(&ContextKey::Report) {
            Some(ContextValue::Report(report)) => Some(report),
            _ => None,
        }
    }
}
