//! In-memory retriever for tests and demos

use async_trait::async_trait;
use bizscore_domain::DiagnosisRecord;
use bizscore_pipeline::{CollaboratorError, DataRetriever};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock retriever returning pre-configured records without any I/O
///
/// Clones share the same records and call count.
///
/// # Examples
///
/// ```
/// use bizscore_connectors::MockRetriever;
/// use bizscore_domain::DiagnosisRecord;
///
/// let retriever = MockRetriever::new();
/// retriever.add_record(DiagnosisRecord::new("DX-20250301-0042").with_company_name("Acme"));
/// assert_eq!(retriever.call_count(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRetriever {
    records: Arc<Mutex<HashMap<String, DiagnosisRecord>>>,
    errors: Arc<Mutex<HashMap<String, CollaboratorError>>>,
    call_count: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockRetriever {
    /// Create an empty retriever
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a retriever holding `records`
    pub fn with_records(records: impl IntoIterator<Item = DiagnosisRecord>) -> Self {
        let retriever = Self::new();
        for record in records {
            retriever.add_record(record);
        }
        retriever
    }

    /// Add or replace a record
    pub fn add_record(&self, record: DiagnosisRecord) {
        lock(&self.records).insert(record.identifier.clone(), record);
    }

    /// Configure an error for a specific identifier
    pub fn add_error(&self, identifier: impl Into<String>, error: CollaboratorError) {
        lock(&self.errors).insert(identifier.into(), error);
    }

    /// Number of retrieve calls so far
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }
}

#[async_trait]
impl DataRetriever for MockRetriever {
    async fn retrieve(&self, identifier: &str) -> Result<DiagnosisRecord, CollaboratorError> {
        *lock(&self.call_count) += 1;

        if let Some(error) = lock(&self.errors).get(identifier) {
            return Err(error.clone());
        }
        lock(&self.records)
            .get(identifier)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(identifier.to_string()))
    }
}
