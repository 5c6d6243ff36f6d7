//! Retriever reading records from a JSON file

use crate::dto::RecordDto;
use crate::error::ConnectorError;
use async_trait::async_trait;
use bizscore_domain::DiagnosisRecord;
use bizscore_pipeline::{CollaboratorError, DataRetriever};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a JSON array of records on every call
///
/// The file is re-read each time so edits are picked up between runs.
///
/// ```json
/// [
///   { "diagnosisId": "DX-20250301-0042", "companyName": "Acme", "answers": [3, 4, 5] }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct FileRetriever {
    path: PathBuf,
}

impl FileRetriever {
    /// Create a retriever over `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record in the file
    pub async fn load(&self) -> Result<Vec<DiagnosisRecord>, ConnectorError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ConnectorError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let records: Vec<RecordDto> = serde_json::from_str(&content)?;
        Ok(records.into_iter().map(DiagnosisRecord::from).collect())
    }

    async fn find(&self, identifier: &str) -> Result<DiagnosisRecord, ConnectorError> {
        let records = self.load().await?;
        debug!(path = %self.path.display(), records = records.len(), "Record file loaded");

        records
            .into_iter()
            .find(|r| r.identifier.trim() == identifier)
            .ok_or_else(|| ConnectorError::NotFound(identifier.to_string()))
    }
}

#[async_trait]
impl DataRetriever for FileRetriever {
    async fn retrieve(&self, identifier: &str) -> Result<DiagnosisRecord, CollaboratorError> {
        Ok(self.find(identifier).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_retriever() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[
                {"diagnosisId": "DX-20250301-0001", "companyName": "Acme", "answers": [4, 4]},
                {"diagnosisId": "DX-20250301-0002", "industry": "retail"}
            ]"#,
        )
        .unwrap();

        let retriever = FileRetriever::new(&path);
        assert_eq!(retriever.load().await.unwrap().len(), 2);

        let record = retriever.retrieve("DX-20250301-0001").await.unwrap();
        assert_eq!(record.company_name(), Some("Acme"));

        let missing = retriever.retrieve("DX-20250301-0003").await;
        assert_eq!(
            missing,
            Err(CollaboratorError::NotFound("DX-20250301-0003".to_string()))
        );
    }

    #[tokio::test]
    async fn test_file_retriever_errors() {
        let dir = TempDir::new().unwrap();

        let retriever = FileRetriever::new(dir.path().join("absent.json"));
        assert!(matches!(
            retriever.retrieve("DX-1").await,
            Err(CollaboratorError::Io(_))
        ));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileRetriever::new(&path).retrieve("DX-1").await,
            Err(CollaboratorError::InvalidResponse(_))
        ));
    }
}
