//! Retriever for a remote record service
//!
//! Issues `GET {base_url}/{identifier}` and expects a single JSON record in
//! the camelCase shape of [`RecordDto`]. Retrying is left to the pipeline's
//! stage policy.

use crate::dto::RecordDto;
use crate::error::ConnectorError;
use async_trait::async_trait;
use bizscore_domain::DiagnosisRecord;
use bizscore_pipeline::{CollaboratorError, DataRetriever};
use std::time::Duration;
use tracing::debug;

/// Default request timeout (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP record service client
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    base_url: String,
    client: reqwest::Client,
    bearer_token: Option<String>,
}

impl HttpRetriever {
    /// Create a retriever for `base_url` (e.g. "http://records.internal/api/diagnoses")
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConnectorError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a retriever with a custom request timeout
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            client,
            bearer_token: None,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// URL requested for `identifier`
    pub fn url_for(&self, identifier: &str) -> String {
        format!("{}/{}", self.base_url, identifier)
    }

    async fn fetch(&self, identifier: &str) -> Result<DiagnosisRecord, ConnectorError> {
        let url = self.url_for(identifier);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Record service responded");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ConnectorError::NotFound(identifier.to_string()));
        }
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let record: RecordDto = serde_json::from_str(&body)?;
        Ok(record.into())
    }
}

#[async_trait]
impl DataRetriever for HttpRetriever {
    async fn retrieve(&self, identifier: &str) -> Result<DiagnosisRecord, CollaboratorError> {
        Ok(self.fetch(identifier).await?)
    }
}
