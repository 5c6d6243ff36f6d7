//! Command implementations.

pub mod batch;
pub mod config;
pub mod run;
pub mod score;

pub use self::batch::execute_batch;
pub use self::config::execute_config;
pub use self::run::execute_run;
pub use self::score::execute_score;

use crate::cli::SourceArgs;
use crate::error::Result;
use bizscore_connectors::{FileRetriever, HttpRetriever, JsonLinesSink};
use bizscore_pipeline::{DataRetriever, ResultSink};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Build the record retriever named by the source arguments.
pub(crate) fn retriever(source: &SourceArgs) -> Result<Arc<dyn DataRetriever>> {
    if let Some(url) = &source.url {
        let mut retriever = HttpRetriever::new(url.as_str())?;
        if let Some(token) = &source.token {
            retriever = retriever.with_bearer_token(token.as_str());
        }
        debug!(url = %url, "Reading records over HTTP");
        return Ok(Arc::new(retriever));
    }

    match &source.records {
        Some(path) => {
            debug!(path = %path.display(), "Reading records from file");
            Ok(Arc::new(FileRetriever::new(path)))
        }
        None => Err(crate::error::CliError::InvalidInput(
            "Must specify either --records or --url".to_string(),
        )),
    }
}

/// Build the optional result sink.
pub(crate) fn sink(source: &SourceArgs) -> Option<Arc<dyn ResultSink>> {
    source
        .output
        .as_ref()
        .map(|path| Arc::new(JsonLinesSink::new(path)) as Arc<dyn ResultSink>)
}

/// Token cancelled on Ctrl-C.
pub(crate) fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight runs");
            child.cancel();
        }
    });
    token
}
