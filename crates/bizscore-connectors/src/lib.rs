//! Bizscore Connectors
//!
//! Implementations of the collaborator traits the pipeline depends on.
//!
//! # Collaborators
//!
//! - `MockRetriever`: In-memory records for tests and demos
//! - `FileRetriever`: JSON array of records on disk
//! - `HttpRetriever`: Remote record service over HTTP (reqwest)
//! - `PlainReportRenderer`: Static six-section HTML report
//! - `MemorySink` / `JsonLinesSink`: Result delivery
//!
//! # Examples
//!
//! ```
//! use bizscore_connectors::{MockRetriever, PlainReportRenderer};
//! use bizscore_domain::DiagnosisRecord;
//! use bizscore_pipeline::{Evaluator, PipelineConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let retriever = MockRetriever::with_records([DiagnosisRecord::new("DX-20250301-0042")
//!     .with_company_name("Acme Tooling")
//!     .with_answers(vec![4; 45])]);
//!
//! let settings = PipelineConfig::default().build()?;
//! let evaluator = Evaluator::standard(
//!     &settings,
//!     Arc::new(retriever),
//!     Arc::new(PlainReportRenderer::new()),
//! )?;
//!
//! let evaluation = evaluator.evaluate("DX-20250301-0042").await?;
//! assert_eq!(evaluation.score.total, 180);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dto;
pub mod error;
pub mod file;
pub mod http;
pub mod mock;
pub mod render;
pub mod sink;

pub use dto::{EvaluationDto, RecordDto};
pub use error::ConnectorError;
pub use file::FileRetriever;
pub use http::HttpRetriever;
pub use mock::MockRetriever;
pub use render::PlainReportRenderer;
pub use sink::{JsonLinesSink, MemorySink};
