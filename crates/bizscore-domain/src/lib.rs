//! Bizscore Domain Layer
//!
//! This crate contains the scoring model for business-diagnosis questionnaires.
//! It has no infrastructure dependencies and defines the value objects and pure
//! engines that the pipeline and its collaborators build on.
//!
//! ## Key Concepts
//!
//! - **AnswerVector**: Fixed-length vector of 1-5 answers, defaulted to the midpoint
//! - **CategorySet**: Validated partition of question ids into weighted categories
//! - **ScoreEngine** ([`score()`]): Answers → category scores → weighted percentage
//! - **BenchmarkEngine** ([`benchmark()`]): Score → industry percentile, maturity tier, grade
//! - **PriorityEngine** ([`prioritize()`]): Weak categories → ranked remediation items
//!
//! ## Architecture
//!
//! - No I/O, no randomness, no wall-clock reads
//! - Configuration errors are caught when a [`CategorySet`], [`ThresholdLadder`]
//!   or [`PriorityPolicy`] is constructed, never at scoring time
//!
//! ## Example
//!
//! ```
//! use bizscore_domain::{score, AnswerVector, CategorySet};
//!
//! let categories = CategorySet::standard();
//! let answers = AnswerVector::uniform(3, categories.question_count());
//! let result = score(&answers, &categories);
//! assert_eq!(result.percentage, 60.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answers;
pub mod benchmark;
pub mod category;
pub mod error;
pub mod priority;
pub mod record;
pub mod run_id;
pub mod score;

// Re-exports for convenience
pub use answers::{AnswerVector, DEFAULT_QUESTION_COUNT, MAX_ANSWER, MIDPOINT_ANSWER, MIN_ANSWER};
pub use benchmark::{
    benchmark, percentile, BenchmarkResult, BenchmarkTable, Grade, IndustryAverages,
    IndustryType, MaturityTier, ThresholdLadder,
};
pub use category::{CategoryDefinition, CategorySet, MAX_CATEGORY_WEIGHT};
pub use error::DomainError;
pub use priority::{prioritize, ImportanceEntry, PriorityItem, PriorityPolicy, Timeline};
pub use record::{CompanyInfo, DiagnosisRecord, RenderedReport};
pub use run_id::RunId;
pub use score::{score, CategoryScore, ScoreResult};
