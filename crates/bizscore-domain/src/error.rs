//! Domain error types
//!
//! Every variant describes a configuration problem. User input never produces
//! a `DomainError`: invalid answers are defaulted instead of rejected.

use std::fmt;

/// Errors raised while constructing validated domain configuration
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The questionnaire must contain at least one question
    InvalidQuestionCount(usize),

    /// A category lists no questions
    EmptyCategory(String),

    /// Two categories share the same name
    DuplicateCategory(String),

    /// Category weight outside (0, 2]
    InvalidWeight {
        /// Category name
        category: String,
        /// Offending weight
        weight: f64,
    },

    /// Question id outside 1..=N
    QuestionOutOfRange {
        /// Category name
        category: String,
        /// Offending question id
        question: usize,
        /// Number of questions in the questionnaire
        question_count: usize,
    },

    /// Question id claimed by two categories
    OverlappingQuestion {
        /// Question id
        question: usize,
        /// Category that claimed it first
        first: String,
        /// Category that claimed it again
        second: String,
    },

    /// Question id not covered by any category
    UncoveredQuestion(usize),

    /// Threshold ladder is malformed
    InvalidLadder(String),

    /// Priority policy is malformed
    InvalidPolicy(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidQuestionCount(n) => {
                write!(f, "question count must be at least 1 (got {})", n)
            }
            DomainError::EmptyCategory(name) => {
                write!(f, "category '{}' has no questions", name)
            }
            DomainError::DuplicateCategory(name) => {
                write!(f, "category '{}' is defined more than once", name)
            }
            DomainError::InvalidWeight { category, weight } => write!(
                f,
                "category '{}' has weight {} (must be in (0, 2])",
                category, weight
            ),
            DomainError::QuestionOutOfRange {
                category,
                question,
                question_count,
            } => write!(
                f,
                "category '{}' references question {} outside 1..={}",
                category, question, question_count
            ),
            DomainError::OverlappingQuestion {
                question,
                first,
                second,
            } => write!(
                f,
                "question {} belongs to both '{}' and '{}'",
                question, first, second
            ),
            DomainError::UncoveredQuestion(question) => {
                write!(f, "question {} is not assigned to any category", question)
            }
            DomainError::InvalidLadder(msg) => write!(f, "invalid threshold ladder: {}", msg),
            DomainError::InvalidPolicy(msg) => write!(f, "invalid priority policy: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
