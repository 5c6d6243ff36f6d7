//! Stage postcondition checks

use crate::markers::{self, COMPANY_NAME_ATTR, DIAGNOSIS_ID_ATTR, TOTAL_SCORE_ATTR};
use crate::ValidationConfig;
use bizscore_domain::{
    BenchmarkResult, CategorySet, DiagnosisRecord, RenderedReport, ScoreResult,
    MAX_ANSWER,
};
use std::fmt;

/// Outcome of a postcondition check
#[derive(Debug, Clone, PartialEq)]
pub struct Postcondition {
    /// Whether the stage output is complete
    pub status: ValidationStatus,

    /// Why the check failed (empty when accepted)
    pub reasons: Vec<RejectionReason>,

    /// Share of individual checks that passed (0-100), for observability only
    pub completion: u8,
}

impl Postcondition {
    /// A passing postcondition with full completion
    pub fn accepted() -> Self {
        Self {
            status: ValidationStatus::Accepted,
            reasons: Vec::new(),
            completion: 100,
        }
    }

    /// A failing postcondition with a single reason
    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            status: ValidationStatus::Rejected,
            reasons: vec![reason],
            completion: 0,
        }
    }

    /// True when accepted
    pub fn passed(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }

    /// All rejection reasons joined into one operator-readable line
    pub fn reason(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Postcondition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Stage output accepted
    Accepted,

    /// Stage output rejected
    Rejected,
}

/// Reasons for rejecting a stage output
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Identifier does not match the configured format
    MalformedIdentifier {
        /// The identifier as received
        identifier: String,
        /// What is wrong with it
        issue: String,
    },

    /// Retrieved record belongs to a different identifier
    IdentifierMismatch {
        /// Identifier that was requested
        expected: String,
        /// Identifier on the record
        actual: String,
    },

    /// A required field is absent or blank
    MissingField(String),

    /// A numeric value is outside its allowed range
    OutOfRange {
        /// Field name
        field: String,
        /// Offending value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },

    /// A configured category has no score
    MissingCategory(String),

    /// The renderer produced nothing
    EmptyReport,

    /// Too few structural sections
    InsufficientSections {
        /// Sections found
        found: usize,
        /// Sections required
        required: usize,
    },

    /// Report smaller than the configured minimum
    ReportTooSmall {
        /// Actual size in bytes
        bytes: usize,
        /// Minimum size in bytes
        min: usize,
    },

    /// An identifying marker is absent or blank
    MissingIdentifyingField(String),

    /// An embedded value differs from the source
    EmbeddedMismatch {
        /// Field name
        field: String,
        /// Source value
        expected: String,
        /// Embedded value (None when the marker is missing)
        actual: Option<String>,
    },

    /// The total reported by the source differs from the computed total
    ReportedTotalMismatch {
        /// Total reported by the source
        reported: u32,
        /// Total computed by the pipeline
        computed: u32,
    },

    /// Unrendered template content was found
    PlaceholderFound(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MalformedIdentifier { identifier, issue } => {
                write!(f, "identifier '{}' {}", identifier, issue)
            }
            RejectionReason::IdentifierMismatch { expected, actual } => write!(
                f,
                "retrieved record is for '{}', expected '{}'",
                actual, expected
            ),
            RejectionReason::MissingField(field) => write!(f, "{} is missing", field),
            RejectionReason::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} is {} (must be in [{}, {}])", field, value, min, max),
            RejectionReason::MissingCategory(name) => {
                write!(f, "category '{}' has no score", name)
            }
            RejectionReason::EmptyReport => write!(f, "report rendering produced no content"),
            RejectionReason::InsufficientSections { found, required } => write!(
                f,
                "report rendering produced {} structural sections, {} required",
                found, required
            ),
            RejectionReason::ReportTooSmall { bytes, min } => write!(
                f,
                "report is {} bytes, at least {} required",
                bytes, min
            ),
            RejectionReason::MissingIdentifyingField(field) => {
                write!(f, "report has no {} marker", field)
            }
            RejectionReason::EmbeddedMismatch {
                field,
                expected,
                actual: Some(actual),
            } => write!(
                f,
                "report embeds {} '{}', source has '{}'",
                field, actual, expected
            ),
            RejectionReason::EmbeddedMismatch {
                field,
                actual: None,
                ..
            } => write!(f, "report does not embed {}", field),
            RejectionReason::ReportedTotalMismatch { reported, computed } => write!(
                f,
                "source reports total score {}, computed {}",
                reported, computed
            ),
            RejectionReason::PlaceholderFound(marker) => {
                write!(f, "report contains placeholder marker '{}'", marker)
            }
        }
    }
}

/// Accumulates individual checks into a [`Postcondition`]
#[derive(Default)]
struct Checks {
    total: usize,
    reasons: Vec<RejectionReason>,
}

impl Checks {
    fn check(&mut self, ok: bool, reason: impl FnOnce() -> RejectionReason) {
        self.total += 1;
        if !ok {
            self.reasons.push(reason());
        }
    }

    fn check_range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        // NaN fails the range test
        self.check(value >= min && value <= max, || RejectionReason::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }

    fn finish(self) -> Postcondition {
        let passed = self.total - self.reasons.len();
        let completion = if self.total == 0 {
            100
        } else {
            (passed * 100 / self.total) as u8
        };
        let status = if self.reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        Postcondition {
            status,
            reasons: self.reasons,
            completion,
        }
    }
}

/// The Gatekeeper decides whether a stage's output is complete
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// validate-input: prefix, length and character set of an identifier
    pub fn validate_identifier(&self, identifier: &str) -> Postcondition {
        let mut checks = Checks::default();
        let prefix = &self.config.identifier_prefix;
        let malformed = |issue: String| RejectionReason::MalformedIdentifier {
            identifier: identifier.to_string(),
            issue,
        };

        checks.check(identifier.starts_with(prefix.as_str()), || {
            malformed(format!("does not start with '{}'", prefix))
        });

        let length = self.config.identifier_length;
        if length != 0 {
            checks.check(identifier.len() == length, || {
                malformed(format!("has length {}, expected {}", identifier.len(), length))
            });
        }

        let body = identifier.strip_prefix(prefix.as_str()).unwrap_or(identifier);
        checks.check(
            !body.is_empty() && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
            || malformed("contains characters other than letters, digits and '-'".to_string()),
        );

        checks.finish()
    }

    /// retrieve-data: the record matches the request and carries what scoring needs
    pub fn validate_record(&self, expected_identifier: &str, record: &DiagnosisRecord) -> Postcondition {
        let mut checks = Checks::default();

        checks.check(record.identifier.trim() == expected_identifier, || {
            RejectionReason::IdentifierMismatch {
                expected: expected_identifier.to_string(),
                actual: record.identifier.clone(),
            }
        });
        checks.check(record.company_name().is_some(), || {
            RejectionReason::MissingField("companyName".to_string())
        });
        checks.check(
            record.answers.as_ref().is_some_and(|a| !a.is_empty()),
            || RejectionReason::MissingField("answers".to_string()),
        );

        checks.finish()
    }

    /// compute-score: every number is in range and every category is present
    pub fn validate_score(
        &self,
        score: &ScoreResult,
        benchmark: &BenchmarkResult,
        categories: &CategorySet,
    ) -> Postcondition {
        let mut checks = Checks::default();
        let max_total = categories.question_count() as f64 * f64::from(MAX_ANSWER);

        checks.check_range("total", f64::from(score.total), 0.0, max_total);
        checks.check_range("percentage", score.percentage, 0.0, 100.0);
        checks.check_range("confidence", score.confidence_level, 0.0, 100.0);
        checks.check_range("percentile", f64::from(benchmark.percentile), 1.0, 99.0);

        for category in categories.categories() {
            match score.category_score(&category.name) {
                Some(value) => checks.check_range(&category.name, value, 0.0, 100.0),
                None => checks.check(false, || RejectionReason::MissingCategory(category.name.clone())),
            }
        }

        checks.finish()
    }

    /// render-report: non-empty, structured, large enough and carrying its identifying markers
    ///
    /// Only presence is checked here; whether the embedded values match the
    /// source is the quality check's job.
    pub fn validate_report(&self, report: &RenderedReport) -> Postcondition {
        if report.is_empty() {
            return Postcondition::rejected(RejectionReason::EmptyReport);
        }

        let mut checks = Checks::default();
        let content = report.as_str();

        let sections = markers::count_occurrences(content, &self.config.section_marker);
        checks.check(sections >= self.config.expected_sections, || {
            RejectionReason::InsufficientSections {
                found: sections,
                required: self.config.expected_sections,
            }
        });
        checks.check(report.len() >= self.config.min_report_bytes, || {
            RejectionReason::ReportTooSmall {
                bytes: report.len(),
                min: self.config.min_report_bytes,
            }
        });
        for (field, attr) in [
            ("company name", COMPANY_NAME_ATTR),
            ("diagnosis id", DIAGNOSIS_ID_ATTR),
            ("total score", TOTAL_SCORE_ATTR),
        ] {
            let present = markers::extract(content, attr).is_some_and(|v| !v.trim().is_empty());
            checks.check(present, || RejectionReason::MissingIdentifyingField(field.to_string()));
        }

        checks.finish()
    }

    /// quality-check: embedded values match the source exactly and nothing is left unrendered
    pub fn validate_quality(
        &self,
        report: &RenderedReport,
        record: &DiagnosisRecord,
        score: &ScoreResult,
    ) -> Postcondition {
        let mut checks = Checks::default();
        let content = report.as_str();

        let mut embedded = |field: &str, attr: &str, expected: String| {
            let actual = markers::extract(content, attr);
            checks.check(actual.as_deref() == Some(expected.as_str()), || {
                RejectionReason::EmbeddedMismatch {
                    field: field.to_string(),
                    expected,
                    actual,
                }
            });
        };

        embedded(
            "company name",
            COMPANY_NAME_ATTR,
            record.company_name().unwrap_or_default().to_string(),
        );
        embedded("diagnosis id", DIAGNOSIS_ID_ATTR, record.identifier.trim().to_string());
        embedded("total score", TOTAL_SCORE_ATTR, score.total.to_string());

        if self.config.check_reported_total {
            if let Some(reported) = record.reported_total {
                checks.check(reported == score.total, || RejectionReason::ReportedTotalMismatch {
                    reported,
                    computed: score.total,
                });
            }
        }

        // Source-supplied text may legitimately contain marker words
        let company_name = record.company_name().unwrap_or_default();
        let template_text = markers::mask(content, &[company_name, record.identifier.trim()]);
        let placeholder =
            markers::find_placeholder(&template_text, &self.config.placeholder_markers);
        checks.check(placeholder.is_none(), || {
            RejectionReason::PlaceholderFound(placeholder.unwrap_or_default().to_string())
        });

        checks.finish()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Identifiers built from the configured shape always pass
        #[test]
        fn test_well_formed_identifiers_pass(body in "[A-Z0-9]{8}-[0-9]{4}") {
            let gatekeeper = Gatekeeper::default_config();
            let identifier = format!("DX-{}", body);
            prop_assert!(gatekeeper.validate_identifier(&identifier).passed());
        }

        /// Property: Completion is 100 exactly when the check passes
        #[test]
        fn test_completion_consistent(identifier in "\\PC{0,20}") {
            let gatekeeper = Gatekeeper::default_config();
            let result = gatekeeper.validate_identifier(&identifier);
            prop_assert_eq!(result.passed(), result.completion == 100);
        }
    }
}
