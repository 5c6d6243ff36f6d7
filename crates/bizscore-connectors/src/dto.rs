//! Wire formats for records and evaluations
//!
//! The domain crate has no serde dependency; these types carry the JSON
//! shapes used by the record service, record files and result sinks.

use bizscore_domain::{DiagnosisRecord, PriorityItem};
use bizscore_pipeline::{Evaluation, RunMetrics};
use serde::{Deserialize, Serialize};

/// Diagnosis record as delivered by the record service
///
/// Every field except the identifier may be absent; the retrieve-data
/// postcondition decides whether the record is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDto {
    /// Diagnosis identifier
    pub diagnosis_id: String,

    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Industry name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Raw answers in question order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<i64>>,

    /// Total score reported by the source system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,

    /// Contact address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<RecordDto> for DiagnosisRecord {
    fn from(dto: RecordDto) -> Self {
        DiagnosisRecord {
            identifier: dto.diagnosis_id,
            company_name: dto.company_name,
            industry: dto.industry,
            answers: dto.answers,
            reported_total: dto.total_score,
            contact_email: dto.email,
        }
    }
}

impl From<&DiagnosisRecord> for RecordDto {
    fn from(record: &DiagnosisRecord) -> Self {
        RecordDto {
            diagnosis_id: record.identifier.clone(),
            company_name: record.company_name.clone(),
            industry: record.industry.clone(),
            answers: record.answers.clone(),
            total_score: record.reported_total,
            email: record.contact_email.clone(),
        }
    }
}

/// One category score in an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScoreDto {
    /// Category name
    pub name: String,
    /// Score (0-100)
    pub score: f64,
    /// Weight
    pub weight: f64,
}

/// One priority item in an evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityDto {
    /// Category the item addresses
    pub category: String,
    /// Current category score
    pub current_score: f64,
    /// importance × urgency
    pub priority: u8,
    /// Recommended time frame
    pub timeline: String,
    /// Resources needed
    pub required_resources: Vec<String>,
}

impl From<&PriorityItem> for PriorityDto {
    fn from(item: &PriorityItem) -> Self {
        PriorityDto {
            category: item.category.clone(),
            current_score: item.current_score,
            priority: item.priority,
            timeline: item.timeline.label().to_string(),
            required_resources: item.required_resources.clone(),
        }
    }
}

/// Attempt counters of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDto {
    /// Attempts across all stages
    pub attempts: u32,
    /// Retries across all stages
    pub retries: u32,
    /// Failed attempts across all stages
    pub failures: u32,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: u64,
}

impl From<&RunMetrics> for MetricsDto {
    fn from(metrics: &RunMetrics) -> Self {
        MetricsDto {
            attempts: metrics.total_attempts(),
            retries: metrics.total_retries(),
            failures: metrics.total_failures(),
            elapsed_ms: u64::try_from(metrics.elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Serialized form of a successful evaluation
///
/// The rendered report is summarized by its size; sinks that need the
/// artifact itself receive it through [`EvaluationDto::with_report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDto {
    /// Run id
    pub run_id: String,
    /// Diagnosis identifier
    pub diagnosis_id: String,
    /// Company name
    pub company_name: String,
    /// Total of all answers
    pub total: u32,
    /// Maximum achievable total
    pub max_total: u32,
    /// Weighted percentage
    pub percentage: f64,
    /// Confidence level
    pub confidence_level: f64,
    /// Industry used for benchmarking
    pub industry: String,
    /// Heuristic percentile
    pub percentile: u8,
    /// Maturity tier
    pub maturity_tier: String,
    /// Letter grade
    pub grade: String,
    /// Distance from the industry average
    pub gap: f64,
    /// Category scores
    pub categories: Vec<CategoryScoreDto>,
    /// Ranked priorities
    pub priorities: Vec<PriorityDto>,
    /// Report size in bytes
    pub report_bytes: usize,
    /// Report content, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Run metrics
    pub metrics: MetricsDto,
}

impl EvaluationDto {
    /// Include the rendered report
    pub fn with_report(mut self, evaluation: &Evaluation) -> Self {
        self.report = Some(evaluation.report.as_str().to_string());
        self
    }
}

impl From<&Evaluation> for EvaluationDto {
    fn from(evaluation: &Evaluation) -> Self {
        let score = &evaluation.score;
        let bench = &evaluation.benchmark;

        EvaluationDto {
            run_id: evaluation.run_id.to_string(),
            diagnosis_id: evaluation.identifier.clone(),
            company_name: evaluation.company_name.clone(),
            total: score.total,
            max_total: score.max_total,
            percentage: score.percentage,
            confidence_level: score.confidence_level,
            industry: bench.industry.to_string(),
            percentile: bench.percentile,
            maturity_tier: bench.maturity_tier.to_string(),
            grade: bench.grade.to_string(),
            gap: bench.gap,
            categories: score
                .category_scores
                .iter()
                .map(|c| CategoryScoreDto {
                    name: c.name.clone(),
                    score: c.score,
                    weight: c.weight,
                })
                .collect(),
            priorities: evaluation.priorities.iter().map(PriorityDto::from).collect(),
            report_bytes: evaluation.report.len(),
            report: None,
            metrics: MetricsDto::from(&evaluation.metrics),
        }
    }
}
