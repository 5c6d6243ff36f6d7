//! Configuration for pipeline runs
//!
//! Everything the pipeline needs is loaded once from TOML (or a preset) and
//! validated by [`PipelineConfig::build`], which produces the immutable
//! runtime [`PipelineSettings`]. Malformed category partitions, ladders or
//! priority tables fail here, never during a run.

use crate::error::ConfigError;
use crate::stage::StageId;
use bizscore_domain::{
    BenchmarkTable, CategoryDefinition, CategorySet, Grade, ImportanceEntry, IndustryAverages,
    IndustryType, MaturityTier, PriorityPolicy, ThresholdLadder, DEFAULT_QUESTION_COUNT,
};
use bizscore_gatekeeper::{Gatekeeper, ValidationConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Retry and timeout policy of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Hard limit for one attempt (milliseconds)
    pub timeout_ms: u64,
}

impl StagePolicy {
    /// Create a policy
    pub const fn new(max_retries: u32, retry_delay_ms: u64, timeout_ms: u64) -> Self {
        Self {
            max_retries,
            retry_delay_ms,
            timeout_ms,
        }
    }

    /// Retry delay as Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Per-attempt timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Policies for every stage (`[stages.<id>]` in TOML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
    /// validate-input
    #[serde(rename = "validate-input")]
    pub validate_input: StagePolicy,

    /// retrieve-data
    #[serde(rename = "retrieve-data")]
    pub retrieve_data: StagePolicy,

    /// compute-score
    #[serde(rename = "compute-score")]
    pub compute_score: StagePolicy,

    /// render-report
    #[serde(rename = "render-report")]
    pub render_report: StagePolicy,

    /// quality-check
    #[serde(rename = "quality-check")]
    pub quality_check: StagePolicy,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            validate_input: StagePolicy::new(1, 100, 1_000),
            retrieve_data: StagePolicy::new(3, 2_000, 30_000),
            compute_score: StagePolicy::new(1, 100, 5_000),
            render_report: StagePolicy::new(2, 3_000, 120_000),
            quality_check: StagePolicy::new(1, 500, 10_000),
        }
    }
}

impl StagesConfig {
    /// Policy for a stage
    pub fn policy(&self, stage: StageId) -> &StagePolicy {
        match stage {
            StageId::ValidateInput => &self.validate_input,
            StageId::RetrieveData => &self.retrieve_data,
            StageId::ComputeScore => &self.compute_score,
            StageId::RenderReport => &self.render_report,
            StageId::QualityCheck => &self.quality_check,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for stage in StageId::ALL {
            if self.policy(stage).timeout_ms == 0 {
                return Err(ConfigError::Invalid(format!(
                    "stages.{}.timeout_ms must be greater than 0",
                    stage
                )));
            }
        }
        Ok(())
    }
}

/// One category as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,

    /// First question id (inclusive)
    pub first_question: usize,

    /// Last question id (inclusive)
    pub last_question: usize,

    /// Aggregation weight in (0, 2]
    pub weight: f64,
}

/// Questionnaire layout (`[scoring]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Number of questions
    pub question_count: usize,

    /// Categories; together they must cover 1..=question_count exactly once
    pub categories: Vec<CategoryConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let categories = CategorySet::standard()
            .categories()
            .iter()
            .map(|c| CategoryConfig {
                name: c.name.clone(),
                first_question: c.question_ids.first().copied().unwrap_or(1),
                last_question: c.question_ids.last().copied().unwrap_or(1),
                weight: c.weight,
            })
            .collect();

        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            categories,
        }
    }
}

impl ScoringConfig {
    fn build(&self) -> Result<CategorySet, ConfigError> {
        let mut definitions = Vec::with_capacity(self.categories.len());
        for c in &self.categories {
            if c.first_question > c.last_question {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has first_question {} after last_question {}",
                    c.name, c.first_question, c.last_question
                )));
            }
            definitions.push(CategoryDefinition::from_range(
                c.name.clone(),
                c.first_question,
                c.last_question,
                c.weight,
            ));
        }
        Ok(CategorySet::new(definitions, self.question_count)?)
    }
}

/// Grade thresholds (minimum percentage per grade)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    /// S
    pub s: f64,
    /// A
    pub a: f64,
    /// B
    pub b: f64,
    /// C
    pub c: f64,
    /// D
    pub d: f64,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            s: 85.0,
            a: 75.0,
            b: 65.0,
            c: 55.0,
            d: 45.0,
        }
    }
}

/// Maturity tier thresholds (minimum percentage per tier)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Leading
    pub leading: f64,
    /// Advanced
    pub advanced: f64,
    /// Defined
    pub defined: f64,
    /// Developing
    pub developing: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            leading: 80.0,
            advanced: 65.0,
            defined: 50.0,
            developing: 35.0,
        }
    }
}

/// Benchmark data (`[benchmark]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Average percentage per industry name
    pub industry_averages: BTreeMap<String, f64>,

    /// Grade ladder
    pub grades: GradeThresholds,

    /// Maturity tier ladder
    pub tiers: TierThresholds,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            industry_averages: IndustryAverages::default()
                .iter()
                .map(|(industry, average)| (industry.as_str().to_string(), average))
                .collect(),
            grades: GradeThresholds::default(),
            tiers: TierThresholds::default(),
        }
    }
}

impl BenchmarkConfig {
    fn build(&self) -> Result<BenchmarkTable, ConfigError> {
        let mut averages = IndustryAverages::empty();
        for (name, average) in &self.industry_averages {
            let industry = IndustryType::parse(name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown industry '{}'", name)))?;
            if !(0.0..=100.0).contains(average) {
                return Err(ConfigError::Invalid(format!(
                    "industry average for '{}' is {} (must be in [0, 100])",
                    name, average
                )));
            }
            averages = averages.with_average(industry, *average);
        }

        let g = &self.grades;
        let grades = ThresholdLadder::new(
            vec![
                (g.s, Grade::S),
                (g.a, Grade::A),
                (g.b, Grade::B),
                (g.c, Grade::C),
                (g.d, Grade::D),
            ],
            Grade::F,
        )?;

        let t = &self.tiers;
        let tiers = ThresholdLadder::new(
            vec![
                (t.leading, MaturityTier::Leading),
                (t.advanced, MaturityTier::Advanced),
                (t.defined, MaturityTier::Defined),
                (t.developing, MaturityTier::Developing),
            ],
            MaturityTier::Beginner,
        )?;

        Ok(BenchmarkTable {
            averages,
            grades,
            tiers,
        })
    }
}

/// Importance data for one category (`[priority.categories.<name>]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportanceConfig {
    /// Business importance, 1-5
    pub importance: u8,

    /// Urgency before the score-based increase, 1-5
    pub base_urgency: u8,

    /// Resources needed to improve the category
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Priority engine settings (`[priority]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    /// Categories scoring below this become priorities
    pub cutoff: f64,

    /// Maximum number of priorities reported
    pub top_k: usize,

    /// Per-category importance
    pub categories: BTreeMap<String, ImportanceConfig>,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        let policy = PriorityPolicy::standard();
        let categories = CategorySet::standard()
            .categories()
            .iter()
            .map(|c| {
                let entry = policy.entry(&c.name);
                (
                    c.name.clone(),
                    ImportanceConfig {
                        importance: entry.importance,
                        base_urgency: entry.base_urgency,
                        resources: entry.resources.clone(),
                    },
                )
            })
            .collect();

        Self {
            cutoff: policy.cutoff(),
            top_k: policy.top_k(),
            categories,
        }
    }
}

impl PriorityConfig {
    fn build(&self) -> Result<PriorityPolicy, ConfigError> {
        let table = self
            .categories
            .iter()
            .map(|(name, c)| {
                (
                    name.clone(),
                    ImportanceEntry {
                        importance: c.importance,
                        base_urgency: c.base_urgency,
                        resources: c.resources.clone(),
                    },
                )
            })
            .collect();
        Ok(PriorityPolicy::new(self.cutoff, self.top_k, table)?)
    }
}

/// Batch execution settings (`[batch]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum runs executing at once
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

/// Complete pipeline configuration
///
/// # Examples
///
/// ```
/// use bizscore_pipeline::PipelineConfig;
///
/// // Default: balanced retries, standard validation
/// let config = PipelineConfig::default();
/// assert_eq!(config.stages.retrieve_data.max_retries, 3);
///
/// // Strict: stricter report validation
/// let config = PipelineConfig::strict();
/// assert_eq!(config.validation.min_report_bytes, 1200);
///
/// // Lenient: more retries, permissive validation
/// let config = PipelineConfig::lenient();
/// assert_eq!(config.stages.retrieve_data.max_retries, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Stage retry and timeout policies
    pub stages: StagesConfig,

    /// Postcondition settings
    pub validation: ValidationConfig,

    /// Questionnaire layout
    pub scoring: ScoringConfig,

    /// Benchmark tables
    pub benchmark: BenchmarkConfig,

    /// Priority engine
    pub priority: PriorityConfig,

    /// Batch execution
    pub batch: BatchConfig,
}

impl PipelineConfig {
    /// Strict configuration: stricter report checks, fewer retries
    pub fn strict() -> Self {
        let mut stages = StagesConfig::default();
        stages.retrieve_data.max_retries = 2;
        stages.render_report.max_retries = 1;

        Self {
            stages,
            validation: ValidationConfig::strict(),
            ..Self::default()
        }
    }

    /// Lenient configuration: more retries, longer timeouts, permissive checks
    ///
    /// Suitable for development against slow or incomplete collaborators.
    pub fn lenient() -> Self {
        let stages = StagesConfig {
            validate_input: StagePolicy::new(1, 100, 2_000),
            retrieve_data: StagePolicy::new(5, 2_000, 60_000),
            compute_score: StagePolicy::new(1, 100, 10_000),
            render_report: StagePolicy::new(4, 3_000, 240_000),
            quality_check: StagePolicy::new(2, 500, 20_000),
        };

        Self {
            stages,
            validation: ValidationConfig::permissive(),
            ..Self::default()
        }
    }

    /// Parse TOML; missing sections fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Write to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_toml()?).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate everything and produce the runtime settings
    pub fn build(&self) -> Result<PipelineSettings, ConfigError> {
        self.stages.validate()?;
        self.validation.validate()?;
        if self.batch.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "batch.concurrency must be at least 1".to_string(),
            ));
        }

        Ok(PipelineSettings {
            stages: self.stages.clone(),
            gatekeeper: Gatekeeper::new(self.validation.clone()),
            scoring: ScoringSettings {
                categories: self.scoring.build()?,
                benchmark: self.benchmark.build()?,
                priority: self.priority.build()?,
            },
            batch_concurrency: self.batch.concurrency,
        })
    }
}

/// Validated scoring inputs shared by every run
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringSettings {
    /// Category partition
    pub categories: CategorySet,

    /// Industry averages and ladders
    pub benchmark: BenchmarkTable,

    /// Priority policy
    pub priority: PriorityPolicy,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            categories: CategorySet::standard(),
            benchmark: BenchmarkTable::default(),
            priority: PriorityPolicy::standard(),
        }
    }
}

/// Immutable runtime settings produced by [`PipelineConfig::build`]
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Stage policies
    pub stages: StagesConfig,

    /// Postcondition checks
    pub gatekeeper: Gatekeeper,

    /// Scoring inputs
    pub scoring: ScoringSettings,

    /// Maximum concurrent runs in a batch
    pub batch_concurrency: usize,
}
