//! Benchmark module - industry-relative positioning of a score
//!
//! The percentile produced here is a heuristic: a linear mapping centred on
//! the industry average with a fixed sensitivity. It is not derived from a
//! population distribution and must not be presented as a true percentile.

use crate::error::DomainError;
use crate::score::ScoreResult;
use std::collections::BTreeMap;
use std::fmt;

/// Percentage-point distance from the industry average that moves the percentile by [`PERCENTILE_SPREAD`]
pub const PERCENTILE_SENSITIVITY: f64 = 15.0;

/// Percentile points gained per [`PERCENTILE_SENSITIVITY`] above the average
pub const PERCENTILE_SPREAD: f64 = 30.0;

/// Industry classification used for benchmarking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndustryType {
    /// Manufacturing and production
    Manufacturing,
    /// Retail and wholesale
    Retail,
    /// IT, software and telecommunications
    Technology,
    /// Banking, insurance and finance
    Finance,
    /// Healthcare and welfare
    Healthcare,
    /// Construction and real estate
    Construction,
    /// Logistics and transport
    Logistics,
    /// Professional and consumer services
    Services,
    /// Anything not listed above
    Other,
}

impl IndustryType {
    /// All industries in table order
    pub const ALL: [IndustryType; 9] = [
        IndustryType::Manufacturing,
        IndustryType::Retail,
        IndustryType::Technology,
        IndustryType::Finance,
        IndustryType::Healthcare,
        IndustryType::Construction,
        IndustryType::Logistics,
        IndustryType::Services,
        IndustryType::Other,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            IndustryType::Manufacturing => "manufacturing",
            IndustryType::Retail => "retail",
            IndustryType::Technology => "technology",
            IndustryType::Finance => "finance",
            IndustryType::Healthcare => "healthcare",
            IndustryType::Construction => "construction",
            IndustryType::Logistics => "logistics",
            IndustryType::Services => "services",
            IndustryType::Other => "other",
        }
    }

    /// Parse an industry name, accepting a few common aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manufacturing" => Some(IndustryType::Manufacturing),
            "retail" | "wholesale" => Some(IndustryType::Retail),
            "technology" | "it" | "software" | "telecom" => Some(IndustryType::Technology),
            "finance" | "insurance" | "banking" => Some(IndustryType::Finance),
            "healthcare" | "medical" => Some(IndustryType::Healthcare),
            "construction" | "real_estate" => Some(IndustryType::Construction),
            "logistics" | "transport" => Some(IndustryType::Logistics),
            "services" => Some(IndustryType::Services),
            "other" => Some(IndustryType::Other),
            _ => None,
        }
    }

    /// Parse an optional industry name, falling back to [`IndustryType::Other`]
    pub fn parse_or_other(s: Option<&str>) -> Self {
        s.and_then(Self::parse).unwrap_or(IndustryType::Other)
    }
}

impl fmt::Display for IndustryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IndustryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid industry: {}", s))
    }
}

/// Five-level maturity classification, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MaturityTier {
    /// Little or no structured adoption
    Beginner,
    /// Early, isolated initiatives
    Developing,
    /// Repeatable processes in place
    Defined,
    /// Broad adoption with measurable results
    Advanced,
    /// Industry-leading practice
    Leading,
}

impl MaturityTier {
    /// Name of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityTier::Beginner => "beginner",
            MaturityTier::Developing => "developing",
            MaturityTier::Defined => "defined",
            MaturityTier::Advanced => "advanced",
            MaturityTier::Leading => "leading",
        }
    }

    /// Level number, 1 (Beginner) through 5 (Leading)
    pub fn level(&self) -> u8 {
        match self {
            MaturityTier::Beginner => 1,
            MaturityTier::Developing => 2,
            MaturityTier::Defined => 3,
            MaturityTier::Advanced => 4,
            MaturityTier::Leading => 5,
        }
    }
}

impl fmt::Display for MaturityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Six-level letter grade, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// Exceptional
    S,
    /// Strong
    A,
    /// Above average
    B,
    /// Average
    C,
    /// Below average
    D,
    /// Weak
    F,
}

impl Grade {
    /// Letter for the grade
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of `(minimum percentage, value)` steps
///
/// Steps are checked from the highest threshold down; the first one the
/// percentage reaches wins, otherwise the floor value applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdLadder<T> {
    steps: Vec<(f64, T)>,
    floor: T,
}

impl<T: Copy> ThresholdLadder<T> {
    /// Build a ladder, requiring strictly descending thresholds within [0, 100]
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLadder`] if thresholds are out of range or
    /// not strictly descending.
    pub fn new(steps: Vec<(f64, T)>, floor: T) -> Result<Self, DomainError> {
        let mut previous = f64::INFINITY;
        for (threshold, _) in &steps {
            if !(0.0..=100.0).contains(threshold) {
                return Err(DomainError::InvalidLadder(format!(
                    "threshold {} is outside [0, 100]",
                    threshold
                )));
            }
            if *threshold >= previous {
                return Err(DomainError::InvalidLadder(format!(
                    "threshold {} is not below the previous threshold {}",
                    threshold, previous
                )));
            }
            previous = *threshold;
        }

        Ok(Self { steps, floor })
    }

    /// Classify a percentage
    pub fn classify(&self, percentage: f64) -> T {
        self.steps
            .iter()
            .find(|(threshold, _)| percentage >= *threshold)
            .map(|(_, value)| *value)
            .unwrap_or(self.floor)
    }

    /// The configured steps, highest threshold first
    pub fn steps(&self) -> &[(f64, T)] {
        &self.steps
    }
}

impl ThresholdLadder<Grade> {
    /// Default grade ladder: S ≥ 85, A ≥ 75, B ≥ 65, C ≥ 55, D ≥ 45, else F
    pub fn default_grades() -> Self {
        Self {
            steps: vec![
                (85.0, Grade::S),
                (75.0, Grade::A),
                (65.0, Grade::B),
                (55.0, Grade::C),
                (45.0, Grade::D),
            ],
            floor: Grade::F,
        }
    }
}

impl ThresholdLadder<MaturityTier> {
    /// Default tier ladder: Leading ≥ 80, Advanced ≥ 65, Defined ≥ 50, Developing ≥ 35, else Beginner
    pub fn default_tiers() -> Self {
        Self {
            steps: vec![
                (80.0, MaturityTier::Leading),
                (65.0, MaturityTier::Advanced),
                (50.0, MaturityTier::Defined),
                (35.0, MaturityTier::Developing),
            ],
            floor: MaturityTier::Beginner,
        }
    }
}

/// Static per-industry average percentages
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryAverages {
    averages: BTreeMap<IndustryType, f64>,
}

impl IndustryAverages {
    /// Fallback average for an industry missing from the table
    pub const FALLBACK_AVERAGE: f64 = 50.0;

    /// Empty table; every lookup falls back
    pub fn empty() -> Self {
        Self {
            averages: BTreeMap::new(),
        }
    }

    /// Set (or replace) the average for an industry
    pub fn with_average(mut self, industry: IndustryType, average: f64) -> Self {
        self.averages.insert(industry, average.clamp(0.0, 100.0));
        self
    }

    /// Average for an industry, falling back to `Other` and then [`Self::FALLBACK_AVERAGE`]
    pub fn average(&self, industry: IndustryType) -> f64 {
        self.averages
            .get(&industry)
            .or_else(|| self.averages.get(&IndustryType::Other))
            .copied()
            .unwrap_or(Self::FALLBACK_AVERAGE)
    }

    /// Iterate configured entries
    pub fn iter(&self) -> impl Iterator<Item = (IndustryType, f64)> + '_ {
        self.averages.iter().map(|(k, v)| (*k, *v))
    }
}

impl Default for IndustryAverages {
    fn default() -> Self {
        Self::empty()
            .with_average(IndustryType::Manufacturing, 52.0)
            .with_average(IndustryType::Retail, 48.0)
            .with_average(IndustryType::Technology, 65.0)
            .with_average(IndustryType::Finance, 60.0)
            .with_average(IndustryType::Healthcare, 45.0)
            .with_average(IndustryType::Construction, 42.0)
            .with_average(IndustryType::Logistics, 47.0)
            .with_average(IndustryType::Services, 50.0)
            .with_average(IndustryType::Other, 50.0)
    }
}

/// Everything the BenchmarkEngine needs, loaded once from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkTable {
    /// Industry averages
    pub averages: IndustryAverages,
    /// Grade ladder
    pub grades: ThresholdLadder<Grade>,
    /// Maturity tier ladder
    pub tiers: ThresholdLadder<MaturityTier>,
}

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self {
            averages: IndustryAverages::default(),
            grades: ThresholdLadder::default_grades(),
            tiers: ThresholdLadder::default_tiers(),
        }
    }
}

/// Industry-relative view of a score
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkResult {
    /// Industry compared against
    pub industry: IndustryType,

    /// Average percentage for that industry
    pub industry_average: f64,

    /// Heuristic percentile in [1, 99]
    pub percentile: u8,

    /// Maturity tier
    pub maturity_tier: MaturityTier,

    /// Letter grade
    pub grade: Grade,

    /// Percentage minus industry average
    pub gap: f64,
}

/// Heuristic percentile: `clamp(1, 99, round(50 + (percentage - average) / 15 × 30))`
///
/// # Examples
///
/// ```
/// use bizscore_domain::percentile;
///
/// assert_eq!(percentile(60.0, 60.0), 50);
/// assert_eq!(percentile(75.0, 60.0), 80);
/// assert_eq!(percentile(0.0, 60.0), 1);
/// assert_eq!(percentile(100.0, 40.0), 99);
/// ```
pub fn percentile(percentage: f64, industry_average: f64) -> u8 {
    let raw = 50.0 + (percentage - industry_average) / PERCENTILE_SENSITIVITY * PERCENTILE_SPREAD;
    raw.round().clamp(1.0, 99.0) as u8
}

/// Benchmark a score against its industry
pub fn benchmark(
    score: &ScoreResult,
    industry: IndustryType,
    table: &BenchmarkTable,
) -> BenchmarkResult {
    let industry_average = table.averages.average(industry);

    BenchmarkResult {
        industry,
        industry_average,
        percentile: percentile(score.percentage, industry_average),
        maturity_tier: table.tiers.classify(score.percentage),
        grade: table.grades.classify(score.percentage),
        gap: ((score.percentage - industry_average) * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerVector;
    use crate::category::{CategoryDefinition, CategorySet};
    use crate::score::score;

    fn score_with_percentage(percentage: f64) -> ScoreResult {
        ScoreResult {
            total: 0,
            max_total: 225,
            percentage,
            category_scores: vec![],
            confidence_level: 100.0,
            defaulted_answers: 0,
        }
    }

    #[test]
    fn test_midpoint_scenario_grades_c() {
        let categories = CategorySet::new(
            vec![
                CategoryDefinition::from_range("a", 1, 8, 1.0),
                CategoryDefinition::from_range("b", 9, 16, 1.0),
                CategoryDefinition::from_range("c", 17, 24, 1.0),
                CategoryDefinition::from_range("d", 25, 32, 1.0),
                CategoryDefinition::from_range("e", 33, 40, 1.0),
                CategoryDefinition::from_range("f", 41, 45, 1.0),
            ],
            45,
        )
        .unwrap();
        let result = score(&AnswerVector::uniform(3, 45), &categories);
        let bench = benchmark(&result, IndustryType::Finance, &BenchmarkTable::default());

        assert_eq!(result.percentage, 60.0);
        assert_eq!(bench.grade, Grade::C);
        assert_eq!(bench.industry_average, 60.0);
        assert_eq!(bench.percentile, 50);
        assert_eq!(bench.maturity_tier, MaturityTier::Defined);
    }

    #[test]
    fn test_grade_boundaries() {
        let ladder = ThresholdLadder::default_grades();
        assert_eq!(ladder.classify(100.0), Grade::S);
        assert_eq!(ladder.classify(85.0), Grade::S);
        assert_eq!(ladder.classify(84.99), Grade::A);
        assert_eq!(ladder.classify(65.0), Grade::B);
        assert_eq!(ladder.classify(64.99), Grade::C);
        assert_eq!(ladder.classify(55.0), Grade::C);
        assert_eq!(ladder.classify(54.99), Grade::D);
        assert_eq!(ladder.classify(44.99), Grade::F);
        assert_eq!(ladder.classify(0.0), Grade::F);
    }

    #[test]
    fn test_tier_boundaries() {
        let ladder = ThresholdLadder::default_tiers();
        assert_eq!(ladder.classify(80.0), MaturityTier::Leading);
        assert_eq!(ladder.classify(79.9), MaturityTier::Advanced);
        assert_eq!(ladder.classify(50.0), MaturityTier::Defined);
        assert_eq!(ladder.classify(35.0), MaturityTier::Developing);
        assert_eq!(ladder.classify(34.9), MaturityTier::Beginner);
        assert_eq!(MaturityTier::Leading.level(), 5);
    }

    #[test]
    fn test_ladder_must_descend() {
        let err = ThresholdLadder::new(vec![(50.0, Grade::A), (60.0, Grade::B)], Grade::F);
        assert!(matches!(err, Err(DomainError::InvalidLadder(_))));

        let err = ThresholdLadder::new(vec![(120.0, Grade::A)], Grade::F);
        assert!(matches!(err, Err(DomainError::InvalidLadder(_))));

        assert!(ThresholdLadder::new(vec![(60.0, Grade::A), (50.0, Grade::B)], Grade::F).is_ok());
    }

    #[test]
    fn test_percentile_formula() {
        // 50 + (70 - 65) / 15 × 30 = 60
        assert_eq!(percentile(70.0, 65.0), 60);
        // 50 + (40 - 65) / 15 × 30 = 0 → clamped to 1
        assert_eq!(percentile(40.0, 65.0), 1);
        // 50 + (52 - 50) / 15 × 30 = 54
        assert_eq!(percentile(52.0, 50.0), 54);
    }

    #[test]
    fn test_unknown_industry_falls_back() {
        let averages = IndustryAverages::empty().with_average(IndustryType::Other, 44.0);
        assert_eq!(averages.average(IndustryType::Retail), 44.0);
        assert_eq!(IndustryAverages::empty().average(IndustryType::Retail), 50.0);
    }

    #[test]
    fn test_industry_parse() {
        assert_eq!(IndustryType::parse("IT"), Some(IndustryType::Technology));
        assert_eq!(IndustryType::parse(" Retail "), Some(IndustryType::Retail));
        assert_eq!(IndustryType::parse("space"), None);
        assert_eq!(IndustryType::parse_or_other(Some("space")), IndustryType::Other);
        assert_eq!(IndustryType::parse_or_other(None), IndustryType::Other);
        assert_eq!("finance".parse::<IndustryType>(), Ok(IndustryType::Finance));
    }

    #[test]
    fn test_benchmark_is_repeatable() {
        let table = BenchmarkTable::default();
        let result = score_with_percentage(71.25);
        assert_eq!(
            benchmark(&result, IndustryType::Technology, &table),
            benchmark(&result, IndustryType::Technology, &table)
        );
    }

    #[test]
    fn test_gap() {
        let bench = benchmark(
            &score_with_percentage(72.5),
            IndustryType::Technology,
            &BenchmarkTable::default(),
        );
        assert_eq!(bench.gap, 7.5);
        assert_eq!(bench.percentile, 65);
    }
}
