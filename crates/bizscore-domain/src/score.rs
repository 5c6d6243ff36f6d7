//! Score computation module
//!
//! Implements the deterministic scoring formula:
//! 1. Category score = mean of member answers × 20 (0-100 scale)
//! 2. Overall percentage = weight-weighted mean of category scores
//! 3. Confidence = 100 - 25 × answer variance, clamped to [0, 100]

use crate::answers::{AnswerVector, MAX_ANSWER, MIDPOINT_ANSWER};
use crate::category::CategorySet;

/// Points per answer level when mapping the 1-5 scale onto 0-100
pub const POINTS_PER_LEVEL: f64 = 20.0;

/// Confidence lost per unit of answer variance
///
/// Variance of values in [1, 5] is at most 4, so the full range maps onto 0-100.
pub const CONFIDENCE_PER_VARIANCE: f64 = 25.0;

/// Score for a single category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    /// Category name
    pub name: String,

    /// Score on the 0-100 scale
    pub score: f64,

    /// Weight the category contributed to the overall percentage
    pub weight: f64,

    /// Number of questions in the category
    pub question_count: usize,
}

/// Result of scoring one answer vector
///
/// Immutable once produced; one per pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Sum of all answers (0..=N*5)
    pub total: u32,

    /// Highest achievable total (N*5)
    pub max_total: u32,

    /// Weighted overall percentage (0-100)
    pub percentage: f64,

    /// Per-category scores in configured order
    pub category_scores: Vec<CategoryScore>,

    /// Confidence in the result derived from answer spread (0-100)
    pub confidence_level: f64,

    /// How many answers were defaulted to the midpoint
    pub defaulted_answers: usize,
}

impl ScoreResult {
    /// Look up a category score by name
    pub fn category_score(&self, name: &str) -> Option<f64> {
        self.category_scores
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.score)
    }
}

/// Score an answer vector against a category set
///
/// Pure and total: answers are read by question id and any id the vector does
/// not cover counts as the midpoint, so a result is produced for every input.
///
/// # Examples
///
/// ```
/// use bizscore_domain::{score, AnswerVector, CategoryDefinition, CategorySet};
///
/// let categories = CategorySet::new(
///     vec![
///         CategoryDefinition::from_range("strategy", 1, 2, 1.0),
///         CategoryDefinition::from_range("execution", 3, 4, 2.0),
///     ],
///     4,
/// ).unwrap();
///
/// let result = score(&AnswerVector::from_raw(&[5, 5, 1, 1], 4), &categories);
/// assert_eq!(result.category_score("strategy"), Some(100.0));
/// assert_eq!(result.category_score("execution"), Some(20.0));
/// // (100 × 1 + 20 × 2) / 3
/// assert_eq!(result.percentage, 46.67);
/// ```
pub fn score(answers: &AnswerVector, categories: &CategorySet) -> ScoreResult {
    let question_count = categories.question_count();
    let answer_at = |id: usize| answers.get(id).unwrap_or(MIDPOINT_ANSWER);

    let category_scores: Vec<CategoryScore> = categories
        .categories()
        .iter()
        .map(|category| {
            let sum: u32 = category
                .question_ids
                .iter()
                .map(|&id| u32::from(answer_at(id)))
                .sum();
            let mean = if category.question_ids.is_empty() {
                f64::from(MIDPOINT_ANSWER)
            } else {
                f64::from(sum) / category.question_ids.len() as f64
            };

            CategoryScore {
                name: category.name.clone(),
                score: round2((mean * POINTS_PER_LEVEL).clamp(0.0, 100.0)),
                weight: category.weight,
                question_count: category.question_ids.len(),
            }
        })
        .collect();

    let total_weight: f64 = category_scores.iter().map(|c| c.weight).sum();
    let percentage = if total_weight > 0.0 {
        category_scores
            .iter()
            .map(|c| c.score * c.weight)
            .sum::<f64>()
            / total_weight
    } else {
        f64::from(MIDPOINT_ANSWER) * POINTS_PER_LEVEL
    };

    let values: Vec<f64> = (1..=question_count).map(|id| f64::from(answer_at(id))).collect();
    let total: u32 = values.iter().map(|&v| v as u32).sum();

    ScoreResult {
        total,
        max_total: question_count as u32 * u32::from(MAX_ANSWER),
        percentage: round2(percentage.clamp(0.0, 100.0)),
        category_scores,
        confidence_level: round2(confidence_from_variance(variance(&values))),
        defaulted_answers: answers.defaulted_count(),
    }
}

/// Population variance of the answers
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn confidence_from_variance(variance: f64) -> f64 {
    (100.0 - variance * CONFIDENCE_PER_VARIANCE).clamp(0.0, 100.0)
}

/// Round to two decimal places so equal inputs print and compare identically
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryDefinition;

    fn equal_weight_set() -> CategorySet {
        CategorySet::new(
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
        .unwrap()
    }

    #[test]
    fn test_all_midpoint_scores_sixty() {
        let result = score(&AnswerVector::uniform(3, 45), &equal_weight_set());
        assert_eq!(result.total, 135);
        assert_eq!(result.max_total, 225);
        assert_eq!(result.percentage, 60.0);
        assert!(result.category_scores.iter().all(|c| c.score == 60.0));
        assert_eq!(result.confidence_level, 100.0);
    }

    #[test]
    fn test_extremes() {
        let set = equal_weight_set();

        let low = score(&AnswerVector::uniform(1, 45), &set);
        assert_eq!(low.total, 45);
        assert_eq!(low.percentage, 20.0);

        let high = score(&AnswerVector::uniform(5, 45), &set);
        assert_eq!(high.total, 225);
        assert_eq!(high.percentage, 100.0);
    }

    #[test]
    fn test_weights_shift_percentage() {
        let set = CategorySet::new(
            vec![
                CategoryDefinition::from_range("foundation", 1, 2, 0.5),
                CategoryDefinition::from_range("execution", 3, 4, 2.0),
            ],
            4,
        )
        .unwrap();

        let result = score(&AnswerVector::from_raw(&[1, 1, 5, 5], 4), &set);
        // (20 × 0.5 + 100 × 2.0) / 2.5 = 84
        assert_eq!(result.percentage, 84.0);
    }

    #[test]
    fn test_confidence_drops_with_spread() {
        let set = CategorySet::new(vec![CategoryDefinition::from_range("all", 1, 4, 1.0)], 4).unwrap();

        let split = score(&AnswerVector::from_raw(&[1, 1, 5, 5], 4), &set);
        assert_eq!(split.confidence_level, 0.0);

        let mild = score(&AnswerVector::from_raw(&[2, 3, 3, 4], 4), &set);
        // variance 0.5 → 87.5
        assert_eq!(mild.confidence_level, 87.5);
    }

    #[test]
    fn test_short_vector_is_padded_with_midpoint() {
        let set = equal_weight_set();
        let result = score(&AnswerVector::from_raw(&[], 10), &set);
        assert_eq!(result.total, 135);
        assert_eq!(result.percentage, 60.0);
        assert_eq!(result.defaulted_answers, 10);
    }

    #[test]
    fn test_category_lookup() {
        let result = score(&AnswerVector::uniform(4, 45), &equal_weight_set());
        assert_eq!(result.category_score("f"), Some(80.0));
        assert_eq!(result.category_score("missing"), None);
    }

    #[test]
    fn test_repeatable() {
        let set = CategorySet::standard();
        let answers = AnswerVector::from_raw(&[1, 5, 2, 4, 3, 5, 1, 2, 3, 4], 45);
        assert_eq!(score(&answers, &set), score(&answers, &set));
    }
}
