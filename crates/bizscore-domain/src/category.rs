//! Category module - weighted groupings of questionnaire items

use crate::answers::DEFAULT_QUESTION_COUNT;
use crate::error::DomainError;
use std::collections::HashSet;

/// Upper bound for a category weight (inclusive)
pub const MAX_CATEGORY_WEIGHT: f64 = 2.0;

/// Standard questionnaire layout: (name, number of questions, weight)
///
/// Questions are assigned consecutively in this order, giving the
/// 8/8/8/8/8/5 split of the 45-question questionnaire.
const STANDARD_LAYOUT: [(&str, usize, f64); 6] = [
    ("business_foundation", 8, 0.8),
    ("current_ai_usage", 8, 1.0),
    ("organizational_readiness", 8, 1.0),
    ("technical_infrastructure", 8, 1.0),
    ("goal_clarity", 8, 1.0),
    ("execution_capability", 5, 1.2),
];

/// A named, weighted group of questions
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDefinition {
    /// Category name (unique within a set)
    pub name: String,

    /// 1-based question ids in display order
    pub question_ids: Vec<usize>,

    /// Weight in (0, 2] applied when aggregating the overall percentage
    pub weight: f64,
}

impl CategoryDefinition {
    /// Create a category from explicit question ids
    pub fn new(name: impl Into<String>, question_ids: Vec<usize>, weight: f64) -> Self {
        Self {
            name: name.into(),
            question_ids,
            weight,
        }
    }

    /// Create a category covering the inclusive id range `first..=last`
    pub fn from_range(name: impl Into<String>, first: usize, last: usize, weight: f64) -> Self {
        Self::new(name, (first..=last).collect(), weight)
    }
}

/// Validated set of categories that partitions the question id space
///
/// The only way to build one is [`CategorySet::new`] (or the known-good
/// [`CategorySet::standard`]), so every `CategorySet` in the system satisfies:
/// - every question id in 1..=N belongs to exactly one category
/// - every weight is in (0, 2]
/// - category names are unique
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySet {
    question_count: usize,
    categories: Vec<CategoryDefinition>,
}

impl CategorySet {
    /// Validate and build a category set
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem found; see [`DomainError`].
    pub fn new(
        categories: Vec<CategoryDefinition>,
        question_count: usize,
    ) -> Result<Self, DomainError> {
        if question_count == 0 {
            return Err(DomainError::InvalidQuestionCount(question_count));
        }

        let mut owners: Vec<Option<usize>> = vec![None; question_count];
        let mut names = HashSet::new();

        for (index, category) in categories.iter().enumerate() {
            if !names.insert(category.name.as_str()) {
                return Err(DomainError::DuplicateCategory(category.name.clone()));
            }

            if category.question_ids.is_empty() {
                return Err(DomainError::EmptyCategory(category.name.clone()));
            }

            // Written as a negated range check so NaN is rejected too
            if !(category.weight > 0.0 && category.weight <= MAX_CATEGORY_WEIGHT) {
                return Err(DomainError::InvalidWeight {
                    category: category.name.clone(),
                    weight: category.weight,
                });
            }

            for &question in &category.question_ids {
                if question == 0 || question > question_count {
                    return Err(DomainError::QuestionOutOfRange {
                        category: category.name.clone(),
                        question,
                        question_count,
                    });
                }

                match owners[question - 1] {
                    Some(first) => {
                        return Err(DomainError::OverlappingQuestion {
                            question,
                            first: categories[first].name.clone(),
                            second: category.name.clone(),
                        });
                    }
                    None => owners[question - 1] = Some(index),
                }
            }
        }

        if let Some(gap) = owners.iter().position(Option::is_none) {
            return Err(DomainError::UncoveredQuestion(gap + 1));
        }

        Ok(Self {
            question_count,
            categories,
        })
    }

    /// The standard six-category layout for the 45-question questionnaire
    pub fn standard() -> Self {
        let mut next = 1;
        let categories = STANDARD_LAYOUT
            .iter()
            .map(|&(name, size, weight)| {
                let category = CategoryDefinition::from_range(name, next, next + size - 1, weight);
                next += size;
                category
            })
            .collect();

        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            categories,
        }
    }

    /// Number of questions the set partitions
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Categories in configured order
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when the set has no categories (only possible for a zero-question set, which is rejected)
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category by name
    pub fn get(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Sum of all category weights
    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|c| c.weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six_equal(question_count: usize) -> Vec<CategoryDefinition> {
        vec![
            CategoryDefinition::from_range("a", 1, 8, 1.0),
            CategoryDefinition::from_range("b", 9, 16, 1.0),
            CategoryDefinition::from_range("c", 17, 24, 1.0),
            CategoryDefinition::from_range("d", 25, 32, 1.0),
            CategoryDefinition::from_range("e", 33, 40, 1.0),
            CategoryDefinition::from_range("f", 41, question_count, 1.0),
        ]
    }

    #[test]
    fn test_standard_set_is_valid() {
        let standard = CategorySet::standard();
        let rebuilt = CategorySet::new(standard.categories().to_vec(), standard.question_count());
        assert_eq!(rebuilt, Ok(standard.clone()));
        assert_eq!(standard.len(), 6);
        assert_eq!(standard.question_count(), 45);
        assert_eq!(standard.categories()[5].question_ids, vec![41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_valid_partition() {
        let set = CategorySet::new(six_equal(45), 45).unwrap();
        assert_eq!(set.total_weight(), 6.0);
        assert!(set.get("c").is_some());
        assert!(set.get("z").is_none());
    }

    #[test]
    fn test_overlap_rejected() {
        let mut categories = six_equal(45);
        categories[1] = CategoryDefinition::from_range("b", 8, 16, 1.0);
        let err = CategorySet::new(categories, 45).unwrap_err();
        assert_eq!(
            err,
            DomainError::OverlappingQuestion {
                question: 8,
                first: "a".to_string(),
                second: "b".to_string(),
            }
        );
    }

    #[test]
    fn test_gap_rejected() {
        let mut categories = six_equal(45);
        categories[5] = CategoryDefinition::from_range("f", 41, 44, 1.0);
        assert_eq!(
            CategorySet::new(categories, 45).unwrap_err(),
            DomainError::UncoveredQuestion(45)
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut categories = six_equal(45);
        categories[5] = CategoryDefinition::from_range("f", 41, 46, 1.0);
        assert!(matches!(
            CategorySet::new(categories, 45).unwrap_err(),
            DomainError::QuestionOutOfRange { question: 46, .. }
        ));
    }

    #[test]
    fn test_weight_bounds() {
        for weight in [0.0, -1.0, 2.01, f64::NAN] {
            let mut categories = six_equal(45);
            categories[0].weight = weight;
            assert!(matches!(
                CategorySet::new(categories, 45).unwrap_err(),
                DomainError::InvalidWeight { .. }
            ));
        }

        let mut categories = six_equal(45);
        categories[0].weight = 2.0;
        assert!(CategorySet::new(categories, 45).is_ok());
    }

    #[test]
    fn test_duplicate_and_empty_rejected() {
        let mut categories = six_equal(45);
        categories[1].name = "a".to_string();
        assert_eq!(
            CategorySet::new(categories, 45).unwrap_err(),
            DomainError::DuplicateCategory("a".to_string())
        );

        let categories = vec![CategoryDefinition::new("empty", vec![], 1.0)];
        assert_eq!(
            CategorySet::new(categories, 1).unwrap_err(),
            DomainError::EmptyCategory("empty".to_string())
        );
    }

    #[test]
    fn test_zero_questions_rejected() {
        assert_eq!(
            CategorySet::new(vec![], 0).unwrap_err(),
            DomainError::InvalidQuestionCount(0)
        );
    }
}
