//! Priority module - ranked remediation items for weak categories

use crate::error::DomainError;
use crate::score::CategoryScore;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Categories scoring below this are candidates for remediation
pub const DEFAULT_CUTOFF: f64 = 70.0;

/// Maximum number of priority items returned
pub const DEFAULT_TOP_K: usize = 5;

/// Score drop (below the cutoff) that raises urgency by one level
pub const URGENCY_STEP: f64 = 15.0;

/// Highest importance or urgency level
pub const MAX_LEVEL: u8 = 5;

/// Recommended time frame for acting on a priority item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeline {
    /// Within one month
    Immediate,
    /// One to three months
    ShortTerm,
    /// Three to six months
    MediumTerm,
    /// Six to twelve months
    LongTerm,
}

impl Timeline {
    /// Derive the timeline from an urgency level
    pub fn from_urgency(urgency: u8) -> Self {
        match urgency {
            u if u >= MAX_LEVEL => Timeline::Immediate,
            4 => Timeline::ShortTerm,
            3 => Timeline::MediumTerm,
            _ => Timeline::LongTerm,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Timeline::Immediate => "immediate (within 1 month)",
            Timeline::ShortTerm => "short term (1-3 months)",
            Timeline::MediumTerm => "medium term (3-6 months)",
            Timeline::LongTerm => "long term (6-12 months)",
        }
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static importance data for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportanceEntry {
    /// Business importance, 1-5
    pub importance: u8,

    /// Urgency before the score-based increase, 1-5
    pub base_urgency: u8,

    /// Resources typically needed to improve the category
    pub resources: Vec<String>,
}

impl ImportanceEntry {
    /// Create an entry
    pub fn new(importance: u8, base_urgency: u8, resources: &[&str]) -> Self {
        Self {
            importance,
            base_urgency,
            resources: resources.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn fallback() -> Self {
        Self::new(3, 2, &["internal project owner", "external advisor"])
    }
}

/// A ranked remediation task
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityItem {
    /// Category the item addresses
    pub category: String,

    /// Current category score (0-100)
    pub current_score: f64,

    /// Importance, 1-5
    pub importance: u8,

    /// Urgency, 1-5
    pub urgency: u8,

    /// importance × urgency
    pub priority: u8,

    /// Recommended time frame
    pub timeline: Timeline,

    /// Resources needed
    pub required_resources: Vec<String>,
}

/// Cutoff, result size and importance table for the PriorityEngine
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityPolicy {
    cutoff: f64,
    top_k: usize,
    table: BTreeMap<String, ImportanceEntry>,
    fallback: ImportanceEntry,
}

impl PriorityPolicy {
    /// Build and validate a policy
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPolicy`] if the cutoff is outside (0, 100],
    /// `top_k` is zero, or any importance/urgency is outside 1-5.
    pub fn new(
        cutoff: f64,
        top_k: usize,
        table: BTreeMap<String, ImportanceEntry>,
    ) -> Result<Self, DomainError> {
        if !(cutoff > 0.0 && cutoff <= 100.0) {
            return Err(DomainError::InvalidPolicy(format!(
                "cutoff {} must be in (0, 100]",
                cutoff
            )));
        }
        if top_k == 0 {
            return Err(DomainError::InvalidPolicy("top_k must be at least 1".to_string()));
        }
        for (name, entry) in &table {
            for (label, level) in [("importance", entry.importance), ("base_urgency", entry.base_urgency)] {
                if !(1..=MAX_LEVEL).contains(&level) {
                    return Err(DomainError::InvalidPolicy(format!(
                        "{} for '{}' is {} (must be 1-5)",
                        label, name, level
                    )));
                }
            }
        }

        Ok(Self {
            cutoff,
            top_k,
            table,
            fallback: ImportanceEntry::fallback(),
        })
    }

    /// Default policy for the standard category layout
    pub fn standard() -> Self {
        let table = [
            ("business_foundation", ImportanceEntry::new(3, 2, &["management review", "documented business plan"])),
            ("current_ai_usage", ImportanceEntry::new(4, 2, &["AI tool licences", "pilot project owner"])),
            ("organizational_readiness", ImportanceEntry::new(4, 3, &["executive sponsor", "training budget"])),
            ("technical_infrastructure", ImportanceEntry::new(3, 2, &["cloud infrastructure", "data integration specialist"])),
            ("goal_clarity", ImportanceEntry::new(5, 3, &["KPI framework", "strategy workshop"])),
            ("execution_capability", ImportanceEntry::new(5, 2, &["dedicated project team", "implementation partner"])),
        ]
        .into_iter()
        .map(|(name, entry)| (name.to_string(), entry))
        .collect();

        Self {
            cutoff: DEFAULT_CUTOFF,
            top_k: DEFAULT_TOP_K,
            table,
            fallback: ImportanceEntry::fallback(),
        }
    }

    /// Score below which a category becomes a priority
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Maximum number of items returned
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Importance entry for a category (fallback entry if not configured)
    pub fn entry(&self, category: &str) -> &ImportanceEntry {
        self.table.get(category).unwrap_or(&self.fallback)
    }

    /// Urgency for a score: `min(5, base + floor((cutoff - score) / 15))`
    pub fn urgency(&self, base_urgency: u8, score: f64) -> u8 {
        let steps = ((self.cutoff - score) / URGENCY_STEP).floor().max(0.0) as u32;
        (u32::from(base_urgency) + steps).min(u32::from(MAX_LEVEL)) as u8
    }
}

/// Derive the ranked remediation list from category scores
///
/// Items are ordered by priority descending, then by lower current score
/// (worse problems first), then by category name.
///
/// # Examples
///
/// ```
/// use bizscore_domain::{prioritize, CategoryScore, PriorityPolicy};
///
/// let scores = vec![
///     CategoryScore { name: "goal_clarity".into(), score: 40.0, weight: 1.0, question_count: 8 },
///     CategoryScore { name: "business_foundation".into(), score: 90.0, weight: 1.0, question_count: 8 },
/// ];
/// let items = prioritize(&scores, &PriorityPolicy::standard());
///
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].category, "goal_clarity");
/// assert_eq!(items[0].urgency, 5);
/// assert_eq!(items[0].priority, 25);
/// ```
pub fn prioritize(category_scores: &[CategoryScore], policy: &PriorityPolicy) -> Vec<PriorityItem> {
    let mut items: Vec<PriorityItem> = category_scores
        .iter()
        .filter(|c| c.score < policy.cutoff())
        .map(|c| {
            let entry = policy.entry(&c.name);
            let urgency = policy.urgency(entry.base_urgency, c.score);

            PriorityItem {
                category: c.name.clone(),
                current_score: c.score,
                importance: entry.importance,
                urgency,
                priority: entry.importance * urgency,
                timeline: Timeline::from_urgency(urgency),
                required_resources: entry.resources.clone(),
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| {
                a.current_score
                    .partial_cmp(&b.current_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.category.cmp(&b.category))
    });
    items.truncate(policy.top_k());
    items
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Output is sorted, bounded, and only contains weak categories
        #[test]
        fn test_prioritize_invariants(scores in prop::collection::vec(0.0f64..=100.0, 1..12)) {
            let policy = PriorityPolicy::standard();
            let categories: Vec<CategoryScore> = scores
                .iter()
                .enumerate()
                .map(|(i, &score)| CategoryScore {
                    name: format!("category_{}", i),
                    score,
                    weight: 1.0,
                    question_count: 4,
                })
                .collect();

            let items = prioritize(&categories, &policy);

            prop_assert!(items.len() <= policy.top_k());
            for item in &items {
                prop_assert!(item.current_score < policy.cutoff());
                prop_assert!((1..=5).contains(&item.urgency));
                prop_assert_eq!(item.priority, item.importance * item.urgency);
            }
            for pair in items.windows(2) {
                prop_assert!(pair[0].priority >= pair[1].priority);
                if pair[0].priority == pair[1].priority {
                    prop_assert!(pair[0].current_score <= pair[1].current_score);
                }
            }
        }
    }
}
