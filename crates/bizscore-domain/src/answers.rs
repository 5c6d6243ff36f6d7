//! Answer vector module - the normalized questionnaire input

/// Number of questions in the current questionnaire version
pub const DEFAULT_QUESTION_COUNT: usize = 45;

/// Lowest valid answer on the 1-5 scale
pub const MIN_ANSWER: u8 = 1;

/// Highest valid answer on the 1-5 scale
pub const MAX_ANSWER: u8 = 5;

/// Value substituted for missing or out-of-range answers
pub const MIDPOINT_ANSWER: u8 = 3;

/// Fixed-length vector of questionnaire answers
///
/// Question ids are 1-based. The vector always holds exactly `question_count`
/// values in [1, 5]; anything missing or out of range is replaced with
/// [`MIDPOINT_ANSWER`] so that scoring never has to fail.
///
/// # Examples
///
/// ```
/// use bizscore_domain::AnswerVector;
///
/// let answers = AnswerVector::from_raw(&[5, 9, -1], 4);
/// assert_eq!(answers.get(1), Some(5));
/// assert_eq!(answers.get(2), Some(3)); // out of range → midpoint
/// assert_eq!(answers.get(4), Some(3)); // missing → midpoint
/// assert_eq!(answers.defaulted_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerVector {
    values: Vec<u8>,
    defaulted: usize,
}

impl AnswerVector {
    /// Build a vector from raw positional answers (index 0 is question 1)
    ///
    /// Extra trailing answers beyond `question_count` are ignored.
    pub fn from_raw(raw: &[i64], question_count: usize) -> Self {
        let mut defaulted = 0;
        let values = (0..question_count)
            .map(|i| match raw.get(i).copied().and_then(normalize) {
                Some(v) => v,
                None => {
                    defaulted += 1;
                    MIDPOINT_ANSWER
                }
            })
            .collect();

        Self { values, defaulted }
    }

    /// Build a vector from `(question_id, answer)` pairs
    ///
    /// Pairs with an id outside 1..=`question_count` are dropped. When an id is
    /// repeated, the last valid answer wins.
    pub fn from_pairs(pairs: &[(usize, i64)], question_count: usize) -> Self {
        let mut slots: Vec<Option<u8>> = vec![None; question_count];
        for &(id, raw) in pairs {
            if id == 0 || id > question_count {
                continue;
            }
            if let Some(v) = normalize(raw) {
                slots[id - 1] = Some(v);
            }
        }

        let defaulted = slots.iter().filter(|s| s.is_none()).count();
        let values = slots
            .into_iter()
            .map(|s| s.unwrap_or(MIDPOINT_ANSWER))
            .collect();

        Self { values, defaulted }
    }

    /// Build a vector where every answer has the same value (clamped to 1-5)
    pub fn uniform(value: u8, question_count: usize) -> Self {
        let value = value.clamp(MIN_ANSWER, MAX_ANSWER);
        Self {
            values: vec![value; question_count],
            defaulted: 0,
        }
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the questionnaire has no questions
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Answer for a 1-based question id
    pub fn get(&self, question_id: usize) -> Option<u8> {
        question_id
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
    }

    /// All answers in question order
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// How many answers were substituted with the midpoint
    pub fn defaulted_count(&self) -> usize {
        self.defaulted
    }

    /// Sum of all answers
    pub fn total(&self) -> u32 {
        self.values.iter().map(|&v| u32::from(v)).sum()
    }
}

fn normalize(raw: i64) -> Option<u8> {
    if (i64::from(MIN_ANSWER)..=i64::from(MAX_ANSWER)).contains(&raw) {
        Some(raw as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_pads_and_defaults() {
        let answers = AnswerVector::from_raw(&[1, 2, 6, 0], 6);
        assert_eq!(answers.values(), &[1, 2, 3, 3, 3, 3]);
        assert_eq!(answers.defaulted_count(), 4);
        assert_eq!(answers.len(), 6);
    }

    #[test]
    fn test_from_raw_ignores_extra_answers() {
        let answers = AnswerVector::from_raw(&[5, 5, 5, 5], 2);
        assert_eq!(answers.values(), &[5, 5]);
        assert_eq!(answers.defaulted_count(), 0);
    }

    #[test]
    fn test_from_pairs() {
        let answers = AnswerVector::from_pairs(&[(1, 4), (3, 5), (3, 2), (9, 1), (0, 1)], 3);
        assert_eq!(answers.values(), &[4, 3, 2]);
        assert_eq!(answers.defaulted_count(), 1);
    }

    #[test]
    fn test_get_is_one_based() {
        let answers = AnswerVector::from_raw(&[1, 2, 3], 3);
        assert_eq!(answers.get(0), None);
        assert_eq!(answers.get(1), Some(1));
        assert_eq!(answers.get(3), Some(3));
        assert_eq!(answers.get(4), None);
    }

    #[test]
    fn test_uniform_clamps() {
        assert_eq!(AnswerVector::uniform(9, 2).values(), &[5, 5]);
        assert_eq!(AnswerVector::uniform(0, 2).values(), &[1, 1]);
    }

    #[test]
    fn test_total() {
        let answers = AnswerVector::uniform(3, DEFAULT_QUESTION_COUNT);
        assert_eq!(answers.total(), 135);
    }
}
