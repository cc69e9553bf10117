//! Per-attempt answer selections.

use std::collections::{HashMap, HashSet};

use crate::models::{AnswerSubmission, OptionId, QuestionId};

/// Question id → selected option id for the running attempt.
///
/// Entries are overwritten on re-selection and never removed one by one.
#[derive(Debug, Clone, Default)]
pub struct AnswerStore {
    selections: HashMap<QuestionId, OptionId>,
    /// Submission order: quiz order first, then ids first seen by `set`.
    order: Vec<QuestionId>,
    /// Members of `order`.
    ordered: HashSet<QuestionId>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that emits submissions in the given question order.
    pub fn with_order(order: impl IntoIterator<Item = QuestionId>) -> Self {
        let mut store = Self::new();
        for question_id in order {
            store.push_order(question_id);
        }
        store
    }

    pub fn set(&mut self, question_id: QuestionId, option_id: OptionId) {
        if self.selections.insert(question_id, option_id).is_none() {
            self.push_order(question_id);
        }
    }

    fn push_order(&mut self, question_id: QuestionId) {
        if self.ordered.insert(question_id) {
            self.order.push(question_id);
        }
    }

    pub fn get(&self, question_id: QuestionId) -> Option<OptionId> {
        self.selections.get(&question_id).copied()
    }

    /// Number of distinct answered questions.
    pub fn size(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// The answered questions as submission pairs, in encounter order.
    /// Unanswered questions are left out.
    pub fn to_submission(&self) -> Vec<AnswerSubmission> {
        self.order
            .iter()
            .filter_map(|&question_id| {
                self.get(question_id).map(|option_id| AnswerSubmission {
                    question_id,
                    option_id,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: i64) -> QuestionId {
        QuestionId::new(id)
    }

    fn o(id: i64) -> OptionId {
        OptionId::new(id)
    }

    #[test]
    fn last_selection_wins() {
        let mut store = AnswerStore::new();
        store.set(q(1), o(11));
        store.set(q(1), o(12));
        store.set(q(1), o(12));

        assert_eq!(store.get(q(1)), Some(o(12)));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn size_never_exceeds_distinct_questions() {
        let picks = [(3, 31), (1, 11), (3, 33), (2, 21), (1, 12), (3, 32), (2, 21)];
        let mut store = AnswerStore::new();
        let mut touched = Vec::new();

        for (question, option) in picks {
            store.set(q(question), o(option));
            if !touched.contains(&question) {
                touched.push(question);
            }
            assert!(store.size() <= touched.len());
        }

        assert_eq!(store.size(), 3);
        assert_eq!(store.get(q(1)), Some(o(12)));
        assert_eq!(store.get(q(2)), Some(o(21)));
        assert_eq!(store.get(q(3)), Some(o(32)));
    }

    #[test]
    fn unset_question_reads_none() {
        let store = AnswerStore::with_order([q(1), q(2)]);
        assert_eq!(store.get(q(2)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn submission_follows_quiz_order_and_skips_unanswered() {
        let mut store = AnswerStore::with_order([q(1), q(2), q(3)]);
        store.set(q(3), o(31));
        store.set(q(1), o(11));

        assert_eq!(
            store.to_submission(),
            vec![
                AnswerSubmission { question_id: q(1), option_id: o(11) },
                AnswerSubmission { question_id: q(3), option_id: o(31) },
            ]
        );
    }

    #[test]
    fn unknown_questions_follow_first_set_order() {
        let mut store = AnswerStore::with_order([q(1)]);
        store.set(q(9), o(91));
        store.set(q(5), o(51));
        store.set(q(1), o(11));
        store.set(q(9), o(92));

        let order: Vec<_> = store.to_submission().iter().map(|a| a.question_id).collect();
        assert_eq!(order, vec![q(1), q(9), q(5)]);
    }

    #[test]
    fn duplicate_seed_ids_keep_first_position() {
        let mut store = AnswerStore::with_order([q(2), q(1), q(2), q(3), q(1)]);
        store.set(q(7), o(71));
        for id in [3, 2, 1] {
            store.set(q(id), o(id * 10 + 1));
        }
        store.set(q(7), o(72));

        let order: Vec<_> = store.to_submission().iter().map(|a| a.question_id).collect();
        assert_eq!(order, vec![q(2), q(1), q(3), q(7)]);
        assert_eq!(store.size(), 4);
    }

    #[test]
    fn many_distinct_ids_stay_in_encounter_order() {
        let mut store = AnswerStore::with_order((0..50_000).map(q));
        for id in (50_000..100_000).rev() {
            store.set(q(id), o(id));
        }
        for id in 0..50_000 {
            store.set(q(id), o(id));
        }

        let submission = store.to_submission();
        assert_eq!(store.size(), 100_000);
        assert_eq!(submission[0].question_id, q(0));
        assert_eq!(submission[49_999].question_id, q(49_999));
        assert_eq!(submission[50_000].question_id, q(99_999));
        assert_eq!(submission[99_999].question_id, q(50_000));
    }
}
