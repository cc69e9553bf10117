use thiserror::Error;

use crate::models::{OptionId, QuestionId};

/// Misuse of the attempt controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("cannot {operation} while the attempt is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),

    #[error("option {option_id} does not belong to question {question_id}")]
    UnknownOption {
        question_id: QuestionId,
        option_id: OptionId,
    },
}
