use serde::{Deserialize, Serialize};

use super::ids::{OptionId, QuestionId};

/// A single multiple-choice question as served for an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One selectable answer.
///
/// `is_correct` is only meaningful once the attempt has been submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl Question {
    pub fn has_option(&self, option_id: OptionId) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }

    /// Position of `option_id` in display order.
    pub fn option_index(&self, option_id: OptionId) -> Option<usize> {
        self.options.iter().position(|option| option.id == option_id)
    }

    pub fn option(&self, option_id: OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

impl QuestionOption {
    pub fn is_correct(&self) -> bool {
        self.is_correct.unwrap_or(false)
    }
}
