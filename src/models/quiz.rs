use serde::{Deserialize, Serialize};

use super::ids::QuizId;

/// Quiz metadata. Questions are fetched separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Time limit in seconds; `None` means untimed.
    #[serde(default, rename = "time_limit")]
    pub time_limit_secs: Option<u64>,
    /// Only admins are ever served unpublished quizzes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}
