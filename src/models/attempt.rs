use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AttemptId, OptionId, QuestionId, QuizId, UserId};
use super::question::QuestionOption;
use super::timestamp;

/// Server reply to starting an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartedAttempt {
    pub attempt_id: AttemptId,
    /// Authoritative limit for this attempt, in seconds.
    #[serde(default, rename = "time_limit")]
    pub time_limit_secs: Option<u64>,
}

/// One answered question in a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: QuestionId,
    pub option_id: OptionId,
}

/// Request body for completing an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSubmission {
    pub answers: Vec<AnswerSubmission>,
}

/// Server reply to a completed submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Percentage, 0..=100.
    pub score: f64,
    pub correct_count: u32,
    pub total_questions: u32,
    #[serde(default, with = "timestamp::optional")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::optional")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SubmissionResult {
    pub fn time_taken(&self) -> Option<Duration> {
        elapsed(self.started_at, self.completed_at)
    }
}

/// Stored attempt as returned by the attempt resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub id: AttemptId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub quiz_id: QuizId,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, with = "timestamp::optional")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::optional")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Seconds, when the server computes it.
    #[serde(default)]
    pub time_taken: Option<f64>,
}

impl AttemptRecord {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn time_taken(&self) -> Option<Duration> {
        match self.time_taken {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Some(Duration::from_secs_f64(secs)),
            _ => elapsed(self.started_at, self.completed_at),
        }
    }
}

/// Entry of the user's attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub attempt_id: AttemptId,
    pub quiz_id: QuizId,
    #[serde(default)]
    pub quiz_title: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, with = "timestamp::optional")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::optional")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl AttemptSummary {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn time_taken(&self) -> Option<Duration> {
        elapsed(self.started_at, self.completed_at)
    }
}

/// A question of a finished attempt together with what the user picked.
///
/// Correctness is always derived from the option flags; a server-side
/// `is_correct` on the question itself is not trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub id: QuestionId,
    pub text: String,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub selected_option_id: Option<OptionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl AnsweredQuestion {
    pub fn is_answered(&self) -> bool {
        self.selected_option_id.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.selected_option()
            .is_some_and(QuestionOption::is_correct)
    }

    pub fn selected_option(&self) -> Option<&QuestionOption> {
        let selected = self.selected_option_id?;
        self.options.iter().find(|option| option.id == selected)
    }

    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.is_correct())
    }
}

fn elapsed(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Option<Duration> {
    (end? - start?).to_std().ok()
}
