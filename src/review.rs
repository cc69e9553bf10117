//! Read-only results of a finished attempt.

use std::time::Duration;

use tracing::{error, instrument};

use crate::api::{ApiError, QuizApi};
use crate::attempt::format_duration_words;
use crate::models::{AnsweredQuestion, AttemptId, AttemptRecord};

/// Minimum score, in percent, that counts as a pass.
pub const PASS_THRESHOLD: f64 = 70.0;

/// Shown when a review cannot be fetched; the cause is logged.
pub const LOAD_FAILED: &str = "Failed to load quiz results";

/// Score band of a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Pass,
    Borderline,
    Fail,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::Excellent
        } else if score >= PASS_THRESHOLD {
            Grade::Pass
        } else if score >= 50.0 {
            Grade::Borderline
        } else {
            Grade::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Pass => "Passed",
            Grade::Borderline => "Almost there",
            Grade::Fail => "Failed",
        }
    }
}

/// An attempt together with every question and the user's pick.
///
/// Correctness comes from the selected option's flag only.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReview {
    pub attempt: AttemptRecord,
    pub questions: Vec<AnsweredQuestion>,
}

impl AttemptReview {
    pub fn new(attempt: AttemptRecord, questions: Vec<AnsweredQuestion>) -> Self {
        Self { attempt, questions }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }

    /// Answered, but not with the correct option.
    pub fn incorrect_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.is_answered() && !q.is_correct())
            .count()
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.iter().filter(|q| !q.is_answered()).count()
    }

    /// Server score when present, else computed from the questions.
    pub fn score(&self) -> f64 {
        match self.attempt.score {
            Some(score) => score,
            None if self.total() == 0 => 0.0,
            None => self.correct_count() as f64 / self.total() as f64 * 100.0,
        }
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score())
    }

    pub fn passed(&self) -> bool {
        self.score() >= PASS_THRESHOLD
    }

    pub fn time_taken(&self) -> Option<Duration> {
        self.attempt.time_taken()
    }

    pub fn formatted_time_taken(&self) -> Option<String> {
        self.time_taken().map(format_duration_words)
    }
}

/// Fetches the attempt and its answered questions.
#[instrument(skip_all, fields(attempt_id = %attempt_id))]
pub async fn load_review(
    api: &dyn QuizApi,
    attempt_id: AttemptId,
) -> Result<AttemptReview, ApiError> {
    let fetched = async {
        let attempt = api.get_attempt(attempt_id).await?;
        let questions = api.get_attempt_answers(attempt_id).await?;
        Ok::<_, ApiError>(AttemptReview::new(attempt, questions))
    }
    .await;

    if let Err(e) = &fetched {
        error!(error = %e, "failed to load attempt review");
    }
    fetched
}
