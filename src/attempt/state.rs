use crate::models::SubmissionResult;

/// Where a failed attempt broke down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    Load,
    Submit,
}

impl AttemptFailure {
    /// The only text shown to the user; causes go to the log.
    pub fn message(&self) -> &'static str {
        match self {
            AttemptFailure::Load => "Failed to load quiz",
            AttemptFailure::Submit => "Failed to submit quiz",
        }
    }
}

/// Lifecycle of one attempt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttemptState {
    /// Nothing requested yet.
    #[default]
    Idle,

    /// Fetching quiz, creating the attempt, fetching questions.
    Loading,

    /// Answering; the countdown (if any) is running.
    InProgress,

    /// Answers sent, waiting for the score.
    Submitting,

    /// Scored by the server. Final.
    Completed(SubmissionResult),

    /// Loading or submitting failed.
    Errored(AttemptFailure),
}

impl AttemptState {
    pub fn name(&self) -> &'static str {
        match self {
            AttemptState::Idle => "idle",
            AttemptState::Loading => "loading",
            AttemptState::InProgress => "in progress",
            AttemptState::Submitting => "submitting",
            AttemptState::Completed(_) => "completed",
            AttemptState::Errored(_) => "errored",
        }
    }

    /// True while a network call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, AttemptState::Loading | AttemptState::Submitting)
    }

    /// Whether the question list can be browsed.
    pub fn can_navigate(&self) -> bool {
        matches!(self, AttemptState::InProgress | AttemptState::Submitting)
    }
}
