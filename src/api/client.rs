//! The contract between the attempt flow and the quiz service.

use async_trait::async_trait;

use crate::models::{
    AnswerSubmission, AnsweredQuestion, AttemptId, AttemptRecord, AttemptSummary, Credentials,
    LoginResponse, Question, Quiz, QuizId, Registration, StartedAttempt, SubmissionResult,
    UserStatistics,
};

use super::error::ApiError;

/// Operations the client needs from the remote quiz service.
///
/// Implemented over HTTP by [`HttpQuizApi`](super::HttpQuizApi) and by
/// [`MockQuizApi`](super::MockQuizApi) for tests.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// Quizzes visible to the session's user; published ones only for non-admins.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError>;

    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError>;

    /// Creates a new attempt; the reply carries the authoritative time limit.
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ApiError>;

    /// Questions in display order.
    async fn get_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ApiError>;

    /// Completes the attempt. Unanswered questions are simply absent.
    async fn submit_attempt(
        &self,
        attempt_id: AttemptId,
        answers: &[AnswerSubmission],
    ) -> Result<SubmissionResult, ApiError>;

    async fn get_attempt(&self, attempt_id: AttemptId) -> Result<AttemptRecord, ApiError>;

    async fn get_attempt_answers(
        &self,
        attempt_id: AttemptId,
    ) -> Result<Vec<AnsweredQuestion>, ApiError>;

    async fn list_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError>;

    async fn user_statistics(&self) -> Result<UserStatistics, ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<(), ApiError>;
}
