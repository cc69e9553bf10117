//! HTTP implementation of [`QuizApi`].

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::models::{
    AnswerSubmission, AnsweredQuestion, AttemptId, AttemptRecord, AttemptSubmission,
    AttemptSummary, Credentials, LoginResponse, Question, Quiz, QuizId, Registration,
    StartedAttempt, SubmissionResult, UserStatistics,
};

use super::client::QuizApi;
use super::error::ApiError;
use super::session::Session;

/// Header the quiz service reads the session token from.
pub const AUTH_HEADER: &str = "Authentication-Token";

/// Quiz service client over HTTP/JSON.
pub struct HttpQuizApi {
    session: Session,
    client: reqwest::Client,
}

impl HttpQuizApi {
    pub fn new(session: Session) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(session.timeout())
            .build()?;

        Ok(Self { session, client })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        self.authorized(self.client.get(self.session.url(path)))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ApiError::Unauthorized("no session token, log in first".to_string()))?;
        Ok(request.header(AUTH_HEADER, token))
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "quiz service replied");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status.as_u16(), &body));
    }

    Ok(response.json::<T>().await?)
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    #[instrument(skip(self))]
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        execute(self.get("/api/quizzes")?).await
    }

    #[instrument(skip_all, fields(quiz_id = %quiz_id))]
    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        execute(self.get(&format!("/api/quizzes/{quiz_id}"))?).await
    }

    #[instrument(skip_all, fields(quiz_id = %quiz_id))]
    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ApiError> {
        let url = self.session.url(&format!("/api/quizzes/{quiz_id}/attempt"));
        let request = self.authorized(self.client.post(url).json(&serde_json::json!({})))?;
        execute(request).await
    }

    #[instrument(skip_all, fields(quiz_id = %quiz_id))]
    async fn get_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ApiError> {
        execute(self.get(&format!("/api/quizzes/{quiz_id}/questions"))?).await
    }

    #[instrument(skip_all, fields(attempt_id = %attempt_id, answered = answers.len()))]
    async fn submit_attempt(
        &self,
        attempt_id: AttemptId,
        answers: &[AnswerSubmission],
    ) -> Result<SubmissionResult, ApiError> {
        let body = AttemptSubmission {
            answers: answers.to_vec(),
        };
        let url = self.session.url(&format!("/api/attempts/{attempt_id}"));
        let request = self.authorized(self.client.put(url).json(&body))?;
        execute(request).await
    }

    #[instrument(skip_all, fields(attempt_id = %attempt_id))]
    async fn get_attempt(&self, attempt_id: AttemptId) -> Result<AttemptRecord, ApiError> {
        execute(self.get(&format!("/api/attempts/{attempt_id}"))?).await
    }

    #[instrument(skip_all, fields(attempt_id = %attempt_id))]
    async fn get_attempt_answers(
        &self,
        attempt_id: AttemptId,
    ) -> Result<Vec<AnsweredQuestion>, ApiError> {
        execute(self.get(&format!("/api/attempts/{attempt_id}/answers"))?).await
    }

    #[instrument(skip(self))]
    async fn list_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        execute(self.get("/api/user/attempts")?).await
    }

    #[instrument(skip(self))]
    async fn user_statistics(&self) -> Result<UserStatistics, ApiError> {
        execute(self.get("/api/user/statistics")?).await
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .post(self.session.url("/login"))
            .json(credentials);
        execute(request).await
    }

    #[instrument(skip_all, fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.session.url("/register"))
            .json(registration);
        execute::<serde_json::Value>(request).await.map(|_| ())
    }
}
