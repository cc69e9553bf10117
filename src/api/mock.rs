//! Scriptable in-memory quiz service for tests and offline demos.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::models::{
    AnswerSubmission, AnsweredQuestion, AttemptId, AttemptRecord, AttemptSummary, Credentials,
    LoginResponse, OptionId, Question, QuestionId, QuestionOption, Quiz, QuizId, QuizStatistics,
    Registration, StartedAttempt, StatisticsDetail, SubmissionResult, UserId, UserStatistics,
};

use super::client::QuizApi;
use super::error::ApiError;

/// Identifies one operation of [`QuizApi`] for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListQuizzes,
    GetQuiz,
    StartAttempt,
    GetQuestions,
    SubmitAttempt,
    GetAttempt,
    GetAttemptAnswers,
    ListAttempts,
    UserStatistics,
    Login,
    Register,
}

/// A mock quiz service holding one quiz.
///
/// Scores submissions the way the real service does: percentage of the
/// quiz's questions answered with an option flagged correct.
pub struct MockQuizApi {
    quiz: Quiz,
    /// Questions with correctness flags; stripped when served for an attempt.
    questions: Vec<Question>,
    attempt_id: AttemptId,
    time_limit_secs: Option<u64>,
    history: Vec<AttemptSummary>,
    failures: Mutex<HashMap<Endpoint, VecDeque<ApiError>>>,
    calls: Mutex<HashMap<Endpoint, u32>>,
    submissions: Mutex<Vec<Vec<AnswerSubmission>>>,
    completed: Mutex<Option<Vec<AnswerSubmission>>>,
}

impl MockQuizApi {
    pub fn new(quiz: Quiz, questions: Vec<Question>) -> Self {
        Self {
            time_limit_secs: quiz.time_limit_secs,
            quiz,
            questions,
            attempt_id: AttemptId::new(1),
            history: Vec::new(),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            completed: Mutex::new(None),
        }
    }

    /// A quiz of `question_count` questions with three options each.
    ///
    /// Question `n` has id `n` and options `10n+1..=10n+3`; the first
    /// option is the correct one.
    pub fn sample(question_count: usize, time_limit_secs: Option<u64>) -> Self {
        let quiz = Quiz {
            id: QuizId::new(1),
            title: "Sample quiz".to_string(),
            description: None,
            time_limit_secs,
            is_published: Some(true),
        };
        let questions = (1..=question_count as i64)
            .map(|n| Question {
                id: QuestionId::new(n),
                text: format!("Question {n}"),
                options: (1..=3)
                    .map(|k| QuestionOption {
                        id: OptionId::new(n * 10 + k),
                        text: format!("Option {k}"),
                        is_correct: Some(k == 1),
                    })
                    .collect(),
                explanation: Some(format!("Option 1 is right for question {n}.")),
            })
            .collect();
        Self::new(quiz, questions)
    }

    /// Overrides the limit returned by `start_attempt`.
    pub fn with_attempt_time_limit(mut self, time_limit_secs: Option<u64>) -> Self {
        self.time_limit_secs = time_limit_secs;
        self
    }

    pub fn with_history(mut self, history: Vec<AttemptSummary>) -> Self {
        self.history = history;
        self
    }

    /// Makes the next call to `endpoint` fail with `error`. Queued failures
    /// are consumed one per call.
    pub fn fail_next(&self, endpoint: Endpoint, error: ApiError) {
        lock(&self.failures)
            .entry(endpoint)
            .or_default()
            .push_back(error);
    }

    pub fn call_count(&self, endpoint: Endpoint) -> u32 {
        lock(&self.calls).get(&endpoint).copied().unwrap_or(0)
    }

    /// Every answer list received by `submit_attempt`, successful or not.
    pub fn submissions(&self) -> Vec<Vec<AnswerSubmission>> {
        lock(&self.submissions).clone()
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn record(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        *lock(&self.calls).entry(endpoint).or_insert(0) += 1;
        match lock(&self.failures).get_mut(&endpoint).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn completed_answers(&self) -> Option<Vec<AnswerSubmission>> {
        lock(&self.completed).clone()
    }

    fn score(&self, answers: &[AnswerSubmission]) -> (u32, f64) {
        let correct = answers
            .iter()
            .filter(|answer| {
                self.questions
                    .iter()
                    .find(|q| q.id == answer.question_id)
                    .and_then(|q| q.option(answer.option_id))
                    .is_some_and(QuestionOption::is_correct)
            })
            .count() as u32;
        let total = self.questions.len() as u32;
        let score = if total > 0 {
            f64::from(correct) / f64::from(total) * 100.0
        } else {
            0.0
        };
        (correct, score)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl QuizApi for MockQuizApi {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, ApiError> {
        self.record(Endpoint::ListQuizzes)?;
        Ok(vec![self.quiz.clone()])
    }

    async fn get_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        self.record(Endpoint::GetQuiz)?;
        if quiz_id != self.quiz.id {
            return Err(ApiError::NotFound("Quiz not found".to_string()));
        }
        Ok(self.quiz.clone())
    }

    async fn start_attempt(&self, quiz_id: QuizId) -> Result<StartedAttempt, ApiError> {
        self.record(Endpoint::StartAttempt)?;
        if quiz_id != self.quiz.id {
            return Err(ApiError::NotFound("Quiz not found".to_string()));
        }
        Ok(StartedAttempt {
            attempt_id: self.attempt_id,
            time_limit_secs: self.time_limit_secs,
        })
    }

    async fn get_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ApiError> {
        self.record(Endpoint::GetQuestions)?;
        if quiz_id != self.quiz.id {
            return Err(ApiError::NotFound("Quiz not found".to_string()));
        }
        let served = self
            .questions
            .iter()
            .cloned()
            .map(|mut question| {
                question.explanation = None;
                for option in &mut question.options {
                    option.is_correct = None;
                }
                question
            })
            .collect();
        Ok(served)
    }

    async fn submit_attempt(
        &self,
        attempt_id: AttemptId,
        answers: &[AnswerSubmission],
    ) -> Result<SubmissionResult, ApiError> {
        lock(&self.submissions).push(answers.to_vec());
        self.record(Endpoint::SubmitAttempt)?;
        if attempt_id != self.attempt_id {
            return Err(ApiError::NotFound("Attempt not found".to_string()));
        }
        {
            let mut completed = lock(&self.completed);
            if completed.is_some() {
                return Err(ApiError::Validation(
                    "This attempt has already been completed".to_string(),
                ));
            }
            *completed = Some(answers.to_vec());
        }
        let (correct_count, score) = self.score(answers);
        Ok(SubmissionResult {
            score,
            correct_count,
            total_questions: self.questions.len() as u32,
            started_at: None,
            completed_at: None,
        })
    }

    async fn get_attempt(&self, attempt_id: AttemptId) -> Result<AttemptRecord, ApiError> {
        self.record(Endpoint::GetAttempt)?;
        if attempt_id != self.attempt_id {
            return Err(ApiError::NotFound("Attempt not found".to_string()));
        }
        let score = self.completed_answers().map(|answers| self.score(&answers).1);
        Ok(AttemptRecord {
            id: self.attempt_id,
            user_id: Some(UserId::new(1)),
            quiz_id: self.quiz.id,
            score,
            started_at: None,
            completed_at: None,
            time_taken: None,
        })
    }

    async fn get_attempt_answers(
        &self,
        attempt_id: AttemptId,
    ) -> Result<Vec<AnsweredQuestion>, ApiError> {
        self.record(Endpoint::GetAttemptAnswers)?;
        if attempt_id != self.attempt_id {
            return Err(ApiError::NotFound("Attempt not found".to_string()));
        }
        let answers = self.completed_answers().unwrap_or_default();
        Ok(self
            .questions
            .iter()
            .map(|question| AnsweredQuestion {
                id: question.id,
                text: question.text.clone(),
                options: question.options.clone(),
                selected_option_id: answers
                    .iter()
                    .find(|answer| answer.question_id == question.id)
                    .map(|answer| answer.option_id),
                explanation: question.explanation.clone(),
            })
            .collect())
    }

    async fn list_attempts(&self) -> Result<Vec<AttemptSummary>, ApiError> {
        self.record(Endpoint::ListAttempts)?;
        Ok(self.history.clone())
    }

    /// Derived from the configured history.
    async fn user_statistics(&self) -> Result<UserStatistics, ApiError> {
        self.record(Endpoint::UserStatistics)?;
        let completed: Vec<&AttemptSummary> =
            self.history.iter().filter(|a| a.is_completed()).collect();
        let scores: Vec<f64> = completed.iter().filter_map(|a| a.score).collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            (scores.iter().sum::<f64>() / scores.len() as f64).round()
        };
        let best_score = scores.iter().copied().fold(0.0, f64::max).round();
        let total_time_secs = completed
            .iter()
            .filter_map(|a| a.time_taken())
            .map(|taken| taken.as_secs())
            .sum();

        Ok(UserStatistics {
            user_id: Some(UserId::new(1)),
            user_name: None,
            stats: StatisticsDetail {
                quizzes: QuizStatistics {
                    attempted: self.history.len() as u32,
                    completed: completed.len() as u32,
                    in_progress: (self.history.len() - completed.len()) as u32,
                    average_score,
                    best_score,
                    total_time_secs,
                    ..QuizStatistics::default()
                },
                ..StatisticsDetail::default()
            },
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record(Endpoint::Login)?;
        if credentials.password.is_empty() {
            return Err(ApiError::Validation("Invalid input".to_string()));
        }
        Ok(LoginResponse {
            token: "mock-token".to_string(),
            email: credentials.email.clone(),
            role: "user".to_string(),
            id: UserId::new(1),
            full_name: None,
        })
    }

    async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.record(Endpoint::Register)?;
        registration
            .validate()
            .map_err(|reason| ApiError::Validation(reason.to_string()))
    }
}
