mod attempt;
mod auth;
mod ids;
mod question;
mod quiz;
mod stats;
pub mod timestamp;

pub use attempt::{
    AnswerSubmission, AnsweredQuestion, AttemptRecord, AttemptSubmission, AttemptSummary,
    StartedAttempt, SubmissionResult,
};
pub use auth::{Credentials, LoginResponse, Registration};
pub use ids::{AttemptId, OptionId, QuestionId, QuizId, UserId};
pub use question::{Question, QuestionOption};
pub use quiz::Quiz;
pub use stats::{
    LeaderboardEntry, ProgressStatistics, QuizStatistics, ScorePoint, StatisticsDetail,
    SubjectPerformance, UserStatistics,
};
