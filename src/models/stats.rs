use serde::{Deserialize, Serialize};

use super::ids::{QuizId, UserId};

/// Reply of the user statistics resource.
///
/// Every block is optional on the wire; missing parts read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub stats: StatisticsDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsDetail {
    /// Top users by accuracy, best first.
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub quizzes: QuizStatistics,
    #[serde(default)]
    pub progress: ProgressStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    /// Percentage of answered questions that were correct.
    #[serde(default)]
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizStatistics {
    pub attempted: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub average_score: f64,
    pub best_score: f64,
    /// Seconds spent across completed attempts.
    #[serde(rename = "totalTime")]
    pub total_time_secs: u64,
    /// Last completed attempts, oldest first.
    pub score_history: Vec<ScorePoint>,
    pub subject_performance: Vec<SubjectPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub score: f64,
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPerformance {
    pub subject: String,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressStatistics {
    pub total_questions: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nested_camel_case_blocks() {
        let parsed: UserStatistics = serde_json::from_value(serde_json::json!({
            "user_id": 4,
            "user_name": "Ada",
            "stats": {
                "leaderboard": [{"user_id": 4, "name": "Ada", "accuracy": 87.5}],
                "quizzes": {
                    "attempted": 5,
                    "completed": 4,
                    "inProgress": 1,
                    "averageScore": 71,
                    "bestScore": 90,
                    "totalTime": 1830,
                    "scoreHistory": [
                        {"quiz_id": 2, "quiz_title": "Ownership", "score": 90, "date": "2024-03-05"}
                    ],
                    "subjectPerformance": [
                        {"subject": "Rust", "average_score": 71, "attempts": 4, "accuracy": 75}
                    ],
                    "recentAttempts": [{"id": 9, "score": "N/A"}]
                },
                "progress": {
                    "totalQuestions": 40,
                    "correctAnswers": 30,
                    "accuracy": 75,
                    "monthlyActivity": [{"month": "Mar", "count": 5}]
                },
                "achievements": {"totalEarned": 0, "recent": [], "list": []}
            }
        }))
        .unwrap();

        assert_eq!(parsed.user_name.as_deref(), Some("Ada"));
        let quizzes = &parsed.stats.quizzes;
        assert_eq!(quizzes.in_progress, 1);
        assert_eq!(quizzes.best_score, 90.0);
        assert_eq!(quizzes.total_time_secs, 1830);
        assert_eq!(quizzes.score_history[0].quiz_id, QuizId::new(2));
        assert_eq!(quizzes.subject_performance[0].attempts, 4);
        assert_eq!(parsed.stats.progress.correct_answers, 30);
        assert_eq!(parsed.stats.leaderboard[0].accuracy, 87.5);
    }

    #[test]
    fn missing_blocks_read_as_empty() {
        let parsed: UserStatistics =
            serde_json::from_value(serde_json::json!({"user_id": 4, "stats": {}})).unwrap();
        assert!(parsed.stats.leaderboard.is_empty());
        assert_eq!(parsed.stats.quizzes, QuizStatistics::default());
        assert_eq!(parsed.stats.progress.total_questions, 0);
    }
}
