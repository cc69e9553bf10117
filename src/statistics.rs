//! User statistics as printable tables.

use std::time::Duration;

use comfy_table::{Cell, Table};

use crate::attempt::format_duration_words;
use crate::models::{LeaderboardEntry, UserStatistics};

/// Attempt counts, scores and accuracy for the session's user.
pub fn summary_table(statistics: &UserStatistics) -> Table {
    let quizzes = &statistics.stats.quizzes;
    let progress = &statistics.stats.progress;

    let mut table = Table::new();
    table.set_header(vec!["Statistic", "Value"]);
    let rows = [
        ("Attempted", quizzes.attempted.to_string()),
        ("Completed", quizzes.completed.to_string()),
        ("In progress", quizzes.in_progress.to_string()),
        ("Average score", format!("{:.0}%", quizzes.average_score)),
        ("Best score", format!("{:.0}%", quizzes.best_score)),
        (
            "Time spent",
            format_duration_words(Duration::from_secs(quizzes.total_time_secs)),
        ),
        (
            "Correct answers",
            format!("{}/{}", progress.correct_answers, progress.total_questions),
        ),
        ("Accuracy", format!("{:.0}%", progress.accuracy)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }

    table
}

/// Ranked by accuracy; `you` marks the session's user.
pub fn leaderboard_table(statistics: &UserStatistics) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Rank", "Name", "Accuracy"]);

    for (rank, entry) in statistics.stats.leaderboard.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(leaderboard_name(entry, statistics)),
            Cell::new(format!("{:.1}%", entry.accuracy)),
        ]);
    }

    table
}

fn leaderboard_name(entry: &LeaderboardEntry, statistics: &UserStatistics) -> String {
    let name = entry.name.as_deref().unwrap_or("anonymous");
    if statistics.user_id == Some(entry.user_id) {
        format!("{name} (you)")
    } else {
        name.to_string()
    }
}

/// Average score and accuracy per subject; `None` when nothing was attempted.
pub fn subject_table(statistics: &UserStatistics) -> Option<Table> {
    let subjects = &statistics.stats.quizzes.subject_performance;
    if subjects.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Attempts", "Average", "Accuracy"]);
    for subject in subjects {
        table.add_row(vec![
            Cell::new(&subject.subject),
            Cell::new(subject.attempts),
            Cell::new(format!("{:.0}%", subject.average_score)),
            Cell::new(format!("{:.0}%", subject.accuracy)),
        ]);
    }
    Some(table)
}
