//! Attempt history as a printable table.

use comfy_table::{Cell, Table};

use crate::models::AttemptSummary;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn status(summary: &AttemptSummary) -> &'static str {
    if summary.is_completed() {
        "completed"
    } else {
        "in progress"
    }
}

pub fn history_table(attempts: &[AttemptSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Attempt", "Quiz", "Score", "Started", "Status"]);

    for attempt in attempts {
        let score = attempt
            .score
            .filter(|_| attempt.is_completed())
            .map_or_else(|| "-".to_string(), |score| format!("{score:.1}%"));
        let started = attempt
            .started_at
            .map_or_else(|| "-".to_string(), |at| at.format(TIME_FORMAT).to_string());

        table.add_row(vec![
            Cell::new(attempt.attempt_id),
            Cell::new(&attempt.quiz_title),
            Cell::new(score),
            Cell::new(started),
            Cell::new(status(attempt)),
        ]);
    }

    table
}
