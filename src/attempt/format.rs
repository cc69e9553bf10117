//! Presentation helpers for attempt progress.

use std::time::Duration;

/// `minutes:seconds`, seconds zero-padded: 65 → `1:05`.
pub fn format_clock(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// round(100 × (active_index + 1) / question_count); 0 for an empty quiz.
pub fn progress_percent(active_index: usize, question_count: usize) -> u16 {
    if question_count == 0 {
        return 0;
    }
    let position = (active_index + 1).min(question_count) as f64;
    (100.0 * position / question_count as f64).round() as u16
}

/// Long form used on result screens: "1 minute 5 seconds".
pub fn format_duration_words(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let (minutes, seconds) = (total / 60, total % 60);
    match minutes {
        0 => format!("{seconds} seconds"),
        1 => format!("1 minute {seconds} seconds"),
        _ => format!("{minutes} minutes {seconds} seconds"),
    }
}
