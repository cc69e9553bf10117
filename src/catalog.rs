//! Quiz catalog as a printable table.

use comfy_table::{Cell, Table};

use crate::attempt::format_clock;
use crate::models::Quiz;

pub fn time_limit_label(quiz: &Quiz) -> String {
    quiz.time_limit_secs.map_or_else(|| "untimed".to_string(), format_clock)
}

pub fn quiz_table(quizzes: &[Quiz]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Quiz", "Title", "Time limit", "Description"]);

    for quiz in quizzes {
        let mut title = quiz.title.clone();
        if quiz.is_published == Some(false) {
            title.push_str(" (draft)");
        }
        table.add_row(vec![
            Cell::new(quiz.id),
            Cell::new(title),
            Cell::new(time_limit_label(quiz)),
            Cell::new(quiz.description.as_deref().unwrap_or("-")),
        ]);
    }

    table
}
