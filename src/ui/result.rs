use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::attempt::format_duration_words;
use crate::models::SubmissionResult;
use crate::review::Grade;

pub fn render(frame: &mut Frame, area: Rect, result: &SubmissionResult) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], result);
    render_controls(frame, chunks[3]);
}

pub fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Pass => Color::Cyan,
        Grade::Borderline => Color::Yellow,
        Grade::Fail => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, result: &SubmissionResult) {
    let grade = Grade::from_score(result.score);
    let color = grade_color(grade);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETED",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                result.correct_count, result.total_questions, result.score
            ),
            Style::default().fg(color).bold(),
        )),
        Line::from(grade.label().fg(color)),
    ];
    if let Some(taken) = result.time_taken() {
        content.push(Line::from(""));
        content.push(Line::from(
            format!("time taken {}", format_duration_words(taken)).fg(Color::DarkGray),
        ));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("r review answers  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
