use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::ReviewScreen;
use crate::models::AnsweredQuestion;
use crate::review::AttemptReview;

use super::result::grade_color;
use super::status;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, screen: &ReviewScreen) {
    let Some(review) = screen.review() else {
        let message = screen.error_message().unwrap_or_default();
        status::render_error(frame, area, message, "q quit");
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[0], review);
    render_questions(frame, chunks[2], review, screen.scroll());
    render_controls(frame, chunks[3]);
}

fn render_summary(frame: &mut Frame, area: Rect, review: &AttemptReview) {
    let grade = review.grade();
    let color = grade_color(grade);
    let verdict = if review.passed() { "PASSED" } else { "NOT PASSED" };

    let mut content = vec![
        Line::from(Span::styled(
            "REVIEW",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("{:.0}%  ·  {}  ·  {}", review.score(), grade.label(), verdict),
            Style::default().fg(color).bold(),
        )),
        Line::from(vec![
            Span::styled(format!("{} correct", review.correct_count()), Color::Green),
            Span::raw("  ·  "),
            Span::styled(format!("{} incorrect", review.incorrect_count()), Color::Red),
            Span::raw("  ·  "),
            Span::styled(
                format!("{} unanswered", review.unanswered_count()),
                Color::DarkGray,
            ),
        ]),
    ];
    if let Some(taken) = review.formatted_time_taken() {
        content.push(Line::from(format!("time taken {taken}").fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_questions(frame: &mut Frame, area: Rect, review: &AttemptReview, scroll: usize) {
    let lines: Vec<Line> = review
        .questions
        .iter()
        .enumerate()
        .skip(scroll)
        .flat_map(|(index, question)| question_lines(index, question))
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn question_lines(index: usize, question: &AnsweredQuestion) -> Vec<Line<'_>> {
    let (symbol, color) = match (question.is_answered(), question.is_correct()) {
        (_, true) => ("+", Color::Green),
        (true, false) => ("-", Color::Red),
        (false, _) => ("?", Color::DarkGray),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {symbol} "), Style::default().fg(color)),
        Span::styled(
            format!("{:2}. ", index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(truncate_question(&question.text), Style::default().fg(Color::Gray)),
    ])];

    let picked = question
        .selected_option()
        .map_or("no answer", |option| option.text.as_str());
    lines.push(Line::from(vec![
        Span::raw("      your answer: ").fg(Color::DarkGray),
        Span::styled(picked, Style::default().fg(color)),
    ]));
    if !question.is_correct() {
        if let Some(correct) = question.correct_option() {
            lines.push(Line::from(vec![
                Span::raw("      correct: ").fg(Color::DarkGray),
                Span::styled(correct.text.as_str(), Style::default().fg(Color::Green)),
            ]));
        }
    }
    if let Some(explanation) = &question.explanation {
        lines.push(Line::from(
            Span::raw(format!("      {explanation}")).fg(Color::DarkGray).italic(),
        ));
    }
    lines.push(Line::from(""));
    lines
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
