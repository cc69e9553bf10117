//! Centered one-box screens: loading, submitting and failures.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render_busy(frame: &mut Frame, area: Rect, title: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("please wait".fg(Color::DarkGray)),
    ];
    render_box(frame, area, content, 6);
}

pub fn render_error(frame: &mut Frame, area: Rect, message: &str, hint: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(hint.to_string().fg(Color::DarkGray)),
    ];
    render_box(frame, area, content, 6);
}

fn render_box(frame: &mut Frame, area: Rect, content: Vec<Line>, height: u16) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
}
