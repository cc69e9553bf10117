use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::attempt::AttemptState;
use crate::models::Question;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];
const LOW_TIME_SECS: u64 = 60;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let Some(question) = controller.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_progress(frame, chunks[1], app);
    render_question_text(frame, chunks[3], &question.text);
    render_options(frame, chunks[4], app, question);
    render_navigator(frame, chunks[5], app);
    render_notice(frame, chunks[6], app);
    render_controls(frame, chunks[7], app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let title = controller.quiz().map_or("", |quiz| quiz.title.as_str());

    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)]).split(area);
    frame.render_widget(
        Paragraph::new(title).fg(Color::Cyan).bold(),
        halves[0],
    );

    if let (Some(clock), Some(remaining)) =
        (controller.formatted_remaining(), controller.remaining_secs())
    {
        let color = if remaining <= LOW_TIME_SECS {
            Color::Red
        } else {
            Color::Gray
        };
        let widget = Paragraph::new(format!("time left {clock}"))
            .alignment(Alignment::Right)
            .fg(color);
        frame.render_widget(widget, halves[1]);
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let label = format!(
        "{}/{}  ·  {}",
        controller.active_index() + 1,
        controller.question_count(),
        controller.answered_label()
    );
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(controller.progress_percent().min(100))
        .label(label);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let selected = app.controller().selection(question.id);
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let under_cursor = index == app.option_cursor();
        let chosen = selected == Some(option.id);
        let style = match (under_cursor, chosen) {
            (_, true) => Style::default().fg(Color::Green).bold(),
            (true, false) => Style::default().fg(Color::Cyan).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if under_cursor { ">" } else { " " };
        let check = if chosen { "●" } else { "○" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} {check} "), style),
            Span::styled(format!("{label}. "), style),
            Span::styled(option.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

/// One cell per question: answered, unanswered, current.
fn render_navigator(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let spans: Vec<Span> = controller
        .questions()
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let answered = controller.selection(question.id).is_some();
            let mut style = if answered {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if index == controller.active_index() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Span::styled(format!(" {} ", index + 1), style)
        })
        .collect();

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match (app.notice(), submitting_banner(app)) {
        (Some(notice), _) => (notice, Color::Yellow),
        (None, Some(banner)) => (banner, Color::Magenta),
        (None, None) => return,
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(color)
        .bold();
    frame.render_widget(widget, area);
}

/// Shown in place of a notice while the answers are on their way.
fn submitting_banner(app: &App) -> Option<&'static str> {
    let controller = app.controller();
    if controller.state() != &AttemptState::Submitting {
        return None;
    }
    if controller.remaining_secs() == Some(0) {
        Some("TIME IS UP · SUBMITTING YOUR ANSWERS")
    } else {
        Some("SUBMITTING YOUR ANSWERS")
    }
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let controller = app.controller();
    let text = if controller.state() == &AttemptState::Submitting {
        "h/l question  ·  1-9 jump  ·  answers are locked until the score arrives"
    } else if controller.all_answered() {
        "h/l question  ·  j/k option  ·  enter select  ·  s submit  ·  q quit"
    } else {
        "h/l question  ·  j/k option  ·  enter select  ·  1-9 jump  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
