mod attempt;
mod result;
mod review;
mod status;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, ReviewScreen};
use crate::attempt::{AttemptFailure, AttemptState};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let controller = app.controller();
    match controller.state() {
        AttemptState::Idle | AttemptState::Loading => {
            status::render_busy(frame, area, "LOADING QUIZ")
        }
        AttemptState::InProgress | AttemptState::Submitting => attempt::render(frame, area, app),
        AttemptState::Completed(result) => result::render(frame, area, result),
        AttemptState::Errored(failure) => {
            let hint = match failure {
                AttemptFailure::Load => "r retry  ·  q quit",
                AttemptFailure::Submit => "s submit again  ·  q quit",
            };
            status::render_error(frame, area, failure.message(), hint)
        }
    }
}

pub fn render_review(frame: &mut Frame, screen: &ReviewScreen) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);
    review::render(frame, area, screen);
}
