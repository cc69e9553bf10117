use std::sync::Arc;

use crossterm::event::KeyCode;
use tracing::debug;

use crate::api::QuizApi;
use crate::attempt::{AttemptController, AttemptError, AttemptFailure, AttemptState};
use crate::models::{AttemptId, Question, QuizId};
use crate::review::{AttemptReview, LOAD_FAILED};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    Review(AttemptId),
}

/// Screen state for taking one quiz.
pub struct App {
    controller: AttemptController,
    quiz_id: QuizId,
    option_cursor: usize,
    notice: Option<String>,
}

impl App {
    pub fn new(api: Arc<dyn QuizApi>, quiz_id: QuizId) -> Self {
        Self {
            controller: AttemptController::new(api),
            quiz_id,
            option_cursor: 0,
            notice: None,
        }
    }

    /// Kicks off loading. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<(), AttemptError> {
        self.controller.start(self.quiz_id)
    }

    pub fn controller(&self) -> &AttemptController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AttemptController {
        &mut self.controller
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Applies queued controller events. Returns true if anything changed.
    pub fn tick(&mut self) -> bool {
        let was_in_progress = self.controller.state() == &AttemptState::InProgress;
        let handled = self.controller.process_pending();
        if was_in_progress != (self.controller.state() == &AttemptState::InProgress) {
            self.sync_cursor();
        }
        handled > 0
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Flow {
        self.notice = None;
        if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
            return self.request_quit();
        }

        match self.controller.state().clone() {
            AttemptState::InProgress | AttemptState::Submitting => self.handle_attempt_key(key),
            AttemptState::Errored(AttemptFailure::Load) => {
                if matches!(key, KeyCode::Char('r') | KeyCode::Char('R')) {
                    let started = self.controller.start(self.quiz_id);
                    self.report(started);
                }
            }
            AttemptState::Errored(AttemptFailure::Submit) => {
                if matches!(key, KeyCode::Char('s') | KeyCode::Char('S')) {
                    let submitted = self.controller.submit().map(|_| ());
                    self.report(submitted);
                }
            }
            AttemptState::Completed(_) => {
                if let (KeyCode::Char('r') | KeyCode::Char('R'), Some(attempt_id)) =
                    (key, self.controller.attempt_id())
                {
                    return Flow::Review(attempt_id);
                }
            }
            AttemptState::Idle | AttemptState::Loading => {}
        }
        Flow::Continue
    }

    /// Quitting drops the runtime, so it waits for any outstanding call.
    fn request_quit(&mut self) -> Flow {
        match self.controller.state() {
            AttemptState::Submitting => {
                self.notice =
                    Some("Wait for the submission to finish before quitting".to_string());
                Flow::Continue
            }
            AttemptState::Loading => {
                self.notice = Some("Wait for the quiz to load before quitting".to_string());
                Flow::Continue
            }
            _ => Flow::Quit,
        }
    }

    fn handle_attempt_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left | KeyCode::Char('h') => {
                let moved = self.controller.previous().map(|_| ());
                self.report(moved);
                self.sync_cursor();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let moved = self.controller.next().map(|_| ());
                self.report(moved);
                self.sync_cursor();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as isize - '1' as isize;
                let moved = self.controller.go_to_question(index).map(|_| ());
                self.report(moved);
                self.sync_cursor();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let count = self.option_count();
                if count > 0 {
                    self.option_cursor = (self.option_cursor + count - 1) % count;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.option_count();
                if count > 0 {
                    self.option_cursor = (self.option_cursor + 1) % count;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select_at_cursor(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.request_submit(),
            _ => {}
        }
    }

    fn select_at_cursor(&mut self) {
        let Some((question_id, option_id)) = self
            .current_question()
            .and_then(|q| q.options.get(self.option_cursor).map(|o| (q.id, o.id)))
        else {
            return;
        };
        let selected = self.controller.select_answer(question_id, option_id);
        self.report(selected);
    }

    fn request_submit(&mut self) {
        if self.controller.state() != &AttemptState::InProgress {
            return;
        }
        if !self.controller.all_answered() {
            self.notice = Some(format!(
                "Answer every question before submitting ({})",
                self.controller.answered_label()
            ));
            return;
        }
        let submitted = self.controller.submit().map(|_| ());
        self.report(submitted);
    }

    fn current_question(&self) -> Option<&Question> {
        self.controller.current_question()
    }

    fn option_count(&self) -> usize {
        self.current_question().map_or(0, |q| q.options.len())
    }

    /// Puts the cursor on the current question's selected option, or the top.
    fn sync_cursor(&mut self) {
        self.option_cursor = self
            .current_question()
            .and_then(|q| {
                self.controller
                    .selection(q.id)
                    .and_then(|option_id| q.option_index(option_id))
            })
            .unwrap_or(0);
    }

    fn report(&mut self, outcome: Result<(), AttemptError>) {
        if let Err(e) = outcome {
            debug!(error = %e, "key ignored");
            self.notice = Some(e.to_string());
        }
    }
}

/// Screen state for reviewing a finished attempt.
pub struct ReviewScreen {
    review: Option<AttemptReview>,
    scroll: usize,
}

impl ReviewScreen {
    pub fn loaded(review: AttemptReview) -> Self {
        Self {
            review: Some(review),
            scroll: 0,
        }
    }

    pub fn failed() -> Self {
        Self {
            review: None,
            scroll: 0,
        }
    }

    pub fn review(&self) -> Option<&AttemptReview> {
        self.review.as_ref()
    }

    /// Only set when loading failed.
    pub fn error_message(&self) -> Option<&'static str> {
        self.review.is_none().then_some(LOAD_FAILED)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Returns true if the screen should close.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        let max_scroll = self.review.as_ref().map_or(0, |r| r.total().saturating_sub(1));
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(max_scroll);
                false
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            _ => false,
        }
    }
}
