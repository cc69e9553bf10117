//! # quizmaster-client
//!
//! Terminal client for a remote quiz service. Scoring, authentication and
//! storage live on the server; this crate drives one timed attempt at a time
//! and shows the results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quizmaster_client::api::{HttpQuizApi, Session};
//! use quizmaster_client::models::QuizId;
//! use quizmaster_client::QuizError;
//!
//! # async fn run() -> Result<(), QuizError> {
//! let session = Session::new("http://localhost:5000").with_token("token");
//! let api = Arc::new(HttpQuizApi::new(session)?);
//!
//! // Takes over the terminal until the user quits
//! quizmaster_client::take_quiz(api, QuizId::new(3)).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod app;
pub mod attempt;
pub mod catalog;
pub mod config;
pub mod history;
pub mod models;
pub mod review;
pub mod statistics;
pub mod telemetry;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use thiserror::Error;
use tracing::info;

use crate::api::{ApiError, QuizApi};
use crate::attempt::AttemptError;
use crate::models::{AttemptId, QuizId};
use crate::terminal::{AppTerminal, TerminalGuard};

pub use app::{App, Flow, ReviewScreen};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for quiz sessions.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Attempt(#[from] AttemptError),

    /// Terminal setup or drawing failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// Runs one attempt of `quiz_id` in the terminal, then optionally its review.
///
/// Returns when the user quits.
pub async fn take_quiz(api: Arc<dyn QuizApi>, quiz_id: QuizId) -> Result<(), QuizError> {
    let mut guard = TerminalGuard::enter()?;
    let mut app = App::new(Arc::clone(&api), quiz_id);
    app.start()?;

    if let Flow::Review(attempt_id) = run_attempt_loop(guard.terminal(), &mut app).await? {
        let screen = load_review_screen(api.as_ref(), attempt_id).await;
        run_review_loop(guard.terminal(), screen)?;
    }
    Ok(())
}

/// Shows the review of a past attempt in the terminal.
pub async fn review_attempt(
    api: Arc<dyn QuizApi>,
    attempt_id: AttemptId,
) -> Result<(), QuizError> {
    let screen = load_review_screen(api.as_ref(), attempt_id).await;
    let mut guard = TerminalGuard::enter()?;
    run_review_loop(guard.terminal(), screen)
}

async fn load_review_screen(api: &dyn QuizApi, attempt_id: AttemptId) -> ReviewScreen {
    match review::load_review(api, attempt_id).await {
        Ok(review) => ReviewScreen::loaded(review),
        // Already logged by load_review.
        Err(_) => ReviewScreen::failed(),
    }
}

async fn run_attempt_loop(terminal: &mut AppTerminal, app: &mut App) -> Result<Flow, QuizError> {
    loop {
        app.tick();
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.handle_key(key.code) {
                    Flow::Continue => {}
                    flow => {
                        info!(?flow, state = app.controller().state().name(), "leaving attempt");
                        return Ok(flow);
                    }
                }
            }
        } else {
            tokio::task::yield_now().await;
        }
    }
}

fn run_review_loop(terminal: &mut AppTerminal, mut screen: ReviewScreen) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render_review(frame, &screen))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if screen.handle_key(key.code) {
                break;
            }
        }
    }

    Ok(())
}
