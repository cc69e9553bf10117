//! One quiz attempt: state machine, countdown and answer tracking.

mod answers;
mod controller;
mod error;
mod format;
mod state;
mod timer;

pub use answers::AnswerStore;
pub use controller::{AttemptController, AttemptEvent, LoadedAttempt};
pub use error::AttemptError;
pub use format::{format_clock, format_duration_words, progress_percent};
pub use state::{AttemptFailure, AttemptState};
pub use timer::Countdown;
