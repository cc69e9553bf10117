//! Tracing setup.
//!
//! The TUI owns the terminal, so events go to a daily rolling file under the
//! configured log directory. `RUST_LOG` wins over the configured filter.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ClientConfig;

pub const LOG_FILE: &str = "quizmaster.log";

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init_tracing(config: &ClientConfig) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    guard
}
