//! Cancellable one-second countdown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

const TICK: Duration = Duration::from_secs(1);

/// Owns at most one running countdown task.
///
/// The task is aborted by [`Countdown::stop`] and when the value is dropped,
/// so callbacks never outlive their owner.
#[derive(Debug, Default)]
pub struct Countdown {
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting down from `initial_secs`, cancelling any previous run.
    ///
    /// `on_tick` gets the new remaining value after every decrement.
    /// `on_expire` runs once, right after the tick that reaches zero, and the
    /// countdown then stops by itself. With `initial_secs == 0` it expires
    /// immediately without ticking.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<T, E>(&mut self, initial_secs: u64, mut on_tick: T, on_expire: E)
    where
        T: FnMut(u64) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.stop();

        let handle = tokio::spawn(async move {
            if initial_secs == 0 {
                on_expire();
                return;
            }

            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            let mut remaining = initial_secs;
            loop {
                ticker.tick().await;
                remaining -= 1;
                on_tick(remaining);
                if remaining == 0 {
                    on_expire();
                    break;
                }
            }
        });

        self.handle = Some(handle);
    }

    /// Halts the countdown. No-op if it already stopped or never started.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}
