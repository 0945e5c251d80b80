//! Busy indicator
//!
//! An `indicatif` spinner ticked by a thread while the engine works. The
//! session that starts it is also the only thing that can stop it:
//! [`ProgressSession::stop`] signals the thread, which clears the bar and
//! exits, then joins it and returns the elapsed time. Dropping the session
//! does the same, so an early return from the pipeline never leaves the
//! thread drawing.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use shared_utils::modern_ui::SPINNER_BAR;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Time between two spinner frames.
pub const TICK_INTERVAL: Duration = Duration::from_millis(120);

const SPINNER_TEMPLATE: &str = "{msg} {spinner}";

/// Message first, glyph after it. The trailing empty string is the
/// finished frame `indicatif` expects last.
fn spinner_style() -> ProgressStyle {
    let mut frames: Vec<&str> = SPINNER_BAR.to_vec();
    frames.push("");
    ProgressStyle::with_template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&frames)
}

pub fn create_spinner(message: &str, target: ProgressDrawTarget) -> ProgressBar {
    let spinner = ProgressBar::with_draw_target(None, target);
    spinner.set_style(spinner_style());
    spinner.set_message(message.to_string());
    spinner
}

/// A running spinner. Exactly one per job.
#[derive(Debug)]
pub struct ProgressSession {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    started: Instant,
}

impl ProgressSession {
    pub fn start(message: &str, target: ProgressDrawTarget) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let spinner = create_spinner(message, target);

        let handle = thread::Builder::new()
            .name("gif-progress".to_string())
            .spawn(move || {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    tick_until_stopped(&spinner, &stop_rx)
                }));
                if result.is_err() {
                    tracing::error!("Progress indicator thread panicked");
                }
                spinner.finish_and_clear();
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                // No spinner is not a reason to fail the job.
                tracing::warn!(error = %e, "Could not start progress indicator");
                None
            }
        };

        Self {
            stop_tx: Some(stop_tx),
            handle,
            started: Instant::now(),
        }
    }

    /// Stop the spinner and wait until its line is cleared.
    pub fn stop(mut self) -> Duration {
        self.shutdown();
        self.started.elapsed()
    }

    fn shutdown(&mut self) {
        // A send error only means the thread is already gone.
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Advance one frame per interval until a stop signal arrives or the
/// sender is dropped.
fn tick_until_stopped(spinner: &ProgressBar, stop_rx: &Receiver<()>) {
    loop {
        spinner.tick();
        match stop_rx.recv_timeout(TICK_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
