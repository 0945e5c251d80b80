//! Two-stage palette pipeline
//!
//! ```text
//! Idle → ValidatedInputs → PaletteBuilding → PaletteApplying → Reported
//!                               └──────────────┴──────────────→ Failed
//! ```
//!
//! Preconditions (engine present, source exists) are checked before any
//! directory is created, any process is spawned or the spinner is started.
//! Once the spinner runs, it is stopped and joined before `run` returns on
//! every path, so nothing the caller prints afterwards can interleave with it.

use crate::engine::TranscodeEngine;
use crate::errors::{GifError, Result};
use crate::job::{JobMode, TranscodeJob};
use crate::progress::ProgressSession;
use crate::stage::PipelineStage;
use indicatif::ProgressDrawTarget;
use shared_utils::modern_ui::{print_success, symbols};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ValidatedInputs,
    PaletteBuilding,
    PaletteApplying,
    Reported,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::ValidatedInputs => "validated",
            PipelineState::PaletteBuilding => "palette-building",
            PipelineState::PaletteApplying => "palette-applying",
            PipelineState::Reported => "reported",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Current state of one run; every transition is logged.
#[derive(Debug)]
struct StateTracker {
    current: PipelineState,
}

impl StateTracker {
    fn new() -> Self {
        Self {
            current: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(from = %self.current, to = %next, "Pipeline state");
        self.current = next;
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub mode: JobMode,
    pub output_path: PathBuf,
    pub palette_path: PathBuf,
    /// Wall-clock time for both engine invocations together.
    pub elapsed: Duration,
}

impl JobReport {
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn elapsed_line(&self) -> String {
        format!(
            "{} Time elapsed: {:.1} seconds.",
            symbols::HOURGLASS,
            self.elapsed.as_secs_f64()
        )
    }

    pub fn location_line(&self) -> String {
        format!(
            "{} File available at: {}",
            symbols::FOLDER,
            self.output_path.display()
        )
    }

    /// Final summary, after the spinner is gone.
    pub fn print(&self) {
        println!();
        print_success(self.mode.success_message());
        println!("{}", self.elapsed_line());
        println!("{}", self.location_line());
    }
}

type DrawTargetFn = dyn Fn() -> ProgressDrawTarget + Send + Sync;

pub struct Pipeline<E> {
    engine: E,
    draw_target: Box<DrawTargetFn>,
}

impl<E: TranscodeEngine> Pipeline<E> {
    /// Spinner on stderr (hidden when stderr is not a terminal).
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            draw_target: Box::new(ProgressDrawTarget::stderr),
        }
    }

    /// Where each run's spinner draws, e.g. `ProgressDrawTarget::hidden`.
    pub fn with_draw_target<F>(mut self, draw_target: F) -> Self
    where
        F: Fn() -> ProgressDrawTarget + Send + Sync + 'static,
    {
        self.draw_target = Box::new(draw_target);
        self
    }

    /// Run one job to a terminal state.
    pub fn run(&self, job: &TranscodeJob) -> Result<JobReport> {
        let mut states = StateTracker::new();

        if let Err(e) = self.validate(job).and_then(|_| prepare_output_dir(job)) {
            states.advance(PipelineState::Failed);
            return Err(e);
        }
        states.advance(PipelineState::ValidatedInputs);

        info!(
            mode = job.mode().label(),
            source = %job.source_path().display(),
            output = %job.output_path().display(),
            frame_rate = job.frame_rate().get(),
            width = job.width().get(),
            "Starting job"
        );

        let session = ProgressSession::start(job.mode().progress_message(), (self.draw_target)());
        let outcome = self.run_stages(job, &mut states);
        let elapsed = session.stop();

        match outcome {
            Ok(()) => {
                states.advance(PipelineState::Reported);
                info!(
                    output = %job.output_path().display(),
                    elapsed_secs = elapsed.as_secs_f64(),
                    "Job finished"
                );
                Ok(JobReport {
                    mode: *job.mode(),
                    output_path: job.output_path().to_path_buf(),
                    palette_path: job.palette_path().to_path_buf(),
                    elapsed,
                })
            }
            Err(e) => {
                let failed_in = states.current;
                states.advance(PipelineState::Failed);
                // Logged only once the spinner is gone.
                error!(state = %failed_in, error = %e, "Job failed");
                Err(e)
            }
        }
    }

    fn validate(&self, job: &TranscodeJob) -> Result<()> {
        self.engine.ensure_available()?;
        if !job.source_path().is_file() {
            return Err(GifError::SourceNotFound(job.source_path().to_path_buf()));
        }
        Ok(())
    }

    /// Build must succeed before apply is attempted.
    fn run_stages(&self, job: &TranscodeJob, states: &mut StateTracker) -> Result<()> {
        states.advance(PipelineState::PaletteBuilding);
        self.engine.run_stage(&PipelineStage::palette_build(job))?;

        states.advance(PipelineState::PaletteApplying);
        self.engine.run_stage(&PipelineStage::palette_apply(job))?;
        Ok(())
    }
}

fn prepare_output_dir(job: &TranscodeJob) -> Result<()> {
    let Some(dir) = job.output_path().parent() else {
        return Ok(());
    };
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| GifError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}


#[cfg(all(test, unix))]
mod engine_failure_tests {
    use super::*;
    use crate::job::{JobRequest, OutputLayout, RawParams};
    use crate::progress::test_term::{EventLog, TermEvent};
    use crate::test_support::{fake_engine, serial};
    use tempfile::TempDir;
    use tracing::Level;

    /// With a console sink capped at WARN sharing the spinner's terminal,
    /// nothing may be written to it until the spinner line is cleared.
    #[test]
    fn test_failed_stage_logs_nothing_over_spinner() {
        let _serial = serial();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("clip.mov");
        std::fs::write(&source, b"garbage").unwrap();
        let engine = fake_engine(
            &dir,
            "sleep 0.3; echo 'clip.mov: Invalid data found when processing input' >&2; exit 1",
        );
        let job = JobRequest::Create {
            params: RawParams {
                source: source.display().to_string(),
                ..Default::default()
            },
            speed_factor: String::new(),
            output_dir: None,
        }
        .into_job(&OutputLayout::new(dir.path().join("gifs")))
        .value;

        let log = EventLog::default();
        let console = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || console.clone())
            .finish();

        let spinner_log = log.clone();
        let pipeline = Pipeline::new(&engine).with_draw_target(move || spinner_log.draw_target());
        let result = tracing::subscriber::with_default(subscriber, || pipeline.run(&job));

        assert!(matches!(result, Err(GifError::StageFailed { .. })));
        let events = log.events();
        let last_clear = log.last_clear().unwrap();
        assert!(log.last_draw().is_some());
        let first_log = events
            .iter()
            .position(|e| matches!(e, TermEvent::Log(_)))
            .unwrap_or(events.len());
        assert!(
            first_log > last_clear,
            "console output before spinner teardown: {:?}",
            &events[..=last_clear]
        );
    }
}
