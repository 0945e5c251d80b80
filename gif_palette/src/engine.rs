//! External transcoding engine
//!
//! The pipeline only needs two things from an engine: proof that it exists,
//! and a blocking "run this stage" call that succeeds or fails.

use crate::errors::{GifError, Result};
use crate::stage::PipelineStage;
use shared_utils::{locate_tool, FfmpegError, FfmpegProcess, ToolNotFound};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info};

pub trait TranscodeEngine {
    /// Fail if the engine cannot be invoked.
    fn ensure_available(&self) -> Result<()>;

    /// Run one stage to completion. Blocks with no timeout.
    fn run_stage(&self, stage: &PipelineStage) -> Result<()>;
}

impl<E: TranscodeEngine + ?Sized> TranscodeEngine for &E {
    fn ensure_available(&self) -> Result<()> {
        (**self).ensure_available()
    }

    fn run_stage(&self, stage: &PipelineStage) -> Result<()> {
        (**self).run_stage(stage)
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    binary: PathBuf,
}

impl FfmpegEngine {
    pub const TOOL_NAME: &'static str = "ffmpeg";

    /// Resolve the binary from `override_path` or `PATH`.
    pub fn locate(override_path: Option<&Path>) -> Result<Self> {
        let binary = locate_tool(Self::TOOL_NAME, override_path)?;
        info!(binary = %binary.display(), "Using FFmpeg");
        Ok(Self { binary })
    }

    /// Use `binary` as-is, without a lookup.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl TranscodeEngine for FfmpegEngine {
    fn ensure_available(&self) -> Result<()> {
        if self.binary.is_file() {
            Ok(())
        } else {
            Err(GifError::EngineNotFound(ToolNotFound {
                tool_name: Self::TOOL_NAME.to_string(),
                searched: Some(self.binary.clone()),
            }))
        }
    }

    fn run_stage(&self, stage: &PipelineStage) -> Result<()> {
        let kind = stage.kind();
        let mut cmd = Command::new(&self.binary);
        cmd.args(stage.args());

        let started = Instant::now();
        let process = FfmpegProcess::spawn(&mut cmd).map_err(|e| GifError::Spawn {
            stage: kind,
            message: format!("{:#}", e),
        })?;
        let command = process.command().to_string();

        let (status, stderr) = process.wait_with_output().map_err(|e| GifError::Spawn {
            stage: kind,
            message: format!("{:#}", e),
        })?;

        debug!(
            stage = %kind,
            exit_code = status.code(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Stage finished"
        );

        if status.success() {
            Ok(())
        } else {
            Err(GifError::StageFailed {
                stage: kind,
                error: FfmpegError::new(command, stderr, status.code()),
            })
        }
    }
}
