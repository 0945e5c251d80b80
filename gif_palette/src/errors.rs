use crate::stage::StageKind;
use shared_utils::{ErrorCategory, FfmpegError, ToolNotFound};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GifError {
    #[error(transparent)]
    EngineNotFound(#[from] ToolNotFound),

    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("FFmpeg failed during {stage}: {}", .error.summary())]
    StageFailed {
        stage: StageKind,
        #[source]
        error: FfmpegError,
    },

    #[error("Could not run FFmpeg for {stage}: {message}")]
    Spawn { stage: StageKind, message: String },

    #[error("Could not create output directory {}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl GifError {
    /// Every job-level error ends the job; parameter problems never reach here.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Fatal
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            GifError::EngineNotFound(_) => {
                Some("Install ffmpeg or pass its location with --ffmpeg".to_string())
            }
            GifError::StageFailed { error, .. } => error.suggestion.clone(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GifError>;
