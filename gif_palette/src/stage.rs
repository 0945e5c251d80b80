//! Engine invocations
//!
//! Each [`PipelineStage`] is one FFmpeg run: an argument list around a
//! filter-graph expression. Both stages of a job share the same
//! `fps,scale` prefix; if the palette was sampled at a different rate or size
//! than the frames it is applied to, the result flickers or bands.

use crate::job::{JobMode, TranscodeJob};
use shared_utils::safe_path_arg;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Resampling filter used for every scale step.
pub const RESAMPLING_FILTER: &str = "lanczos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    PaletteBuild,
    PaletteApply,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::PaletteBuild => "palette generation",
            StageKind::PaletteApply => "palette application",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `fps=F,scale=W:-1:flags=lanczos` (height follows the aspect ratio)
fn sampling_chain(job: &TranscodeJob) -> String {
    format!(
        "fps={},scale={}:-1:flags={}",
        job.frame_rate(),
        job.width(),
        RESAMPLING_FILTER
    )
}

pub fn palette_build_filter(job: &TranscodeJob) -> String {
    let chain = sampling_chain(job);
    match job.mode() {
        JobMode::Create { .. } => format!("{},palettegen", chain),
        JobMode::Compress { max_colors, .. } => {
            format!("{},palettegen=max_colors={}", chain, max_colors)
        }
    }
}

pub fn palette_apply_filter(job: &TranscodeJob) -> String {
    let chain = sampling_chain(job);
    match job.mode() {
        JobMode::Create { speed_factor } => {
            format!("{},setpts={}*PTS[x];[x][1:v]paletteuse", chain, speed_factor)
        }
        JobMode::Compress { dither, .. } => {
            format!("{}[x];[x][1:v]paletteuse=dither={}", chain, dither)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStage {
    kind: StageKind,
    filter: String,
    args: Vec<OsString>,
    output: PathBuf,
}

impl PipelineStage {
    /// Sample the source and write the palette artifact.
    pub fn palette_build(job: &TranscodeJob) -> Self {
        let filter = palette_build_filter(job);
        let mut args = quiet_overwrite_args();
        push_input(&mut args, job.source_path());
        args.push("-vf".into());
        args.push(filter.clone().into());
        args.push(safe_path_arg(job.palette_path()).into_owned());

        Self {
            kind: StageKind::PaletteBuild,
            filter,
            args,
            output: job.palette_path().to_path_buf(),
        }
    }

    /// Re-encode the source against the palette artifact.
    pub fn palette_apply(job: &TranscodeJob) -> Self {
        let filter = palette_apply_filter(job);
        let mut args = quiet_overwrite_args();
        push_input(&mut args, job.source_path());
        push_input(&mut args, job.palette_path());
        args.push("-filter_complex".into());
        args.push(filter.clone().into());
        args.push(safe_path_arg(job.output_path()).into_owned());

        Self {
            kind: StageKind::PaletteApply,
            filter,
            args,
            output: job.output_path().to_path_buf(),
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

fn quiet_overwrite_args() -> Vec<OsString> {
    vec!["-v".into(), "error".into(), "-y".into()]
}

fn push_input(args: &mut Vec<OsString>, path: &Path) {
    args.push("-i".into());
    args.push(safe_path_arg(path).into_owned());
}
