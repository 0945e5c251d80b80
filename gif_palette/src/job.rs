//! Job model
//!
//! A [`TranscodeJob`] is built once from normalized parameters and never
//! changes afterwards. Output and palette paths are derived from the source
//! stem, so every job writes to its own pair of files.

use crate::normalize::{normalize, normalize_max_colors, MaxColors, Normalized, SpeedFactor};
use shared_utils::clean_path_input;
use std::ffi::OsString;
use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

pub const OUTPUT_EXTENSION: &str = "gif";
pub const PALETTE_SUFFIX: &str = "_palette.png";

pub const GENERATED_SUFFIX: &str = "_generated";
pub const COMPRESSED_SUFFIX: &str = "_compressed";

const GENERATED_DIR: &str = "generated";
const COMPRESSED_DIR: &str = "compressed";

pub mod defaults {
    use super::*;

    const fn positive(n: u32) -> NonZeroU32 {
        match NonZeroU32::new(n) {
            Some(v) => v,
            None => panic!("default must be positive"),
        }
    }

    pub const CREATE_FRAME_RATE: NonZeroU32 = positive(30);
    pub const CREATE_WIDTH: NonZeroU32 = positive(1280);
    pub const CREATE_SPEED: SpeedFactor = SpeedFactor::NORMAL;

    pub const COMPRESS_FRAME_RATE: NonZeroU32 = positive(15);
    pub const COMPRESS_WIDTH: NonZeroU32 = positive(900);
    pub const COMPRESS_MAX_COLORS: i64 = 200;
}

/// Dithering applied when mapping compressed frames onto the bounded palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMethod {
    /// Ordered (Bayer matrix) dithering: deterministic, cheap, little banding.
    #[default]
    Bayer,
}

impl DitherMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DitherMethod::Bayer => "bayer",
        }
    }
}

impl fmt::Display for DitherMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode-specific part of a job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobMode {
    Create {
        speed_factor: SpeedFactor,
    },
    Compress {
        max_colors: MaxColors,
        dither: DitherMethod,
    },
}

impl JobMode {
    pub fn label(&self) -> &'static str {
        match self {
            JobMode::Create { .. } => "create",
            JobMode::Compress { .. } => "compress",
        }
    }

    pub fn output_suffix(&self) -> &'static str {
        match self {
            JobMode::Create { .. } => GENERATED_SUFFIX,
            JobMode::Compress { .. } => COMPRESSED_SUFFIX,
        }
    }

    pub fn progress_message(&self) -> &'static str {
        match self {
            JobMode::Create { .. } => "⌛️ Generating GIF...",
            JobMode::Compress { .. } => "⌛️ Compressing GIF...",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            JobMode::Create { .. } => "GIF generated successfully.",
            JobMode::Compress { .. } => "GIF compressed successfully.",
        }
    }
}

/// Where finished GIFs go: `<root>/generated` and `<root>/compressed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub const DEFAULT_ROOT: &'static str = "gifs";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn generated_dir(&self) -> PathBuf {
        self.root.join(GENERATED_DIR)
    }

    pub fn compressed_dir(&self) -> PathBuf {
        self.root.join(COMPRESSED_DIR)
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

/// `<out_dir>/<source stem><suffix>.gif`
pub fn output_path_for(source: &Path, out_dir: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(suffix);
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    out_dir.join(name)
}

/// `<output stem>_palette.png`, beside the output.
pub fn palette_path_for(output: &Path) -> PathBuf {
    let mut name: OsString = output
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push(PALETTE_SUFFIX);
    output.with_file_name(name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeJob {
    source_path: PathBuf,
    output_path: PathBuf,
    palette_path: PathBuf,
    frame_rate: NonZeroU32,
    width: NonZeroU32,
    mode: JobMode,
}

impl TranscodeJob {
    pub fn new(
        source: impl Into<PathBuf>,
        output_dir: &Path,
        frame_rate: NonZeroU32,
        width: NonZeroU32,
        mode: JobMode,
    ) -> Self {
        let source_path = source.into();
        let output_path = output_path_for(&source_path, output_dir, mode.output_suffix());
        let palette_path = palette_path_for(&output_path);
        Self {
            source_path,
            output_path,
            palette_path,
            frame_rate,
            width,
            mode,
        }
    }

    pub fn create(
        source: impl Into<PathBuf>,
        output_dir: &Path,
        frame_rate: NonZeroU32,
        width: NonZeroU32,
        speed_factor: SpeedFactor,
    ) -> Self {
        Self::new(source, output_dir, frame_rate, width, JobMode::Create { speed_factor })
    }

    pub fn compress(
        source: impl Into<PathBuf>,
        output_dir: &Path,
        frame_rate: NonZeroU32,
        width: NonZeroU32,
        max_colors: MaxColors,
    ) -> Self {
        let mode = JobMode::Compress {
            max_colors,
            dither: DitherMethod::default(),
        };
        Self::new(source, output_dir, frame_rate, width, mode)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn palette_path(&self) -> &Path {
        &self.palette_path
    }

    pub fn frame_rate(&self) -> NonZeroU32 {
        self.frame_rate
    }

    pub fn width(&self) -> NonZeroU32 {
        self.width
    }

    pub fn mode(&self) -> &JobMode {
        &self.mode
    }
}

/// Raw, unvalidated job parameters as collected from the CLI or a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pub source: String,
    pub frame_rate: String,
    pub width: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Create {
        params: RawParams,
        speed_factor: String,
        output_dir: Option<PathBuf>,
    },
    Compress {
        params: RawParams,
        max_colors: String,
    },
}

impl JobRequest {
    /// Clean the source path, normalize every number, then build the job.
    pub fn into_job(self, layout: &OutputLayout) -> Normalized<TranscodeJob> {
        let mut warnings = Vec::new();

        let job = match self {
            JobRequest::Create {
                params,
                speed_factor,
                output_dir,
            } => {
                let frame_rate = normalize("frame rate", &params.frame_rate, defaults::CREATE_FRAME_RATE)
                    .collect_into(&mut warnings);
                let width =
                    normalize("width", &params.width, defaults::CREATE_WIDTH).collect_into(&mut warnings);
                let speed = normalize("speed factor", &speed_factor, defaults::CREATE_SPEED)
                    .collect_into(&mut warnings);
                let output_dir = output_dir.unwrap_or_else(|| layout.generated_dir());
                TranscodeJob::create(
                    clean_path_input(&params.source),
                    &output_dir,
                    frame_rate,
                    width,
                    speed,
                )
            }
            JobRequest::Compress { params, max_colors } => {
                let frame_rate =
                    normalize("frame rate", &params.frame_rate, defaults::COMPRESS_FRAME_RATE)
                        .collect_into(&mut warnings);
                let width = normalize("width", &params.width, defaults::COMPRESS_WIDTH)
                    .collect_into(&mut warnings);
                let max_colors = normalize_max_colors(
                    &max_colors,
                    MaxColors::clamped(defaults::COMPRESS_MAX_COLORS),
                )
                .collect_into(&mut warnings);
                TranscodeJob::compress(
                    clean_path_input(&params.source),
                    &layout.compressed_dir(),
                    frame_rate,
                    width,
                    max_colors,
                )
            }
        };

        Normalized {
            value: job,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(source: &str, fps: &str, width: &str) -> RawParams {
        RawParams {
            source: source.to_string(),
            frame_rate: fps.to_string(),
            width: width.to_string(),
        }
    }

    #[test]
    fn test_create_defaults_layout() {
        let layout = OutputLayout::new("gifs");
        let request = JobRequest::Create {
            params: raw("clip.mov", "", ""),
            speed_factor: String::new(),
            output_dir: None,
        };
        let normalized = request.into_job(&layout);
        assert!(normalized.warnings.is_empty());

        let job = normalized.value;
        assert_eq!(job.output_path(), Path::new("gifs/generated/clip_generated.gif"));
        assert_eq!(
            job.palette_path(),
            Path::new("gifs/generated/clip_generated_palette.png")
        );
        assert_eq!(job.frame_rate().get(), 30);
        assert_eq!(job.width().get(), 1280);
        assert_eq!(
            *job.mode(),
            JobMode::Create {
                speed_factor: SpeedFactor::NORMAL
            }
        );
    }

    #[test]
    fn test_create_with_custom_dir_and_quoted_source() {
        let request = JobRequest::Create {
            params: raw(" '/videos/my clip.mp4' ", "24", "640"),
            speed_factor: "0.5".to_string(),
            output_dir: Some(PathBuf::from("/out")),
        };
        let job = request.into_job(&OutputLayout::default()).value;
        assert_eq!(job.source_path(), Path::new("/videos/my clip.mp4"));
        assert_eq!(job.output_path(), Path::new("/out/my clip_generated.gif"));
        assert_eq!(job.frame_rate().get(), 24);
        assert_eq!(job.width().get(), 640);
    }

    #[test]
    fn test_compress_always_uses_compressed_dir() {
        let request = JobRequest::Compress {
            params: raw("anim.gif", "", ""),
            max_colors: "abc".to_string(),
        };
        let normalized = request.into_job(&OutputLayout::new("gifs"));
        assert_eq!(normalized.warnings.len(), 1);
        assert_eq!(normalized.warnings[0].parameter, "max colors");

        let job = normalized.value;
        assert_eq!(job.output_path(), Path::new("gifs/compressed/anim_compressed.gif"));
        assert_eq!(
            job.palette_path(),
            Path::new("gifs/compressed/anim_compressed_palette.png")
        );
        assert_eq!(job.frame_rate().get(), 15);
        assert_eq!(job.width().get(), 900);
        match job.mode() {
            JobMode::Compress { max_colors, dither } => {
                assert_eq!(max_colors.get(), 200);
                assert_eq!(*dither, DitherMethod::Bayer);
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_warnings_accumulate_across_parameters() {
        let request = JobRequest::Create {
            params: raw("clip.mov", "thirty", "wide"),
            speed_factor: "slow".to_string(),
            output_dir: None,
        };
        let normalized = request.into_job(&OutputLayout::default());
        let names: Vec<_> = normalized.warnings.iter().map(|w| w.parameter).collect();
        assert_eq!(names, ["frame rate", "width", "speed factor"]);
    }

    #[test]
    fn test_palette_path_for_shares_output_stem() {
        assert_eq!(
            palette_path_for(Path::new("/a/b/x.y_generated.gif")),
            PathBuf::from("/a/b/x.y_generated_palette.png")
        );
        assert_eq!(
            output_path_for(Path::new("dir/movie.final.mov"), Path::new("o"), GENERATED_SUFFIX),
            PathBuf::from("o/movie.final_generated.gif")
        );
    }

    #[test]
    fn test_mode_text() {
        let create = JobMode::Create {
            speed_factor: SpeedFactor::NORMAL,
        };
        assert_eq!(create.label(), "create");
        assert!(create.progress_message().contains("Generating"));
        let compress = JobMode::Compress {
            max_colors: MaxColors::clamped(16),
            dither: DitherMethod::Bayer,
        };
        assert!(compress.progress_message().contains("Compressing"));
        assert_eq!(compress.output_suffix(), "_compressed");
    }
}
