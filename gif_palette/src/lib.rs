//! gif-palette - GIF creation and compression through a two-pass FFmpeg palette
//!
//! Every job runs the same two engine invocations:
//! - palette build: sample frames at the target rate and width, write a palette PNG
//! - palette apply: re-encode the source against that palette
//!
//! Create jobs also rescale timestamps (speed factor); compress jobs bound the
//! palette size and use ordered dithering.
//!
//! ```rust,ignore
//! use gif_palette::{FfmpegEngine, JobRequest, OutputLayout, Pipeline, RawParams};
//!
//! let request = JobRequest::Create {
//!     params: RawParams { source: "clip.mov".into(), ..Default::default() },
//!     speed_factor: String::new(),
//!     output_dir: None,
//! };
//! let job = request.into_job(&OutputLayout::default()).emit();
//! let report = Pipeline::new(FfmpegEngine::locate(None)?).run(&job)?;
//! report.print();
//! ```

pub mod engine;
pub mod errors;
pub mod interactive;
pub mod job;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod stage;

#[cfg(all(test, unix))]
mod test_support;

pub use engine::{FfmpegEngine, TranscodeEngine};
pub use errors::{GifError, Result};
pub use job::{DitherMethod, JobMode, JobRequest, OutputLayout, RawParams, TranscodeJob};
pub use normalize::{normalize, normalize_max_colors, MaxColors, Normalized, ParamWarning, SpeedFactor};
pub use pipeline::{JobReport, Pipeline, PipelineState};
pub use progress::{create_spinner, ProgressSession};
pub use stage::{PipelineStage, StageKind};
