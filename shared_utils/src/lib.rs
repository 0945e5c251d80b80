//! Shared utilities for the gif-palette tools
//!
//! - Logging setup (tracing + rolling file)
//! - External tool lookup
//! - Scoped FFmpeg process handle and error formatting
//! - Error categories and reporting
//! - Terminal notices and spinner glyphs
//! - Path argument sanitising

pub mod error_handler;
pub mod ffmpeg_process;
pub mod logging;
pub mod modern_ui;
pub mod path_safety;
pub mod tools;

pub use error_handler::{report_error, report_recoverable, ErrorCategory};
pub use ffmpeg_process::{format_ffmpeg_error, get_error_suggestion, FfmpegError, FfmpegProcess};
pub use modern_ui::{print_error, print_success, print_warning, symbols};
pub use path_safety::{clean_path_input, safe_path_arg};
pub use tools::{locate_tool, ToolNotFound};
