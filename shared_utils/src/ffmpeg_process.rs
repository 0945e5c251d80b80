//! FFmpeg process handling
//!
//! `FfmpegProcess` owns one running engine invocation. stderr is drained on a
//! helper thread so the child can never block on a full pipe (about 64KB on
//! most systems) while we wait on it. The wait itself is unbounded: encoding
//! time scales with the source and has no useful upper limit.
//!
//! If a handle is dropped before `wait_with_output` completed, the child is
//! killed and reaped, and the stderr thread joined, so no descriptor or zombie
//! outlives the handle.
//!
//! ```ignore
//! use shared_utils::ffmpeg_process::FfmpegProcess;
//! use std::process::Command;
//!
//! let mut cmd = Command::new("ffmpeg");
//! cmd.args(["-v", "error", "-y", "-i", "in.mov", "out.gif"]);
//! let (status, stderr) = FfmpegProcess::spawn(&mut cmd)?.wait_with_output()?;
//! ```

use anyhow::{Context, Result};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

// ═══════════════════════════════════════════════════════════════
// FfmpegProcess - scoped child process wrapper
// ═══════════════════════════════════════════════════════════════

pub struct FfmpegProcess {
    child: Child,
    stderr_thread: Option<JoinHandle<String>>,
    command: String,
    finished: bool,
}

impl FfmpegProcess {
    /// Spawn `cmd` with stdin/stdout detached and stderr captured.
    ///
    /// # Errors
    /// - the binary could not be started
    /// - stderr could not be captured
    pub fn spawn(cmd: &mut Command) -> Result<Self> {
        let command = format!("{:?}", cmd);
        info!(command = %command, "Executing FFmpeg command");

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn FFmpeg process: {}", command))?;

        let stderr = match child.stderr.take() {
            Some(stderr) => stderr,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                anyhow::bail!("Failed to capture FFmpeg stderr");
            }
        };

        let stderr_thread = thread::spawn(move || {
            let mut buf = String::new();
            for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                buf.push_str(&line);
                buf.push('\n');
            }
            buf
        });

        Ok(Self {
            child,
            stderr_thread: Some(stderr_thread),
            command,
            finished: false,
        })
    }

    /// Block until the process exits.
    ///
    /// # Returns
    /// (ExitStatus, stderr content)
    pub fn wait_with_output(mut self) -> Result<(ExitStatus, String)> {
        let status = self.child.wait().context("Failed to wait for FFmpeg")?;
        self.finished = true;
        let stderr = self.join_stderr();

        if status.success() {
            info!(exit_code = status.code(), "FFmpeg process completed successfully");
            debug!(stderr_output = %stderr, "FFmpeg stderr output");
        } else {
            // Callers decide how a failure is surfaced; this runs while
            // a spinner may still own the terminal.
            debug!(
                command = %self.command,
                exit_code = status.code(),
                stderr_output = %stderr,
                "FFmpeg process failed"
            );
        }

        Ok((status, stderr))
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn join_stderr(&mut self) -> String {
        self.stderr_thread
            .take()
            .map(|t| t.join().unwrap_or_default())
            .unwrap_or_default()
    }
}

impl Drop for FfmpegProcess {
    fn drop(&mut self) {
        if !self.finished {
            warn!(command = %self.command, "Abandoned FFmpeg process, killing it");
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
        self.join_stderr();
    }
}

// ═══════════════════════════════════════════════════════════════
// Error formatting
// ═══════════════════════════════════════════════════════════════

/// Pick the most meaningful line out of FFmpeg's stderr.
///
/// 1. the last line mentioning "Error"/"error"
/// 2. otherwise the last non-progress, non-empty line
/// 3. otherwise "Unknown FFmpeg error"
pub fn format_ffmpeg_error(stderr: &str) -> String {
    if let Some(error_line) = stderr
        .lines()
        .rev()
        .find(|line| line.contains("Error") || line.contains("error"))
    {
        return error_line.trim().to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("frame=")
                && !trimmed.starts_with("fps=")
                && !trimmed.starts_with("size=")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Unknown FFmpeg error".to_string())
}

/// Map common FFmpeg failure patterns to an actionable hint.
pub fn get_error_suggestion(stderr: &str) -> Option<String> {
    let patterns = [
        ("No such file or directory", "Check that the input path is correct"),
        ("Invalid data found", "The input may be corrupted or not a video/GIF"),
        ("does not contain any stream", "The input has no video stream"),
        ("Permission denied", "Check read/write permissions on input and output"),
        ("Invalid argument", "Check frame rate, width and other numeric parameters"),
        ("No space left on device", "Free disk space in the output directory"),
        ("moov atom not found", "The MP4/MOV file is incomplete"),
        ("Output file is empty", "Encoding produced no frames, try a lower frame rate"),
    ];

    patterns
        .iter()
        .find(|(pattern, _)| stderr.contains(pattern))
        .map(|(_, suggestion)| suggestion.to_string())
}

/// Detailed report for a failed invocation.
#[derive(Debug, Clone)]
pub struct FfmpegError {
    pub command: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub suggestion: Option<String>,
}

impl FfmpegError {
    pub fn new(command: impl Into<String>, stderr: impl Into<String>, exit_code: Option<i32>) -> Self {
        let stderr = stderr.into();
        let suggestion = get_error_suggestion(&stderr);
        Self {
            command: command.into(),
            stderr,
            exit_code,
            suggestion,
        }
    }

    pub fn summary(&self) -> String {
        format_ffmpeg_error(&self.stderr)
    }
}

impl fmt::Display for FfmpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} exited with code {}", self.command, code),
            None => write!(f, "{} was terminated by a signal", self.command),
        }
    }
}

impl std::error::Error for FfmpegError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ffmpeg_error_with_error_line() {
        let stderr = r#"
frame=  100 fps=25.0 q=28.0 size=    1024kB time=00:00:04.00 bitrate=2097.2kbits/s
[Parsed_palettegen_2 @ 0x7f8b8c000000] Error: invalid parameter
"#;
        let error = format_ffmpeg_error(stderr);
        assert!(error.contains("Error"));
        assert!(error.contains("invalid parameter"));
    }

    #[test]
    fn test_format_ffmpeg_error_no_error_line() {
        let stderr = r#"
frame=  100 fps=25.0 q=28.0 size=    1024kB time=00:00:04.00
Conversion failed!
"#;
        assert_eq!(format_ffmpeg_error(stderr), "Conversion failed!");
    }

    #[test]
    fn test_format_ffmpeg_error_empty() {
        assert_eq!(format_ffmpeg_error(""), "Unknown FFmpeg error");
    }

    #[test]
    fn test_suggestion_lookup() {
        assert!(get_error_suggestion("clip.mov: No such file or directory").is_some());
        assert!(get_error_suggestion("all good").is_none());
    }

    #[test]
    fn test_ffmpeg_error_display() {
        let err = FfmpegError::new("ffmpeg -i x", "x: Invalid data found when processing input", Some(1));
        assert_eq!(err.to_string(), "ffmpeg -i x exited with code 1");
        assert!(err.suggestion.is_some());
        assert_eq!(err.summary(), "x: Invalid data found when processing input");

        let killed = FfmpegError::new("ffmpeg -i x", "", None);
        assert!(killed.to_string().ends_with("terminated by a signal"));
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_and_wait_captures_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo 'Error: boom' >&2; exit 3"]);
        let (status, stderr) = FfmpegProcess::spawn(&mut cmd)
            .unwrap()
            .wait_with_output()
            .unwrap();
        assert_eq!(status.code(), Some(3));
        assert_eq!(format_ffmpeg_error(&stderr), "Error: boom");
    }

    #[cfg(unix)]
    #[test]
    fn test_drop_kills_unfinished_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = std::time::Instant::now();
        let process = FfmpegProcess::spawn(&mut cmd).unwrap();
        drop(process);
        assert!(start.elapsed() < std::time::Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_emits_no_warnings() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let (status, _) = tracing::subscriber::with_default(subscriber, || {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", "echo 'Invalid data found' >&2; exit 1"]);
            FfmpegProcess::spawn(&mut cmd)
                .unwrap()
                .wait_with_output()
                .unwrap()
        });

        assert!(!status.success());
        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_spawn_missing_binary_fails() {
        let mut cmd = Command::new("definitely_not_a_real_binary_xyz");
        assert!(FfmpegProcess::spawn(&mut cmd).is_err());
    }
}
