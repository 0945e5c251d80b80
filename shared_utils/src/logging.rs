//! Logging Module - unified tracing setup
//!
//! Two sinks share one `EnvFilter`:
//! - a daily-rolling log file (plain text, thread ids, line numbers)
//! - stderr, off unless `console_level` is set (`--verbose`); user-facing
//!   notices go through `modern_ui`, so a running spinner is never torn by log lines
//!
//! # Examples
//!
//! ```no_run
//! use shared_utils::logging::{init_logging, LogConfig};
//!
//! init_logging("gif_palette", LogConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("Program started");
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Crates whose events pass the default filter.
const LOGGED_TARGETS: &[&str] = &["shared_utils"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory (system temp dir by default)
    pub log_dir: PathBuf,
    /// Number of log files kept per program
    pub max_files: usize,
    /// Level written to the log file
    pub level: Level,
    /// Highest verbosity shown on stderr; `None` keeps stderr free of log lines
    pub console_level: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: std::env::temp_dir(),
            max_files: 5,
            level: Level::INFO,
            console_level: None,
        }
    }
}

impl LogConfig {
    pub fn with_log_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.log_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Let stderr show everything the file gets (`--verbose`).
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.console_level = Some(self.level.max(Level::DEBUG));
        }
        self
    }

    fn default_directives(&self, program_name: &str) -> String {
        std::iter::once(program_name)
            .chain(LOGGED_TARGETS.iter().copied())
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the global subscriber.
///
/// The log file is `{program_name}.log` (plus the daily rotation suffix) in
/// `config.log_dir`. `RUST_LOG` overrides the default directives.
pub fn init_logging(program_name: &str, config: LogConfig) -> Result<()> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log directory: {:?}", config.log_dir))?;

    let log_file_name = format!("{}.log", program_name);
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.log_dir, &log_file_name);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives(program_name)));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_line_number(false)
        .with_filter(
            config
                .console_level
                .map_or(LevelFilter::OFF, LevelFilter::from_level),
        );

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Logging was already initialized")?;

    tracing::info!(
        program = program_name,
        log_dir = ?config.log_dir,
        log_file = log_file_name,
        level = ?config.level,
        console_level = ?config.console_level,
        "Logging system initialized"
    );

    cleanup_old_logs(&config.log_dir, program_name, config.max_files)?;

    Ok(())
}

/// Keep only the `max_files` most recently modified logs of `program_name`.
fn cleanup_old_logs(log_dir: &Path, program_name: &str, max_files: usize) -> Result<()> {
    use std::fs;

    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("Failed to read log directory: {:?}", log_dir))?;

    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy();
        // rotation appends the date after ".log"
        if file_name.starts_with(program_name) && file_name.contains(".log") {
            if let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) {
                log_files.push((path, modified));
            }
        }
    }

    if log_files.len() <= max_files {
        return Ok(());
    }

    log_files.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in log_files.iter().skip(max_files) {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = ?path, "Removed old log file"),
            Err(e) => tracing::warn!(path = ?path, error = %e, "Failed to remove old log file"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.max_files, 5);
        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.console_level, None);
    }

    #[test]
    fn test_log_config_builder() {
        let temp_dir = TempDir::new().unwrap();
        let config = LogConfig::default().with_log_dir(temp_dir.path());
        assert_eq!(config.log_dir, temp_dir.path());
    }

    #[test]
    fn test_console_silent_unless_verbose() {
        assert_eq!(LogConfig::default().verbose(false).console_level, None);
        assert_eq!(
            LogConfig::default().verbose(true).console_level,
            Some(Level::DEBUG)
        );
        let trace = LogConfig {
            level: Level::TRACE,
            ..LogConfig::default()
        };
        assert_eq!(trace.verbose(true).console_level, Some(Level::TRACE));
    }

    #[test]
    fn test_default_directives_cover_program_and_shared_utils() {
        let directives = LogConfig::default().default_directives("gif_palette");
        assert_eq!(directives, "gif_palette=INFO,shared_utils=INFO");
    }

    #[test]
    fn test_cleanup_old_logs() {
        let temp_dir = TempDir::new().unwrap();
        let program_name = "test_program";

        for i in 0..10 {
            let file_path = temp_dir
                .path()
                .join(format!("{}.log.2026-01-{:02}", program_name, i + 1));
            fs::write(&file_path, format!("log content {}", i)).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        fs::write(temp_dir.path().join("unrelated.txt"), "keep").unwrap();

        cleanup_old_logs(temp_dir.path(), program_name, 3).unwrap();

        let remaining: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(program_name))
            .collect();

        assert_eq!(remaining.len(), 3);
        assert!(temp_dir.path().join("unrelated.txt").exists());
    }
}
