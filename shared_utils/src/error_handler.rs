//! Error categories and reporting
//!
//! - Recoverable: log a warning, continue with a fallback value
//! - Fatal: stop the current job and surface the error

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Recoverable,
    Fatal,
}

impl ErrorCategory {
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorCategory::Fatal)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Recoverable => write!(f, "RECOVERABLE"),
            ErrorCategory::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Print one notice for an error; its source chain goes to the log only.
pub fn report_error<E: std::error::Error + ?Sized>(category: ErrorCategory, error: &E) {
    if category.is_fatal() {
        crate::modern_ui::print_error(&error.to_string());
        tracing::error!(category = %category, "{}", error);
    } else {
        crate::modern_ui::print_warning(&error.to_string());
        tracing::warn!(category = %category, "{}", error);
    }

    for (level, cause) in source_chain(error).iter().enumerate() {
        tracing::debug!("  Caused by (level {}): {}", level + 1, cause);
    }
}

fn source_chain<E: std::error::Error + ?Sized>(error: &E) -> Vec<String> {
    let mut chain = Vec::new();
    let mut source = error.source();
    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }
    chain
}

/// Print a recoverable problem together with the value used instead.
pub fn report_recoverable(context: &str, fallback: &dyn fmt::Display) {
    crate::modern_ui::print_warning(&format!("{}, using default: {}", context, fallback));
    tracing::warn!(category = %ErrorCategory::Recoverable, fallback = %fallback, "{}", context);
}
