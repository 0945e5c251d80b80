//! External tool lookup
//!
//! Resolves command-line tools either from an explicit override or from `PATH`.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNotFound {
    pub tool_name: String,
    pub searched: Option<PathBuf>,
}

impl fmt::Display for ToolNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.searched {
            Some(path) => write!(f, "{} not found at {}", self.tool_name, path.display()),
            None => write!(f, "{} is not installed or not in PATH", self.tool_name),
        }
    }
}

impl std::error::Error for ToolNotFound {}

/// Resolve `tool_name`, preferring `override_path` when given.
///
/// An override may be a bare name (looked up on `PATH`) or a path to an
/// executable file.
pub fn locate_tool(tool_name: &str, override_path: Option<&Path>) -> Result<PathBuf, ToolNotFound> {
    let candidate = override_path.unwrap_or_else(|| Path::new(tool_name));

    let resolved = which::which(candidate).map_err(|_| ToolNotFound {
        tool_name: tool_name.to_string(),
        searched: override_path.map(Path::to_path_buf),
    })?;

    tracing::debug!(tool = tool_name, path = %resolved.display(), "Resolved external tool");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let err = locate_tool("definitely_not_a_real_tool_xyz", None).unwrap_err();
        assert_eq!(err.tool_name, "definitely_not_a_real_tool_xyz");
        assert!(err.to_string().contains("not in PATH"));
    }

    #[test]
    fn test_missing_override_reports_path() {
        let err = locate_tool("ffmpeg", Some(Path::new("/nonexistent/bin/ffmpeg"))).unwrap_err();
        assert_eq!(err.searched.as_deref(), Some(Path::new("/nonexistent/bin/ffmpeg")));
        assert!(err.to_string().contains("/nonexistent/bin/ffmpeg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_shell() {
        let sh = locate_tool("sh", None).unwrap();
        assert!(sh.is_absolute());
        assert!(locate_tool("ffmpeg", Some(&sh)).is_ok());
    }
}
