use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// FFmpeg has no `--` delimiter, so a relative path starting with '-' would be
/// read as an option. Such paths get a `./` prefix; everything else is passed
/// through untouched (including non-UTF-8 names).
pub fn safe_path_arg(path: &Path) -> Cow<'_, OsStr> {
    if path.as_os_str().to_string_lossy().starts_with('-') {
        let mut prefixed = OsString::from("./");
        prefixed.push(path.as_os_str());
        Cow::Owned(prefixed)
    } else {
        Cow::Borrowed(path.as_os_str())
    }
}

/// Clean a path typed or pasted by a user.
///
/// Surrounding whitespace and quote characters are removed, which covers
/// terminal drag-and-drop (`'/a b/c.mov' `) and copied quoted paths.
pub fn clean_path_input(raw: &str) -> PathBuf {
    PathBuf::from(raw.trim().trim_matches(|c| c == '\'' || c == '"').trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_path_arg() {
        assert_eq!(safe_path_arg(Path::new("clip.mov")), OsStr::new("clip.mov"));
        assert_eq!(safe_path_arg(Path::new("/abs/clip.gif")), OsStr::new("/abs/clip.gif"));
        assert_eq!(safe_path_arg(Path::new("-dash.gif")), OsStr::new("./-dash.gif"));
        assert_eq!(
            safe_path_arg(Path::new("-dir/palette.png")),
            OsStr::new("./-dir/palette.png")
        );
    }

    #[test]
    fn test_clean_path_input() {
        assert_eq!(clean_path_input("  clip.mov \n"), PathBuf::from("clip.mov"));
        assert_eq!(clean_path_input("'/tmp/my clip.mov' "), PathBuf::from("/tmp/my clip.mov"));
        assert_eq!(clean_path_input("\"C:\\v\\a.mp4\""), PathBuf::from("C:\\v\\a.mp4"));
        assert_eq!(clean_path_input(""), PathBuf::new());
    }
}
