//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + lexical fallback)
//! - `resolve_under` - resolve a user-supplied path against a base directory
//! - `display_relative` - report a path relative to a base when possible

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to lexical cleanup so that paths to files which do not exist
/// yet (e.g. the default live target) still come out absolute and tidy.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        };
        clean(&absolute)
    })
}

/// Resolve `path` against `base` unless it is already absolute.
///
/// # Example
/// ```ignore
/// let target = resolve_under(Path::new("notes/a.md"), home);
/// ```
#[inline]
pub fn resolve_under(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Path relative to `base`, or the path itself when it lies elsewhere.
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Lexically remove `.` and `..` components.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.md"));
        assert!(normalized.is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_under_missing_file() {
        let resolved = resolve_under(Path::new("docs/../LIVE"), Path::new("/nonexistent/home"));
        assert_eq!(resolved, PathBuf::from("/nonexistent/home/LIVE"));
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_under_absolute() {
        let resolved = resolve_under(Path::new("/nonexistent/abs.md"), Path::new("/home"));
        assert_eq!(resolved, PathBuf::from("/nonexistent/abs.md"));
    }

    #[test]
    fn test_display_relative() {
        let base = Path::new("/home/user");
        assert_eq!(display_relative(Path::new("/home/user/a/b.md"), base), "a/b.md");
        assert_eq!(display_relative(Path::new("/srv/x.md"), base), "/srv/x.md");
    }
}
