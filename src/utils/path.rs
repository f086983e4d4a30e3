//! Filesystem path normalization.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to the path itself when absolute, or joined onto the current
/// directory when relative.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render `path` relative to `root` for log output.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_path() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();

        let normalized = normalize_path(&nested.join("..").join("docs"));
        assert_eq!(normalized, nested.canonicalize().unwrap());
    }

    #[test]
    fn test_normalize_missing_absolute_path() {
        let path = Path::new("/definitely/not/here.md");
        assert_eq!(normalize_path(path), path);
    }

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/site/docs/intro.md"), Path::new("/site")),
            "docs/intro.md"
        );
        assert_eq!(
            display_relative(Path::new("/elsewhere/a.md"), Path::new("/site")),
            "/elsewhere/a.md"
        );
    }
}
