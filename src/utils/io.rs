//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a text file, reporting failures as `file.read_failed`.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file_read(path.display().to_string(), e.to_string()))
}

/// Write content to file atomically (write to .tmp, then rename).
///
/// Readers always see either the old content or the new content, never a
/// partial write.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let write_err = |e: String| Error::file_write(path.display().to_string(), e);

    let parent = path
        .parent()
        .ok_or_else(|| write_err(format!("Invalid path: {}", path.display())))?;
    let filename = path
        .file_name()
        .ok_or_else(|| write_err(format!("Invalid path: {}", path.display())))?;

    let tmp_path = parent.join(format!(".{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content).map_err(|e| write_err(format!("write temp: {}", e)))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(format!("rename: {}", e)));
    }

    Ok(())
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        Error::file_write(dir.display().to_string(), e.to_string())
            .with_hint("Check that the restore directory is writable")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path()).unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let err = read_file(Path::new("/nonexistent/path.txt")).unwrap_err();
        assert_eq!(err.code.as_str(), "file.read_failed");
        assert_eq!(err.details["path"], "/nonexistent/path.txt");
    }

    #[test]
    fn atomic_write_replaces_content_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chapter.txt");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn atomic_write_fails_for_missing_directory() {
        let err = write_file_atomic(Path::new("/nonexistent/dir/file.txt"), "content").unwrap_err();
        assert_eq!(err.code.as_str(), "file.write_failed");
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
