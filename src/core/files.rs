//! Selecting input files and writing results.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

/// Expand every glob pattern and return the matching regular files, sorted
/// and without duplicates.
pub fn select_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| {
            Error::config_invalid_value(
                "select",
                Some(pattern.clone()),
                format!("Invalid glob pattern: {}", e),
            )
        })?;

        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => log_status!("select", "Skipping unreadable path: {}", e),
            }
        }
        if files.len() == before {
            log_status!("select", "No files match pattern: {}", pattern);
        }
    }

    Ok(files.into_iter().collect())
}

/// Where the result for `source` goes: `restore/<file name>`, or the source
/// itself when no mirror directory is configured.
pub fn destination(source: &Path, restore: Option<&Path>) -> PathBuf {
    match (restore, source.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => source.to_path_buf(),
    }
}

/// Whether the mirrored copy at `destination` is at least as new as `source`.
///
/// In-place runs are never up to date; there is nothing to compare against.
pub fn is_up_to_date(source: &Path, destination: &Path) -> bool {
    if source == destination {
        return false;
    }

    let modified = |p: &Path| p.metadata().and_then(|m| m.modified()).ok();
    match (modified(source), modified(destination)) {
        (Some(src), Some(dst)) => src <= dst,
        _ => false,
    }
}

/// What [`write_output`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

/// Whether writing `content` would change anything on disk.
///
/// Mirrored output is always written; in-place output only when it differs.
pub fn needs_write(source: &Path, destination: &Path, original: &str, content: &str) -> bool {
    source != destination || original != content
}

/// Write `content` to `destination`, creating its directory if needed.
///
/// An in-place destination whose content already matches is left alone.
pub fn write_output(source: &Path, destination: &Path, original: &str, content: &str) -> Result<WriteStatus> {
    if !needs_write(source, destination, original, content) {
        return Ok(WriteStatus::Unchanged);
    }

    if let Some(dir) = destination.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            io::ensure_dir(dir)?;
        }
    }

    io::write_file_atomic(destination, content)?;
    Ok(WriteStatus::Written)
}
