//! Input validation primitives.
//!
//! These replace verbose ok_or_else + Error::validation_invalid_argument chains.

use std::path::Path;

use crate::error::{Error, Result};

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Require `path` to name an existing regular file.
pub fn require_file<'a>(path: &'a Path, field: &str) -> Result<&'a Path> {
    if path.is_file() {
        return Ok(path);
    }

    let problem = if path.exists() {
        format!("Not a file: {}", path.display())
    } else {
        format!("File not found: {}", path.display())
    };
    Err(Error::validation_invalid_argument(
        field,
        problem,
        Some(path.display().to_string()),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn require_non_empty_trims_whitespace() {
        let result = require_non_empty("  hello  ", "field", "msg");
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace_only() {
        let err = require_non_empty("   ", "config", "Cannot be empty").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "config");
    }

    #[test]
    fn require_file_accepts_existing_file() {
        let temp = NamedTempFile::new().unwrap();
        assert_eq!(require_file(temp.path(), "config").unwrap(), temp.path());
    }

    #[test]
    fn require_file_rejects_missing_path_and_directories() {
        let err = require_file(Path::new("/nonexistent/words.json"), "config").unwrap_err();
        assert!(err.details["problem"].as_str().unwrap().contains("File not found"));

        let dir = TempDir::new().unwrap();
        let err = require_file(dir.path(), "config").unwrap_err();
        assert!(err.details["problem"].as_str().unwrap().contains("Not a file"));
    }
}
