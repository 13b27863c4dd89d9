//! Public output types for a replacement run.
//!
//! These are what the CLI serializes into the `data` field of its JSON
//! response, and what library callers get back from a run.

use serde::Serialize;

use crate::rewrap::TransformWarning;

/// Summary of one run over every selected file.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub config: String,
    pub dry_run: bool,
    pub updated: u32,
    pub unchanged: u32,
    pub skipped: u32,
    pub errors: u32,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TransformWarning>,
    pub items: Vec<FileOutcome>,
}

/// Result for a single file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub path: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub replacements: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TransformWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    fn new(path: String, status: &str) -> Self {
        Self {
            path,
            status: status.to_string(),
            destination: None,
            replacements: 0,
            warnings: Vec::new(),
            error: None,
        }
    }
}

impl RunSummary {
    pub fn new(config: String, dry_run: bool) -> Self {
        Self {
            config,
            dry_run,
            ..Self::default()
        }
    }

    pub fn record_updated(
        &mut self,
        path: String,
        destination: String,
        replacements: usize,
        warnings: Vec<TransformWarning>,
    ) {
        self.updated += 1;
        self.replacements += replacements;
        self.items.push(FileOutcome {
            destination: Some(destination),
            replacements,
            warnings,
            ..FileOutcome::new(path, "updated")
        });
    }

    pub fn record_unchanged(&mut self, path: String, warnings: Vec<TransformWarning>) {
        self.unchanged += 1;
        self.items.push(FileOutcome {
            warnings,
            ..FileOutcome::new(path, "unchanged")
        });
    }

    pub fn record_skipped(&mut self, path: String) {
        self.skipped += 1;
        self.items.push(FileOutcome::new(path, "skipped"));
    }

    pub fn record_error(&mut self, path: String, error: String) {
        self.errors += 1;
        self.items.push(FileOutcome {
            error: Some(error),
            ..FileOutcome::new(path, "error")
        });
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}
