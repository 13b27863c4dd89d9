//! Alias substitution that keeps the visual line wrapping of prose.
//!
//! A document goes through five stages:
//!
//! 1. [`breaks::scan`] collapses every line break into a working buffer and
//!    records where each one was.
//! 2. [`substitute::AliasMatcher`] replaces aliases with canonical names and
//!    moves the records along.
//! 3. [`reflow::reflow`] recomputes soft wraps in paragraphs whose widths
//!    changed (only when wrapping is preserved).
//! 4. [`mutation::plan`] turns the final records into mutations.
//! 5. [`mutation::apply`] applies them from the end of the buffer backwards.

pub mod breaks;
pub mod mutation;
pub mod reflow;
pub mod substitute;
pub mod width;

use serde::Serialize;

use crate::error::Result;

pub use breaks::{BreakKind, BreakRecord, ParagraphEndingSet};
pub use substitute::{AliasMatcher, DuplicateAlias, MappingTable};

pub const DEFAULT_TARGET_WIDTH: usize = 78;
pub const DEFAULT_TOLERANCE: usize = 4;

/// How soft wraps are treated after substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapPolicy {
    /// Recompute soft wraps in paragraphs whose display width changed.
    pub preserve_wrapping: bool,
    /// Line width, in columns, that recomputed wraps aim for.
    pub target_width: usize,
    /// Allowed distance from `target_width` before an existing wrap moves.
    pub tolerance: usize,
    /// Drop soft wraps from the output instead of restoring them.
    pub join_lines: bool,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self {
            preserve_wrapping: false,
            target_width: DEFAULT_TARGET_WIDTH,
            tolerance: DEFAULT_TOLERANCE,
            join_lines: false,
        }
    }
}

/// A non-fatal problem noticed while transforming a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformWarning {
    /// Warning category: `offset_clamped` or `duplicate_alias`.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    pub message: String,
}

impl TransformWarning {
    pub fn offset_clamped(original: usize, clamped: usize) -> Self {
        Self {
            kind: "offset_clamped".to_string(),
            offset: Some(clamped),
            message: format!(
                "Break offset {} fell outside its range and was moved to {}",
                original, clamped
            ),
        }
    }

    pub fn duplicate_alias(duplicate: &DuplicateAlias) -> Self {
        Self {
            kind: "duplicate_alias".to_string(),
            offset: None,
            message: format!(
                "Alias '{}' is listed under '{}' and '{}'; '{}' is used",
                duplicate.alias, duplicate.kept, duplicate.ignored, duplicate.kept
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutcome {
    pub content: String,
    pub replacements: usize,
    pub warnings: Vec<TransformWarning>,
}

/// Compiled patterns and policy, shared across every file of a run.
#[derive(Debug, Clone)]
pub struct Rewriter {
    matcher: AliasMatcher,
    endings: ParagraphEndingSet,
    policy: WrapPolicy,
}

impl Rewriter {
    pub fn new(
        table: &MappingTable,
        endings: &ParagraphEndingSet,
        policy: WrapPolicy,
    ) -> Result<Self> {
        Ok(Self {
            matcher: AliasMatcher::new(table)?,
            endings: endings.clone(),
            policy,
        })
    }

    pub fn rewrite(&self, content: &str) -> TransformOutcome {
        let scanned = breaks::scan(content, &self.endings);
        let sub = self.matcher.substitute(scanned);
        let replacements = sub.edits.len();

        if replacements == 0 && !self.policy.join_lines {
            return TransformOutcome {
                content: content.to_string(),
                replacements,
                warnings: Vec::new(),
            };
        }

        let mut warnings = Vec::new();
        let records = if self.policy.preserve_wrapping {
            reflow::reflow(&sub.buffer, sub.breaks, &sub.edits, &self.policy, &mut warnings)
        } else {
            sub.breaks
        };

        let mutations = mutation::plan(&records, self.policy.join_lines);
        let content = mutation::apply(sub.buffer, mutations, &mut warnings);

        TransformOutcome {
            content,
            replacements,
            warnings,
        }
    }
}

/// Replace every alias in `content` and restore its line structure.
pub fn transform(
    content: &str,
    table: &MappingTable,
    endings: &ParagraphEndingSet,
    policy: WrapPolicy,
) -> Result<String> {
    Ok(transform_with_report(content, table, endings, policy)?.content)
}

pub fn transform_with_report(
    content: &str,
    table: &MappingTable,
    endings: &ParagraphEndingSet,
    policy: WrapPolicy,
) -> Result<TransformOutcome> {
    Ok(Rewriter::new(table, endings, policy)?.rewrite(content))
}
