//! Line-break scanning.
//!
//! Splits raw text into a working buffer without line breaks plus an ordered
//! list of [`BreakRecord`]s that remember where each break was and how to
//! restore it.

use regex::Regex;

use super::width::is_narrow;
use crate::error::{Error, Result};

/// Stands in for a collapsed paragraph-ending marker in the working buffer.
///
/// Aliases may not contain it, so no substitution can span two paragraphs.
pub const PARAGRAPH_PLACEHOLDER: char = '\u{2029}';

/// Stands in for a soft wrap that separated two narrow words.
pub const JOIN_PLACEHOLDER: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakKind {
    /// A visual wrap. When `join_with_space` is set, the buffer holds a
    /// [`JOIN_PLACEHOLDER`] at the record's position; otherwise the break
    /// occupies no buffer space.
    SoftWrap { join_with_space: bool },
    /// A true paragraph boundary. The buffer holds one
    /// [`PARAGRAPH_PLACEHOLDER`] at the record's position.
    ParagraphEnd { marker: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakRecord {
    /// Byte offset into the current working buffer.
    pub position: usize,
    pub kind: BreakKind,
}

impl BreakRecord {
    pub fn soft(position: usize, join_with_space: bool) -> Self {
        Self {
            position,
            kind: BreakKind::SoftWrap { join_with_space },
        }
    }

    pub fn paragraph(position: usize, marker: impl Into<String>) -> Self {
        Self {
            position,
            kind: BreakKind::ParagraphEnd {
                marker: marker.into(),
            },
        }
    }

    pub fn is_paragraph_end(&self) -> bool {
        matches!(self.kind, BreakKind::ParagraphEnd { .. })
    }

    /// Bytes the record occupies in the working buffer.
    pub fn placeholder_len(&self) -> usize {
        match self.kind {
            BreakKind::SoftWrap {
                join_with_space: true,
            } => JOIN_PLACEHOLDER.len_utf8(),
            BreakKind::SoftWrap {
                join_with_space: false,
            } => 0,
            BreakKind::ParagraphEnd { .. } => PARAGRAPH_PLACEHOLDER.len_utf8(),
        }
    }

    /// Offset where the line after this break begins.
    pub fn resume_at(&self) -> usize {
        self.position + self.placeholder_len()
    }
}

/// Ordered paragraph-ending markers, compiled into one alternation.
///
/// Earlier markers take precedence when two could match at the same offset,
/// so longer markers should be listed first.
#[derive(Debug, Clone)]
pub struct ParagraphEndingSet {
    markers: Vec<String>,
    pattern: Option<Regex>,
}

impl ParagraphEndingSet {
    pub fn new<I, S>(markers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers.into_iter().map(Into::into).collect();

        for marker in &markers {
            if marker.is_empty() {
                return Err(Error::pattern_invalid(
                    "paraEnding",
                    Some(marker.clone()),
                    "Paragraph ending markers must not be empty",
                ));
            }
            if !marker.contains('\n') {
                log_status!(
                    "config",
                    "Paragraph ending {:?} has no line break and will never match",
                    marker
                );
            }
        }

        let pattern = if markers.is_empty() {
            None
        } else {
            let alternation = markers
                .iter()
                .map(|m| regex::escape(m))
                .collect::<Vec<_>>()
                .join("|");
            let compiled = Regex::new(&alternation).map_err(|e| {
                Error::pattern_invalid("paraEnding", Some(alternation.clone()), e.to_string())
            })?;
            Some(compiled)
        };

        Ok(Self { markers, pattern })
    }

    pub fn empty() -> Self {
        Self {
            markers: Vec::new(),
            pattern: None,
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker spans in `text` that cover at least one line break.
    fn spans(&self, text: &str) -> Vec<(usize, usize)> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .find_iter(text)
            .filter(|m| m.as_str().contains('\n'))
            .map(|m| (m.start(), m.end()))
            .collect()
    }
}

/// Result of scanning one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub buffer: String,
    pub breaks: Vec<BreakRecord>,
}

/// Whether a soft wrap between `before` and `after` must leave a space so the
/// two sides do not fuse into one word.
pub fn joins_with_space(before: Option<char>, after: Option<char>) -> bool {
    match (before, after) {
        (Some(b), Some(a)) => {
            is_narrow(b)
                && is_narrow(a)
                && !b.is_whitespace()
                && !a.is_whitespace()
                && b != '-'
                && a != '-'
        }
        _ => false,
    }
}

/// Collapse every line break in `text` into the working buffer, recording a
/// [`BreakRecord`] for each one.
pub fn scan(text: &str, endings: &ParagraphEndingSet) -> Scan {
    let spans = endings.spans(text);
    let mut spans = spans.into_iter().peekable();

    let mut buffer = String::with_capacity(text.len());
    let mut breaks = Vec::new();
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if let Some(&(start, end)) = spans.peek() {
            if start == offset {
                breaks.push(BreakRecord::paragraph(buffer.len(), &text[start..end]));
                buffer.push(PARAGRAPH_PLACEHOLDER);
                spans.next();

                prev = text[..end].chars().next_back();
                while chars.peek().is_some_and(|&(o, _)| o < end) {
                    chars.next();
                }
                continue;
            }
        }

        if c == '\n' {
            let next = chars.peek().map(|&(_, n)| n);
            let join = joins_with_space(prev, next);
            breaks.push(BreakRecord::soft(buffer.len(), join));
            if join {
                buffer.push(JOIN_PLACEHOLDER);
            }
        } else {
            buffer.push(c);
        }
        prev = Some(c);
    }

    Scan { buffer, breaks }
}
