//! Turning final break records back into line breaks.

use std::cmp::Reverse;

use super::breaks::{BreakKind, BreakRecord, JOIN_PLACEHOLDER, PARAGRAPH_PLACEHOLDER};
use super::TransformWarning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the placeholder character `expect` at `at` with `text`.
    Replace {
        at: usize,
        expect: char,
        text: String,
    },
    /// Insert `text` before the character at `at`.
    Insert { at: usize, text: String },
}

impl Mutation {
    pub fn offset(&self) -> usize {
        match self {
            Mutation::Replace { at, .. } | Mutation::Insert { at, .. } => *at,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Mutation::Replace { .. } => 0,
            Mutation::Insert { .. } => 1,
        }
    }
}

/// One mutation per record. With `join_lines`, soft wraps produce none.
pub fn plan(breaks: &[BreakRecord], join_lines: bool) -> Vec<Mutation> {
    breaks
        .iter()
        .filter_map(|record| match &record.kind {
            BreakKind::ParagraphEnd { marker } => Some(Mutation::Replace {
                at: record.position,
                expect: PARAGRAPH_PLACEHOLDER,
                text: marker.clone(),
            }),
            BreakKind::SoftWrap { .. } if join_lines => None,
            BreakKind::SoftWrap {
                join_with_space: true,
            } => Some(Mutation::Replace {
                at: record.position,
                expect: JOIN_PLACEHOLDER,
                text: "\n".to_string(),
            }),
            BreakKind::SoftWrap {
                join_with_space: false,
            } => Some(Mutation::Insert {
                at: record.position,
                text: "\n".to_string(),
            }),
        })
        .collect()
}

/// Apply mutations from the highest offset down so earlier offsets stay valid.
///
/// At equal offsets replacements go first, which leaves inserted text ahead of
/// the replaced placeholder.
pub fn apply(
    mut buffer: String,
    mut mutations: Vec<Mutation>,
    warnings: &mut Vec<TransformWarning>,
) -> String {
    mutations.sort_by_key(|m| (Reverse(m.offset()), m.rank()));

    for mutation in mutations {
        match mutation {
            Mutation::Replace { at, expect, text } => {
                if buffer.get(at..).is_some_and(|rest| rest.starts_with(expect)) {
                    buffer.replace_range(at..at + expect.len_utf8(), &text);
                } else {
                    let clamped = clamp_offset(&buffer, at);
                    warnings.push(TransformWarning::offset_clamped(at, clamped));
                    buffer.insert_str(clamped, &text);
                }
            }
            Mutation::Insert { at, text } => {
                let clamped = clamp_offset(&buffer, at);
                if clamped != at {
                    warnings.push(TransformWarning::offset_clamped(at, clamped));
                }
                buffer.insert_str(clamped, &text);
            }
        }
    }

    buffer
}

fn clamp_offset(buffer: &str, at: usize) -> usize {
    let mut at = at.min(buffer.len());
    while !buffer.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_maps_each_record_kind() {
        let breaks = vec![
            BreakRecord::soft(1, true),
            BreakRecord::soft(3, false),
            BreakRecord::paragraph(5, "\n\n"),
        ];
        assert_eq!(
            plan(&breaks, false),
            vec![
                Mutation::Replace {
                    at: 1,
                    expect: ' ',
                    text: "\n".to_string()
                },
                Mutation::Insert {
                    at: 3,
                    text: "\n".to_string()
                },
                Mutation::Replace {
                    at: 5,
                    expect: '\u{2029}',
                    text: "\n\n".to_string()
                },
            ]
        );
    }

    #[test]
    fn join_lines_keeps_only_paragraph_ends() {
        let breaks = vec![BreakRecord::soft(1, true), BreakRecord::paragraph(5, "\n\n")];
        let planned = plan(&breaks, true);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].offset(), 5);
    }

    #[test]
    fn apply_restores_breaks() {
        let buffer = "ab cd\u{2029}ef".to_string();
        let breaks = vec![
            BreakRecord::soft(2, true),
            BreakRecord::soft(4, false),
            BreakRecord::paragraph(5, "\n\n"),
        ];
        let mut warnings = Vec::new();
        let out = apply(buffer, plan(&breaks, false), &mut warnings);
        assert_eq!(out, "ab\nc\nd\n\nef");
        assert!(warnings.is_empty());
    }

    #[test]
    fn insert_lands_before_replacement_at_same_offset() {
        let buffer = "a\u{2029}b".to_string();
        let breaks = vec![BreakRecord::soft(1, false), BreakRecord::paragraph(1, "\n\n")];
        let mut warnings = Vec::new();
        let out = apply(buffer, plan(&breaks, false), &mut warnings);
        assert_eq!(out, "a\n\n\nb");
    }

    #[test]
    fn out_of_range_offsets_are_clamped_with_warning() {
        let mut warnings = Vec::new();
        let out = apply(
            "张三".to_string(),
            vec![
                Mutation::Insert {
                    at: 40,
                    text: "\n".to_string(),
                },
                Mutation::Insert {
                    at: 1,
                    text: "\n".to_string(),
                },
            ],
            &mut warnings,
        );
        assert_eq!(out, "\n张三\n");
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.kind == "offset_clamped"));
    }
}
