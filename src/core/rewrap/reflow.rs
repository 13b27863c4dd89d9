//! Soft-wrap recalculation for paragraphs whose line widths changed.
//!
//! Only paragraphs holding at least one width-changing substitution are
//! touched, and only from the line holding the first such substitution
//! onward. Existing wraps are kept while their line stays within tolerance of
//! the target width; otherwise a new wrap point is derived from display
//! widths. Wraps only move to existing character boundaries.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use super::breaks::{BreakRecord, JOIN_PLACEHOLDER};
use super::substitute::Edit;
use super::width::{advance, char_width, is_narrow, str_width};
use super::{TransformWarning, WrapPolicy};

/// Characters that must not end a line (opening brackets, quotes, currency).
pub static AVOID_LINE_END: &str = "$([{£¥·‘“〈《「『【〔〖〝﹙﹛﹝＄（．［｛￡￥";

/// Characters that must not start a line (closing brackets, quotes, stops).
pub static AVOID_LINE_START: &str = "!%),.:;>?]}¢¨°·ˇˉ―‖’”…‰′″›℃∶、。〃〉》」』】〕〗〞︶︺︾﹀﹄﹚﹜﹞！＂％＇），．：；？］｀｜｝～￠";

/// Recompute soft wraps in every paragraph touched by a width-changing edit.
///
/// `breaks` must be sorted by position. The result is sorted too.
pub fn reflow(
    buffer: &str,
    breaks: Vec<BreakRecord>,
    edits: &[Edit],
    policy: &WrapPolicy,
    warnings: &mut Vec<TransformWarning>,
) -> Vec<BreakRecord> {
    let mut out = Vec::with_capacity(breaks.len());
    let mut soft = Vec::new();
    let mut para_start = 0;

    for record in breaks {
        if record.is_paragraph_end() {
            let para_end = record.position;
            out.extend(reflow_paragraph(
                buffer,
                para_start..para_end,
                std::mem::take(&mut soft),
                edits,
                policy,
                warnings,
            ));
            para_start = record.resume_at();
            out.push(record);
        } else {
            soft.push(record);
        }
    }
    out.extend(reflow_paragraph(
        buffer,
        para_start..buffer.len(),
        soft,
        edits,
        policy,
        warnings,
    ));

    out
}

fn reflow_paragraph(
    buffer: &str,
    para: std::ops::Range<usize>,
    soft: Vec<BreakRecord>,
    edits: &[Edit],
    policy: &WrapPolicy,
    warnings: &mut Vec<TransformWarning>,
) -> Vec<BreakRecord> {
    let first_edit = edits
        .iter()
        .find(|e| e.width_delta != 0 && para.contains(&e.start))
        .map(|e| e.start);

    let Some(edit_start) = first_edit else {
        return soft;
    };

    let target = policy.target_width as isize;
    let tolerance = policy.tolerance as isize;

    // Wraps that close a line ahead of the edited one stay as they are, as do
    // wraps sitting right at the paragraph end.
    let mut kept = Vec::new();
    let mut tail = Vec::new();
    let mut pending = VecDeque::new();
    for record in soft {
        if record.resume_at() <= edit_start {
            kept.push(record);
        } else if record.position >= para.end {
            tail.push(record);
        } else {
            pending.push_back(record);
        }
    }

    let mut cursor = kept.last().map_or(para.start, BreakRecord::resume_at);
    let mut carry: isize = 0;

    loop {
        while pending.front().is_some_and(|r| r.position < cursor) {
            pending.pop_front();
        }

        if let Some(old) = pending.front() {
            let width = str_width(&buffer[cursor..old.position]) as isize;
            if (width - target).abs() <= tolerance {
                carry = width - target;
                cursor = old.resume_at();
                if let Some(old) = pending.pop_front() {
                    kept.push(old);
                }
                continue;
            }
        }

        let rest = str_width(&buffer[cursor..para.end]) as isize;
        if rest <= target + tolerance {
            break;
        }

        let lo = (target - tolerance).max(1);
        let hi = (target + tolerance).max(lo);
        let goal = (target - carry).clamp(lo, hi);
        let position = choose_break_within(
            buffer,
            cursor,
            para.end,
            goal as usize,
            lo as usize..=hi as usize,
        );
        if position >= para.end {
            break;
        }

        let position = clamp_into(buffer, position, cursor, para.end, warnings);
        let record = BreakRecord::soft(position, buffer[position..].starts_with(JOIN_PLACEHOLDER));

        carry = str_width(&buffer[cursor..position]) as isize - target;
        cursor = record.resume_at();
        kept.push(record);

        while pending.front().is_some_and(|r| r.position <= position) {
            pending.pop_front();
        }
    }

    kept.extend(tail);
    kept
}

/// Pick the legal wrap offset whose line width lies in `window` and is
/// closest to `goal`, preferring the leftmost on ties.
///
/// Falls back to [`choose_break`] when no offset in the window is legal, as
/// happens with one long word or a long run of forbidden punctuation.
fn choose_break_within(
    buffer: &str,
    cursor: usize,
    end: usize,
    goal: usize,
    window: RangeInclusive<usize>,
) -> usize {
    let line = &buffer[..end];
    let mut width = 0;
    let mut best: Option<(usize, usize)> = None;

    for (offset, c) in line[cursor..].char_indices() {
        width += char_width(c);
        if width > *window.end() {
            break;
        }
        let pos = cursor + offset + c.len_utf8();
        if pos >= end {
            break;
        }
        if width < *window.start() || !is_legal_break(line, pos) {
            continue;
        }
        let distance = width.abs_diff(goal);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, pos));
        }
    }

    match best {
        Some((_, pos)) => pos,
        None => choose_break(buffer, cursor, end, goal),
    }
}

/// A wrap opportunity that leaves no trailing space, splits no combining
/// mark, and respects both punctuation sets.
fn is_legal_break(text: &str, pos: usize) -> bool {
    let before = char_before(text, pos);
    let after = char_at(text, pos);
    is_wrap_opportunity(text, pos)
        && before != Some(' ')
        && !before.is_some_and(|c| AVOID_LINE_END.contains(c))
        && !after.is_some_and(|c| AVOID_LINE_START.contains(c) || char_width(c) == 0)
}

/// Pick a wrap offset in `cursor..end` whose line width lands near `goal`.
///
/// Returns `end` when the rest of the paragraph has no legal wrap point.
fn choose_break(buffer: &str, cursor: usize, end: usize, goal: usize) -> usize {
    let line = &buffer[..end];
    let (mut pos, _) = advance(line, cursor, goal);
    if pos >= end {
        return end;
    }
    if pos == cursor {
        // A single character is wider than the goal; give it its own line.
        pos = next_boundary(line, cursor);
        if pos >= end {
            return end;
        }
    }

    if !is_wrap_opportunity(line, pos) {
        let left = (cursor + 1..pos)
            .rev()
            .filter(|&p| line.is_char_boundary(p))
            .find(|&p| is_wrap_opportunity(line, p));
        let right = || {
            (pos + 1..end)
                .filter(|&p| line.is_char_boundary(p))
                .find(|&p| is_wrap_opportunity(line, p))
        };
        match left.or_else(right) {
            Some(p) => pos = p,
            None => return end,
        }
    }

    // End the line on the space itself so the wrap replaces it.
    if char_before(line, pos) == Some(' ') && prev_boundary(line, pos) > cursor {
        pos = prev_boundary(line, pos);
    }

    while pos > cursor {
        let prev = prev_boundary(line, pos);
        if prev <= cursor || !char_before(line, pos).is_some_and(|c| AVOID_LINE_END.contains(c)) {
            break;
        }
        pos = prev;
    }

    while pos < end && char_at(line, pos).is_some_and(|c| AVOID_LINE_START.contains(c)) {
        pos = next_boundary(line, pos);
    }

    pos
}

/// Whether a line may end right before byte offset `pos`.
///
/// Never splits two touching narrow characters (a word), but any boundary
/// next to a wide character, a space, or after a hyphen is fine.
fn is_wrap_opportunity(text: &str, pos: usize) -> bool {
    let (Some(before), Some(after)) = (char_before(text, pos), char_at(text, pos)) else {
        return false;
    };
    after.is_whitespace()
        || before.is_whitespace()
        || before == '-'
        || !is_narrow(before)
        || !is_narrow(after)
}

fn clamp_into(
    buffer: &str,
    position: usize,
    min: usize,
    max: usize,
    warnings: &mut Vec<TransformWarning>,
) -> usize {
    if (min..max).contains(&position) && buffer.is_char_boundary(position) {
        return position;
    }

    let mut clamped = position.clamp(min, max);
    while !buffer.is_char_boundary(clamped) {
        clamped -= 1;
    }
    warnings.push(TransformWarning::offset_clamped(position, clamped));
    clamped
}

fn char_before(text: &str, pos: usize) -> Option<char> {
    text[..pos].chars().next_back()
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

fn prev_boundary(text: &str, pos: usize) -> usize {
    char_before(text, pos).map_or(pos, |c| pos - c.len_utf8())
}

fn next_boundary(text: &str, pos: usize) -> usize {
    char_at(text, pos).map_or(pos, |c| pos + c.len_utf8())
}
