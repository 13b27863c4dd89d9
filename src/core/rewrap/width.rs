//! Display width of characters in fixed-width columns.
//!
//! Widths come from a sparse table of `(range_start, width)` entries sorted by
//! code point. A character takes the width of the last entry whose start is at
//! or below it, so a block without its own entry inherits the width of the
//! block before it.

/// `(first code point of range, columns)`, sorted ascending by start.
static WIDTH_TABLE: &[(u32, u8)] = &[
    (0x0000, 0), // control characters
    (0x0020, 1), // ASCII
    (0x007F, 0), // DEL
    (0x0080, 0), // C1 controls
    (0x00A0, 1), // Latin-1 Supplement
    (0x0100, 1), // Latin Extended
    (0x0250, 1), // IPA Extensions
    (0x02B0, 1), // Spacing Modifier Letters
    (0x0300, 0), // Combining Diacritical Marks
    (0x0370, 1), // Greek and Coptic
    (0x0400, 1), // Cyrillic
    (0x0500, 1), // Cyrillic Supplement
    (0x0530, 1), // Armenian
    (0x0590, 1), // Hebrew
    (0x0600, 1),
    (0x1100, 2), // Hangul Jamo
    (0x1200, 1), // Ethiopic
    (0x1380, 1), // Ethiopic Supplement
    (0x13A0, 1),
    (0x1800, 2), // Mongolian
    (0x1900, 1),
    (0x1950, 1), // Tai Le
    (0x1980, 1), // New Tai Lue
    (0x19E0, 1),
    (0x1A20, 1), // Tai Tham
    (0x1AB0, 0), // Combining Diacritical Marks Extended
    (0x1B00, 1),
    (0x1C80, 1), // Cyrillic Extended-C
    (0x1C90, 1),
    (0x1D00, 1), // Phonetic Extensions
    (0x1D80, 1), // Phonetic Extensions Supplement
    (0x1DC0, 1), // Combining Diacritical Marks Supplement
    (0x1E00, 1), // Latin Extended Additional
    (0x1F00, 1), // Greek Extended
    (0x2000, 1), // General Punctuation
    (0x2070, 1), // Superscripts and Subscripts
    (0x20A0, 1), // Currency Symbols
    (0x20D0, 0), // Combining Diacritical Marks for Symbols
    (0x2100, 1), // Letterlike Symbols
    (0x2139, 2),
    (0x213C, 1),
    (0x2150, 2), // Number Forms
    (0x2153, 1),
    (0x2160, 2),
    (0x216C, 1),
    (0x2170, 2),
    (0x217C, 1),
    (0x2180, 2),
    (0x2181, 1),
    (0x2182, 2),
    (0x2183, 1),
    (0x2186, 2),
    (0x2187, 1),
    (0x2188, 2),
    (0x218A, 1),
    (0x218C, 0),
    (0x2190, 1), // Arrows
    (0x2200, 1), // Mathematical Operators
    (0x2300, 1), // Miscellaneous Technical
    (0x231A, 2),
    (0x231C, 1),
    (0x2322, 0),
    (0x2324, 2),
    (0x2329, 1),
    (0x232B, 2),
    (0x232D, 1),
    (0x2384, 2),
    (0x238C, 1),
    (0x238F, 2),
    (0x2393, 1),
    (0x23DC, 0),
    (0x23E9, 2),
    (0x2400, 1), // Control Pictures
    (0x2440, 1), // Optical Character Recognition
    (0x2460, 1), // Enclosed Alphanumerics
    (0x2491, 2),
    (0x249C, 1),
    (0x2500, 1), // Box Drawing
    (0x2580, 1), // Block Elements
    (0x25A0, 1), // Geometric Shapes
    (0x2600, 1), // Miscellaneous Symbols
    (0x2700, 1), // Dingbats
    (0x27C0, 1), // Miscellaneous Mathematical Symbols-A
    (0x27F0, 1), // Supplemental Arrows-A
    (0x2800, 1), // Braille Patterns
    (0x2900, 1), // Supplemental Arrows-B
    (0x2980, 1), // Miscellaneous Mathematical Symbols-B
    (0x2A00, 1), // Supplemental Mathematical Operators
    (0x2B00, 1), // Miscellaneous Symbols and Arrows
    (0x2C00, 1), // Glagolitic
    (0x2C60, 1), // Latin Extended-C
    (0x2C80, 1), // Coptic
    (0x2D00, 1), // Georgian Supplement
    (0x2D30, 1), // Tifinagh
    (0x2D80, 1), // Ethiopic Extended
    (0x2DE0, 0), // Cyrillic Extended-A (combining)
    (0x2E00, 1), // Supplemental Punctuation
    (0x2E80, 2), // CJK Radicals Supplement
    (0x2F00, 2), // Kangxi Radicals
    (0x2FF0, 2), // Ideographic Description Characters
    (0x3000, 2), // CJK Symbols and Punctuation
    (0x3040, 2), // Hiragana
    (0x30A0, 2), // Katakana
    (0x3100, 2), // Bopomofo
    (0x3130, 2), // Hangul Compatibility Jamo
    (0x3190, 2), // Kanbun
    (0x31A0, 2), // Bopomofo Extended
    (0x31C0, 2), // CJK Strokes
    (0x31F0, 2), // Katakana Phonetic Extensions
    (0x3200, 2), // Enclosed CJK Letters and Months
    (0x3300, 2), // CJK Compatibility
    (0x3400, 2), // CJK Unified Ideographs Extension A
    (0x4DC0, 1), // Yijing Hexagram Symbols
    (0x4E00, 2), // CJK Unified Ideographs
    (0xA000, 2), // Yi Syllables
    (0xA490, 2), // Yi Radicals
    (0xA4D0, 1), // Lisu
    (0xA500, 1), // Vai
    (0xA640, 1), // Cyrillic Extended-B
    (0xA6A0, 1), // Bamum
    (0xA700, 1), // Modifier Tone Letters
    (0xA720, 1), // Latin Extended-D
    (0xA800, 1), // Syloti Nagri
    (0xA830, 1), // Common Indic Number Forms
    (0xA840, 1), // Phags-pa
    (0xA880, 1), // Saurashtra
    (0xA8E0, 1), // Devanagari Extended
    (0xA900, 1), // Kayah Li
    (0xA930, 1), // Rejang
    (0xA960, 2), // Hangul Jamo Extended-A
    (0xA980, 1), // Javanese
    (0xA9E0, 1), // Myanmar Extended-B
    (0xAA00, 1), // Cham
    (0xAA60, 1), // Myanmar Extended-A
    (0xAA80, 1), // Tai Viet
    (0xAAE0, 1), // Meetei Mayek Extensions
    (0xAB00, 1), // Ethiopic Extended-A
    (0xAB30, 1), // Latin Extended-E
    (0xAB70, 1), // Cherokee Supplement
    (0xABC0, 1), // Meetei Mayek
    (0xAC00, 2), // Hangul Syllables
    (0xD7B0, 1), // Hangul Jamo Extended-B
    (0xD800, 0), // surrogates
    (0xE000, 1), // Private Use Area
    (0xF900, 2), // CJK Compatibility Ideographs
    (0xFB00, 1), // Alphabetic Presentation Forms
    (0xFB50, 1), // Arabic Presentation Forms-A
    (0xFE00, 0), // Variation Selectors
    (0xFE10, 2), // Vertical Forms
    (0xFE20, 0), // Combining Half Marks
    (0xFE30, 2), // CJK Compatibility Forms
    (0xFE50, 2), // Small Form Variants
    (0xFE70, 1), // Arabic Presentation Forms-B
    (0xFF00, 2), // Fullwidth Forms
    (0xFF61, 1), // Halfwidth Forms
    (0xFFE0, 2),
    (0xFFE8, 1),
    (0xFFF0, 1), // Specials
    (0x10000, 1),
    (0x1F300, 2), // Miscellaneous Symbols and Pictographs, Emoticons
    (0x1F650, 1),
    (0x1F680, 2), // Transport and Map Symbols
    (0x1F700, 1),
    (0x1F900, 2), // Supplemental Symbols and Pictographs
    (0x1FB00, 1),
    (0x20000, 2), // CJK Unified Ideographs Extension B and later
    (0x3FFFE, 1),
    (0xE0000, 0), // Tags, Variation Selectors Supplement
    (0xE01F0, 1),
];

/// Columns occupied by `c`: 0, 1, or 2.
pub fn char_width(c: char) -> usize {
    let cp = c as u32;
    let idx = WIDTH_TABLE.partition_point(|&(start, _)| start <= cp);
    // The first entry starts at 0, so idx is at least 1.
    WIDTH_TABLE[idx.saturating_sub(1)].1 as usize
}

/// Whether `c` renders in a single column or less.
pub fn is_narrow(c: char) -> bool {
    char_width(c) <= 1
}

/// Total display width of `s`.
pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Walk `text` from byte offset `start` until `columns` display columns are
/// filled.
///
/// Stops before the first character that would exceed `columns`; zero-width
/// characters directly after the stop point stay with their base character.
/// Returns the byte offset reached and the signed deviation from `columns`,
/// which is negative when a double-width character straddles the boundary or
/// the text runs out first.
pub fn advance(text: &str, start: usize, columns: usize) -> (usize, isize) {
    let mut reached = 0usize;
    let mut end = start;

    for (offset, c) in text[start..].char_indices() {
        let w = char_width(c);
        if reached + w > columns {
            return (start + offset, reached as isize - columns as isize);
        }
        reached += w;
        end = start + offset + c.len_utf8();
    }

    (end, reached as isize - columns as isize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_starts_at_zero() {
        assert_eq!(WIDTH_TABLE[0].0, 0);
        assert!(WIDTH_TABLE.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(WIDTH_TABLE.iter().all(|&(_, w)| w <= 2));
    }

    #[test]
    fn common_scripts() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width(' '), 1);
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('\u{7f}'), 0);
        assert_eq!(char_width('é'), 1);
        assert_eq!(char_width('Ж'), 1);
        assert_eq!(char_width('\u{301}'), 0);
        assert_eq!(char_width('张'), 2);
        assert_eq!(char_width('。'), 2);
        assert_eq!(char_width('の'), 2);
        assert_eq!(char_width('한'), 2);
        assert_eq!(char_width('，'), 2);
        assert_eq!(char_width('ｱ'), 1);
        assert_eq!(char_width('😀'), 2);
    }

    #[test]
    fn uncovered_ranges_inherit_previous_entry() {
        // 0x0700 (Syriac) has no entry of its own and inherits 0x0600.
        assert_eq!(char_width('\u{0700}'), 1);
        // 0x9FFF is still inside the CJK Unified Ideographs entry.
        assert_eq!(char_width('\u{9fff}'), 2);
    }

    #[test]
    fn exact_range_boundaries() {
        assert_eq!(char_width('\u{2138}'), 1);
        assert_eq!(char_width('\u{2139}'), 2);
        assert_eq!(char_width('\u{213c}'), 1);
    }

    #[test]
    fn str_width_sums() {
        assert_eq!(str_width(""), 0);
        assert_eq!(str_width("abc"), 3);
        assert_eq!(str_width("老张abc"), 7);
    }

    #[test]
    fn advance_over_full_segment_matches_str_width() {
        for s in ["", "hello world", "老张去了,张哥也去了", "mixed 文字 text", "e\u{301}t\u{e9}"] {
            assert_eq!(advance(s, 0, str_width(s)), (s.len(), 0), "segment {:?}", s);
        }
    }

    #[test]
    fn advance_stops_before_straddling_wide_char() {
        // "ab" = 2 columns, then a wide char would reach 4 > 3.
        let (end, dev) = advance("ab张c", 0, 3);
        assert_eq!(end, 2);
        assert_eq!(dev, -1);
    }

    #[test]
    fn advance_from_offset() {
        let text = "老张去了";
        let (end, dev) = advance(text, '老'.len_utf8(), 4);
        assert_eq!(&text[..end], "老张去");
        assert_eq!(dev, 0);
    }

    #[test]
    fn advance_keeps_combining_marks_with_base() {
        let text = "ae\u{301}x";
        let (end, dev) = advance(text, 0, 2);
        assert_eq!(&text[..end], "ae\u{301}");
        assert_eq!(dev, 0);
    }

    #[test]
    fn advance_reports_undershoot_at_end_of_text() {
        assert_eq!(advance("abc", 0, 10), (3, -7));
    }
}
