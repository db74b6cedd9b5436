//! Text Measurement
//!
//! Utilities for measuring text in terminal cells, backed by `unicode-width`:
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells
//! - Combining marks and other zero-width characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Display width of one character; control characters count as 0.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Longest prefix of `s` that fits in `max_width` cells.
///
/// A double-width character that would straddle the limit is dropped.
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > max_width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Truncate or right-pad `s` with spaces to exactly `width` cells.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let cut = truncate_to_width(s, width);
    let mut out = String::with_capacity(width);
    out.push_str(cut);
    let used = string_width(cut);
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Replace tabs with spaces up to the next multiple of `tab_width`, and drop
/// other control characters.
pub fn expand_tabs(line: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for c in line.chars() {
        match c {
            '\t' => {
                let next = (col / tab_width + 1) * tab_width;
                out.extend(std::iter::repeat_n(' ', next - col));
                col = next;
            }
            c if c.is_control() => {}
            c => {
                out.push(c);
                col += char_width(c);
            }
        }
    }
    out
}
