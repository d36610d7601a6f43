//! Terminal cell width of chars.
//!
//! Every layout decision (physical line wrapping in the editor, cursor
//! placement while streaming) goes through these two functions so the two
//! paths can never disagree about how wide a glyph is.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width in terminal cells of `c`. Wide East Asian glyphs occupy 2 cells;
/// control characters and zero-width marks occupy none.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Width in terminal cells of `s` (no ANSI awareness; strip escapes first).
pub fn str_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}
