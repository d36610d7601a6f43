//! Word and logical-line boundary scanning.
//!
//! Pure queries over a `Buffer` + cursor offset: nothing here mutates state,
//! so every function is directly testable against literal fixtures. A "word"
//! is a maximal run of chars that are neither whitespace nor listed in the
//! caller's delimiter set. A "logical line" is a `\n`-delimited span; wrapped
//! physical lines are a screen concern and live in `core-model`.

use crate::Buffer;

/// Default delimiter set (in addition to whitespace, which always splits words).
pub const DEFAULT_WORD_DELIMITERS: &str = ";:,.[]{}()/\\|^&*-=+'\"\u{2013}\u{2014}\u{2015}";

/// True iff `c` is part of a word under `delimiters`.
pub fn in_word(c: char, delimiters: &str) -> bool {
    !c.is_whitespace() && !delimiters.contains(c)
}

fn in_word_at(buf: &Buffer, idx: usize, delimiters: &str) -> bool {
    buf.char_at(idx).is_some_and(|c| in_word(c, delimiters))
}

/// End of the current word, or of the next word when the cursor sits between
/// words. Returns `buf.len()` when no word follows.
pub fn find_forward_word_point(buf: &Buffer, cursor: usize, delimiters: &str) -> usize {
    let len = buf.len();
    let mut i = cursor.min(len);
    if i == len {
        return i;
    }
    if !in_word_at(buf, i, delimiters) {
        // Scan to the end of the current non-word run.
        while i < len && !in_word_at(buf, i, delimiters) {
            i += 1;
        }
    }
    while i < len && in_word_at(buf, i, delimiters) {
        i += 1;
    }
    i
}

/// Start of the next word (skips the rest of the current word first).
pub fn find_next_word_point(buf: &Buffer, cursor: usize, delimiters: &str) -> usize {
    let len = buf.len();
    let mut i = cursor.min(len);
    if i == len {
        return i;
    }
    if in_word_at(buf, i, delimiters) {
        while i < len && in_word_at(buf, i, delimiters) {
            i += 1;
        }
    }
    while i < len && !in_word_at(buf, i, delimiters) {
        i += 1;
    }
    i
}

/// Start of the current word, or of the previous word when the char before the
/// cursor is not part of a word. Returns 0 at the buffer start.
pub fn find_backward_word_point(buf: &Buffer, cursor: usize, delimiters: &str) -> usize {
    let cursor = cursor.min(buf.len());
    if cursor == 0 {
        return 0;
    }
    let mut i = cursor - 1;
    if !in_word_at(buf, i, delimiters) {
        // Scan backwards until we are at the end of the previous word.
        while i > 0 && !in_word_at(buf, i, delimiters) {
            i -= 1;
        }
    }
    while i > 0 {
        if !in_word_at(buf, i, delimiters) {
            return i + 1;
        }
        i -= 1;
    }
    i
}

/// Offset of the first char of the logical line containing `offset`.
pub fn beginning_of_line_pos(buf: &Buffer, offset: usize) -> usize {
    let mut i = offset.min(buf.len());
    while i > 0 {
        if buf.char_at(i - 1) == Some('\n') {
            return i;
        }
        i -= 1;
    }
    0
}

/// Offset of the *last char* of the logical line containing `offset`, i.e.
/// the char just before the terminating `\n` (or the final char of the
/// buffer). When `offset` already sits on the `\n` or at the buffer end the
/// offset itself is returned.
pub fn end_of_logical_line_pos(buf: &Buffer, offset: usize) -> usize {
    let mut end = offset;
    for (i, c) in buf.chars_from(offset).enumerate() {
        if c == '\n' {
            break;
        }
        end = offset + i;
    }
    end
}

/// Offset of the `\n` that terminates the logical line containing `offset`, or
/// `buf.len()` on the last line. This is where the cursor rests for
/// "end of line".
pub fn logical_line_end(buf: &Buffer, offset: usize) -> usize {
    let offset = offset.min(buf.len());
    buf.chars_from(offset)
        .position(|c| c == '\n')
        .map_or(buf.len(), |p| offset + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: &str = DEFAULT_WORD_DELIMITERS;

    #[test]
    fn forward_word_point_lands_on_word_end() {
        let buf = Buffer::from_text("foo bar  baz");
        assert_eq!(find_forward_word_point(&buf, 0, D), 3);
        assert_eq!(find_forward_word_point(&buf, 3, D), 7);
        assert_eq!(find_forward_word_point(&buf, 7, D), 12);
        assert_eq!(find_forward_word_point(&buf, 12, D), 12);
    }

    #[test]
    fn next_word_point_lands_on_word_start() {
        let buf = Buffer::from_text("foo bar  baz");
        assert_eq!(find_next_word_point(&buf, 0, D), 4);
        assert_eq!(find_next_word_point(&buf, 4, D), 9);
        assert_eq!(find_next_word_point(&buf, 9, D), 12);
        // from inside the gap the current non-word run is skipped
        assert_eq!(find_next_word_point(&buf, 7, D), 9);
    }

    #[test]
    fn backward_word_point_lands_on_word_start() {
        let buf = Buffer::from_text("foo bar  baz");
        assert_eq!(find_backward_word_point(&buf, 12, D), 9);
        assert_eq!(find_backward_word_point(&buf, 9, D), 4);
        assert_eq!(find_backward_word_point(&buf, 5, D), 4);
        assert_eq!(find_backward_word_point(&buf, 4, D), 0);
        assert_eq!(find_backward_word_point(&buf, 0, D), 0);
    }

    #[test]
    fn delimiters_split_words() {
        let buf = Buffer::from_text("a.b-c d");
        assert_eq!(find_forward_word_point(&buf, 0, D), 1);
        assert_eq!(find_forward_word_point(&buf, 0, ""), 5);
        assert_eq!(find_backward_word_point(&buf, 5, D), 4);
        assert_eq!(find_backward_word_point(&buf, 5, ""), 0);
    }

    #[test]
    fn leading_whitespace_backward_returns_zero() {
        let buf = Buffer::from_text("   x");
        assert_eq!(find_backward_word_point(&buf, 3, D), 0);
    }

    #[test]
    fn logical_line_helpers() {
        let buf = Buffer::from_text("line1\nline2\nline3");
        assert_eq!(beginning_of_line_pos(&buf, 8), 6);
        assert_eq!(beginning_of_line_pos(&buf, 6), 6);
        assert_eq!(beginning_of_line_pos(&buf, 3), 0);
        assert_eq!(end_of_logical_line_pos(&buf, 6), 10);
        assert_eq!(end_of_logical_line_pos(&buf, 11), 11);
        assert_eq!(end_of_logical_line_pos(&buf, 14), 16);
        assert_eq!(logical_line_end(&buf, 6), 11);
        assert_eq!(logical_line_end(&buf, 11), 11);
        assert_eq!(logical_line_end(&buf, 13), 17);
    }

    #[test]
    fn queries_never_exceed_bounds() {
        let buf = Buffer::from_text("");
        assert_eq!(find_forward_word_point(&buf, 0, D), 0);
        assert_eq!(find_next_word_point(&buf, 0, D), 0);
        assert_eq!(find_backward_word_point(&buf, 0, D), 0);
        assert_eq!(beginning_of_line_pos(&buf, 0), 0);
        assert_eq!(logical_line_end(&buf, 0), 0);
    }
}
