//! Offset <-> screen point conversion with terminal wrapping.
//!
//! Wrapping rules shared by every walk:
//! * `\n` moves to the next row; the column resets to the continuation
//!   indent (the continuation prompt width for the editor, 0 for a stream).
//! * A char that exactly fills the row leaves the cursor at column 0 of the
//!   next row, unless the next char is a `\n` that is also part of the walk
//!   (that newline does the advance, so the row is not counted twice).
//! * A char that overflows the row moves entirely to the next row.
//! * After the walk, if the char *following* the target offset is too wide
//!   for the space left, the cursor is reported where that char will land.

use core_text::{Buffer, char_width};

use crate::Point;

/// Geometry of an input region on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Cell where the first buffer char is drawn (right after the prompt).
    pub initial: Point,
    /// Terminal buffer width in cells.
    pub buffer_width: i32,
    /// Column where text resumes after a `\n`.
    pub continuation_prompt_width: i32,
}

impl ScreenLayout {
    pub fn new(initial: Point, buffer_width: i32, continuation_prompt_width: i32) -> Self {
        Self {
            initial,
            buffer_width,
            continuation_prompt_width,
        }
    }

    fn width(&self) -> i32 {
        self.buffer_width.max(1)
    }

    /// Screen cell of the char at `offset` (clamped to the buffer length).
    pub fn offset_to_point(&self, buf: &Buffer, offset: usize) -> Point {
        let width = self.width();
        let offset = offset.min(buf.len());
        let mut p = self.initial;
        let mut chars = buf.chars_from(0).peekable();
        for i in 0..offset {
            let Some(c) = chars.next() else { break };
            if c == '\n' {
                p.y += 1;
                p.x = self.continuation_prompt_width;
            } else {
                // The char at `offset` is not walked, so it cannot absorb a wrap.
                let next = if i + 1 < offset { chars.peek().copied() } else { None };
                wrap_step(&mut p, cell_width(c), width, next);
            }
        }
        spill(&mut p, chars.peek().copied(), width);
        p
    }

    /// Buffer offset displayed at `point`.
    ///
    /// When the row is shorter than `point.x` the offset of the row's end is
    /// returned. `None` means the row lies outside the rendered input.
    pub fn point_to_offset(&self, buf: &Buffer, point: Point) -> Option<usize> {
        let width = self.width();
        let mut p = self.initial;
        let mut offset = 0usize;
        let mut chars = buf.chars_from(0).peekable();
        while let Some(c) = chars.next() {
            if point.y == p.y && point.x <= p.x {
                return Some(offset);
            }
            if c == '\n' {
                // Leaving the wanted row: it was shorter than the column.
                if point.y == p.y {
                    return Some(offset);
                }
                p.y += 1;
                p.x = self.continuation_prompt_width;
            } else {
                wrap_step(&mut p, cell_width(c), width, chars.peek().copied());
            }
            offset += 1;
        }
        (point.y == p.y).then_some(offset)
    }
}

/// Walk `text` (already stripped of escape sequences) from `start` on a
/// terminal `buffer_width` cells wide and return where the cursor ends up.
pub fn advance_point(start: Point, text: &str, buffer_width: i32) -> Point {
    let width = buffer_width.max(1);
    let mut p = start;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            p.y += 1;
            p.x = 0;
        } else {
            wrap_step(&mut p, cell_width(c), width, chars.peek().copied());
        }
    }
    p
}

fn cell_width(c: char) -> i32 {
    i32::try_from(char_width(c)).unwrap_or(i32::MAX)
}

fn wrap_step(p: &mut Point, size: i32, width: i32, next: Option<char>) {
    p.x += size;
    if p.x >= width {
        p.x = if p.x == width { 0 } else { size };
        if p.x != 0 || next != Some('\n') {
            p.y += 1;
        }
    }
}

fn spill(p: &mut Point, following: Option<char>, width: i32) {
    if let Some(c) = following
        && c != '\n'
        && p.x + cell_width(c) > width
    {
        p.x = 0;
        p.y += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(x: i32, width: i32, cont: i32) -> ScreenLayout {
        ScreenLayout::new(Point::new(x, 0), width, cont)
    }

    #[test]
    fn single_row_offsets_start_after_prompt() {
        let buf = Buffer::from_text("abc");
        let l = layout(2, 10, 0);
        assert_eq!(l.offset_to_point(&buf, 0), Point::new(2, 0));
        assert_eq!(l.offset_to_point(&buf, 3), Point::new(5, 0));
    }

    #[test]
    fn full_row_wraps_to_column_zero() {
        let buf = Buffer::from_text("abcdef");
        let l = layout(0, 4, 0);
        assert_eq!(l.offset_to_point(&buf, 4), Point::new(0, 1));
        assert_eq!(l.offset_to_point(&buf, 6), Point::new(2, 1));
    }

    #[test]
    fn full_row_followed_by_newline_is_not_double_counted() {
        let buf = Buffer::from_text("abcd\nef");
        let l = layout(0, 4, 0);
        assert_eq!(l.offset_to_point(&buf, 5), Point::new(0, 1));
        assert_eq!(l.offset_to_point(&buf, 7), Point::new(2, 1));
    }

    #[test]
    fn cursor_before_newline_after_full_row_sits_on_next_row() {
        let buf = Buffer::from_text("abcd\nef");
        let l = layout(0, 4, 0);
        assert_eq!(l.offset_to_point(&buf, 3), Point::new(3, 0));
        assert_eq!(l.offset_to_point(&buf, 4), Point::new(0, 1));
    }

    #[test]
    fn editor_and_stream_walks_agree() {
        for text in ["abcd\nef", "abcdefgh\n\nij", "ab\ncdef\ngh", "abcd"] {
            let buf = Buffer::from_text(text);
            let l = layout(0, 4, 0);
            for (off, (byte, _)) in text.char_indices().chain([(text.len(), ' ')]).enumerate() {
                assert_eq!(
                    l.offset_to_point(&buf, off),
                    advance_point(Point::new(0, 0), &text[..byte], 4),
                    "{text:?} at offset {off}"
                );
            }
        }
    }

    #[test]
    fn wide_char_that_does_not_fit_moves_to_next_row() {
        let buf = Buffer::from_text("abc漢");
        let l = layout(0, 4, 0);
        assert_eq!(l.offset_to_point(&buf, 3), Point::new(0, 1));
        assert_eq!(l.offset_to_point(&buf, 4), Point::new(2, 1));
    }

    #[test]
    fn newline_resumes_at_continuation_prompt() {
        let buf = Buffer::from_text("ab\ncd");
        let l = layout(2, 80, 3);
        assert_eq!(l.offset_to_point(&buf, 3), Point::new(3, 1));
        assert_eq!(l.offset_to_point(&buf, 5), Point::new(5, 1));
    }

    #[test]
    fn point_to_offset_clamps_short_rows() {
        let buf = Buffer::from_text("ab\ncd");
        let l = layout(2, 80, 2);
        assert_eq!(l.point_to_offset(&buf, Point::new(3, 0)), Some(1));
        assert_eq!(l.point_to_offset(&buf, Point::new(10, 0)), Some(2));
        assert_eq!(l.point_to_offset(&buf, Point::new(3, 1)), Some(4));
        assert_eq!(l.point_to_offset(&buf, Point::new(10, 1)), Some(5));
        assert_eq!(l.point_to_offset(&buf, Point::new(0, 2)), None);
    }

    #[test]
    fn point_and_offset_agree_on_every_char() {
        let buf = Buffer::from_text("hello 世界\nsecond line that wraps");
        let l = layout(3, 8, 3);
        for off in 0..=buf.len() {
            let p = l.offset_to_point(&buf, off);
            let back = l.point_to_offset(&buf, p).expect("row in range");
            assert_eq!(l.offset_to_point(&buf, back), p, "offset {off}");
        }
    }

    #[test]
    fn advance_point_tracks_stream_output() {
        assert_eq!(advance_point(Point::new(0, 5), "ab\ncd", 80), Point::new(2, 6));
        assert_eq!(advance_point(Point::new(0, 0), "abcdef", 4), Point::new(2, 1));
        assert_eq!(advance_point(Point::new(0, 0), "abcd\n", 4), Point::new(0, 1));
    }
}
