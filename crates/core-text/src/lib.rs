//! Rope-backed input buffer abstraction.
//!
//! The whole multi-line input lives in one buffer; logical lines are simply
//! `\n`-delimited spans inside it (there is no separate line array). All
//! offsets handed across this API are *char* indices, never bytes, so cursor
//! arithmetic in higher layers can stay plain `usize` math.
//!
//! Mutating primitives clamp out-of-range arguments instead of failing. The
//! editor treats boundary conditions as steady state (the user hears a bell),
//! so nothing in here panics on user-reachable input.

use ropey::Rope;
use std::fmt;

pub mod motion;
pub mod width;

pub use width::{char_width, str_width};

/// An editable character sequence backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Construct a buffer from an in-memory string slice.
    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Number of chars in the buffer.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Char at `idx`, or `None` past the end.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        if idx < self.rope.len_chars() {
            Some(self.rope.char(idx))
        } else {
            None
        }
    }

    /// Return `length` chars starting at `start` as an owned `String` (clamped).
    pub fn slice(&self, start: usize, length: usize) -> String {
        let (s, e) = self.clamp_span(start, length);
        if s >= e {
            return String::new();
        }
        self.rope.slice(s..e).to_string()
    }

    /// Insert `text` at `at` (clamped to the buffer end). Returns the char
    /// offset the text actually landed at.
    pub fn insert(&mut self, at: usize, text: &str) -> usize {
        let at = at.min(self.rope.len_chars());
        if !text.is_empty() {
            self.rope.insert(at, text);
        }
        at
    }

    /// Remove `length` chars at `start` (clamped). Returns the removed text so
    /// callers can feed the undo log or the kill ring.
    pub fn remove(&mut self, start: usize, length: usize) -> String {
        let (s, e) = self.clamp_span(start, length);
        if s >= e {
            return String::new();
        }
        let removed = self.rope.slice(s..e).to_string();
        self.rope.remove(s..e);
        removed
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
    }

    /// Iterate chars starting at `from` (clamped).
    pub fn chars_from(&self, from: usize) -> impl Iterator<Item = char> + '_ {
        let from = from.min(self.rope.len_chars());
        self.rope.chars_at(from)
    }

    /// Index of the `n`th occurrence of `target` strictly after `from`.
    pub fn find_char_forward(&self, from: usize, target: char, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let mut seen = 0;
        for i in from.saturating_add(1)..self.len() {
            if self.rope.char(i) == target {
                seen += 1;
                if seen == n {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Index of the `n`th occurrence of `target` strictly before `from`.
    pub fn find_char_backward(&self, from: usize, target: char, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let mut seen = 0;
        for i in (0..from.min(self.len())).rev() {
            if self.rope.char(i) == target {
                seen += 1;
                if seen == n {
                    return Some(i);
                }
            }
        }
        None
    }

    fn clamp_span(&self, start: usize, length: usize) -> (usize, usize) {
        let total = self.rope.len_chars();
        let s = start.min(total);
        let e = s.saturating_add(length).min(total);
        (s, e)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Buffer").field(&self.to_string()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_buffer_and_read_back() {
        let b = Buffer::from_text("hello\nworld");
        assert_eq!(b.len(), 11);
        assert_eq!(b.to_string(), "hello\nworld");
        assert_eq!(b.char_at(5), Some('\n'));
        assert_eq!(b.char_at(11), None);
    }

    #[test]
    fn insert_is_char_indexed() {
        let mut b = Buffer::from_text("héllo");
        let at = b.insert(2, "XY");
        assert_eq!(at, 2);
        assert_eq!(b.to_string(), "héXYllo");
        assert_eq!(b.len(), 7);
    }

    #[test]
    fn insert_past_end_clamps() {
        let mut b = Buffer::from_text("ab");
        assert_eq!(b.insert(99, "c"), 2);
        assert_eq!(b.to_string(), "abc");
    }

    #[test]
    fn remove_returns_text_and_clamps() {
        let mut b = Buffer::from_text("hello world");
        assert_eq!(b.remove(5, 100), " world");
        assert_eq!(b.to_string(), "hello");
        assert_eq!(b.remove(10, 2), "");
        assert_eq!(b.remove(0, 0), "");
        assert_eq!(b.to_string(), "hello");
    }

    #[test]
    fn slice_clamps() {
        let b = Buffer::from_text("abc");
        assert_eq!(b.slice(1, 10), "bc");
        assert_eq!(b.slice(3, 1), "");
    }

    #[test]
    fn char_search_counts_occurrences() {
        let b = Buffer::from_text("a-b-c-d");
        assert_eq!(b.find_char_forward(0, '-', 1), Some(1));
        assert_eq!(b.find_char_forward(0, '-', 3), Some(5));
        assert_eq!(b.find_char_forward(0, '-', 4), None);
        // the char under the cursor is never a match
        assert_eq!(b.find_char_forward(1, '-', 1), Some(3));
        assert_eq!(b.find_char_backward(7, '-', 1), Some(5));
        assert_eq!(b.find_char_backward(5, '-', 2), Some(1));
        assert_eq!(b.find_char_backward(1, '-', 1), None);
    }
}
