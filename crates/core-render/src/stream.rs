//! Incremental rendering of a growing response.
//!
//! `StreamRenderer` keeps the text it last put on screen (`current_text`) and
//! the cell where output began (`initial`). For each chunk it formats the
//! whole accumulated input again, finds the longest prefix shared with what
//! is on screen, moves the cursor to where that prefix ends, erases below,
//! and writes only the rest.
//!
//! Two cases need care:
//!
//! * A difference that sits before an `ESC[0m` still ahead in the old text
//!   means a styled run was cut; rewriting from the middle would lose its
//!   opening style, so the whole logical line is redone.
//! * Output taller than the window scrolls `initial` off the top. The row
//!   is tracked as a negative number, and a rewrite that would start above
//!   the window skips forward through the new text to the first line that
//!   is still visible.

use core_model::{Point, advance_point};
use core_terminal::Console;
use tracing::{debug, trace};

use crate::ansi::{RESET, strip_ansi, trailing_partial_escape, trim_trailing_escapes};
use crate::cancel::CancelToken;
use crate::markdown::MarkdownFormatter;
use crate::timing::Throttle;
use crate::writer::Writer;
use crate::{RenderError, RenderResult};

/// A consumer of streamed output chunks.
pub trait StreamRender {
    /// Show `chunk` appended to everything received so far.
    fn refresh(&mut self, chunk: &str) -> RenderResult<()>;

    /// Raw (unformatted) text received so far.
    fn accumulated_content(&self) -> &str;
}

/// Where a rewrite has to begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Divergence {
    /// Byte offset into both texts: everything before it stays on screen.
    keep: usize,
    redo_whole_line: bool,
}

/// Compare the text on screen with its replacement.
fn divergence(current: &str, new: &str) -> Divergence {
    let mismatch = current
        .char_indices()
        .zip(new.chars())
        .find(|&((_, a), b)| a != b)
        .map(|((i, _), _)| i);
    // Shared prefix is identical, so its byte length is the same in both.
    let mut first_diff = mismatch.unwrap_or(current.len().min(new.len()));
    // Never resume inside an escape sequence: its cells are not where the
    // stripped prefix says.
    while let Some(esc) = trailing_partial_escape(&current[..first_diff]) {
        first_diff = esc;
    }
    if first_diff < current.len() && current[first_diff..].contains(RESET) {
        let keep = current[..first_diff].rfind('\n').map_or(0, |nl| nl + 1);
        return Divergence {
            keep,
            redo_whole_line: true,
        };
    }
    Divergence {
        keep: first_diff,
        redo_whole_line: false,
    }
}

/// Byte offset in `text` after enough newlines to climb from row
/// `start_row` (negative, above the window) back to row 0.
fn first_visible_line(text: &str, from: usize, start_row: i32) -> Option<usize> {
    let mut row = start_row;
    for (i, c) in text[from..].char_indices() {
        if c == '\n' {
            row += 1;
            if row == 0 {
                return Some(from + i + 1);
            }
        }
    }
    None
}

pub struct StreamRenderer<C: Console, F: MarkdownFormatter> {
    console: C,
    formatter: F,
    throttle: Throttle,
    cancel: CancelToken,
    accumulated: String,
    current_text: String,
    initial: Point,
    buffer_width: i32,
    buffer_height: i32,
}

impl<C: Console, F: MarkdownFormatter> StreamRenderer<C, F> {
    /// Start a stream at the console's current cursor position.
    pub fn new(mut console: C, formatter: F, cancel: CancelToken) -> RenderResult<Self> {
        let initial = console.cursor_position()?;
        let buffer_width = console.buffer_width()?;
        let buffer_height = console.buffer_height()?;
        debug!(target: "render.stream", ?initial, buffer_width, buffer_height, "stream_start");
        Ok(Self {
            console,
            formatter,
            throttle: Throttle::default(),
            cancel,
            accumulated: String::new(),
            current_text: String::new(),
            initial,
            buffer_width,
            buffer_height,
        })
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Formatted text currently on screen.
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    /// Cell where the stream began; negative rows have scrolled away.
    pub fn initial_cursor(&self) -> Point {
        self.initial
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    fn check_cancelled(&self) -> RenderResult<()> {
        if self.cancel.is_cancelled() {
            debug!(target: "render.stream", "cancelled");
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    /// Where to resume writing `new_text` over `current_text`.
    ///
    /// A row filled to its last cell leaves the terminal waiting to wrap, and
    /// a cursor move discards that state (a `\n` written next would then skip
    /// a row). So when the retained prefix ends on such a row, the char that
    /// filled it is written again.
    fn rewrite_point(&self, new_text: &str) -> Divergence {
        let d = divergence(&self.current_text, new_text);
        if d.redo_whole_line || d.keep >= self.current_text.len() {
            return d;
        }
        let retained = &self.current_text[..d.keep];
        let end = advance_point(self.initial, &strip_ansi(retained), self.buffer_width);
        if end.x != 0 {
            return d;
        }
        match trim_trailing_escapes(retained).char_indices().next_back() {
            Some((at, c)) if c != '\n' => {
                if self.current_text[at..].contains(RESET) {
                    Divergence {
                        keep: retained[..at].rfind('\n').map_or(0, |nl| nl + 1),
                        redo_whole_line: true,
                    }
                } else {
                    Divergence {
                        keep: at,
                        redo_whole_line: false,
                    }
                }
            }
            _ => d,
        }
    }

    /// Bring the screen from `current_text` to `new_text`. Returns whether a
    /// whole logical line had to be rewritten, or `None` when nothing changed.
    pub fn show(&mut self, new_text: String) -> RenderResult<Option<bool>> {
        if new_text == self.current_text {
            return Ok(None);
        }

        let mut start = 0;
        let mut redo_whole_line = false;
        let mut writer = Writer::new();
        let cursor_start = if self.current_text.is_empty() {
            self.initial
        } else {
            let d = self.rewrite_point(&new_text);
            redo_whole_line = d.redo_whole_line;
            start = d.keep;
            if d.keep < self.current_text.len() {
                let retained = strip_ansi(&self.current_text[..d.keep]);
                let mut target = advance_point(self.initial, &retained, self.buffer_width);
                if target.y < 0 {
                    // Rows above the window cannot be reached; replay from row 0.
                    if let Some(visible) = first_visible_line(&new_text, d.keep, target.y) {
                        start = visible;
                    }
                    debug!(target: "render.stream", row = target.y, start, "rewrite_above_window");
                    target = Point::new(0, 0);
                }
                writer.move_to(target);
                writer.erase_below();
                target
            } else {
                self.console.cursor_position()?
            }
        };

        trace!(
            target: "render.stream",
            keep = start,
            redo_whole_line,
            ?cursor_start,
            "rewrite"
        );
        writer.print(&new_text[start..]);
        writer.flush(&mut self.console)?;

        let top_max = self.buffer_height - 1;
        if self.console.cursor_position()?.y == top_max {
            let end = advance_point(cursor_start, &strip_ansi(&new_text[start..]), self.buffer_width);
            if end.y > top_max {
                let scrolled = end.y - top_max;
                self.initial.y -= scrolled;
                debug!(target: "render.stream", scrolled, initial_row = self.initial.y, "scrolled");
            }
        }

        self.current_text = new_text;
        Ok(Some(redo_whole_line))
    }
}

impl<C: Console, F: MarkdownFormatter> StreamRender for StreamRenderer<C, F> {
    fn refresh(&mut self, chunk: &str) -> RenderResult<()> {
        self.check_cancelled()?;
        self.accumulated.push_str(chunk);
        let new_text = self.formatter.format(&self.accumulated);
        let Some(redo_whole_line) = self.show(new_text)? else {
            return Ok(());
        };
        self.check_cancelled()?;
        if self.cancel.sleep(self.throttle.interval(redo_whole_line)) {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    fn accumulated_content(&self) -> &str {
        &self.accumulated
    }
}

/// Writes chunks as they arrive, no formatting or diffing.
pub struct PlainStreamRenderer<C: Console> {
    console: C,
    cancel: CancelToken,
    accumulated: String,
}

impl<C: Console> PlainStreamRenderer<C> {
    pub fn new(console: C, cancel: CancelToken) -> Self {
        Self {
            console,
            cancel,
            accumulated: String::new(),
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }
}

impl<C: Console> StreamRender for PlainStreamRenderer<C> {
    fn refresh(&mut self, chunk: &str) -> RenderResult<()> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        self.console.write(chunk)?;
        self.console.flush()?;
        self.accumulated.push_str(chunk);
        Ok(())
    }

    fn accumulated_content(&self) -> &str {
        &self.accumulated
    }
}
