//! Interactive input painter: the `RenderSink` behind the line editor.
//!
//! Every render repaints the whole input from `initial` (the cell right after
//! the prompt): move there, erase below, write the buffer with the
//! continuation prompt after each `\n` and the selection in reverse video,
//! then put the cursor where `ScreenLayout` says the editor cursor is. When
//! the input grows past the bottom row the terminal scrolls and `initial`
//! moves up with it.

use std::io;

use core_actions::{RenderHints, RenderSink};
use core_model::{Point, ScreenLayout};
use core_state::{BellStyle, EditorState};
use core_terminal::Console;
use core_text::str_width;
use tracing::{debug, trace};

use crate::style;
use crate::writer::Writer;

pub struct InputPainter<C: Console> {
    console: C,
    prompt: String,
    continuation_prompt: String,
    initial: Point,
    buffer_width: i32,
    buffer_height: i32,
}

impl<C: Console> InputPainter<C> {
    pub fn new(console: C, prompt: impl Into<String>) -> Self {
        Self {
            console,
            prompt: prompt.into(),
            continuation_prompt: String::new(),
            initial: Point::default(),
            buffer_width: 80,
            buffer_height: 24,
        }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn initial(&self) -> Point {
        self.initial
    }

    fn refresh_size(&mut self) -> io::Result<()> {
        self.buffer_width = self.console.buffer_width()?;
        self.buffer_height = self.console.buffer_height()?;
        Ok(())
    }

    /// Buffer text from offset `from` as drawn: continuation prompts after
    /// newlines, selection wrapped in reverse video.
    fn body(&self, state: &EditorState, from: usize) -> String {
        let selection = state.selection().filter(|r| !r.is_empty());
        let mut out = String::with_capacity(state.len() + 16);
        if from > 0 && state.buffer.char_at(from - 1) == Some('\n') {
            out.push_str(&self.continuation_prompt);
        }
        if selection.is_some_and(|r| r.start < from && from < r.end()) {
            out.push_str(style::REVERSE);
        }
        for (i, c) in state.buffer.chars_from(from).enumerate() {
            let i = from + i;
            if let Some(r) = selection {
                if i == r.start {
                    out.push_str(style::REVERSE);
                }
                if i == r.end() {
                    out.push_str(style::NO_REVERSE);
                }
            }
            out.push(c);
            if c == '\n' {
                out.push_str(&self.continuation_prompt);
            }
        }
        if selection.is_some_and(|r| r.end() == state.len()) {
            out.push_str(style::NO_REVERSE);
        }
        out
    }

    /// Where a repaint starts: the input start, or the first visible row
    /// when the prompt has scrolled above the window.
    fn paint_origin(&mut self, state: &EditorState) -> (Point, usize) {
        if self.initial.y >= 0 {
            return (self.initial, 0);
        }
        match self.layout().point_to_offset(&state.buffer, Point::new(0, 0)) {
            Some(offset) => (Point::new(0, 0), offset),
            None => {
                // Everything shrank above the top row; anchor the input there.
                self.initial.y = 0;
                (self.initial, 0)
            }
        }
    }

    /// Follow the terminal when painting ran past the last row.
    fn track_scroll(&mut self, state: &EditorState) {
        let end = self.layout().offset_to_point(&state.buffer, state.len());
        let top_max = self.buffer_height - 1;
        if end.y > top_max {
            let scrolled = end.y - top_max;
            self.initial.y -= scrolled;
            debug!(target: "render.painter", scrolled, initial_row = self.initial.y, "scrolled");
        }
    }
}

impl<C: Console> RenderSink for InputPainter<C> {
    fn begin_line(&mut self, state: &EditorState) -> io::Result<()> {
        self.refresh_size()?;
        self.continuation_prompt = state.options.continuation_prompt.clone();
        self.console.write(&self.prompt)?;
        self.console.flush()?;
        self.initial = self.console.cursor_position()?;
        debug!(target: "render.painter", initial = ?self.initial, "begin_line");
        Ok(())
    }

    fn render(&mut self, state: &EditorState, hints: RenderHints) -> io::Result<()> {
        self.refresh_size()?;
        trace!(
            target: "render.painter",
            len = state.len(),
            cursor = state.cursor(),
            paused = hints.prediction_paused,
            "render"
        );
        let (origin, from) = self.paint_origin(state);
        let mut w = Writer::new();
        w.move_to(origin);
        w.erase_below();
        w.print(self.body(state, from));
        w.flush(&mut self.console)?;
        self.track_scroll(state);
        self.place_cursor(state)
    }

    fn place_cursor(&mut self, state: &EditorState) -> io::Result<()> {
        let p = self.layout().offset_to_point(&state.buffer, state.cursor());
        self.console.set_cursor_position(p)?;
        self.console.flush()
    }

    fn layout(&self) -> ScreenLayout {
        let cont = i32::try_from(str_width(&self.continuation_prompt)).unwrap_or(0);
        ScreenLayout::new(self.initial, self.buffer_width, cont)
    }

    fn ding(&mut self, bell: BellStyle) {
        let seq = match bell {
            BellStyle::Audible => "\x07".to_string(),
            BellStyle::Visual => format!("{}{}", style::FLASH_ON, style::FLASH_OFF),
            BellStyle::None => return,
        };
        if let Err(e) = self.console.write(&seq).and_then(|()| self.console.flush()) {
            debug!(target: "render.painter", error = %e, "ding_failed");
        }
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.console.write(text)?;
        self.console.flush()
    }

    fn clear_screen(&mut self, state: &EditorState) -> io::Result<()> {
        self.console.write("\x1b[2J")?;
        self.console.set_cursor_position(Point::new(0, 0))?;
        self.console.write(&self.prompt)?;
        self.console.flush()?;
        self.initial = self.console.cursor_position()?;
        self.render(state, RenderHints::default())
    }
}
