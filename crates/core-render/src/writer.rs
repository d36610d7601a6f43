//! Batched console output.
//!
//! A refresh is built as a list of commands and applied in one go, so a
//! cancellation check can never land between the erase and the write that
//! replaces what was erased.

use std::io;

use core_model::Point;
use core_terminal::Console;
use tracing::trace;

/// Erase from the cursor to the end of the display.
pub const ERASE_BELOW: &str = "\x1b[0J";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(Point),
    EraseBelow,
    Print(String),
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn move_to(&mut self, p: Point) {
        self.cmds.push(Command::MoveTo(p));
    }

    pub fn erase_below(&mut self) {
        self.cmds.push(Command::EraseBelow);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush<C: Console + ?Sized>(self, console: &mut C) -> io::Result<()> {
        trace!(target: "render.writer", commands = self.cmds.len(), "flush");
        for c in self.cmds {
            match c {
                Command::MoveTo(p) => console.set_cursor_position(p)?,
                Command::EraseBelow => console.write(ERASE_BELOW)?,
                Command::Print(s) => console.write(&s)?,
            }
        }
        console.flush()
    }
}
