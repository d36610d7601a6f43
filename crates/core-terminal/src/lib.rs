//! Terminal access for the editor and the stream renderer.
//!
//! `Console` is the narrow surface both consumers need: geometry, cursor
//! position, and text output. `CrosstermConsole` drives a real terminal;
//! `VirtualConsole` is an in-memory grid used by tests. Raw mode is scoped by
//! `TerminalGuard` so it is restored on every exit path, panics included.

use std::cell::RefCell;
use std::io::{self, Stdout, Write, stdout};
use std::rc::Rc;

use anyhow::Result;
use core_model::Point;
use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use tracing::{debug, trace};

pub mod key;
pub mod virtual_console;

pub use key::{map_key_event, poll_chord, read_chord};
pub use virtual_console::VirtualConsole;

/// Output side of a terminal.
pub trait Console {
    /// `(columns, rows)` of the visible buffer.
    fn size(&self) -> io::Result<(u16, u16)>;

    fn cursor_position(&mut self) -> io::Result<Point>;

    fn set_cursor_position(&mut self, p: Point) -> io::Result<()>;

    /// Write text (may contain escape sequences) at the cursor.
    fn write(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;

    fn buffer_width(&self) -> io::Result<i32> {
        Ok(i32::from(self.size()?.0))
    }

    fn buffer_height(&self) -> io::Result<i32> {
        Ok(i32::from(self.size()?.1))
    }
}

impl<C: Console + ?Sized> Console for &mut C {
    fn size(&self) -> io::Result<(u16, u16)> {
        (**self).size()
    }

    fn cursor_position(&mut self) -> io::Result<Point> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&mut self, p: Point) -> io::Result<()> {
        (**self).set_cursor_position(p)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// A console shared between an owner that draws (a painter boxed inside a
/// session) and one that inspects it.
impl<C: Console> Console for Rc<RefCell<C>> {
    fn size(&self) -> io::Result<(u16, u16)> {
        self.borrow().size()
    }

    fn cursor_position(&mut self) -> io::Result<Point> {
        self.borrow_mut().cursor_position()
    }

    fn set_cursor_position(&mut self, p: Point) -> io::Result<()> {
        self.borrow_mut().set_cursor_position(p)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.borrow_mut().write(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.borrow_mut().flush()
    }
}

/// Console on the process's stdout.
pub struct CrosstermConsole {
    out: Stdout,
}

impl Default for CrosstermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermConsole {
    pub fn new() -> Self {
        Self { out: stdout() }
    }
}

impl Console for CrosstermConsole {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn cursor_position(&mut self) -> io::Result<Point> {
        self.out.flush()?;
        cursor::position().map(Point::from)
    }

    fn set_cursor_position(&mut self, p: Point) -> io::Result<()> {
        let x = u16::try_from(p.x.max(0)).unwrap_or(u16::MAX);
        let y = u16::try_from(p.y.max(0)).unwrap_or(u16::MAX);
        trace!(target: "terminal", x, y, "move_to");
        queue!(self.out, MoveTo(x, y))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        // Raw mode does not translate LF, so every newline carries its own CR.
        if text.contains('\n') {
            queue!(self.out, Print(text.replace('\n', "\r\n")))
        } else {
            queue!(self.out, Print(text))
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
}

/// Raw-mode switch. The editor draws inline, so the alternate screen is not
/// used.
pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            self.entered = true;
            debug!(target: "terminal", "raw_mode_on");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "raw_mode_off");
        }
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}
