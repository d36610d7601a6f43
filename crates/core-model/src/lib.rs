//! Screen geometry for the line editor and the stream renderer.
//!
//! Both consumers need the same answer to one question: given where output
//! started on the terminal and the terminal's buffer width, at which cell does
//! the N-th char land? Wrapping rules live here once so an edited buffer and a
//! streamed response agree on wide glyphs and full-width rows.
//!
//! Coordinates are signed. A stream that has scrolled past the top of the
//! window legitimately yields a negative row for its starting point.

pub mod layout;

pub use layout::{ScreenLayout, advance_point};

/// A terminal cell coordinate (`x` = column, `y` = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(u16, u16)> for Point {
    fn from((x, y): (u16, u16)) -> Self {
        Self {
            x: i32::from(x),
            y: i32::from(y),
        }
    }
}
