//! In-memory terminal for tests.
//!
//! Output is tokenized by a `vte::Parser` and applied to a grid of cells.
//! Wrapping follows `core_model::advance_point`: a char that exactly fills a
//! row moves the cursor to column 0 of the next row, and a `\n` written right
//! after that does not advance a second time. A char too wide for the space
//! left starts the next row. Writing past the bottom row scrolls the grid.
//!
//! Only what the renderers emit has an effect: printable chars, `\n`, `\r`,
//! `ESC[0J`/`ESC[J` (erase to end of display) and `ESC[2J` (erase all). SGR,
//! private modes and OSC 8 links are parsed and dropped.

use std::fmt;
use std::io;

use core_model::Point;
use core_text::char_width;
use tracing::warn;
use vte::{Params, Parser, Perform};

use crate::Console;

/// Placeholder for the right half of a wide glyph.
const WIDE_TAIL: char = '\0';

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const ERASE_IN_DISPLAY: char = 'J';

/// Cells, cursor and scroll count. Receives parsed output from `vte`.
#[derive(Debug, Clone)]
struct Grid {
    width: u16,
    height: u16,
    rows: Vec<Vec<char>>,
    cursor: Point,
    absorb_newline: bool,
    scrolled: usize,
}

impl Grid {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![' '; usize::from(width)]; usize::from(height)],
            cursor: Point::default(),
            absorb_newline: false,
            scrolled: 0,
        }
    }

    fn blank_row(&self) -> Vec<char> {
        vec![' '; usize::from(self.width)]
    }

    fn line_feed(&mut self) {
        self.cursor.x = 0;
        if self.cursor.y + 1 >= i32::from(self.height) {
            self.rows.remove(0);
            self.rows.push(self.blank_row());
            self.scrolled += 1;
            self.cursor.y = i32::from(self.height) - 1;
        } else {
            self.cursor.y += 1;
        }
    }

    fn put(&mut self, c: char) {
        let w = i32::try_from(char_width(c)).unwrap_or(0);
        if w == 0 {
            return;
        }
        let width = i32::from(self.width);
        if self.cursor.x + w > width {
            self.line_feed();
        }
        let (x, y) = (self.cursor.x as usize, self.cursor.y as usize);
        if let Some(row) = self.rows.get_mut(y) {
            row[x] = c;
            if w == 2 && x + 1 < row.len() {
                row[x + 1] = WIDE_TAIL;
            }
        }
        self.cursor.x += w;
        if self.cursor.x >= width {
            self.line_feed();
            self.absorb_newline = true;
        }
    }

    fn erase_below(&mut self) {
        let (x, y) = (self.cursor.x.max(0) as usize, self.cursor.y.max(0) as usize);
        for (ry, row) in self.rows.iter_mut().enumerate().skip(y) {
            let from = if ry == y { x } else { 0 };
            for cell in row.iter_mut().skip(from) {
                *cell = ' ';
            }
        }
    }

    fn erase_all(&mut self) {
        for row in &mut self.rows {
            row.fill(' ');
        }
    }
}

impl Perform for Grid {
    fn print(&mut self, c: char) {
        self.absorb_newline = false;
        self.put(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            LINE_FEED => {
                if !std::mem::take(&mut self.absorb_newline) {
                    self.line_feed();
                }
            }
            CARRIAGE_RETURN => {
                self.absorb_newline = false;
                self.cursor.x = 0;
            }
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            warn!(target: "terminal.virtual", %action, "csi_discarded");
            return;
        }
        // Private modes (`ESC[?5h`) and SGR carry no cell changes.
        if action != ERASE_IN_DISPLAY || !intermediates.is_empty() {
            return;
        }
        let mode = params.iter().next().and_then(|p| p.first()).copied().unwrap_or(0);
        match mode {
            0 => self.erase_below(),
            2 | 3 => self.erase_all(),
            _ => {}
        }
    }
}

pub struct VirtualConsole {
    parser: Parser,
    grid: Grid,
    /// Every `write` call, verbatim.
    pub writes: Vec<String>,
}

impl fmt::Debug for VirtualConsole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualConsole")
            .field("grid", &self.grid)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

impl VirtualConsole {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            parser: Parser::new(),
            grid: Grid::new(width.max(1), height.max(1)),
            writes: Vec::new(),
        }
    }

    /// Visible text of row `y` with trailing blanks removed.
    pub fn row_text(&self, y: usize) -> String {
        self.grid.rows.get(y).map_or_else(String::new, |row| {
            let s: String = row.iter().filter(|&&c| c != WIDE_TAIL).collect();
            s.trim_end().to_string()
        })
    }

    /// All visible rows, trailing blank rows dropped.
    pub fn screen_text(&self) -> String {
        let mut lines: Vec<String> = (0..self.grid.rows.len()).map(|y| self.row_text(y)).collect();
        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines.join("\n")
    }

    pub fn cursor(&self) -> Point {
        self.grid.cursor
    }

    /// Rows scrolled off the top so far.
    pub fn scrolled(&self) -> usize {
        self.grid.scrolled
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Console for VirtualConsole {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.grid.width, self.grid.height))
    }

    fn cursor_position(&mut self) -> io::Result<Point> {
        Ok(self.grid.cursor)
    }

    fn set_cursor_position(&mut self, p: Point) -> io::Result<()> {
        let grid = &mut self.grid;
        grid.absorb_newline = false;
        grid.cursor = Point::new(
            p.x.clamp(0, i32::from(grid.width) - 1),
            p.y.clamp(0, i32::from(grid.height) - 1),
        );
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writes.push(text.to_string());
        self.parser.advance(&mut self.grid, text.as_bytes());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_wrap_and_absorb_newline() {
        let mut c = VirtualConsole::new(4, 5);
        c.write("abcd\nef").unwrap();
        assert_eq!(c.row_text(0), "abcd");
        assert_eq!(c.row_text(1), "ef");
        assert_eq!(c.cursor(), Point::new(2, 1));
    }

    #[test]
    fn moving_the_cursor_cancels_the_pending_wrap() {
        let mut c = VirtualConsole::new(4, 5);
        c.write("abcd").unwrap();
        c.set_cursor_position(Point::new(0, 1)).unwrap();
        c.write("\nx").unwrap();
        assert_eq!(c.screen_text(), "abcd\n\nx");
    }

    #[test]
    fn wide_char_moves_to_next_row() {
        let mut c = VirtualConsole::new(3, 3);
        c.write("ab中").unwrap();
        assert_eq!(c.row_text(0), "ab");
        assert_eq!(c.row_text(1), "中");
        assert_eq!(c.cursor(), Point::new(2, 1));
    }

    #[test]
    fn scrolls_at_bottom() {
        let mut c = VirtualConsole::new(10, 2);
        c.write("one\ntwo\nthree").unwrap();
        assert_eq!(c.screen_text(), "two\nthree");
        assert_eq!(c.scrolled(), 1);
        assert_eq!(c.cursor(), Point::new(5, 1));
    }

    #[test]
    fn erase_below_and_styles() {
        let mut c = VirtualConsole::new(10, 3);
        c.write("\x1b[1mhello\x1b[0m\nworld").unwrap();
        c.set_cursor_position(Point::new(2, 0)).unwrap();
        c.write("\x1b[0J").unwrap();
        assert_eq!(c.screen_text(), "he");
        c.write("\x1b]8;;http://x\x1b\\LY\x1b]8;;\x1b\\").unwrap();
        assert_eq!(c.screen_text(), "heLY");
    }

    #[test]
    fn erase_all_keeps_the_cursor() {
        let mut c = VirtualConsole::new(10, 3);
        c.write("abc\ndef").unwrap();
        c.write("\x1b[2J").unwrap();
        assert_eq!(c.screen_text(), "");
        assert_eq!(c.cursor(), Point::new(3, 1));
    }

    #[test]
    fn escape_split_across_writes_is_still_parsed() {
        let mut c = VirtualConsole::new(10, 3);
        c.write("ab\x1b[1").unwrap();
        c.write("mcd\x1b[0m").unwrap();
        assert_eq!(c.screen_text(), "abcd");
        c.write("\x1b[?5h\x1b[?5l").unwrap();
        assert_eq!(c.screen_text(), "abcd");
    }
}
