//! SGR sequences used by the painters.

pub const RESET: &str = "\x1b[0m";
pub const REVERSE: &str = "\x1b[7m";
pub const NO_REVERSE: &str = "\x1b[27m";
pub const BOLD: &str = "\x1b[1m";
pub const NO_BOLD: &str = "\x1b[22m";
pub const ITALIC: &str = "\x1b[3m";
pub const NO_ITALIC: &str = "\x1b[23m";
pub const UNDERLINE_BOLD: &str = "\x1b[1;4m";
pub const STRIKE: &str = "\x1b[9m";
pub const NO_STRIKE: &str = "\x1b[29m";
pub const DIM: &str = "\x1b[2m";
pub const INLINE_CODE: &str = "\x1b[96m";
pub const CODE_BLOCK: &str = "\x1b[93m";
pub const DEFAULT_FG: &str = "\x1b[39m";
pub const BRIGHT_RED: &str = "\x1b[91m";

/// Screen flash used for the visual bell.
pub const FLASH_ON: &str = "\x1b[?5h";
pub const FLASH_OFF: &str = "\x1b[?5l";

/// OSC 8 hyperlink opener for `url`; close with `LINK_END`.
pub fn link_start(url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\")
}

pub const LINK_END: &str = "\x1b]8;;\x1b\\";
