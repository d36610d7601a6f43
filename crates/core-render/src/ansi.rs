//! Escape sequence handling for formatted output.

use std::sync::LazyLock;

use regex::Regex;

/// SGR attributes, private mode toggles (`ESC[?25l`) and OSC 8 hyperlinks.
static ANSI_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\x1b\[\d+(;\d+)*m)|(\x1b\[\?\d+[hl])|(\x1b\]8;;.*?\x1b\\)")
        .expect("Invalid ANSI sequence regex")
});

/// Full SGR reset. A retained prefix that still has one of these ahead of the
/// first difference cannot be resumed mid-line.
pub const RESET: &str = "\x1b[0m";

/// Text as it occupies cells: every escape sequence removed.
pub fn strip_ansi(text: &str) -> String {
    ANSI_SEQUENCE.replace_all(text, "").into_owned()
}

/// Start of an escape sequence cut off by the end of `text`, if any.
pub fn trailing_partial_escape(text: &str) -> Option<usize> {
    let esc = text.rfind('\x1b')?;
    match ANSI_SEQUENCE.find(&text[esc..]) {
        Some(m) if m.start() == 0 => None,
        _ => Some(esc),
    }
}

/// `text` without the escape sequences at its very end.
pub fn trim_trailing_escapes(text: &str) -> &str {
    let spans: Vec<_> = ANSI_SEQUENCE.find_iter(text).collect();
    let mut end = text.len();
    for m in spans.iter().rev() {
        if m.end() != end {
            break;
        }
        end = m.start();
    }
    &text[..end]
}
