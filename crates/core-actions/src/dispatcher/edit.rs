//! Text insertion and deletion that bypasses the kill ring, case changes, and
//! the two commands that finish a line.
//!
//! Every handler mutates through the `Session` primitives so each change is
//! recorded for undo and rendered exactly once. A deletion issued while a
//! selection is active removes the selection instead.

use core_text::motion;
use tracing::{debug, info};

use crate::collab::{PredictionPause, RenderHints};
use crate::{CommandOutcome, EditResult, Invocation, Session};

const CANCEL_MARKER: &str = "\x1b[91m^C\x1b[0m";

/// Delete the active selection, if any. Returns true when it did.
fn delete_selection(s: &mut Session) -> EditResult<bool> {
    match s.state.selection() {
        Some(region) => {
            s.delete_region(region)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub(super) fn self_insert(s: &mut Session, inv: Invocation) -> EditResult<()> {
    let Some(key) = inv.key.filter(|&c| c != '\0') else {
        return Ok(());
    };
    let count = inv.count();
    if count <= 0 {
        return Ok(());
    }
    let text: String = std::iter::repeat_n(key, count as usize).collect();
    match s.state.selection() {
        Some(region) => s.replace(region.start, region.length, &text),
        None => s.insert(&text),
    }
}

pub(super) fn add_line(s: &mut Session) -> EditResult<()> {
    s.insert("\n")
}

/// Open an empty line above the current logical line and move onto it.
pub(super) fn insert_line_above(s: &mut Session) -> EditResult<()> {
    let start = motion::beginning_of_line_pos(&s.state.buffer, s.state.cursor());
    s.state.set_cursor(start);
    s.insert("\n")?;
    s.move_cursor(start)
}

/// Open an empty line below the current logical line and move onto it.
pub(super) fn insert_line_below(s: &mut Session) -> EditResult<()> {
    let end = motion::logical_line_end(&s.state.buffer, s.state.cursor());
    s.state.set_cursor(end);
    s.insert("\n")
}

pub(super) fn backward_delete_char(s: &mut Session, inv: Invocation) -> EditResult<()> {
    if delete_selection(s)? {
        return Ok(());
    }
    let cursor = s.state.cursor();
    if s.state.is_empty() || cursor == 0 {
        return Ok(());
    }
    let qty = inv.count();
    if qty < 1 {
        return Ok(());
    }
    let qty = (qty as usize).min(cursor);
    s.delete(cursor - qty, qty)
}

/// Delete under the cursor. On an empty buffer `or_exit` asks the driving
/// loop to leave.
pub(super) fn delete_char(s: &mut Session, qty: i32, or_exit: bool) -> EditResult<CommandOutcome> {
    if qty < 1 {
        return Ok(CommandOutcome::Continue);
    }
    if delete_selection(s)? {
        return Ok(CommandOutcome::Continue);
    }
    if s.state.is_empty() {
        if or_exit {
            info!(target: "actions.dispatch", "exit_on_empty_line");
            return Ok(CommandOutcome::Exit);
        }
        return Ok(CommandOutcome::Continue);
    }
    let cursor = s.state.cursor();
    if cursor < s.state.len() {
        let qty = (qty as usize).min(s.state.len() - cursor);
        s.delete(cursor, qty)?;
    }
    Ok(CommandOutcome::Continue)
}

fn forward_delete_to(s: &mut Session, end: usize) -> EditResult<()> {
    if delete_selection(s)? {
        return Ok(());
    }
    let cursor = s.state.cursor();
    if !s.state.is_empty() && cursor < end {
        s.delete(cursor, end - cursor)?;
    }
    Ok(())
}

pub(super) fn forward_delete_input(s: &mut Session) -> EditResult<()> {
    let end = s.state.len();
    forward_delete_to(s, end)
}

/// Through the end of the logical line. On a `\n` the newline itself goes.
pub(super) fn forward_delete_line(s: &mut Session) -> EditResult<()> {
    let end = motion::end_of_logical_line_pos(&s.state.buffer, s.state.cursor()) + 1;
    forward_delete_to(s, end)
}

fn backward_delete_to(s: &mut Session, start: usize) -> EditResult<()> {
    if delete_selection(s)? {
        return Ok(());
    }
    let cursor = s.state.cursor();
    if cursor > start {
        s.delete(start, cursor - start)?;
    }
    Ok(())
}

pub(super) fn backward_delete_input(s: &mut Session) -> EditResult<()> {
    backward_delete_to(s, 0)
}

pub(super) fn backward_delete_line(s: &mut Session) -> EditResult<()> {
    let start = motion::beginning_of_line_pos(&s.state.buffer, s.state.cursor());
    backward_delete_to(s, start)
}

/// Span from the cursor to the end of the current (or next) word.
fn word_at_cursor(s: &Session) -> (usize, String) {
    let cursor = s.state.cursor();
    let end = motion::find_forward_word_point(&s.state.buffer, cursor, s.state.word_delimiters());
    (end - cursor, s.state.buffer.slice(cursor, end - cursor))
}

/// Upcase or downcase through the end of the word. The cursor lands after the
/// rewritten text, which may differ in length from the original.
pub(super) fn change_word_case(s: &mut Session, upper: bool) -> EditResult<()> {
    if s.state.at_end() {
        s.ding();
        return Ok(());
    }
    let (len, word) = word_at_cursor(s);
    let mapped = if upper {
        word.to_uppercase()
    } else {
        word.to_lowercase()
    };
    s.replace(s.state.cursor(), len, &mapped)
}

pub(super) fn capitalize_word(s: &mut Session) -> EditResult<()> {
    if s.state.at_end() {
        s.ding();
        return Ok(());
    }
    let cursor = s.state.cursor();
    let (len, word) = word_at_cursor(s);
    let lower = word.to_lowercase();
    let Some(first) = lower.char_indices().find(|(_, c)| c.is_alphabetic()) else {
        return s.move_cursor(cursor + len);
    };
    let (at, c) = first;
    let mut out = String::with_capacity(lower.len());
    out.push_str(&lower[..at]);
    out.extend(c.to_uppercase());
    out.push_str(&lower[at + c.len_utf8()..]);
    s.replace(cursor, len, &out)
}

/// Finish the line: cursor to the end, final paint without a suggestion, then
/// a newline below the input.
pub(super) fn accept_line(s: &mut Session) -> EditResult<CommandOutcome> {
    let _pause = PredictionPause::new(s.prediction.as_mut());
    if !s.state.at_end() {
        let len = s.state.len();
        s.state.set_cursor(len);
        s.sink.place_cursor(&s.state)?;
    }
    s.sink.render(&s.state, RenderHints::PAUSED)?;
    s.sink.emit("\n")?;
    let text = s.state.text();
    info!(target: "actions.dispatch", chars = text.chars().count(), "accept_line");
    Ok(CommandOutcome::Accept(text))
}

/// Abandon the line, leaving it on screen followed by a red `^C`.
pub(super) fn cancel_line(s: &mut Session) -> EditResult<CommandOutcome> {
    let len = s.state.len();
    s.state.set_cursor(len);
    {
        let _pause = PredictionPause::new(s.prediction.as_mut());
        s.sink.render(&s.state, RenderHints::PAUSED)?;
    }
    s.sink.emit(CANCEL_MARKER)?;
    s.state.discard_text();
    debug!(target: "actions.dispatch", "cancel_line");
    Ok(CommandOutcome::Cancel)
}
