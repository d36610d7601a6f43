//! Cursor movement: characters, words, logical and physical lines, and
//! single-character search.
//!
//! Vertical moves keep a sticky column for the length of a streak. The first
//! move of a streak records either the physical column of the cursor or, when
//! the cursor rests at the end of a logical line, `DesiredColumn::EndOfLine`.
//! Later moves in the streak reuse that choice so passing through a short line
//! does not lose the column.

use core_keymap::CommandId;
use core_model::Point;
use core_state::DesiredColumn;
use core_text::{Buffer, motion};
use tracing::trace;

use crate::{EditError, EditResult, Invocation, Session};

/// To the end of the logical line; when already there, to the end of input.
pub(super) fn end_of_line(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let end = motion::logical_line_end(&s.state.buffer, cursor);
    let target = if end == cursor { s.state.len() } else { end };
    s.move_cursor(target)
}

/// To the start of the logical line; when already there, to the start of
/// input.
pub(super) fn beginning_of_line(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let start = motion::beginning_of_line_pos(&s.state.buffer, cursor);
    s.move_cursor(if start == cursor { 0 } else { start })
}

pub(super) fn forward_char(s: &mut Session, count: i32) -> EditResult<()> {
    if s.state.at_end() && count > 0 {
        return accept_suggestion(s);
    }
    s.set_cursor_position(s.state.cursor() as i64 + i64::from(count))
}

pub(super) fn backward_char(s: &mut Session, count: i32) -> EditResult<()> {
    s.set_cursor_position(s.state.cursor() as i64 - i64::from(count))
}

/// Append the whole suggestion for the current input.
fn accept_suggestion(s: &mut Session) -> EditResult<()> {
    if s.prediction.is_paused() {
        return Ok(());
    }
    let Some(suffix) = s.prediction.suggestion(&s.state.text()) else {
        return Ok(());
    };
    trace!(target: "actions.dispatch", len = suffix.len(), "accept_suggestion");
    s.insert(&suffix)
}

/// Append the first `count` words of the suggestion.
fn accept_next_suggestion_word(s: &mut Session, count: i32) -> EditResult<()> {
    if s.prediction.is_paused() {
        return Ok(());
    }
    let Some(suffix) = s.prediction.suggestion(&s.state.text()) else {
        return Ok(());
    };
    let words = Buffer::from_text(&suffix);
    let mut end = 0;
    for _ in 0..count {
        end = motion::find_forward_word_point(&words, end, s.state.word_delimiters());
    }
    let taken = words.slice(0, end);
    s.insert(&taken)
}

pub(super) fn next_word(s: &mut Session, count: i32) -> EditResult<()> {
    if count < 0 {
        return backward_word(s, -count);
    }
    for _ in 0..count {
        let to = motion::find_next_word_point(
            &s.state.buffer,
            s.state.cursor(),
            s.state.word_delimiters(),
        );
        s.move_cursor(to)?;
    }
    Ok(())
}

pub(super) fn forward_word(s: &mut Session, count: i32) -> EditResult<()> {
    if s.state.at_end() && count > 0 {
        return accept_next_suggestion_word(s, count);
    }
    if count < 0 {
        return backward_word(s, -count);
    }
    for _ in 0..count {
        let to = motion::find_forward_word_point(
            &s.state.buffer,
            s.state.cursor(),
            s.state.word_delimiters(),
        );
        s.move_cursor(to)?;
    }
    Ok(())
}

/// A negative count moves forward with whichever forward word command the
/// keymap actually offers.
pub(super) fn backward_word(s: &mut Session, count: i32) -> EditResult<()> {
    if count < 0 {
        return if s.keymap.is_bound(CommandId::ForwardWord) {
            forward_word(s, -count)
        } else {
            next_word(s, -count)
        };
    }
    for _ in 0..count {
        let to = motion::find_backward_word_point(
            &s.state.buffer,
            s.state.cursor(),
            s.state.word_delimiters(),
        );
        s.move_cursor(to)?;
    }
    Ok(())
}

/// Move `line_offset` lines down (negative: up).
pub(super) fn move_to_line(s: &mut Session, line_offset: i32) -> EditResult<()> {
    let layout = s.layout();
    let state = &mut s.state;
    state.move_to_line_command_count += 1;
    let cursor = state.cursor();
    let len = state.len();

    if state.move_to_line_command_count == 1 {
        state.move_to_line_desired_column =
            if cursor == len || state.buffer.char_at(cursor) == Some('\n') {
                DesiredColumn::EndOfLine
            } else {
                DesiredColumn::Column(layout.offset_to_point(&state.buffer, cursor).x)
            };
    }

    if line_offset == 0 || (line_offset > 0 && cursor == len) {
        return Ok(());
    }

    let target = match state.move_to_line_desired_column {
        DesiredColumn::EndOfLine if line_offset > 0 => {
            Some(logical_line_ends_down(&state.buffer, cursor, line_offset))
        }
        DesiredColumn::EndOfLine => {
            Some(logical_line_ends_up(&state.buffer, cursor, -line_offset))
        }
        DesiredColumn::Column(x) => {
            let here = layout.offset_to_point(&state.buffer, cursor);
            let y = (here.y + line_offset).max(layout.initial.y);
            layout.point_to_offset(&state.buffer, Point::new(x, y))
        }
    };
    trace!(target: "actions.dispatch", line_offset, from = cursor, to = ?target, column = ?state.move_to_line_desired_column, "move_to_line");
    match target {
        Some(to) => s.move_cursor(to),
        None => Ok(()),
    }
}

/// End of the logical line `lines` below the one ending at or after `from`.
fn logical_line_ends_down(buf: &Buffer, from: usize, lines: i32) -> usize {
    let len = buf.len();
    let mut i = from;
    for _ in 0..lines {
        i += 1;
        while i < len && buf.char_at(i) != Some('\n') {
            i += 1;
        }
        if i >= len {
            return len;
        }
    }
    i
}

/// End of the logical line `lines` above; stays on the last newline found
/// when the top of the input is reached first.
fn logical_line_ends_up(buf: &Buffer, from: usize, lines: i32) -> usize {
    let mut last = from;
    for _ in 0..lines {
        let found = (0..last).rev().find(|&i| buf.char_at(i) == Some('\n'));
        match found {
            Some(i) => last = i,
            None => break,
        }
    }
    last
}

/// Move to the `n`th occurrence of the target char. A negative count flips
/// the direction; too few occurrences rings the bell.
pub(super) fn character_search(
    s: &mut Session,
    command: CommandId,
    inv: Invocation,
    forward: bool,
) -> EditResult<()> {
    let target = inv.target.ok_or(EditError::InvalidArgument {
        command,
        reason: "missing target character",
    })?;
    let occurrence = inv.count();
    let forward = if occurrence < 0 { !forward } else { forward };
    let n = occurrence.unsigned_abs() as usize;
    if n == 0 {
        return Ok(());
    }
    let cursor = s.state.cursor();
    let found = if forward {
        s.state.buffer.find_char_forward(cursor, target, n)
    } else {
        s.state.buffer.find_char_backward(cursor, target, n)
    };
    match found {
        Some(i) => s.move_cursor(i),
        None => {
            s.ding();
            Ok(())
        }
    }
}

pub(super) fn clear_screen(s: &mut Session) -> EditResult<()> {
    s.sink.clear_screen(&s.state)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_line_ends_walk_newlines() {
        let buf = Buffer::from_text("ab\ncd\nef");
        assert_eq!(logical_line_ends_down(&buf, 2, 1), 5);
        assert_eq!(logical_line_ends_down(&buf, 2, 5), 8);
        assert_eq!(logical_line_ends_up(&buf, 8, 1), 5);
        assert_eq!(logical_line_ends_up(&buf, 8, 2), 2);
        assert_eq!(logical_line_ends_up(&buf, 2, 3), 2);
    }
}
