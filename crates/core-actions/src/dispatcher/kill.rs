//! Kill ring commands and the mark.
//!
//! A kill removes text into the ring. While `kill_command_count` is non-zero
//! (the dispatcher zeroes it after any other command) the next kill merges
//! into the current slot: backward kills prepend, forward kills append. A kill
//! of nothing keeps an active streak alive without touching the ring.

use core_text::motion;
use tracing::debug;

use crate::{EditResult, Session};

fn kill(s: &mut Session, start: usize, length: usize, prepend: bool) -> EditResult<()> {
    if length == 0 {
        if s.state.kill_command_count > 0 {
            s.state.kill_command_count += 1;
        }
        return Ok(());
    }
    let text = s.state.delete(start, length);
    s.state.set_cursor(start);
    s.render()?;
    let streak = s.state.kill_command_count > 0;
    s.state.kill_ring.push(&text, prepend, streak);
    s.state.kill_command_count += 1;
    debug!(target: "state.kill_ring", streak, prepend, count = s.state.kill_command_count, "kill");
    Ok(())
}

pub(super) fn kill_line(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let len = s.state.len();
    kill(s, cursor, len - cursor, false)
}

pub(super) fn backward_kill_input(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    kill(s, 0, cursor, true)
}

pub(super) fn backward_kill_line(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let start = motion::beginning_of_line_pos(&s.state.buffer, cursor);
    kill(s, start, cursor - start, true)
}

pub(super) fn kill_word(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let end = motion::find_forward_word_point(&s.state.buffer, cursor, s.state.word_delimiters());
    kill(s, cursor, end - cursor, false)
}

pub(super) fn backward_kill_word(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let start =
        motion::find_backward_word_point(&s.state.buffer, cursor, s.state.word_delimiters());
    kill(s, start, cursor - start, true)
}

/// Like `backward_kill_word` but only whitespace separates words.
pub(super) fn unix_word_rubout(s: &mut Session) -> EditResult<()> {
    let cursor = s.state.cursor();
    let start = motion::find_backward_word_point(&s.state.buffer, cursor, "");
    kill(s, start, cursor - start, true)
}

pub(super) fn kill_region(s: &mut Session) -> EditResult<()> {
    let region = s.state.region();
    kill(s, region.start, region.length, true)
}

/// Insert the current ring slot and anchor a yank-pop streak at the cursor.
pub(super) fn yank(s: &mut Session) -> EditResult<()> {
    let Some(text) = s.state.kill_ring.current().map(str::to_owned) else {
        s.ding();
        return Ok(());
    };
    let cursor = s.state.cursor();
    s.state.mark = cursor;
    s.state.yank_start_point = cursor;
    s.insert(&text)?;
    s.state.yank_command_count += 1;
    Ok(())
}

/// Replace the text just yanked with the previous ring slot. A ring with a
/// single entry has nothing to rotate to; the streak continues unchanged.
pub(super) fn yank_pop(s: &mut Session) -> EditResult<()> {
    if s.state.yank_command_count == 0 {
        s.ding();
        return Ok(());
    }
    if s.state.kill_ring.len() > 1 {
        let text = s.state.kill_ring.rotate_back().map(str::to_owned).unwrap_or_default();
        let start = s.state.yank_start_point;
        let length = s.state.cursor().saturating_sub(start);
        s.replace(start, length, &text)?;
    }
    s.state.yank_command_count += 1;
    Ok(())
}

pub(super) fn clear_kill_ring(s: &mut Session) {
    s.state.kill_ring.clear();
    debug!(target: "state.kill_ring", "cleared");
}

pub(super) fn set_mark(s: &mut Session) {
    s.state.mark = s.state.cursor();
}

pub(super) fn exchange_point_and_mark(s: &mut Session) -> EditResult<()> {
    let mark = s.state.mark;
    s.state.mark = s.state.cursor();
    s.move_cursor(mark.min(s.state.len()))
}
