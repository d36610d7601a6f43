//! Visual selection and clipboard commands.
//!
//! A selection is the region between mark and cursor while
//! `visual_selection_command_count > 0`. Select commands wrap an ordinary
//! motion: the first one drops the mark at the cursor, later ones only move
//! the cursor. Any other command ends the selection (see `dispatcher`).

use tracing::trace;

use crate::collab::RenderHints;
use crate::{CommandOutcome, EditResult, Session};

use super::edit;

pub(super) fn visual_selection<F>(s: &mut Session, action: F) -> EditResult<()>
where
    F: FnOnce(&mut Session) -> EditResult<()>,
{
    if !s.state.selection_active() {
        s.state.mark = s.state.cursor();
    }
    s.state.visual_selection_command_count += 1;
    s.with_prediction_paused(|s| {
        action(s)?;
        trace!(target: "actions.dispatch", mark = s.state.mark, cursor = s.state.cursor(), "selection");
        s.sink.render(&s.state, RenderHints::PAUSED)?;
        Ok(())
    })
}

pub(super) fn select_all(s: &mut Session) -> EditResult<()> {
    s.state.visual_selection_command_count += 1;
    s.state.mark = 0;
    let len = s.state.len();
    s.state.set_cursor(len);
    s.render_with_prediction_paused()
}

/// Clipboard text with carriage returns dropped and tabs expanded.
fn normalize_paste(text: &str) -> String {
    text.replace('\r', "").replace('\t', "    ")
}

pub(super) fn paste(s: &mut Session) -> EditResult<()> {
    let Some(text) = s.clipboard.get_text() else {
        return Ok(());
    };
    let text = normalize_paste(&text);
    match s.state.selection() {
        Some(region) => s.replace(region.start, region.length, &text),
        None => s.insert(&text),
    }
}

/// Copy the selection, or the whole input when nothing is selected.
pub(super) fn copy(s: &mut Session) {
    let text = match s.state.selection() {
        Some(region) => s.state.buffer.slice(region.start, region.length),
        None => s.state.text(),
    };
    if !text.is_empty() {
        s.clipboard.set_text(&text);
    }
}

pub(super) fn copy_or_cancel_line(s: &mut Session) -> EditResult<CommandOutcome> {
    if s.state.selection_active() {
        copy(s);
        Ok(CommandOutcome::Continue)
    } else {
        edit::cancel_line(s)
    }
}

pub(super) fn cut(s: &mut Session) -> EditResult<()> {
    let Some(region) = s.state.selection() else {
        return Ok(());
    };
    let text = s.state.buffer.slice(region.start, region.length);
    s.clipboard.set_text(&text);
    s.delete_region(region)
}
