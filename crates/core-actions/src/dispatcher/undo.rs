//! Undo handling. There is no redo: the log only walks backward.

use tracing::debug;

use crate::{EditResult, Session};

/// Undo one record, or one coalesced run of self-inserts.
pub(super) fn undo(s: &mut Session) -> EditResult<()> {
    if s.state.undo_once() {
        debug!(target: "state.undo", depth = s.state.undo.undo_depth(), "undo");
        s.render()
    } else {
        s.ding();
        Ok(())
    }
}

/// Dismiss a visible suggestion, or else undo every edit of this line with a
/// single repaint at the end.
pub(super) fn revert_line(s: &mut Session) -> EditResult<()> {
    if s.prediction.revert_suggestion() {
        return Ok(());
    }
    let reverted = s.state.undo_all();
    debug!(target: "state.undo", reverted, "revert_line");
    s.render()
}
