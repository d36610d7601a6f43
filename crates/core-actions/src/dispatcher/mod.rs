//! Command dispatch.
//!
//! Handlers are grouped by concern:
//! * `edit`   - insertion, deletion, case changes, accept/cancel
//! * `motion` - horizontal and vertical cursor movement, char search
//! * `kill`   - kill ring, yank, mark
//! * `select` - visual selection and clipboard
//! * `undo`   - undo and revert
//!
//! `execute` wraps every handler in streak bookkeeping: the four streak
//! counters are snapshotted first and any counter the handler did not advance
//! is zeroed afterwards. That is how "any other command breaks the streak" is
//! implemented without each handler knowing about the others.

use core_keymap::CommandId;
use core_state::EditorState;
use tracing::{debug, trace};

use crate::{CommandOutcome, EditResult, Invocation, Session};

mod edit;
mod kill;
mod motion;
mod select;
mod undo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Streaks {
    kill: u32,
    yank: u32,
    visual: u32,
    move_to_line: u32,
}

impl Streaks {
    fn capture(state: &EditorState) -> Self {
        Self {
            kill: state.kill_command_count,
            yank: state.yank_command_count,
            visual: state.visual_selection_command_count,
            move_to_line: state.move_to_line_command_count,
        }
    }

    /// Zero every counter that did not move. Returns true when this ended an
    /// active selection.
    fn settle(self, state: &mut EditorState) -> bool {
        if state.kill_command_count == self.kill {
            state.kill_command_count = 0;
        }
        if state.yank_command_count == self.yank {
            state.yank_command_count = 0;
        }
        if state.move_to_line_command_count == self.move_to_line {
            state.move_to_line_command_count = 0;
        }
        if state.visual_selection_command_count == self.visual {
            state.visual_selection_command_count = 0;
            return self.visual > 0;
        }
        false
    }
}

/// Run `command` and settle streaks.
pub(crate) fn execute(
    s: &mut Session,
    command: CommandId,
    inv: Invocation,
) -> EditResult<CommandOutcome> {
    let before = Streaks::capture(&s.state);
    s.state.current_command = command;
    trace!(target: "actions.dispatch", %command, key = ?inv.key, arg = ?inv.arg, cursor = s.state.cursor(), "execute");
    let outcome = run(s, command, inv);
    let selection_ended = before.settle(&mut s.state);
    let after = Streaks::capture(&s.state);
    if after != before {
        debug!(target: "actions.dispatch", %command, kill = after.kill, yank = after.yank, visual = after.visual, move_to_line = after.move_to_line, "streaks");
    }
    if selection_ended && matches!(outcome, Ok(CommandOutcome::Continue)) {
        // Repaint once so the highlight disappears.
        s.render()?;
    }
    outcome
}

fn cont(r: EditResult<()>) -> EditResult<CommandOutcome> {
    r.map(|()| CommandOutcome::Continue)
}

fn run(s: &mut Session, command: CommandId, inv: Invocation) -> EditResult<CommandOutcome> {
    use CommandId::*;
    match command {
        SelfInsert => cont(edit::self_insert(s, inv)),
        AddLine => cont(edit::add_line(s)),
        InsertLineAbove => cont(edit::insert_line_above(s)),
        InsertLineBelow => cont(edit::insert_line_below(s)),
        BackwardDeleteChar => cont(edit::backward_delete_char(s, inv)),
        DeleteChar => edit::delete_char(s, inv.count(), false),
        DeleteCharOrExit => edit::delete_char(s, 1, true),
        ForwardDeleteInput => cont(edit::forward_delete_input(s)),
        ForwardDeleteLine => cont(edit::forward_delete_line(s)),
        BackwardDeleteInput => cont(edit::backward_delete_input(s)),
        BackwardDeleteLine => cont(edit::backward_delete_line(s)),
        UpcaseWord => cont(edit::change_word_case(s, true)),
        DowncaseWord => cont(edit::change_word_case(s, false)),
        CapitalizeWord => cont(edit::capitalize_word(s)),
        KillLine => cont(kill::kill_line(s)),
        BackwardKillInput => cont(kill::backward_kill_input(s)),
        BackwardKillLine => cont(kill::backward_kill_line(s)),
        KillWord => cont(kill::kill_word(s)),
        BackwardKillWord => cont(kill::backward_kill_word(s)),
        UnixWordRubout => cont(kill::unix_word_rubout(s)),
        KillRegion => cont(kill::kill_region(s)),
        Yank => cont(kill::yank(s)),
        YankPop => cont(kill::yank_pop(s)),
        ClearKillRing => {
            kill::clear_kill_ring(s);
            Ok(CommandOutcome::Continue)
        }
        SetMark => {
            kill::set_mark(s);
            Ok(CommandOutcome::Continue)
        }
        ExchangePointAndMark => cont(kill::exchange_point_and_mark(s)),
        SelectBackwardChar => cont(select::visual_selection(s, |s| {
            motion::backward_char(s, inv.count())
        })),
        SelectForwardChar => cont(select::visual_selection(s, |s| {
            motion::forward_char(s, inv.count())
        })),
        SelectBackwardWord => cont(select::visual_selection(s, |s| {
            motion::backward_word(s, inv.count())
        })),
        SelectNextWord => cont(select::visual_selection(s, |s| {
            motion::next_word(s, inv.count())
        })),
        SelectForwardWord => cont(select::visual_selection(s, |s| {
            motion::forward_word(s, inv.count())
        })),
        SelectAll => cont(select::select_all(s)),
        SelectLine => cont(select::visual_selection(s, motion::end_of_line)),
        SelectBackwardsLine => cont(select::visual_selection(s, motion::beginning_of_line)),
        Paste => cont(select::paste(s)),
        Copy => {
            select::copy(s);
            Ok(CommandOutcome::Continue)
        }
        CopyOrCancelLine => select::copy_or_cancel_line(s),
        Cut => cont(select::cut(s)),
        ForwardChar => cont(motion::forward_char(s, inv.count())),
        BackwardChar => cont(motion::backward_char(s, inv.count())),
        BeginningOfLine => cont(motion::beginning_of_line(s)),
        EndOfLine => cont(motion::end_of_line(s)),
        NextLine => cont(motion::move_to_line(s, inv.count())),
        PreviousLine => cont(motion::move_to_line(s, -inv.count())),
        NextWord => cont(motion::next_word(s, inv.count())),
        ForwardWord => cont(motion::forward_word(s, inv.count())),
        BackwardWord => cont(motion::backward_word(s, inv.count())),
        CharacterSearch => cont(motion::character_search(s, command, inv, true)),
        CharacterSearchBackward => cont(motion::character_search(s, command, inv, false)),
        ClearScreen => cont(motion::clear_screen(s)),
        Undo => cont(undo::undo(s)),
        RevertLine => cont(undo::revert_line(s)),
        AcceptLine => edit::accept_line(s),
        CancelLine => edit::cancel_line(s),
    }
}
