//! Editor session state: buffer, cursor, mark, undo log, kill ring, and the
//! streak counters that give consecutive commands their combined meaning.
//!
//! Everything a command handler touches lives in one `EditorState` value that
//! is passed explicitly; there is no global editor. The mutation primitives
//! here (`insert`, `delete`, `replace`) record an `EditRecord` before changing
//! the buffer, so every change the user can see is exactly reversible.
//! Rendering is not this crate's concern: callers render after a primitive.
//!
//! Streak counters:
//! * `kill_command_count` - consecutive kills merge into one ring slot.
//! * `yank_command_count` - a yank streak lets yank-pop replace the last yank.
//! * `visual_selection_command_count` - > 0 means a selection is active.
//! * `move_to_line_command_count` - vertical moves reuse the sticky column.
//!
//! The dispatcher zeroes any counter a command did not advance.

use core_keymap::CommandId;
use core_text::Buffer;
use core_text::motion::DEFAULT_WORD_DELIMITERS;
use tracing::trace;

pub mod kill_ring;
pub mod undo;

pub use kill_ring::KillRing;
pub use undo::{EditKind, EditRecord, UndoLog};

/// How a boundary condition is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BellStyle {
    #[default]
    Audible,
    Visual,
    None,
}

/// Tunables consumed by editing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub word_delimiters: String,
    pub maximum_kill_ring_count: usize,
    pub continuation_prompt: String,
    pub bell: BellStyle,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            word_delimiters: DEFAULT_WORD_DELIMITERS.to_string(),
            maximum_kill_ring_count: 10,
            continuation_prompt: ">> ".to_string(),
            bell: BellStyle::Audible,
        }
    }
}

/// Normalized span between mark and cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub start: usize,
    pub length: usize,
}

impl Region {
    pub fn between(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            length: a.abs_diff(b),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Column remembered across a streak of up/down moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesiredColumn {
    /// Stick to the end of each logical line.
    #[default]
    EndOfLine,
    /// Physical column to aim for.
    Column(i32),
}

#[derive(Debug, Clone)]
pub struct EditorState {
    pub buffer: Buffer,
    current: usize,
    /// Other end of the region; 0 until set.
    pub mark: usize,
    pub undo: UndoLog,
    pub kill_ring: KillRing,
    pub options: EditorOptions,
    pub kill_command_count: u32,
    pub yank_command_count: u32,
    pub yank_start_point: usize,
    pub visual_selection_command_count: u32,
    pub move_to_line_command_count: u32,
    pub move_to_line_desired_column: DesiredColumn,
    /// Command currently executing; stamped onto edit records.
    pub current_command: CommandId,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl EditorState {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            buffer: Buffer::new(),
            current: 0,
            mark: 0,
            undo: UndoLog::new(),
            kill_ring: KillRing::new(options.maximum_kill_ring_count),
            options,
            kill_command_count: 0,
            yank_command_count: 0,
            yank_start_point: 0,
            visual_selection_command_count: 0,
            move_to_line_command_count: 0,
            move_to_line_desired_column: DesiredColumn::EndOfLine,
            current_command: CommandId::SelfInsert,
        }
    }

    /// State with `text` loaded and the cursor at `cursor` (clamped). Nothing
    /// is recorded in the undo log.
    pub fn with_text(text: &str, cursor: usize) -> Self {
        let mut s = Self::default();
        s.buffer = Buffer::from_text(text);
        s.set_cursor(cursor);
        s
    }

    pub fn cursor(&self) -> usize {
        self.current
    }

    /// Place the cursor, clamped to `[0, len]`.
    pub fn set_cursor(&mut self, offset: usize) {
        self.current = offset.min(self.buffer.len());
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn at_end(&self) -> bool {
        self.current == self.buffer.len()
    }

    /// Char under the cursor.
    pub fn char_at_cursor(&self) -> Option<char> {
        self.buffer.char_at(self.current)
    }

    pub fn region(&self) -> Region {
        Region::between(self.mark.min(self.buffer.len()), self.current)
    }

    pub fn selection_active(&self) -> bool {
        self.visual_selection_command_count > 0
    }

    /// Active selection, if any.
    pub fn selection(&self) -> Option<Region> {
        self.selection_active().then(|| self.region())
    }

    pub fn word_delimiters(&self) -> &str {
        &self.options.word_delimiters
    }

    /// Insert `text` at `at` (clamped). The cursor advances past the text when
    /// it was at or after the insertion point. Empty text is a no-op.
    pub fn insert(&mut self, at: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let at = at.min(self.buffer.len());
        let coalesce = self.continues_insert_run(at);
        self.undo.push(EditRecord {
            kind: EditKind::Insert {
                position: at,
                text: text.to_string(),
            },
            cursor_before: self.current,
            command: self.current_command,
            coalesce,
        });
        self.buffer.insert(at, text);
        if self.current >= at {
            self.current += text.chars().count();
        }
        self.clamp_cursor();
        trace!(target: "state.edit", op = "insert", at, len = text.len(), cursor = self.current, "edit");
    }

    /// Insert at the cursor.
    pub fn insert_at_cursor(&mut self, text: &str) {
        self.insert(self.current, text);
    }

    /// Remove `length` chars at `start` (clamped). A cursor past `start` moves
    /// to `start`. Returns the removed text.
    pub fn delete(&mut self, start: usize, length: usize) -> String {
        let start = start.min(self.buffer.len());
        let length = length.min(self.buffer.len() - start);
        if length == 0 {
            return String::new();
        }
        let text = self.buffer.slice(start, length);
        self.undo.push(EditRecord {
            kind: EditKind::Delete {
                position: start,
                text: text.clone(),
            },
            cursor_before: self.current,
            command: self.current_command,
            coalesce: false,
        });
        self.buffer.remove(start, length);
        if self.current > start {
            self.current = start;
        }
        self.clamp_cursor();
        trace!(target: "state.edit", op = "delete", start, length, cursor = self.current, "edit");
        text
    }

    /// Swap `length` chars at `start` for `text` as one undoable edit. The
    /// cursor lands after the new text.
    pub fn replace(&mut self, start: usize, length: usize, text: &str) {
        let start = start.min(self.buffer.len());
        let length = length.min(self.buffer.len() - start);
        if length == 0 && text.is_empty() {
            return;
        }
        let old = self.buffer.slice(start, length);
        self.undo.push(EditRecord {
            kind: EditKind::Replace {
                position: start,
                old,
                new: text.to_string(),
            },
            cursor_before: self.current,
            command: self.current_command,
            coalesce: false,
        });
        self.buffer.remove(start, length);
        self.buffer.insert(start, text);
        self.current = start + text.chars().count();
        self.clamp_cursor();
        trace!(target: "state.edit", op = "replace", start, length, new_len = text.len(), cursor = self.current, "edit");
    }

    /// Undo one record (or one coalesced run). Returns false when the log is
    /// exhausted.
    pub fn undo_once(&mut self) -> bool {
        match self.undo.undo(&mut self.buffer) {
            Some(cursor) => {
                self.set_cursor(cursor);
                true
            }
            None => false,
        }
    }

    /// Undo everything recorded since the line began.
    pub fn undo_all(&mut self) -> bool {
        match self.undo.undo_all(&mut self.buffer) {
            Some(cursor) => {
                self.set_cursor(cursor);
                true
            }
            None => false,
        }
    }

    /// Start a fresh line: empty buffer, no history, no streaks. The kill ring
    /// survives across lines.
    pub fn reset_line(&mut self) {
        self.buffer.clear();
        self.current = 0;
        self.mark = 0;
        self.undo.clear();
        self.reset_streaks();
    }

    pub fn reset_streaks(&mut self) {
        self.kill_command_count = 0;
        self.yank_command_count = 0;
        self.visual_selection_command_count = 0;
        self.move_to_line_command_count = 0;
    }

    /// Empty the buffer without recording an edit (line accepted or
    /// cancelled).
    pub fn discard_text(&mut self) {
        self.buffer.clear();
        self.current = 0;
    }

    pub fn set_options(&mut self, options: EditorOptions) {
        self.kill_ring.set_capacity(options.maximum_kill_ring_count);
        self.options = options;
    }

    fn continues_insert_run(&self, at: usize) -> bool {
        if self.current_command != CommandId::SelfInsert {
            return false;
        }
        matches!(
            self.undo.last(),
            Some(EditRecord {
                kind: EditKind::Insert { position, text },
                command: CommandId::SelfInsert,
                ..
            }) if position + text.chars().count() == at
        )
    }

    fn clamp_cursor(&mut self) {
        let len = self.buffer.len();
        if self.current > len {
            self.current = len;
        }
        debug_assert!(self.current <= self.buffer.len());
    }
}
