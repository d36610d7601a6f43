use core_keymap::CommandId;
use core_text::Buffer;
use tracing::trace;

/// One invertible buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
    Replace { position: usize, old: String, new: String },
}

impl EditKind {
    /// Re-apply the mutation (used to check invertibility in tests and to
    /// describe the record in logs).
    pub fn apply(&self, buffer: &mut Buffer) {
        match self {
            EditKind::Insert { position, text } => {
                buffer.insert(*position, text);
            }
            EditKind::Delete { position, text } => {
                buffer.remove(*position, char_len(text));
            }
            EditKind::Replace { position, old, new } => {
                buffer.remove(*position, char_len(old));
                buffer.insert(*position, new);
            }
        }
    }

    /// Apply the inverse mutation.
    pub fn revert(&self, buffer: &mut Buffer) {
        match self {
            EditKind::Insert { position, text } => {
                buffer.remove(*position, char_len(text));
            }
            EditKind::Delete { position, text } => {
                buffer.insert(*position, text);
            }
            EditKind::Replace { position, old, new } => {
                buffer.remove(*position, char_len(new));
                buffer.insert(*position, old);
            }
        }
    }

    fn op(&self) -> &'static str {
        match self {
            EditKind::Insert { .. } => "insert",
            EditKind::Delete { .. } => "delete",
            EditKind::Replace { .. } => "replace",
        }
    }
}

/// Undo log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub kind: EditKind,
    /// Cursor before the mutation; restored when the record is undone.
    pub cursor_before: usize,
    /// Command that produced the record.
    pub command: CommandId,
    /// Undo this record together with the one before it.
    pub coalesce: bool,
}

/// Linear edit history. Undo walks `index` backwards; recording a new edit
/// drops everything past `index`. There is no redo.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    records: Vec<EditRecord>,
    index: usize,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records that can still be undone.
    pub fn undo_depth(&self) -> usize {
        self.index
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn records(&self) -> &[EditRecord] {
        &self.records[..self.index]
    }

    /// Most recent undoable record.
    pub fn last(&self) -> Option<&EditRecord> {
        self.index.checked_sub(1).map(|i| &self.records[i])
    }

    pub fn push(&mut self, record: EditRecord) {
        if self.index < self.records.len() {
            trace!(target: "state.undo", dropped = self.records.len() - self.index, "undo_tail_truncated");
            self.records.truncate(self.index);
        }
        trace!(target: "state.undo", op = record.kind.op(), command = %record.command, coalesce = record.coalesce, depth = self.index + 1, "push_record");
        self.records.push(record);
        self.index += 1;
    }

    /// Revert the most recent record, plus any records it coalesces with.
    /// Returns the cursor to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut Buffer) -> Option<usize> {
        let mut cursor = None;
        while let Some(i) = self.index.checked_sub(1) {
            let record = &self.records[i];
            record.kind.revert(buffer);
            cursor = Some(record.cursor_before);
            self.index = i;
            trace!(target: "state.undo", op = record.kind.op(), depth = self.index, "undo_record");
            if !record.coalesce {
                break;
            }
        }
        cursor
    }

    /// Revert every record. Returns the cursor from before the first edit.
    pub fn undo_all(&mut self, buffer: &mut Buffer) -> Option<usize> {
        let mut cursor = None;
        while let Some(c) = self.undo(buffer) {
            cursor = Some(c);
        }
        cursor
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.index = 0;
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
