//! core-keymap: symbolic command registry and key bindings.
//!
//! Commands are addressed by `CommandId`, never by function identity, so the
//! binding table can be queried in both directions:
//! * chord -> command, for dispatching a key press;
//! * command -> chords, for "is this command bound anywhere?" checks that
//!   movement commands use to pick a counterpart when a count is negative.
//!
//! The table is plain data. Overrides from configuration are applied with
//! `Keymap::bind_str`; the default table is `Keymap::emacs`.

use std::collections::HashMap;

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

pub mod chord;
pub mod command;

pub use chord::{KeyChord, KeyCode, KeyModifiers};
pub use command::CommandId;

/// Failure to interpret a chord string or a command name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key chord")]
    Empty,
    #[error("key chord `{0}` names modifiers but no key")]
    MissingKey(String),
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}

/// Chords bound to one command. Almost every command has one or two.
pub type ChordList = SmallVec<[KeyChord; 4]>;

/// Bidirectional chord <-> command table.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    by_chord: HashMap<KeyChord, CommandId>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `chord` to `command`, returning the command it displaced.
    pub fn bind(&mut self, chord: KeyChord, command: CommandId) -> Option<CommandId> {
        let prev = self.by_chord.insert(chord, command);
        trace!(target: "keymap", %chord, %command, displaced = ?prev, "bind");
        prev
    }

    pub fn unbind(&mut self, chord: KeyChord) -> Option<CommandId> {
        self.by_chord.remove(&chord)
    }

    /// Parse both sides and bind.
    pub fn bind_str(&mut self, chord: &str, command: &str) -> Result<(), KeyParseError> {
        let chord: KeyChord = chord.parse()?;
        let command: CommandId = command.parse()?;
        if let Some(prev) = self.bind(chord, command)
            && prev != command
        {
            debug!(target: "keymap", %chord, from = %prev, to = %command, "rebind");
        }
        Ok(())
    }

    /// Command explicitly bound to `chord`.
    pub fn lookup(&self, chord: &KeyChord) -> Option<CommandId> {
        self.by_chord.get(chord).copied()
    }

    /// Command a key press runs: the bound command, or `self-insert` for an
    /// unbound printable chord.
    pub fn resolve(&self, chord: &KeyChord) -> Option<CommandId> {
        self.lookup(chord)
            .or_else(|| chord.printable().map(|_| CommandId::SelfInsert))
    }

    /// All chords bound to `command`, in a stable order.
    pub fn keys_for(&self, command: CommandId) -> ChordList {
        let mut keys: ChordList = self
            .by_chord
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_bound(&self, command: CommandId) -> bool {
        self.by_chord.values().any(|c| *c == command)
    }

    pub fn len(&self) -> usize {
        self.by_chord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chord.is_empty()
    }

    /// Default bindings: Emacs chords plus the usual arrow/Home/End keys and
    /// Shift-extended selection.
    pub fn emacs() -> Self {
        use CommandId::*;
        const TABLE: &[(&str, CommandId)] = &[
            ("Enter", AcceptLine),
            ("Shift+Enter", AddLine),
            ("Ctrl+Enter", InsertLineAbove),
            ("Ctrl+Shift+Enter", InsertLineBelow),
            ("Escape", RevertLine),
            ("Ctrl+g", CancelLine),
            ("Ctrl+c", CopyOrCancelLine),
            ("Backspace", BackwardDeleteChar),
            ("Ctrl+h", BackwardDeleteChar),
            ("Delete", DeleteChar),
            ("Ctrl+d", DeleteCharOrExit),
            ("Ctrl+End", ForwardDeleteInput),
            ("Ctrl+Home", BackwardDeleteInput),
            ("Alt+u", UpcaseWord),
            ("Alt+l", DowncaseWord),
            ("Alt+c", CapitalizeWord),
            ("Ctrl+k", KillLine),
            ("Ctrl+u", BackwardKillLine),
            ("Alt+d", KillWord),
            ("Alt+Backspace", BackwardKillWord),
            ("Ctrl+Backspace", BackwardKillWord),
            ("Ctrl+w", UnixWordRubout),
            ("Ctrl+Alt+w", KillRegion),
            ("Ctrl+y", Yank),
            ("Alt+y", YankPop),
            ("Ctrl+@", SetMark),
            ("Alt+x", ExchangePointAndMark),
            ("Shift+LeftArrow", SelectBackwardChar),
            ("Shift+RightArrow", SelectForwardChar),
            ("Ctrl+Shift+LeftArrow", SelectBackwardWord),
            ("Ctrl+Shift+RightArrow", SelectNextWord),
            ("Alt+Shift+f", SelectForwardWord),
            ("Alt+a", SelectAll),
            ("Shift+End", SelectLine),
            ("Shift+Home", SelectBackwardsLine),
            ("Ctrl+v", Paste),
            ("Ctrl+Shift+c", Copy),
            ("Ctrl+x", Cut),
            ("Ctrl+f", ForwardChar),
            ("RightArrow", ForwardChar),
            ("Ctrl+b", BackwardChar),
            ("LeftArrow", BackwardChar),
            ("Ctrl+a", BeginningOfLine),
            ("Home", BeginningOfLine),
            ("Ctrl+e", EndOfLine),
            ("End", EndOfLine),
            ("Ctrl+n", NextLine),
            ("DownArrow", NextLine),
            ("Ctrl+p", PreviousLine),
            ("UpArrow", PreviousLine),
            ("Ctrl+RightArrow", NextWord),
            ("Alt+f", ForwardWord),
            ("Alt+b", BackwardWord),
            ("Ctrl+LeftArrow", BackwardWord),
            ("Ctrl+]", CharacterSearch),
            ("Ctrl+Alt+]", CharacterSearchBackward),
            ("Ctrl+l", ClearScreen),
            ("Ctrl+z", Undo),
            ("Ctrl+_", Undo),
        ];
        let mut map = Keymap::new();
        for (chord, command) in TABLE {
            match chord.parse() {
                Ok(chord) => {
                    map.bind(chord, *command);
                }
                Err(e) => debug_assert!(false, "default chord {chord}: {e}"),
            }
        }
        map
    }
}
