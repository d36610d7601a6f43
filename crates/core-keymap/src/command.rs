//! Symbolic command identifiers.
//!
//! Every editing command is addressed by a `CommandId`. The kebab-case name is
//! the stable external spelling used by configuration files and scripted
//! invocation; the enum is what the dispatcher matches on.

use std::fmt;
use std::str::FromStr;

use crate::KeyParseError;

macro_rules! commands {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Identifier of a bindable editing command.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CommandId {
            $($variant,)*
        }

        impl CommandId {
            /// Every command, in declaration order.
            pub const ALL: &'static [CommandId] = &[$(CommandId::$variant,)*];

            /// Kebab-case name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(CommandId::$variant => $name,)*
                }
            }

            /// Resolve a kebab-case name.
            pub fn from_name(name: &str) -> Option<CommandId> {
                match name {
                    $($name => Some(CommandId::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

commands! {
    // insertion
    SelfInsert => "self-insert",
    AddLine => "add-line",
    InsertLineAbove => "insert-line-above",
    InsertLineBelow => "insert-line-below",
    // deletion (kill ring untouched)
    BackwardDeleteChar => "backward-delete-char",
    DeleteChar => "delete-char",
    DeleteCharOrExit => "delete-char-or-exit",
    ForwardDeleteInput => "forward-delete-input",
    ForwardDeleteLine => "forward-delete-line",
    BackwardDeleteInput => "backward-delete-input",
    BackwardDeleteLine => "backward-delete-line",
    // case
    UpcaseWord => "upcase-word",
    DowncaseWord => "downcase-word",
    CapitalizeWord => "capitalize-word",
    // kill ring
    KillLine => "kill-line",
    BackwardKillInput => "backward-kill-input",
    BackwardKillLine => "backward-kill-line",
    KillWord => "kill-word",
    BackwardKillWord => "backward-kill-word",
    UnixWordRubout => "unix-word-rubout",
    KillRegion => "kill-region",
    Yank => "yank",
    YankPop => "yank-pop",
    ClearKillRing => "clear-kill-ring",
    // mark
    SetMark => "set-mark",
    ExchangePointAndMark => "exchange-point-and-mark",
    // selection
    SelectBackwardChar => "select-backward-char",
    SelectForwardChar => "select-forward-char",
    SelectBackwardWord => "select-backward-word",
    SelectNextWord => "select-next-word",
    SelectForwardWord => "select-forward-word",
    SelectAll => "select-all",
    SelectLine => "select-line",
    SelectBackwardsLine => "select-backwards-line",
    // clipboard
    Paste => "paste",
    Copy => "copy",
    CopyOrCancelLine => "copy-or-cancel-line",
    Cut => "cut",
    // movement
    ForwardChar => "forward-char",
    BackwardChar => "backward-char",
    BeginningOfLine => "beginning-of-line",
    EndOfLine => "end-of-line",
    NextLine => "next-line",
    PreviousLine => "previous-line",
    NextWord => "next-word",
    ForwardWord => "forward-word",
    BackwardWord => "backward-word",
    CharacterSearch => "character-search",
    CharacterSearchBackward => "character-search-backward",
    ClearScreen => "clear-screen",
    // history of edits
    Undo => "undo",
    RevertLine => "revert-line",
    // line
    AcceptLine => "accept-line",
    CancelLine => "cancel-line",
}

impl CommandId {
    /// Commands that consume a target char read after the key press.
    pub fn needs_char_argument(self) -> bool {
        matches!(
            self,
            CommandId::CharacterSearch | CommandId::CharacterSearchBackward
        )
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandId {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandId::from_name(s).ok_or_else(|| KeyParseError::UnknownCommand(s.to_string()))
    }
}
