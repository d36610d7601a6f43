use std::io;

use core_keymap::CommandId;
use thiserror::Error;

/// Failure of an editing command. Boundary conditions (cursor at an edge,
/// empty kill ring, nothing to undo) are not errors; they ring the bell.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("{command}: {reason}")]
    InvalidArgument {
        command: CommandId,
        reason: &'static str,
    },
}

pub type EditResult<T> = Result<T, EditError>;
