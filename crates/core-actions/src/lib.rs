//! Editing commands and the session that runs them.
//!
//! A `Session` owns the `EditorState` plus its collaborators (render sink,
//! clipboard, prediction provider) and executes commands by `CommandId`. Each
//! command is a plain function of `(session, invocation)`; the dispatcher adds
//! the streak bookkeeping that makes consecutive kills merge, consecutive
//! yank-pops rotate, and selections end when a non-selection command runs.
//!
//! Boundary conditions ring the bell through the sink and return
//! `CommandOutcome::Continue`. Only terminal I/O failures and malformed
//! invocations surface as `EditError`.

pub mod collab;
mod dispatcher;
pub mod error;
pub mod session;

pub use collab::{
    Clipboard, MemoryClipboard, NoPrediction, Prediction, PredictionPause, RenderHints,
    RenderSink,
};
pub use error::{EditError, EditResult};
pub use session::Session;

/// What the driving loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Keep reading keys.
    Continue,
    /// The line was accepted with this text.
    Accept(String),
    /// The line was abandoned.
    Cancel,
    /// End of input on an empty line: leave the REPL.
    Exit,
}

/// Arguments a command is invoked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Char typed by the key that triggered the command.
    pub key: Option<char>,
    /// Numeric argument (repeat count, or occurrence for searches).
    pub arg: Option<i32>,
    /// Target char for character searches.
    pub target: Option<char>,
}

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: char) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    pub fn with_arg(arg: i32) -> Self {
        Self {
            arg: Some(arg),
            ..Self::default()
        }
    }

    pub fn with_target(target: char) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: i32) -> Self {
        self.arg = Some(arg);
        self
    }

    pub fn target(mut self, target: char) -> Self {
        self.target = Some(target);
        self
    }

    /// Numeric argument, defaulting to 1.
    pub fn count(&self) -> i32 {
        self.arg.unwrap_or(1)
    }
}
