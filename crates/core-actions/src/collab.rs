//! Collaborators the editing commands talk to but do not own.
//!
//! * `RenderSink` paints the buffer. Commands decide *when* to render (once
//!   per logical operation), the sink decides *how*.
//! * `Clipboard` is the system clipboard (or an in-memory stand-in).
//! * `Prediction` is an inline suggestion provider. Some operations pause it
//!   for their duration through `PredictionPause`, which restores the
//!   previous state on drop so no exit path can leave it paused.

use std::io;

use core_model::ScreenLayout;
use core_state::{BellStyle, EditorState};

/// Extra information for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderHints {
    /// The prediction provider must not be queried for this pass.
    pub prediction_paused: bool,
}

impl RenderHints {
    pub const PAUSED: RenderHints = RenderHints {
        prediction_paused: true,
    };
}

pub trait RenderSink {
    /// A new line is about to be read (draw the prompt, remember where input
    /// starts).
    fn begin_line(&mut self, _state: &EditorState) -> io::Result<()> {
        Ok(())
    }

    /// Redraw the input region (text, selection highlight, cursor).
    fn render(&mut self, state: &EditorState, hints: RenderHints) -> io::Result<()>;

    /// Move the terminal cursor to the editor cursor without repainting text.
    fn place_cursor(&mut self, state: &EditorState) -> io::Result<()>;

    /// Geometry used to map offsets to screen points.
    fn layout(&self) -> ScreenLayout;

    /// Signal a boundary condition to the user.
    fn ding(&mut self, style: BellStyle);

    /// Write text after the input region (the `^C` marker, the final newline).
    fn emit(&mut self, text: &str) -> io::Result<()>;

    /// Clear the screen and repaint the prompt and input at the top.
    fn clear_screen(&mut self, state: &EditorState) -> io::Result<()>;
}

pub trait Clipboard {
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
}

/// Process-local clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}

pub trait Prediction {
    /// Text that would complete `input`, if the provider has a suggestion.
    fn suggestion(&self, input: &str) -> Option<String>;

    /// Dismiss a visible suggestion. Returns true when one was dismissed.
    fn revert_suggestion(&mut self) -> bool {
        false
    }

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);
}

/// Provider that never suggests anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrediction {
    paused: bool,
}

impl Prediction for NoPrediction {
    fn suggestion(&self, _input: &str) -> Option<String> {
        None
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// Pauses a `Prediction` until dropped.
pub struct PredictionPause<'a> {
    prediction: &'a mut dyn Prediction,
    was_paused: bool,
}

impl<'a> PredictionPause<'a> {
    pub fn new(prediction: &'a mut dyn Prediction) -> Self {
        let was_paused = prediction.is_paused();
        prediction.set_paused(true);
        Self {
            prediction,
            was_paused,
        }
    }
}

impl Drop for PredictionPause<'_> {
    fn drop(&mut self) {
        self.prediction.set_paused(self.was_paused);
    }
}
