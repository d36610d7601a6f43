use core_keymap::{CommandId, KeyChord, Keymap};
use core_model::ScreenLayout;
use core_state::{EditorState, Region};
use tracing::{debug, info};

use crate::collab::{
    Clipboard, MemoryClipboard, NoPrediction, Prediction, PredictionPause, RenderHints,
    RenderSink,
};
use crate::dispatcher;
use crate::{CommandOutcome, EditError, EditResult, Invocation};

/// One interactive editing session.
pub struct Session {
    pub(crate) state: EditorState,
    pub(crate) keymap: Keymap,
    pub(crate) sink: Box<dyn RenderSink>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) prediction: Box<dyn Prediction>,
}

impl Session {
    /// Session with an in-memory clipboard and no prediction provider.
    pub fn new(state: EditorState, keymap: Keymap, sink: Box<dyn RenderSink>) -> Self {
        Self {
            state,
            keymap,
            sink,
            clipboard: Box::new(MemoryClipboard::new()),
            prediction: Box::new(NoPrediction::default()),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_prediction(mut self, prediction: Box<dyn Prediction>) -> Self {
        self.prediction = prediction;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    pub fn clipboard(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    /// Start reading a new line: empty buffer, fresh undo log, first paint.
    pub fn begin_line(&mut self) -> EditResult<()> {
        self.state.reset_line();
        info!(target: "actions.dispatch", "begin_line");
        self.sink.begin_line(&self.state)?;
        self.render()
    }

    /// Run `command` with streak bookkeeping.
    pub fn execute(&mut self, command: CommandId, inv: Invocation) -> EditResult<CommandOutcome> {
        dispatcher::execute(self, command, inv)
    }

    /// Run a command by its kebab-case name.
    pub fn execute_named(&mut self, name: &str, inv: Invocation) -> EditResult<CommandOutcome> {
        let command =
            CommandId::from_name(name).ok_or_else(|| EditError::UnknownCommand(name.to_string()))?;
        self.execute(command, inv)
    }

    /// Resolve `chord` through the keymap and run the bound command. An
    /// unbound chord rings the bell.
    pub fn handle_key(
        &mut self,
        chord: KeyChord,
        arg: Option<i32>,
        target: Option<char>,
    ) -> EditResult<CommandOutcome> {
        let Some(command) = self.keymap.resolve(&chord) else {
            debug!(target: "actions.dispatch", %chord, "unbound_key");
            self.ding();
            return Ok(CommandOutcome::Continue);
        };
        let inv = Invocation {
            key: chord.printable(),
            arg,
            target,
        };
        self.execute(command, inv)
    }

    pub(crate) fn layout(&self) -> ScreenLayout {
        self.sink.layout()
    }

    pub(crate) fn render(&mut self) -> EditResult<()> {
        self.sink.render(&self.state, RenderHints::default())?;
        Ok(())
    }

    pub(crate) fn render_with_prediction_paused(&mut self) -> EditResult<()> {
        let _pause = PredictionPause::new(self.prediction.as_mut());
        self.sink.render(&self.state, RenderHints::PAUSED)?;
        Ok(())
    }

    /// Run `f` with the prediction provider paused. The previous state is
    /// restored whether `f` succeeds or fails.
    pub(crate) fn with_prediction_paused<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> EditResult<T>,
    ) -> EditResult<T> {
        let was_paused = self.prediction.is_paused();
        self.prediction.set_paused(true);
        let result = f(self);
        self.prediction.set_paused(was_paused);
        result
    }

    pub(crate) fn ding(&mut self) {
        self.sink.ding(self.state.options.bell);
    }

    /// Move the cursor (clamped) without repainting text.
    pub(crate) fn move_cursor(&mut self, offset: usize) -> EditResult<()> {
        self.state.set_cursor(offset);
        self.sink.place_cursor(&self.state)?;
        Ok(())
    }

    /// Move by a signed amount, clamped to the buffer.
    pub(crate) fn set_cursor_position(&mut self, target: i64) -> EditResult<()> {
        let len = self.state.len() as i64;
        let clamped = target.clamp(0, len);
        self.move_cursor(clamped as usize)
    }

    pub(crate) fn insert(&mut self, text: &str) -> EditResult<()> {
        self.state.insert_at_cursor(text);
        self.render()
    }

    pub(crate) fn delete(&mut self, start: usize, length: usize) -> EditResult<()> {
        self.state.delete(start, length);
        self.render()
    }

    pub(crate) fn delete_region(&mut self, region: Region) -> EditResult<()> {
        self.delete(region.start, region.length)
    }

    pub(crate) fn replace(&mut self, start: usize, length: usize, text: &str) -> EditResult<()> {
        self.state.replace(start, length, text);
        self.render()
    }
}
