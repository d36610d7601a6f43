#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use core_actions::{
    CommandOutcome, Invocation, MemoryClipboard, Prediction, RenderHints, RenderSink, Session,
};
use core_keymap::{CommandId, Keymap};
use core_model::{Point, ScreenLayout};
use core_state::{BellStyle, EditorState};

/// What a `RecordingSink` observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Render { text: String, cursor: usize, paused: bool },
    PlaceCursor(usize),
    Ding,
    Emit(String),
    ClearScreen,
}

/// Render sink that logs every call into a shared vector.
#[derive(Clone)]
pub struct RecordingSink {
    pub log: Rc<RefCell<Vec<SinkEvent>>>,
    pub layout: ScreenLayout,
}

impl RecordingSink {
    pub fn new(width: i32) -> Self {
        Self {
            log: Rc::default(),
            layout: ScreenLayout::new(Point::new(0, 0), width, 0),
        }
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, state: &EditorState, hints: RenderHints) -> io::Result<()> {
        self.log.borrow_mut().push(SinkEvent::Render {
            text: state.text(),
            cursor: state.cursor(),
            paused: hints.prediction_paused,
        });
        Ok(())
    }

    fn place_cursor(&mut self, state: &EditorState) -> io::Result<()> {
        self.log
            .borrow_mut()
            .push(SinkEvent::PlaceCursor(state.cursor()));
        Ok(())
    }

    fn layout(&self) -> ScreenLayout {
        self.layout
    }

    fn ding(&mut self, _style: BellStyle) {
        self.log.borrow_mut().push(SinkEvent::Ding);
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.log.borrow_mut().push(SinkEvent::Emit(text.to_string()));
        Ok(())
    }

    fn clear_screen(&mut self, _state: &EditorState) -> io::Result<()> {
        self.log.borrow_mut().push(SinkEvent::ClearScreen);
        Ok(())
    }
}

/// Prediction stub that always suggests the same suffix.
#[derive(Debug, Default)]
pub struct FixedPrediction {
    pub suffix: Option<String>,
    pub visible: bool,
    pub paused: bool,
}

impl Prediction for FixedPrediction {
    fn suggestion(&self, _input: &str) -> Option<String> {
        self.suffix.clone()
    }

    fn revert_suggestion(&mut self) -> bool {
        std::mem::take(&mut self.visible)
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// What a `RecordingPrediction` was asked, with its paused state at the time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionEvent {
    Queried { paused: bool },
    SetPaused(bool),
}

/// Prediction that always suggests `suffix` and logs every call.
#[derive(Debug, Default)]
pub struct RecordingPrediction {
    pub suffix: Option<String>,
    pub paused: bool,
    pub log: Rc<RefCell<Vec<PredictionEvent>>>,
}

impl Prediction for RecordingPrediction {
    fn suggestion(&self, _input: &str) -> Option<String> {
        self.log.borrow_mut().push(PredictionEvent::Queried {
            paused: self.paused,
        });
        self.suffix.clone()
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.log.borrow_mut().push(PredictionEvent::SetPaused(paused));
        self.paused = paused;
    }
}

/// Session over `text` with the cursor at `cursor`, an 80-column layout and
/// the default emacs keymap.
pub fn session(text: &str, cursor: usize) -> (Session, Rc<RefCell<Vec<SinkEvent>>>) {
    session_with_width(text, cursor, 80)
}

pub fn session_with_width(
    text: &str,
    cursor: usize,
    width: i32,
) -> (Session, Rc<RefCell<Vec<SinkEvent>>>) {
    let sink = RecordingSink::new(width);
    let log = sink.log.clone();
    let state = EditorState::with_text(text, cursor);
    let s = Session::new(state, Keymap::emacs(), Box::new(sink))
        .with_clipboard(Box::new(MemoryClipboard::new()));
    (s, log)
}

pub fn run(s: &mut Session, command: CommandId) -> CommandOutcome {
    s.execute(command, Invocation::new()).unwrap()
}

pub fn run_with(s: &mut Session, command: CommandId, inv: Invocation) -> CommandOutcome {
    s.execute(command, inv).unwrap()
}

pub fn type_str(s: &mut Session, text: &str) {
    for c in text.chars() {
        s.execute(CommandId::SelfInsert, Invocation::with_key(c))
            .unwrap();
    }
}

pub fn count_renders(log: &Rc<RefCell<Vec<SinkEvent>>>) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, SinkEvent::Render { .. }))
        .count()
}

pub fn count_dings(log: &Rc<RefCell<Vec<SinkEvent>>>) -> usize {
    log.borrow()
        .iter()
        .filter(|e| matches!(e, SinkEvent::Ding))
        .count()
}
