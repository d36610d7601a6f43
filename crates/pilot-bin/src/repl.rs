//! Interactive loop: read chords, run commands, echo accepted lines.

use anyhow::Result;
use core_actions::{CommandOutcome, Session};
use core_config::Config;
use core_keymap::{KeyChord, KeyCode, KeyModifiers, Keymap};
use core_render::InputPainter;
use core_state::EditorState;
use core_terminal::{Console, CrosstermBackend, CrosstermConsole, read_chord};
use tracing::{debug, info};

const PROMPT: &str = "pilot> ";

/// One command invocation assembled from one or more key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub chord: KeyChord,
    pub arg: Option<i32>,
    pub target: Option<char>,
}

/// Collects `Alt+<digit>` numeric arguments and the target char that
/// character search reads after its own key.
#[derive(Debug, Default)]
pub(crate) struct KeyReader {
    digits: Option<i32>,
    negative: bool,
    awaiting_target: Option<(KeyChord, Option<i32>)>,
}

impl KeyReader {
    fn take_arg(&mut self) -> Option<i32> {
        let negative = std::mem::take(&mut self.negative);
        match self.digits.take() {
            Some(n) => Some(if negative { -n } else { n }),
            None => negative.then_some(-1),
        }
    }

    /// Feed one chord. Returns a step once a command is complete.
    pub(crate) fn feed(&mut self, chord: KeyChord, keymap: &Keymap) -> Option<Step> {
        if let Some((search, arg)) = self.awaiting_target.take() {
            // A non-printable key abandons the search.
            let target = chord.printable()?;
            return Some(Step {
                chord: search,
                arg,
                target: Some(target),
            });
        }
        if chord.mods == KeyModifiers::ALT
            && let KeyCode::Char(c) = chord.code
        {
            if let Some(d) = c.to_digit(10) {
                let d = i32::try_from(d).unwrap_or(0);
                self.digits = Some(self.digits.unwrap_or(0).saturating_mul(10).saturating_add(d));
                return None;
            }
            if c == '-' && self.digits.is_none() {
                self.negative = !self.negative;
                return None;
            }
        }
        let arg = self.take_arg();
        if keymap
            .resolve(&chord)
            .is_some_and(|command| command.needs_char_argument())
        {
            self.awaiting_target = Some((chord, arg));
            return None;
        }
        Some(Step {
            chord,
            arg,
            target: None,
        })
    }
}

pub(crate) fn run(config: &Config) -> Result<()> {
    let mut keymap = Keymap::emacs();
    let applied = config.apply_keys(&mut keymap);
    info!(target: "runtime.repl", bindings = keymap.len(), overrides = applied, "keymap_ready");

    let state = EditorState::new(config.editor_options());
    let painter = InputPainter::new(CrosstermConsole::new(), PROMPT);
    let mut session = Session::new(state, keymap, Box::new(painter));

    let mut backend = CrosstermBackend::new();
    let _guard = backend.enter_guard()?;
    let mut out = CrosstermConsole::new();
    let mut reader = KeyReader::default();

    'lines: loop {
        session.begin_line()?;
        loop {
            let Some(chord) = read_chord()? else { continue };
            let Some(step) = reader.feed(chord, session.keymap()) else {
                continue;
            };
            match session.handle_key(step.chord, step.arg, step.target)? {
                CommandOutcome::Continue => {}
                CommandOutcome::Accept(text) => {
                    info!(target: "runtime.repl", len = text.chars().count(), "accepted");
                    if text.trim() == "exit" {
                        break 'lines;
                    }
                    out.write(&text)?;
                    out.write("\n")?;
                    out.flush()?;
                    continue 'lines;
                }
                CommandOutcome::Cancel => {
                    debug!(target: "runtime.repl", "cancelled");
                    out.write("\n")?;
                    out.flush()?;
                    continue 'lines;
                }
                CommandOutcome::Exit => {
                    out.write("\n")?;
                    out.flush()?;
                    break 'lines;
                }
            }
        }
    }
    info!(target: "runtime.repl", "exit");
    Ok(())
}
