//! Crossterm key events to `KeyChord`s.

use std::io;
use std::time::Duration;

use core_keymap::{KeyChord, KeyCode, KeyModifiers};
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyEventKind as CKeyEventKind, KeyModifiers as CKeyModifiers,
};
use tracing::trace;

/// Map a key press. Releases and keys without a chord form (media keys,
/// lone modifiers) yield `None`.
pub fn map_key_event(event: &CKeyEvent) -> Option<KeyChord> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let code = match event.code {
        CKeyCode::Char(c) => KeyCode::Char(c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    let mut mods = map_modifiers(event.modifiers);
    if let KeyCode::Char(c) = code {
        if mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) {
            // Bindings spell Ctrl/Alt letters in lower case with explicit Shift.
            if c.is_ascii_uppercase() {
                return Some(KeyChord::new(
                    KeyCode::Char(c.to_ascii_lowercase()),
                    mods | KeyModifiers::SHIFT,
                ));
            }
        } else {
            // Shift is already part of the typed char.
            mods.remove(KeyModifiers::SHIFT);
        }
    }
    Some(KeyChord::new(code, mods))
}

fn map_modifiers(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.intersects(CKeyModifiers::ALT | CKeyModifiers::META) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Block for the next terminal event. `None` for anything that is not a
/// mappable key press (resize, focus, releases).
pub fn read_chord() -> io::Result<Option<KeyChord>> {
    match event::read()? {
        CEvent::Key(key) => {
            let chord = map_key_event(&key);
            trace!(target: "terminal", ?key, ?chord, "key");
            Ok(chord)
        }
        _ => Ok(None),
    }
}

/// Wait up to `timeout` for a key press. `Ok(None)` on timeout or for
/// events that are not key presses.
pub fn poll_chord(timeout: Duration) -> io::Result<Option<KeyChord>> {
    if event::poll(timeout)? {
        read_chord()
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState as CKeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: CKeyEventState::empty(),
        }
    }

    fn press(code: CKeyCode, modifiers: CKeyModifiers) -> Option<KeyChord> {
        map_key_event(&key_event(code, modifiers, CKeyEventKind::Press))
    }

    #[test]
    fn shifted_letters_type_themselves() {
        let chord = press(CKeyCode::Char('A'), CKeyModifiers::SHIFT).unwrap();
        assert_eq!(chord, KeyChord::plain(KeyCode::Char('A')));
        assert_eq!(chord.printable(), Some('A'));
    }

    #[test]
    fn ctrl_letters_match_binding_syntax() {
        assert_eq!(
            press(CKeyCode::Char('k'), CKeyModifiers::CONTROL),
            Some("Ctrl+k".parse().unwrap())
        );
        assert_eq!(
            press(CKeyCode::Char('F'), CKeyModifiers::ALT | CKeyModifiers::SHIFT),
            Some("Alt+Shift+f".parse().unwrap())
        );
    }

    #[test]
    fn named_keys_keep_shift() {
        assert_eq!(
            press(CKeyCode::Left, CKeyModifiers::SHIFT),
            Some("Shift+LeftArrow".parse().unwrap())
        );
    }

    #[test]
    fn releases_and_media_keys_are_dropped() {
        assert_eq!(
            map_key_event(&key_event(
                CKeyCode::Char('a'),
                CKeyModifiers::NONE,
                CKeyEventKind::Release
            )),
            None
        );
        assert_eq!(press(CKeyCode::CapsLock, CKeyModifiers::NONE), None);
    }
}
