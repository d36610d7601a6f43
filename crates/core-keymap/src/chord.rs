//! Key chords and their textual form (`Ctrl+Shift+LeftArrow`).

use std::fmt;
use std::str::FromStr;

use crate::KeyParseError;

/// Logical key, independent of any terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    F(u8),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// A key plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyChord {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyChord {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    /// The char this chord types when it is not bound, if any. Shift is part
    /// of the char itself; Ctrl/Alt chords never self-insert.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c)
                if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
                    && !c.is_control() =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Escape".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::Up => "UpArrow".into(),
        KeyCode::Down => "DownArrow".into(),
        KeyCode::Left => "LeftArrow".into(),
        KeyCode::Right => "RightArrow".into(),
        KeyCode::F(n) => format!("F{n}"),
    }
}

fn parse_key(name: &str) -> Result<KeyCode, KeyParseError> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }
    let code = match name.to_ascii_lowercase().as_str() {
        "enter" | "return" => KeyCode::Enter,
        "escape" | "esc" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "uparrow" | "up" => KeyCode::Up,
        "downarrow" | "down" => KeyCode::Down,
        "leftarrow" | "left" => KeyCode::Left,
        "rightarrow" | "right" => KeyCode::Right,
        "spacebar" | "space" => KeyCode::Char(' '),
        lower => match lower.strip_prefix('f').map(str::parse::<u8>) {
            Some(Ok(n)) if (1..=24).contains(&n) => KeyCode::F(n),
            _ => return Err(KeyParseError::UnknownKey(name.to_string())),
        },
    };
    Ok(code)
}

impl FromStr for KeyChord {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        // "Ctrl++" binds the plus key itself.
        let (prefix, key) = if s == "+" {
            ("", s)
        } else {
            match s.strip_suffix("++") {
                Some(rest) => (rest, "+"),
                None => match s.rsplit_once('+') {
                    Some((rest, key)) => (rest, key),
                    None => ("", s),
                },
            }
        };
        if key.is_empty() {
            return Err(KeyParseError::MissingKey(s.to_string()));
        }
        let mut mods = KeyModifiers::empty();
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            let flag = match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CTRL,
                "alt" | "meta" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return Err(KeyParseError::UnknownModifier(part.to_string())),
            };
            mods |= flag;
        }
        let mut code = parse_key(key)?;
        // Ctrl chords are case-insensitive letters; Shift is explicit.
        if let KeyCode::Char(c) = code
            && mods.contains(KeyModifiers::CTRL)
            && c.is_ascii_uppercase()
        {
            code = KeyCode::Char(c.to_ascii_lowercase());
            mods |= KeyModifiers::SHIFT;
        }
        Ok(KeyChord { code, mods })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        f.write_str(&key_name(self.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chord(s: &str) -> KeyChord {
        s.parse().expect("valid chord")
    }

    #[test]
    fn parses_modifiers_and_named_keys() {
        assert_eq!(
            chord("Ctrl+Shift+LeftArrow"),
            KeyChord::new(KeyCode::Left, KeyModifiers::CTRL | KeyModifiers::SHIFT)
        );
        assert_eq!(chord("alt+f"), KeyChord::new(KeyCode::Char('f'), KeyModifiers::ALT));
        assert_eq!(chord("Enter"), KeyChord::plain(KeyCode::Enter));
        assert_eq!(chord("F3"), KeyChord::plain(KeyCode::F(3)));
        assert_eq!(chord("Ctrl++"), KeyChord::new(KeyCode::Char('+'), KeyModifiers::CTRL));
    }

    #[test]
    fn ctrl_uppercase_letter_means_shift() {
        assert_eq!(
            chord("Ctrl+C"),
            KeyChord::new(KeyCode::Char('c'), KeyModifiers::CTRL | KeyModifiers::SHIFT)
        );
    }

    #[test]
    fn display_round_trips() {
        for s in ["Ctrl+Alt+Shift+RightArrow", "Ctrl+k", "Escape", "Alt+Backspace", "F12"] {
            assert_eq!(chord(s).to_string(), s);
        }
    }

    #[test]
    fn malformed_chords_are_rejected() {
        assert!(matches!("".parse::<KeyChord>(), Err(KeyParseError::Empty)));
        assert!(matches!("Ctrl+".parse::<KeyChord>(), Err(KeyParseError::MissingKey(_))));
        assert!(matches!(
            "Hyper+x".parse::<KeyChord>(),
            Err(KeyParseError::UnknownModifier(m)) if m == "Hyper"
        ));
        assert!(matches!("Ctrl+Banana".parse::<KeyChord>(), Err(KeyParseError::UnknownKey(_))));
    }

    #[test]
    fn printable_excludes_ctrl_and_alt() {
        assert_eq!(chord("a").printable(), Some('a'));
        assert_eq!(chord("Shift+A").printable(), Some('A'));
        assert_eq!(chord("Ctrl+a").printable(), None);
        assert_eq!(chord("Alt+a").printable(), None);
        assert_eq!(chord("Enter").printable(), None);
    }
}
