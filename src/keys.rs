// ============================================================================
// src/keys.rs – terminal key events → keysym / character pairs
// ============================================================================
//! The logger only ever sees a [`KeyStroke`]: a symbolic key name plus the
//! character the key produced, if any. Names follow the X11 keysym family
//! (`a`, `Return`, `Shift_L`, `Prior`, ...), so the log reads the same no
//! matter which terminal delivered the event.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MediaKeyCode, ModifierKeyCode,
};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub keysym: String,
    pub ch: Option<char>,
}

impl KeyStroke {
    pub fn new(keysym: impl Into<String>, ch: Option<char>) -> Self {
        Self {
            keysym: keysym.into(),
            ch,
        }
    }

    /// Map a terminal event. Key releases produce nothing; presses and
    /// auto-repeats each count as one key-down.
    pub fn from_terminal(event: &KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }

        let stroke = match event.code {
            KeyCode::Char(c) => {
                let produced = produced_char(c, event.modifiers, event.state);
                let ch = if event.modifiers.contains(KeyModifiers::CONTROL) {
                    control_char(produced).or(Some(produced))
                } else {
                    Some(produced)
                };
                Self::new(char_keysym(produced), ch)
            }
            KeyCode::Enter => Self::new("Return", Some('\r')),
            KeyCode::Tab => Self::new("Tab", Some('\t')),
            KeyCode::BackTab => Self::new("ISO_Left_Tab", None),
            KeyCode::Backspace => Self::new("BackSpace", Some('\u{8}')),
            KeyCode::Esc => Self::new("Escape", Some('\u{1b}')),
            KeyCode::Delete => Self::new("Delete", Some('\u{7f}')),
            KeyCode::Insert => Self::new("Insert", None),
            KeyCode::Left => Self::new("Left", None),
            KeyCode::Right => Self::new("Right", None),
            KeyCode::Up => Self::new("Up", None),
            KeyCode::Down => Self::new("Down", None),
            KeyCode::Home => Self::new("Home", None),
            KeyCode::End => Self::new("End", None),
            KeyCode::PageUp => Self::new("Prior", None),
            KeyCode::PageDown => Self::new("Next", None),
            KeyCode::F(n) => Self::new(format!("F{n}"), None),
            KeyCode::CapsLock => Self::new("Caps_Lock", None),
            KeyCode::ScrollLock => Self::new("Scroll_Lock", None),
            KeyCode::NumLock => Self::new("Num_Lock", None),
            KeyCode::PrintScreen => Self::new("Print", None),
            KeyCode::Pause => Self::new("Pause", None),
            KeyCode::Menu => Self::new("Menu", None),
            KeyCode::KeypadBegin => Self::new("KP_Begin", None),
            KeyCode::Media(media) => Self::new(media_keysym(media), None),
            KeyCode::Modifier(modifier) => Self::new(modifier_keysym(modifier), None),
            _ => Self::new("??", None),
        };
        Some(stroke)
    }
}

/// Character a `Char` key actually produced. Kitty-protocol terminals that
/// send no alternate codepoint report the base key plus SHIFT / CAPS_LOCK;
/// legacy encodings and alternate keys already carry the shifted character.
fn produced_char(c: char, modifiers: KeyModifiers, state: KeyEventState) -> char {
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    if c.is_ascii_lowercase() {
        let caps = state.contains(KeyEventState::CAPS_LOCK);
        return if shift ^ caps { c.to_ascii_uppercase() } else { c };
    }
    if shift {
        shifted_us(c).unwrap_or(c)
    } else {
        c
    }
}

/// Shifted counterpart on a US layout for non-letter base keys.
fn shifted_us(c: char) -> Option<char> {
    let shifted = match c {
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        '`' => '~',
        _ => return None,
    };
    Some(shifted)
}

/// Ctrl+key yields the matching C0 control character: Ctrl+A → 0x01,
/// Ctrl+Space / Ctrl+@ → 0x00, Ctrl+[ … Ctrl+_ → 0x1b … 0x1f.
fn control_char(c: char) -> Option<char> {
    let code = match c {
        ' ' | '@' => 0,
        c if c.is_ascii_alphabetic() => c.to_ascii_lowercase() as u8 - b'a' + 1,
        '[' => 0x1b,
        '\\' => 0x1c,
        ']' => 0x1d,
        '^' => 0x1e,
        '_' => 0x1f,
        _ => return None,
    };
    Some(code as char)
}

fn char_keysym(c: char) -> String {
    let name = match c {
        ' ' => "space",
        '!' => "exclam",
        '"' => "quotedbl",
        '#' => "numbersign",
        '$' => "dollar",
        '%' => "percent",
        '&' => "ampersand",
        '\'' => "apostrophe",
        '(' => "parenleft",
        ')' => "parenright",
        '*' => "asterisk",
        '+' => "plus",
        ',' => "comma",
        '-' => "minus",
        '.' => "period",
        '/' => "slash",
        ':' => "colon",
        ';' => "semicolon",
        '<' => "less",
        '=' => "equal",
        '>' => "greater",
        '?' => "question",
        '@' => "at",
        '[' => "bracketleft",
        '\\' => "backslash",
        ']' => "bracketright",
        '^' => "asciicircum",
        '_' => "underscore",
        '`' => "grave",
        '{' => "braceleft",
        '|' => "bar",
        '}' => "braceright",
        '~' => "asciitilde",
        other => return other.to_string(),
    };
    name.to_string()
}

fn modifier_keysym(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftShift => "Shift_L",
        ModifierKeyCode::RightShift => "Shift_R",
        ModifierKeyCode::LeftControl => "Control_L",
        ModifierKeyCode::RightControl => "Control_R",
        ModifierKeyCode::LeftAlt => "Alt_L",
        ModifierKeyCode::RightAlt => "Alt_R",
        ModifierKeyCode::LeftSuper => "Super_L",
        ModifierKeyCode::RightSuper => "Super_R",
        ModifierKeyCode::LeftHyper => "Hyper_L",
        ModifierKeyCode::RightHyper => "Hyper_R",
        ModifierKeyCode::LeftMeta => "Meta_L",
        ModifierKeyCode::RightMeta => "Meta_R",
        ModifierKeyCode::IsoLevel3Shift => "ISO_Level3_Shift",
        ModifierKeyCode::IsoLevel5Shift => "ISO_Level5_Shift",
    }
}

fn media_keysym(media: MediaKeyCode) -> &'static str {
    match media {
        MediaKeyCode::Play | MediaKeyCode::PlayPause => "XF86AudioPlay",
        MediaKeyCode::Pause => "XF86AudioPause",
        MediaKeyCode::Stop => "XF86AudioStop",
        MediaKeyCode::FastForward => "XF86AudioForward",
        MediaKeyCode::Rewind | MediaKeyCode::Reverse => "XF86AudioRewind",
        MediaKeyCode::TrackNext => "XF86AudioNext",
        MediaKeyCode::TrackPrevious => "XF86AudioPrev",
        MediaKeyCode::Record => "XF86AudioRecord",
        MediaKeyCode::LowerVolume => "XF86AudioLowerVolume",
        MediaKeyCode::RaiseVolume => "XF86AudioRaiseVolume",
        MediaKeyCode::MuteVolume => "XF86AudioMute",
    }
}

/// Quoted, escaped rendering of the produced character: `'a'`, `"'"`,
/// `'\r'`, `'\x01'`, and `''` when the key produced nothing.
pub fn quote_char(ch: Option<char>) -> String {
    let Some(c) = ch else {
        return "''".to_string();
    };
    let quote = if c == '\'' { '"' } else { '\'' };

    let mut out = String::with_capacity(8);
    out.push(quote);
    match c {
        '\\' => out.push_str("\\\\"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        c if c.is_control() => {
            let _ = write!(out, "\\x{:02x}", c as u32);
        }
        c => out.push(c),
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_keys_keep_their_character() {
        let s = KeyStroke::from_terminal(&press(KeyCode::Char('a'), KeyModifiers::NONE)).unwrap();
        assert_eq!(s, KeyStroke::new("a", Some('a')));

        let s = KeyStroke::from_terminal(&press(KeyCode::Char('A'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("A", Some('A')));
    }

    #[test]
    fn shift_on_a_base_key_yields_the_shifted_character() {
        let s = KeyStroke::from_terminal(&press(KeyCode::Char('a'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("A", Some('A')));

        let s = KeyStroke::from_terminal(&press(KeyCode::Char('1'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("exclam", Some('!')));

        let s = KeyStroke::from_terminal(&press(KeyCode::Char('/'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("question", Some('?')));

        // Alternate-key reports already carry the shifted codepoint.
        let s = KeyStroke::from_terminal(&press(KeyCode::Char('!'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("exclam", Some('!')));
    }

    #[test]
    fn caps_lock_state_applies_to_letters_only() {
        let caps = |code, modifiers| KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::CAPS_LOCK,
        };

        let s = KeyStroke::from_terminal(&caps(KeyCode::Char('q'), KeyModifiers::NONE)).unwrap();
        assert_eq!(s, KeyStroke::new("Q", Some('Q')));

        let s = KeyStroke::from_terminal(&caps(KeyCode::Char('q'), KeyModifiers::SHIFT)).unwrap();
        assert_eq!(s, KeyStroke::new("q", Some('q')));

        let s = KeyStroke::from_terminal(&caps(KeyCode::Char('5'), KeyModifiers::NONE)).unwrap();
        assert_eq!(s, KeyStroke::new("5", Some('5')));
    }

    #[test]
    fn control_shift_letter_names_the_capital() {
        let s = KeyStroke::from_terminal(&press(
            KeyCode::Char('a'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ))
        .unwrap();
        assert_eq!(s, KeyStroke::new("A", Some('\u{1}')));
    }

    #[test]
    fn control_punctuation_produces_c0_codes() {
        let cases = [
            (' ', "space", '\u{0}'),
            ('@', "at", '\u{0}'),
            ('[', "bracketleft", '\u{1b}'),
            ('\\', "backslash", '\u{1c}'),
            (']', "bracketright", '\u{1d}'),
            ('^', "asciicircum", '\u{1e}'),
            ('_', "underscore", '\u{1f}'),
        ];
        for (c, name, code) in cases {
            let s = KeyStroke::from_terminal(&press(KeyCode::Char(c), KeyModifiers::CONTROL)).unwrap();
            assert_eq!(s, KeyStroke::new(name, Some(code)));
        }

        let s = KeyStroke::from_terminal(&press(KeyCode::Char('1'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(s, KeyStroke::new("1", Some('1')));
    }

    #[test]
    fn punctuation_uses_symbolic_names() {
        for (c, name) in [(' ', "space"), ('!', "exclam"), ('/', "slash"), ('~', "asciitilde")] {
            let s = KeyStroke::from_terminal(&press(KeyCode::Char(c), KeyModifiers::NONE)).unwrap();
            assert_eq!(s.keysym, name);
            assert_eq!(s.ch, Some(c));
        }
    }

    #[test]
    fn named_keys_follow_x11_names() {
        let cases = [
            (KeyCode::Enter, "Return", Some('\r')),
            (KeyCode::Backspace, "BackSpace", Some('\u{8}')),
            (KeyCode::Esc, "Escape", Some('\u{1b}')),
            (KeyCode::PageUp, "Prior", None),
            (KeyCode::PageDown, "Next", None),
            (KeyCode::F(5), "F5", None),
            (KeyCode::Left, "Left", None),
        ];
        for (code, name, ch) in cases {
            let s = KeyStroke::from_terminal(&press(code, KeyModifiers::NONE)).unwrap();
            assert_eq!(s.keysym, name);
            assert_eq!(s.ch, ch);
        }
    }

    #[test]
    fn modifier_keys_have_no_character() {
        let s = KeyStroke::from_terminal(&press(
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
            KeyModifiers::SHIFT,
        ))
        .unwrap();
        assert_eq!(s.keysym, "Shift_L");
        assert_eq!(s.ch, None);
    }

    #[test]
    fn control_letters_produce_control_characters() {
        let s = KeyStroke::from_terminal(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(s.keysym, "c");
        assert_eq!(s.ch, Some('\u{3}'));
    }

    #[test]
    fn releases_are_not_key_downs() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(KeyStroke::from_terminal(&release).is_none());

        let repeat = KeyEvent {
            kind: KeyEventKind::Repeat,
            ..release
        };
        assert!(KeyStroke::from_terminal(&repeat).is_some());
    }

    #[test]
    fn quoting_matches_debug_representation() {
        assert_eq!(quote_char(Some('a')), "'a'");
        assert_eq!(quote_char(None), "''");
        assert_eq!(quote_char(Some('\'')), "\"'\"");
        assert_eq!(quote_char(Some('"')), "'\"'");
        assert_eq!(quote_char(Some('\\')), "'\\\\'");
        assert_eq!(quote_char(Some('\r')), "'\\r'");
        assert_eq!(quote_char(Some('\t')), "'\\t'");
        assert_eq!(quote_char(Some('\u{1}')), "'\\x01'");
        assert_eq!(quote_char(Some('\u{7f}')), "'\\x7f'");
        assert_eq!(quote_char(Some('é')), "'é'");
    }
}
