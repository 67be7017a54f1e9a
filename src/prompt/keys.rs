//! Key events understood by the prompt and their default terminal bindings

use crossterm::event::{
    Event, KeyCode, KeyEvent as TermKeyEvent, KeyEventKind, KeyModifiers,
};

/// Discrete input delivered to an [`InputSession`](super::session::InputSession)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Printable text (typed or pasted); unprintable characters are filtered on insert
    Chars(String),
    Submit,
    Cancel,
    Interrupt,
    MoveLeft,
    MoveRight,
    /// Older history entry
    MoveUp,
    /// Newer history entry
    MoveDown,
    WordLeft,
    WordRight,
    DeleteBackward,
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    LineStart,
    LineEnd,
    /// Terminal width changed
    Resize(usize),
}

impl KeyEvent {
    /// Map a crossterm event to a prompt event.
    ///
    /// Key releases, mouse/focus events and unbound keys yield `None`.
    #[must_use]
    pub fn from_crossterm(event: &Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::from_key(key),
            // Pasted line breaks join the lines with a space instead of submitting
            Event::Paste(text) => Some(Self::Chars(text.lines().collect::<Vec<_>>().join(" "))),
            Event::Resize(cols, _) => Some(Self::Resize(usize::from(*cols))),
            _ => None,
        }
    }

    fn from_key(key: &TermKeyEvent) -> Option<Self> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        let event = match key.code {
            KeyCode::Enter => Self::Submit,
            KeyCode::Esc => Self::Cancel,
            KeyCode::Up => Self::MoveUp,
            KeyCode::Down => Self::MoveDown,

            KeyCode::Left if ctrl || alt => Self::WordLeft,
            KeyCode::Right if ctrl || alt => Self::WordRight,
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,

            KeyCode::Backspace if alt => Self::DeleteWordBackward,
            KeyCode::Delete if alt => Self::DeleteWordForward,
            KeyCode::Backspace => Self::DeleteBackward,
            KeyCode::Delete => Self::DeleteForward,

            KeyCode::Home => Self::LineStart,
            KeyCode::End => Self::LineEnd,

            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'q' => Self::Cancel,
                'c' => Self::Interrupt,
                'f' => Self::MoveRight,
                'b' => Self::MoveLeft,
                'h' => Self::DeleteBackward,
                'd' => Self::DeleteForward,
                'a' => Self::LineStart,
                'e' => Self::LineEnd,
                'w' => Self::DeleteWordBackward,
                // AltGr arrives as Ctrl+Alt on Windows: keep the composed character
                _ if alt => Self::Chars(c.to_string()),
                _ => return None,
            },
            KeyCode::Char(c) if alt => match c {
                'f' => Self::WordRight,
                'b' => Self::WordLeft,
                'd' => Self::DeleteWordForward,
                _ => return None,
            },
            KeyCode::Char(c) => Self::Chars(c.to_string()),

            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(TermKeyEvent::new(code, modifiers))
    }

    #[test_case(KeyCode::Enter, KeyModifiers::NONE, KeyEvent::Submit ; "enter submits")]
    #[test_case(KeyCode::Esc, KeyModifiers::NONE, KeyEvent::Cancel ; "escape cancels")]
    #[test_case(KeyCode::Char('q'), KeyModifiers::CONTROL, KeyEvent::Cancel ; "ctrl q cancels")]
    #[test_case(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEvent::Interrupt ; "ctrl c interrupts")]
    #[test_case(KeyCode::Right, KeyModifiers::NONE, KeyEvent::MoveRight ; "right arrow")]
    #[test_case(KeyCode::Char('f'), KeyModifiers::CONTROL, KeyEvent::MoveRight ; "ctrl f")]
    #[test_case(KeyCode::Left, KeyModifiers::NONE, KeyEvent::MoveLeft ; "left arrow")]
    #[test_case(KeyCode::Char('b'), KeyModifiers::CONTROL, KeyEvent::MoveLeft ; "ctrl b")]
    #[test_case(KeyCode::Backspace, KeyModifiers::NONE, KeyEvent::DeleteBackward ; "backspace")]
    #[test_case(KeyCode::Char('h'), KeyModifiers::CONTROL, KeyEvent::DeleteBackward ; "ctrl h")]
    #[test_case(KeyCode::Delete, KeyModifiers::NONE, KeyEvent::DeleteForward ; "delete")]
    #[test_case(KeyCode::Char('d'), KeyModifiers::CONTROL, KeyEvent::DeleteForward ; "ctrl d")]
    #[test_case(KeyCode::Home, KeyModifiers::NONE, KeyEvent::LineStart ; "home")]
    #[test_case(KeyCode::Char('a'), KeyModifiers::CONTROL, KeyEvent::LineStart ; "ctrl a")]
    #[test_case(KeyCode::End, KeyModifiers::NONE, KeyEvent::LineEnd ; "end")]
    #[test_case(KeyCode::Char('e'), KeyModifiers::CONTROL, KeyEvent::LineEnd ; "ctrl e")]
    #[test_case(KeyCode::Right, KeyModifiers::ALT, KeyEvent::WordRight ; "alt right")]
    #[test_case(KeyCode::Right, KeyModifiers::CONTROL, KeyEvent::WordRight ; "ctrl right")]
    #[test_case(KeyCode::Char('f'), KeyModifiers::ALT, KeyEvent::WordRight ; "alt f")]
    #[test_case(KeyCode::Left, KeyModifiers::ALT, KeyEvent::WordLeft ; "alt left")]
    #[test_case(KeyCode::Left, KeyModifiers::CONTROL, KeyEvent::WordLeft ; "ctrl left")]
    #[test_case(KeyCode::Char('b'), KeyModifiers::ALT, KeyEvent::WordLeft ; "alt b")]
    #[test_case(KeyCode::Backspace, KeyModifiers::ALT, KeyEvent::DeleteWordBackward ; "alt backspace")]
    #[test_case(KeyCode::Char('w'), KeyModifiers::CONTROL, KeyEvent::DeleteWordBackward ; "ctrl w")]
    #[test_case(KeyCode::Delete, KeyModifiers::ALT, KeyEvent::DeleteWordForward ; "alt delete")]
    #[test_case(KeyCode::Char('d'), KeyModifiers::ALT, KeyEvent::DeleteWordForward ; "alt d")]
    #[test_case(KeyCode::Up, KeyModifiers::NONE, KeyEvent::MoveUp ; "up")]
    #[test_case(KeyCode::Down, KeyModifiers::NONE, KeyEvent::MoveDown ; "down")]
    fn default_bindings(code: KeyCode, modifiers: KeyModifiers, expected: KeyEvent) {
        assert_eq!(KeyEvent::from_crossterm(&key(code, modifiers)), Some(expected));
    }

    #[test]
    fn shifted_char_is_text() {
        let ev = key(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(KeyEvent::from_crossterm(&ev), Some(KeyEvent::Chars("S".into())));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        assert_eq!(KeyEvent::from_crossterm(&key(KeyCode::F(5), KeyModifiers::NONE)), None);
        assert_eq!(KeyEvent::from_crossterm(&key(KeyCode::Char('z'), KeyModifiers::CONTROL)), None);
        assert_eq!(KeyEvent::from_crossterm(&Event::FocusGained), None);
    }

    #[test_case('\\' ; "backslash")]
    #[test_case('@' ; "at sign")]
    #[test_case('{' ; "brace")]
    fn altgr_characters_are_text(c: char) {
        let ev = key(KeyCode::Char(c), KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!(KeyEvent::from_crossterm(&ev), Some(KeyEvent::Chars(c.to_string())));
    }

    #[test]
    fn ctrl_binding_wins_over_altgr_fallback() {
        let ev = key(KeyCode::Char('c'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!(KeyEvent::from_crossterm(&ev), Some(KeyEvent::Interrupt));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut release = TermKeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(KeyEvent::from_crossterm(&Event::Key(release)), None);
    }

    #[test]
    fn resize_and_paste() {
        assert_eq!(KeyEvent::from_crossterm(&Event::Resize(120, 40)), Some(KeyEvent::Resize(120)));
        assert_eq!(
            KeyEvent::from_crossterm(&Event::Paste("select 1".into())),
            Some(KeyEvent::Chars("select 1".into()))
        );
    }

    #[test]
    fn pasted_line_breaks_do_not_submit() {
        let paste = Event::Paste("select 1\r\nfrom t\n".into());
        assert_eq!(
            KeyEvent::from_crossterm(&paste),
            Some(KeyEvent::Chars("select 1 from t".into()))
        );
    }
}
