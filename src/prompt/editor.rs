//! Single-line text buffer with a movable insertion cursor
//!
//! All positions are character indices into a `Vec<char>`, never byte offsets, so
//! multi-byte input can not be split in half by cursor arithmetic.

use super::render;

/// Rendering decomposition of the buffer around the cursor
///
/// `head` is everything strictly before the cursor, `cursor` is the character the
/// cursor sits on (empty at end of line) and `tail` is everything after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Split {
    pub head: String,
    pub cursor: String,
    pub tail: String,
}

/// Text buffer plus insertion point
///
/// Invariant: `cursor <= text.len()` after every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: Vec<char>,
    cursor: usize,
}

/// Characters accepted by [`LineEditor::insert`]
///
/// Plain space is the only whitespace that counts as printable; tabs, newlines and
/// other control characters are dropped.
#[must_use]
pub fn is_printable(c: char) -> bool {
    c == ' ' || !(c.is_control() || c.is_whitespace())
}

impl LineEditor {
    /// Create an empty editor with the cursor at position 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing string and place the cursor at the end
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        let mut editor = Self::new();
        editor.set_value(s);
        editor
    }

    /// Current buffer contents
    #[must_use]
    pub fn value(&self) -> String {
        self.text.iter().collect()
    }

    /// Replace the buffer and move the cursor to its end
    pub fn set_value(&mut self, s: &str) {
        self.text = s.chars().collect();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.set_value("");
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the cursor, clamped to the buffer length
    pub fn set_cursor(&mut self, idx: usize) {
        self.cursor = idx.min(self.text.len());
    }

    /// Buffer length in characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert printable characters at the cursor; anything else is silently dropped.
    ///
    /// The cursor advances by the number of characters actually inserted.
    pub fn insert(&mut self, chars: &str) {
        let filtered: Vec<char> = chars.chars().filter(|c| is_printable(*c)).collect();
        if filtered.is_empty() {
            return;
        }
        let inserted = filtered.len();
        self.text.splice(self.cursor..self.cursor, filtered);
        self.cursor += inserted;
    }

    /// Backspace
    pub fn delete_backward(&mut self) {
        if self.cursor > 0 {
            self.text.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    /// Delete the character under the cursor
    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            self.text.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Move to just after the nearest preceding space, or to 0.
    ///
    /// Stops after a single space rather than skipping runs of them: from the
    /// start of a word the first step crosses the space, the next step stops.
    pub fn move_word_left(&mut self) {
        self.cursor = self.word_left_target();
    }

    /// Move to just after the next space, or to the end of the buffer.
    pub fn move_word_right(&mut self) {
        self.cursor = self.word_right_target();
    }

    /// Remove the span `move_word_left` would cross; the cursor lands at its start.
    pub fn delete_word_backward(&mut self) {
        let start = self.word_left_target();
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Remove the span `move_word_right` would cross; the cursor stays put.
    pub fn delete_word_forward(&mut self) {
        let end = self.word_right_target();
        self.text.drain(self.cursor..end);
    }

    fn word_left_target(&self) -> usize {
        let start = self.cursor;
        let mut pos = start;
        while pos > 0 {
            if self.text[pos - 1] == ' ' && pos != start {
                break;
            }
            pos -= 1;
        }
        pos
    }

    fn word_right_target(&self) -> usize {
        let start = self.cursor;
        let mut pos = start;
        while pos < self.text.len() {
            if pos > 0 && self.text[pos - 1] == ' ' && pos != start {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// Decompose the buffer into `(head, cursor char, tail)`
    #[must_use]
    pub fn split(&self) -> Split {
        let len = self.text.len();
        let head = self.text[..self.cursor].iter().collect();
        if self.cursor < len {
            Split {
                head,
                cursor: self.text[self.cursor].to_string(),
                tail: self.text[self.cursor + 1..].iter().collect(),
            }
        } else {
            Split {
                head,
                cursor: String::new(),
                tail: String::new(),
            }
        }
    }

    /// Prompt, text and a highlighted cursor cell, soft-wrapped to `width` columns
    #[must_use]
    pub fn render(&self, prompt: &str, width: usize) -> String {
        render::render_line(prompt, &self.split(), width)
    }
}
