//! One editing session: a `LineEditor` plus history recall and a terminal outcome

use super::editor::LineEditor;
use super::keys::KeyEvent;
use tracing::{debug, trace};

/// Width used by [`InputSession::view`] until the host reports one
pub const DEFAULT_WIDTH: usize = 80;

/// Result of a session; `Committed` and `Cancelled` are terminal
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Pending,
    Committed(String),
    Cancelled,
}

/// Interprets key events into editor operations or history recall
///
/// The history slice is borrowed from the caller and never mutated; the caller
/// appends committed lines after the session is over.
#[derive(Debug)]
pub struct InputSession<'h> {
    prompt: String,
    editor: LineEditor,
    history: &'h [String],
    /// `None` while the buffer holds live input, else the recalled entry
    history_index: Option<usize>,
    outcome: Outcome,
    width: usize,
}

/// Begin a session with an empty buffer
#[must_use]
pub fn start_session<'h>(prompt: &str, history: &'h [String]) -> InputSession<'h> {
    InputSession::new(prompt, history)
}

impl<'h> InputSession<'h> {
    #[must_use]
    pub fn new(prompt: &str, history: &'h [String]) -> Self {
        Self {
            prompt: prompt.to_string(),
            editor: LineEditor::new(),
            history,
            history_index: None,
            outcome: Outcome::Pending,
            width: DEFAULT_WIDTH,
        }
    }

    /// Apply one event. Events after a terminal outcome are ignored.
    pub fn handle_event(&mut self, event: KeyEvent) {
        if self.outcome != Outcome::Pending {
            trace!(?event, "event after session end ignored");
            return;
        }

        match event {
            KeyEvent::Submit => {
                self.outcome = Outcome::Committed(self.editor.value());
            }
            KeyEvent::Cancel => {
                self.outcome = Outcome::Cancelled;
            }
            KeyEvent::Interrupt => {
                if self.editor.is_empty() {
                    self.outcome = Outcome::Cancelled;
                } else {
                    self.editor.clear();
                    self.history_index = None;
                }
            }
            KeyEvent::MoveUp => self.history_older(),
            KeyEvent::MoveDown => self.history_newer(),
            KeyEvent::Resize(width) => self.width = width,

            KeyEvent::Chars(text) => self.editor.insert(&text),
            KeyEvent::MoveLeft => self.editor.move_left(),
            KeyEvent::MoveRight => self.editor.move_right(),
            KeyEvent::WordLeft => self.editor.move_word_left(),
            KeyEvent::WordRight => self.editor.move_word_right(),
            KeyEvent::DeleteBackward => self.editor.delete_backward(),
            KeyEvent::DeleteForward => self.editor.delete_forward(),
            KeyEvent::DeleteWordBackward => self.editor.delete_word_backward(),
            KeyEvent::DeleteWordForward => self.editor.delete_word_forward(),
            KeyEvent::LineStart => self.editor.move_to_start(),
            KeyEvent::LineEnd => self.editor.move_to_end(),
        }

        if self.outcome != Outcome::Pending {
            debug!(outcome = ?self.outcome, "input session finished");
        }
    }

    fn history_older(&mut self) {
        // Empty history leaves browsing inactive
        if self.history.is_empty() {
            return;
        }
        let idx = self
            .history_index
            .unwrap_or(self.history.len())
            .saturating_sub(1);
        self.history_index = Some(idx);
        self.editor.set_value(&self.history[idx]);
    }

    fn history_newer(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };
        if idx + 1 < self.history.len() {
            self.history_index = Some(idx + 1);
            self.editor.set_value(&self.history[idx + 1]);
        } else {
            self.history_index = None;
            self.editor.clear();
        }
    }

    /// Prompt and buffer with cursor highlight, wrapped to `width` columns
    #[must_use]
    pub fn render(&self, width: usize) -> String {
        self.editor.render(&self.prompt, width)
    }

    /// Display width of each row of [`view`](Self::view)
    #[must_use]
    pub fn view_row_widths(&self) -> Vec<usize> {
        super::render::row_widths(&self.prompt, &self.editor.split(), self.width)
    }

    /// Render at the last width reported through a resize event
    #[must_use]
    pub fn view(&self) -> String {
        self.render(self.width)
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome != Outcome::Pending
    }

    #[must_use]
    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    #[must_use]
    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }
}
