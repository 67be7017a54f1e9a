//! Interactive line prompt
//!
//! [`LineEditor`] owns the buffer and cursor, [`InputSession`] layers history recall
//! and submit/cancel handling on top, and [`read_line`] drives a session from the
//! terminal: raw mode, one crossterm event at a time, redraw after every event.

use color_eyre::eyre::{Result, WrapErr};
use crossterm::cursor::{Hide, MoveToColumn, MoveUp, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, EventStream};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode};
use futures_util::StreamExt;
use std::io::{self, Write};
use tracing::{debug, warn};

pub mod editor;
pub mod keys;
mod render;
pub mod session;

#[cfg(test)]
mod tests;

pub use editor::{LineEditor, Split};
pub use keys::KeyEvent;
pub use session::{InputSession, Outcome, start_session};

/// Hide the cursor and turn on bracketed paste so a paste arrives as one event
fn setup_terminal(out: &mut impl Write) -> io::Result<()> {
    execute!(out, Hide, EnableBracketedPaste)
}

/// Undo [`setup_terminal`]
fn restore_terminal(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableBracketedPaste, Show)
}

/// Restores the terminal when the prompt returns or unwinds
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().wrap_err("Failed to enable raw mode")?;
        let guard = Self;
        setup_terminal(&mut io::stdout()).wrap_err("Failed to set up terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort restore; ignore errors here
        let _ = disable_raw_mode();
        let _ = restore_terminal(&mut io::stdout());
    }
}

/// Install a panic hook that leaves raw mode before the report is printed.
///
/// Wraps the existing hook (color-eyre from `main`) so normal panic output is kept.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = restore_terminal(&mut io::stdout());
        original_hook(info);
    }));
}

/// Replace the previous frame, which currently spans `previous_rows` screen rows
fn redraw(out: &mut impl Write, previous_rows: usize, frame: &str) -> io::Result<()> {
    if previous_rows > 1 {
        let up = u16::try_from(previous_rows - 1).unwrap_or(u16::MAX);
        execute!(out, MoveUp(up))?;
    }
    execute!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;
    // Raw mode: a bare \n does not return the carriage
    execute!(out, Print(frame.replace('\n', "\r\n")))?;
    out.flush()
}

/// Read one line from the terminal.
///
/// Returns `Some(text)` on submit and `None` when the user cancels (Esc, Ctrl+Q,
/// or Ctrl+C on an empty line).
///
/// # Errors
/// Returns an error if the terminal can not be switched to raw mode, drawing
/// fails, or the event stream fails.
pub async fn read_line(prompt: &str, history: &[String]) -> Result<Option<String>> {
    let mut session = start_session(prompt, history);
    if let Ok((cols, _)) = terminal::size() {
        session.handle_event(KeyEvent::Resize(usize::from(cols)));
    }

    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let mut events = EventStream::new();

    redraw(&mut stdout, 0, &session.view()).wrap_err("Failed to draw prompt")?;
    // Row widths of the frame on screen; after a resize the terminal reflows them
    let mut drawn = session.view_row_widths();

    while !session.is_finished() {
        let Some(event) = events.next().await else {
            warn!("terminal event stream closed, cancelling input");
            return Ok(None);
        };
        let event = event.wrap_err("Failed to read terminal event")?;

        if let Some(key) = KeyEvent::from_crossterm(&event) {
            session.handle_event(key);
            let rows = render::rows_on_screen(&drawn, session.width());
            redraw(&mut stdout, rows, &session.view()).wrap_err("Failed to draw prompt")?;
            drawn = session.view_row_widths();
        } else {
            debug!(?event, "unbound terminal event");
        }
    }

    execute!(stdout, Print("\r\n")).wrap_err("Failed to finish prompt line")?;

    Ok(match session.into_outcome() {
        Outcome::Committed(text) => Some(text),
        Outcome::Cancelled | Outcome::Pending => None,
    })
}

#[cfg(test)]
mod terminal_tests {
    use super::*;

    fn written(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn setup_enables_bracketed_paste_and_restore_disables_it() {
        let setup = written(|out| setup_terminal(out));
        assert!(setup.contains("\x1b[?2004h"), "{setup:?}");
        assert!(setup.contains("\x1b[?25l"), "{setup:?}");

        let restore = written(|out| restore_terminal(out));
        assert!(restore.contains("\x1b[?2004l"), "{restore:?}");
        assert!(restore.contains("\x1b[?25h"), "{restore:?}");
    }

    #[test]
    fn redraw_moves_up_over_previous_rows() {
        let frame = written(|out| redraw(out, 3, "> ab\ncd"));
        assert!(frame.starts_with("\x1b[2A"), "{frame:?}");
        assert!(frame.ends_with("> ab\r\ncd"), "{frame:?}");

        let first = written(|out| redraw(out, 0, "> "));
        assert!(!first.contains('A'), "{first:?}");
    }
}
