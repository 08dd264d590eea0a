//! Keyboard handling.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::app::{App, InputMode};

/// Steps moved by PageUp and PageDown.
const COARSE_STEPS: i64 = 1000;

/// Handle keyboard events.
pub(crate) fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Global shortcuts (work in all modes)
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') if app.input_mode == InputMode::Normal => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // Stock selection
        KeyCode::Down | KeyCode::Char('j') => app.next_stock(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_stock(),

        // Input focus
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_previous(),

        // Input values
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge(1),
        KeyCode::Char('-') => app.nudge(-1),
        KeyCode::PageUp => app.nudge(COARSE_STEPS),
        KeyCode::PageDown => app.nudge(-COARSE_STEPS),
        KeyCode::Char('e') | KeyCode::Enter => app.start_editing(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') => {
            app.edit_buffer.push(c);
        }
        _ => {}
    }
}

/// Poll for events with a timeout.
pub(crate) fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
