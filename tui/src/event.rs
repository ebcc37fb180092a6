use crate::app::App;
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Terminal events
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal tick event
    Tick,
    /// Terminal resized
    Resize,
}

/// Event handler for the terminal
pub struct EventHandler {
    /// Tick rate in milliseconds
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CEvent::Key(key) => return Ok(Event::Key(key)),
                CEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => {}
            }
        }
        Ok(Event::Tick)
    }
}

/// Handle key events for the application
pub fn handle_key_event(key: KeyEvent, app: &mut App) {
    // On Windows, crossterm reports both key press and release events.
    // We only want to handle press events to avoid duplicates.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Help screen takes precedence
    if app.help_open {
        if key.code == KeyCode::Esc || app.bindings.help.matches(&key) {
            app.close_help();
        }
        return;
    }

    if app.confirming_delete {
        if key.code == KeyCode::Enter || app.bindings.confirm.matches(&key) {
            app.confirm_delete();
        } else if key.code == KeyCode::Esc || app.bindings.cancel.matches(&key) {
            app.cancel_delete();
        }
        return;
    }

    if app.is_editing {
        handle_editing_input(key, app);
        return;
    }

    let bindings = app.bindings.clone();
    if bindings.quit.matches(&key) {
        app.quit();
    } else if bindings.help.matches(&key) {
        app.open_help();
    } else if bindings.start_editing.matches(&key) {
        app.start_editing();
    } else if bindings.delete_note.matches(&key) || key.code == KeyCode::Delete {
        app.initiate_delete();
    } else {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                app.create_note_by_index(c as usize - '0' as usize);
            }
            KeyCode::Left => app.move_left(),
            KeyCode::Right => app.move_right(),
            KeyCode::Up => app.move_up(),
            KeyCode::Down => app.move_down(),
            _ => {}
        }
    }
}

/// Handle key events when in editing mode
fn handle_editing_input(key: KeyEvent, app: &mut App) {
    if app.bindings.stop_editing.matches(&key) {
        app.stop_editing();
        return;
    }
    match key.code {
        KeyCode::Enter => app.insert_char('\n'),
        KeyCode::Tab => app.insert_char('\t'),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => {
            // Allow AltGr combinations (CONTROL+ALT) for special characters
            if !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT) {
                app.insert_char(c);
            }
        }
        _ => {}
    }
}
