use crate::config::{load_config, Bindings, Config};
use log::error;
use stickies_core::{Color as NoteColor, KeyValueStore, Note, NoteStore};
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a status message stays in the status bar
const STATUS_TTL: Duration = Duration::from_secs(4);

pub type Store = NoteStore<Box<dyn KeyValueStore>>;

/// Number of grid columns for a content area `width` cells wide
pub fn grid_columns(width: u16) -> usize {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

/// Application state
pub struct App {
    pub should_quit: bool,
    pub store: Store,
    pub config: Config,
    pub bindings: Bindings,
    /// Index of the selected note in display order
    pub selected: usize,
    /// Columns in the last rendered grid, used for up/down navigation
    pub columns: usize,
    /// First grid row currently on screen
    pub scroll_row: usize,
    pub is_editing: bool,
    /// Cursor position within the edited note, in chars
    pub edit_cursor_position: usize,
    pub confirming_delete: bool,
    pub pending_delete_id: Option<String>,
    pub help_open: bool,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an app over an initialized store, reading the keymap from
    /// `config_path`.
    pub fn new(store: Store, config_path: &Path) -> Self {
        Self::with_config(store, load_config(config_path))
    }

    pub fn with_config(store: Store, mut config: Config) -> Self {
        let bindings = config.resolve_bindings();
        Self {
            should_quit: false,
            store,
            config,
            bindings,
            selected: 0,
            columns: 1,
            scroll_row: 0,
            is_editing: false,
            edit_cursor_position: 0,
            confirming_delete: false,
            pending_delete_id: None,
            help_open: false,
            status_message: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.store.notes().get(self.selected)
    }

    /// Create a note of `color`, select it and start editing it
    pub fn create_note(&mut self, color: NoteColor) {
        let result = self.store.create_note(color);
        // The note is appended even when the write fails
        self.selected = self.store.len().saturating_sub(1);
        match result {
            Ok(_) => {
                self.is_editing = true;
                self.edit_cursor_position = 0;
            }
            Err(err) => self.report_error("create note", &err),
        }
    }

    pub fn create_note_by_index(&mut self, index: usize) {
        if let Some(color) = NoteColor::from_index(index) {
            self.create_note(color);
        }
    }

    // =========================
    // Navigation
    // =========================

    pub fn move_left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected + self.columns < self.store.len() {
            self.selected += self.columns;
        }
    }

    /// Keep `scroll_row` such that the selected card is within `visible_rows`
    pub fn ensure_selected_visible(&mut self, visible_rows: usize) {
        let columns = self.columns.max(1);
        let row = self.selected / columns;
        let visible_rows = visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }

    // =========================
    // Editing
    // =========================

    pub fn start_editing(&mut self) {
        if self.is_editing {
            return;
        }
        if let Some(note) = self.selected_note() {
            self.edit_cursor_position = note.text.chars().count();
            self.is_editing = true;
        }
    }

    pub fn stop_editing(&mut self) {
        self.is_editing = false;
        self.edit_cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(note) = self.selected_note() else { return };
        let mut text = note.text.clone();
        let byte_pos = byte_offset(&text, self.edit_cursor_position);
        text.insert(byte_pos, c);
        self.edit_cursor_position += 1;
        self.write_selected_text(text);
    }

    pub fn backspace(&mut self) {
        if self.edit_cursor_position == 0 {
            return;
        }
        let Some(note) = self.selected_note() else { return };
        let mut text = note.text.clone();
        let from = byte_offset(&text, self.edit_cursor_position - 1);
        if from < text.len() {
            text.remove(from);
            self.edit_cursor_position -= 1;
            self.write_selected_text(text);
        }
    }

    pub fn delete_forward(&mut self) {
        let Some(note) = self.selected_note() else { return };
        let mut text = note.text.clone();
        let at = byte_offset(&text, self.edit_cursor_position);
        if at < text.len() {
            text.remove(at);
            self.write_selected_text(text);
        }
    }

    pub fn cursor_left(&mut self) {
        self.edit_cursor_position = self.edit_cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let len = self.selected_note().map(|n| n.text.chars().count()).unwrap_or(0);
        if self.edit_cursor_position < len {
            self.edit_cursor_position += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.edit_cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.edit_cursor_position = self.selected_note().map(|n| n.text.chars().count()).unwrap_or(0);
    }

    /// Each edit goes straight to the store, one write per keystroke
    fn write_selected_text(&mut self, text: String) {
        let Some(id) = self.selected_note().map(|n| n.id.clone()) else { return };
        if let Err(err) = self.store.update_text(&id, text) {
            self.report_error("save note", &err);
        }
    }

    // =========================
    // Deletion
    // =========================

    pub fn initiate_delete(&mut self) {
        if let Some(id) = self.selected_note().map(|n| n.id.clone()) {
            self.pending_delete_id = Some(id);
            self.confirming_delete = true;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(id) = self.pending_delete_id.take() {
            if let Err(err) = self.store.delete_note(&id) {
                self.report_error("delete note", &err);
            }
            if self.selected >= self.store.len() {
                self.selected = self.store.len().saturating_sub(1);
            }
        }
        self.confirming_delete = false;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete_id = None;
        self.confirming_delete = false;
    }

    // =========================
    // Misc
    // =========================

    pub fn open_help(&mut self) {
        self.help_open = true;
    }

    pub fn close_help(&mut self) {
        self.help_open = false;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn report_error(&mut self, action: &str, err: &stickies_core::Error) {
        error!("event=ui_action status=failed action=\"{}\" error=\"{}\"", action, err);
        self.set_status(format!("Could not {}: {}", action, err));
    }

    /// Periodic housekeeping: expire the status message
    pub fn tick(&mut self) {
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() >= STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn byte_offset(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .map(|(i, _)| i)
        .nth(char_pos)
        .unwrap_or(text.len())
}
