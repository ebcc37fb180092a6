use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{render_delete_confirmation, render_header, render_help_screen, render_notes_grid, render_status_bar};

/// Render the complete UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.size();

    // Create main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Note grid
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_header(frame, app, chunks[0]);
    render_notes_grid(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Overlays (drawn last)
    if app.confirming_delete {
        render_delete_confirmation(frame, app, size);
    }
    if app.help_open {
        render_help_screen(frame, app, size);
    }
}
