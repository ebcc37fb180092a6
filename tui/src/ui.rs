mod layout;
mod widgets;

pub use layout::render;
pub use widgets::{
    note_color,
    render_delete_confirmation,
    render_header,
    render_help_screen,
    render_notes_grid,
    render_status_bar,
};
