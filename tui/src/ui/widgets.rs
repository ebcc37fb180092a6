use crate::app::{grid_columns, App};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        block::{Position, Title},
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};
use stickies_core::{models::format_note_time, Color as NoteColor, Note};

/// Height of a note card including its border
const CARD_HEIGHT: u16 = 9;

/// Terminal color used for a palette entry
pub fn note_color(color: NoteColor) -> Color {
    match color {
        NoteColor::Yellow => Color::Yellow,
        NoteColor::Green => Color::Green,
        NoteColor::Blue => Color::Blue,
        NoteColor::Pink => Color::LightMagenta,
        NoteColor::Purple => Color::Magenta,
    }
}

/// Render the header with title, palette and key hints
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut header_spans = vec![
        Span::styled(
            " Stickies ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
    ];

    for color in NoteColor::ALL {
        header_spans.push(Span::styled(
            format!(" {}:{} ", color.index(), color),
            Style::default().fg(Color::Black).bg(note_color(color)),
        ));
        header_spans.push(Span::raw(" "));
    }

    header_spans.push(Span::raw("| "));
    header_spans.push(Span::styled(key_hints(app), Style::default().fg(Color::DarkGray)));

    let header = Paragraph::new(Line::from(header_spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Header hints for the current mode, using the configured keymap
fn key_hints(app: &App) -> String {
    let keys = &app.config.keymap;
    if app.is_editing {
        format!(" [{}:Done] [Typing saves as you go] ", keys.stop_editing)
    } else if app.confirming_delete {
        format!(" [{}:Delete] [{}:Keep] ", keys.confirm, keys.cancel)
    } else {
        format!(
            " [{}:Quit] [{}:Help] [Arrows:Select] [{}:Edit] [{}:Delete] ",
            keys.quit, keys.help, keys.start_editing, keys.delete_note
        )
    }
}

/// Help overlay entries for the configured keymap
fn help_lines(app: &App) -> Vec<Line<'static>> {
    let keys = &app.config.keymap;
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let entry = |key: &str, action: &str| Line::from(format!("{:<13}{}", key, action));

    let mut lines = vec![Line::from(""), Line::from(Span::styled("Notes", heading))];
    for color in NoteColor::ALL {
        lines.push(entry(&color.index().to_string(), &format!("New {} note", color)));
    }
    lines.extend([
        entry(&keys.start_editing, "Edit selected note"),
        entry(&keys.stop_editing, "Stop editing"),
        entry(&format!("{} / delete", keys.delete_note), "Delete selected note"),
        Line::from(""),
        Line::from(Span::styled("Navigation", heading)),
        entry("arrows", "Move selection"),
        Line::from(""),
        Line::from(Span::styled("General", heading)),
        entry(&keys.help, "Toggle help"),
        entry(&keys.quit, "Quit"),
    ]);
    lines
}

/// Render the notes as a grid of cards, or the empty state
pub fn render_notes_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.notes().is_empty() {
        let top_padding = area.height.saturating_sub(2) / 2;
        let mut lines: Vec<Line> = (0..top_padding).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(
            "No notes yet",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!(
            "Press 1-{} to create a note",
            NoteColor::ALL.len()
        )));
        let empty_message = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty_message, area);
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.columns = columns;
    app.ensure_selected_visible(visible_rows);

    let mut row_constraints = vec![Constraint::Length(CARD_HEIGHT); visible_rows];
    row_constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    let column_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
    for (r, row_area) in rows.iter().take(visible_rows).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints.clone())
            .split(*row_area);
        let first = (app.scroll_row + r) * columns;
        for (c, cell) in cells.iter().enumerate() {
            let index = first + c;
            if let Some(note) = app.notes().get(index) {
                render_note_card(frame, app, note, index, *cell);
            }
        }
    }
}

fn render_note_card(frame: &mut Frame, app: &App, note: &Note, index: usize, area: Rect) {
    let color = note_color(note.color);
    let selected = index == app.selected;
    let editing = selected && app.is_editing;

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} ", note.color),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .title(
            Title::from(Span::styled(
                format!(" {} ", format_note_time(note.time)),
                Style::default().fg(Color::DarkGray),
            ))
            .position(Position::Bottom)
            .alignment(Alignment::Right),
        );
    if selected {
        block = block.border_type(BorderType::Thick);
    }

    let (body, scroll) = if editing {
        let inner_height = area.height.saturating_sub(2) as usize;
        let cursor_line = note
            .text
            .chars()
            .take(app.edit_cursor_position)
            .filter(|c| *c == '\n')
            .count();
        let scroll = (cursor_line + 1).saturating_sub(inner_height) as u16;
        (text_with_cursor(&note.text, app.edit_cursor_position), scroll)
    } else if note.text.is_empty() {
        (
            Text::styled("Type your note here...", Style::default().fg(Color::DarkGray)),
            0,
        )
    } else {
        (Text::raw(note.text.clone()), 0)
    };

    let card = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(card, area);
}

/// Note text with the char at `cursor` shown reversed
fn text_with_cursor(text: &str, cursor: usize) -> Text<'static> {
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split('\n') {
        let len = raw.chars().count();
        if (offset..=offset + len).contains(&cursor) {
            let at = cursor - offset;
            let before: String = raw.chars().take(at).collect();
            let mut rest = raw.chars().skip(at);
            let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
            let after: String = rest.collect();
            lines.push(Line::from(vec![
                Span::raw(before),
                Span::styled(under, cursor_style),
                Span::raw(after),
            ]));
        } else {
            lines.push(Line::from(raw.to_string()));
        }
        offset += len + 1;
    }
    Text::from(lines)
}

/// Render the status bar at the bottom
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.notes().len();
    let mut status_text = if count == 0 {
        " 0 notes ".to_string()
    } else {
        format!(" {} notes | Note {}/{} ", count, app.selected + 1, count)
    };
    if let Some((message, _)) = &app.status_message {
        status_text.push_str(&format!("| {} ", message));
    }

    let status_bar = Paragraph::new(status_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .alignment(Alignment::Center);

    frame.render_widget(status_bar, area);
}

/// Render the delete confirmation popup
pub fn render_delete_confirmation(frame: &mut Frame, app: &App, area: Rect) {
    let popup_width = 44.min(area.width);
    let popup_height = 5.min(area.height);

    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);

    let text = format!(
        "Delete this note permanently? ({}/{})",
        app.config.keymap.confirm, app.config.keymap.cancel
    );
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .title("Confirm Deletion")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area); // This clears the area behind the popup
    frame.render_widget(paragraph, popup_area);
}

/// Render the help overlay
pub fn render_help_screen(frame: &mut Frame, app: &App, size: Rect) {
    let help_text = help_lines(app);

    let popup_width = 44.min(size.width);
    let popup_height = (help_text.len() as u16 + 2).min(size.height);
    let popup_area = Rect::new(
        (size.width.saturating_sub(popup_width)) / 2,
        (size.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    let help = Paragraph::new(help_text).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::White)),
    );

    frame.render_widget(Clear, popup_area);
    frame.render_widget(help, popup_area);
}
