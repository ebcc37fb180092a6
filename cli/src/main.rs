mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Backend, CliConfig, Command};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use log::info;
use stickies_core::{
    encode_notes, models::format_note_time, storage::Database, Color, JsonFileStore,
    KeyValueStore, MemoryStore, NoteStore, SqliteStore,
};
use stickies_tui::{app::Store, config::read_config, App, EventHandler};
use std::io;
use std::path::Path;

fn main() -> Result<()> {
    let cli = CliConfig::parse();

    // Keep the handle alive so buffered records get flushed on exit
    let _logger = match cli.log_dir() {
        Some(dir) => match logging::init_logging(&cli.log_level, &dir) {
            Ok(handle) => Some(handle),
            Err(err) => {
                eprintln!("Logging disabled: {}", err);
                None
            }
        },
        None => None,
    };

    if let Some(Command::Backup { path }) = &cli.command {
        backup_data(&cli, path)?;
        println!("Backed up {} to {}", cli.data_path().display(), path.display());
        return Ok(());
    }

    let mut store = open_store(&cli)?;

    match cli.command.clone().unwrap_or(Command::Tui) {
        Command::Tui => run_tui(store, &cli),
        Command::List { json } => {
            if json {
                println!("{}", encode_notes(store.notes())?);
            } else {
                for note in store.notes() {
                    let first_line = note.text.lines().next().unwrap_or("");
                    println!(
                        "{}\t{}\t{}\t{}",
                        note.id,
                        note.color,
                        format_note_time(note.time),
                        first_line
                    );
                }
            }
            Ok(())
        }
        Command::Add { color, text } => {
            let id = store.create_note(color)?;
            if let Some(text) = text {
                store.update_text(&id, text)?;
            }
            println!("{}", id);
            Ok(())
        }
        Command::Edit { id, text } => {
            if store.get(&id).is_none() {
                eprintln!("No note with id {}", id);
            }
            store.update_text(&id, text)?;
            Ok(())
        }
        Command::Delete { id } => {
            if store.get(&id).is_none() {
                eprintln!("No note with id {}", id);
            }
            store.delete_note(&id)?;
            Ok(())
        }
        // Handled before the store is opened
        Command::Backup { .. } => Ok(()),
        Command::Palette => {
            for color in Color::ALL {
                println!("{}\t{}", color.index(), color);
            }
            Ok(())
        }
    }
}

fn open_store(cli: &CliConfig) -> Result<Store> {
    let path = cli.data_path();
    let storage: Box<dyn KeyValueStore> = match cli.backend {
        Backend::Sqlite => Box::new(
            SqliteStore::open(&path)
                .with_context(|| format!("opening database {}", path.display()))?,
        ),
        Backend::Json => Box::new(JsonFileStore::new(&path)),
        Backend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(NoteStore::initialize(storage))
}

/// Copy the data file for file-backed backends
fn backup_data(cli: &CliConfig, dest: &Path) -> Result<()> {
    let source = cli.data_path();
    match cli.backend {
        Backend::Sqlite => {
            let db = Database::new(&source);
            if !db.exists() {
                bail!("no database at {}", source.display());
            }
            db.backup(dest)
                .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
        }
        Backend::Json => {
            std::fs::copy(&source, dest)
                .with_context(|| format!("copying {} to {}", source.display(), dest.display()))?;
        }
        Backend::Memory => bail!("the memory backend keeps nothing to back up"),
    }
    info!("event=backup status=ok source={} dest={}", source.display(), dest.display());
    Ok(())
}

fn run_tui(store: Store, cli: &CliConfig) -> Result<()> {
    let config_path = cli.data_dir().join("config.toml");
    let mut app = if cli.persists() {
        App::new(store, &config_path)
    } else {
        App::with_config(store, read_config(&config_path))
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create event handler
    let event_handler = EventHandler::new(250); // 250ms tick rate

    // Main loop
    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| stickies_tui::ui::render(f, app))?;

        match event_handler.next()? {
            stickies_tui::Event::Key(key) => {
                stickies_tui::event::handle_key_event(key, app);
            }
            stickies_tui::Event::Resize => {}
            stickies_tui::Event::Tick => {
                app.tick();
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli_for(backend: &str, data: &Path) -> CliConfig {
        CliConfig::parse_from([
            "stickies",
            "--backend",
            backend,
            "--data",
            data.to_str().unwrap(),
        ])
    }

    #[test]
    fn test_backup_sqlite_restores_notes() {
        let dir = tempdir().unwrap();
        let cli = cli_for("sqlite", &dir.path().join("notes.db"));

        let id = {
            let mut store = open_store(&cli).unwrap();
            let id = store.create_note(Color::Blue).unwrap();
            store.update_text(&id, "backed up").unwrap();
            id
        };

        let copy = dir.path().join("copy.db");
        backup_data(&cli, &copy).unwrap();

        let restored = open_store(&cli_for("sqlite", &copy)).unwrap();
        assert_eq!(restored.get(&id).unwrap().text, "backed up");
    }

    #[test]
    fn test_backup_json() {
        let dir = tempdir().unwrap();
        let cli = cli_for("json", &dir.path().join("notes.json"));
        open_store(&cli).unwrap().create_note(Color::Pink).unwrap();

        let copy = dir.path().join("copy.json");
        backup_data(&cli, &copy).unwrap();
        assert_eq!(open_store(&cli_for("json", &copy)).unwrap().len(), 1);
    }

    #[test]
    fn test_backup_missing_database_fails() {
        let dir = tempdir().unwrap();
        let cli = cli_for("sqlite", &dir.path().join("absent.db"));
        assert!(backup_data(&cli, &dir.path().join("copy.db")).is_err());
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_backup_memory_fails() {
        let dir = tempdir().unwrap();
        let cli = cli_for("memory", &dir.path().join("x"));
        assert!(backup_data(&cli, &dir.path().join("copy")).is_err());
    }
}
