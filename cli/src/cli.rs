use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use stickies_core::Color;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum Backend {
    /// SQLite database file
    Sqlite,
    /// Plain JSON file
    Json,
    /// Nothing is kept after exit; config.toml is only read, never written,
    /// and no log files are written unless --log-dir is given
    Memory,
}

#[derive(Clone, Debug, Eq, Parser, PartialEq)]
#[command(version, author, about = "Colored sticky notes in the terminal")]
pub struct CliConfig {
    /// Data file; defaults to stickies.db or stickies.json depending on the backend
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Sqlite, global = true)]
    pub backend: Backend,

    /// Directory for log files; defaults to the data file's directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Clone, Debug, Eq, PartialEq, Subcommand)]
pub enum Command {
    /// Open the interactive note board (default)
    Tui,
    /// Print all notes
    List {
        /// Print the stored JSON array instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Create an empty note and print its id
    Add {
        #[arg(value_parser = parse_color)]
        color: Color,
        /// Initial text for the note
        #[arg(long)]
        text: Option<String>,
    },
    /// Replace the text of a note
    Edit { id: String, text: String },
    /// Delete a note
    Delete { id: String },
    /// Print the color palette
    Palette,
    /// Copy the data file to PATH
    Backup { path: PathBuf },
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Color>().map_err(|err| err.to_string())
}

impl CliConfig {
    pub fn data_path(&self) -> PathBuf {
        match (&self.data, self.backend) {
            (Some(path), _) => path.clone(),
            (None, Backend::Json) => PathBuf::from("stickies.json"),
            (None, _) => PathBuf::from("stickies.db"),
        }
    }

    /// Directory holding the data file, also home of config.toml and logs
    pub fn data_dir(&self) -> PathBuf {
        self.data_path()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Whether the backend keeps anything on disk
    pub fn persists(&self) -> bool {
        self.backend != Backend::Memory
    }

    /// Where log files go; `None` when nothing should be written
    pub fn log_dir(&self) -> Option<PathBuf> {
        match &self.log_dir {
            Some(dir) => Some(dir.clone()),
            None if self.persists() => Some(self.data_dir()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = CliConfig::parse_from(["stickies"]);
        assert_eq!(cli.backend, Backend::Sqlite);
        assert_eq!(cli.command, None);
        assert_eq!(cli.data_path(), PathBuf::from("stickies.db"));
        assert_eq!(cli.data_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_json_backend_default_path() {
        let cli = CliConfig::parse_from(["stickies", "--backend", "json", "list"]);
        assert_eq!(cli.data_path(), PathBuf::from("stickies.json"));
        assert_eq!(cli.command, Some(Command::List { json: false }));
    }

    #[test]
    fn test_add_parses_color() {
        let cli = CliConfig::parse_from(["stickies", "add", "bg-blue-100", "--data", "/tmp/x/n.db"]);
        assert_eq!(cli.command, Some(Command::Add { color: Color::Blue, text: None }));
        assert_eq!(cli.log_dir(), Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_memory_backend_writes_no_logs_by_default() {
        let cli = CliConfig::parse_from(["stickies", "--backend", "memory"]);
        assert!(!cli.persists());
        assert_eq!(cli.log_dir(), None);

        let cli = CliConfig::parse_from(["stickies", "--backend", "memory", "--log-dir", "/tmp/logs"]);
        assert_eq!(cli.log_dir(), Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn test_backup_command() {
        let cli = CliConfig::parse_from(["stickies", "backup", "/tmp/copy.db"]);
        assert_eq!(cli.command, Some(Command::Backup { path: PathBuf::from("/tmp/copy.db") }));
    }

    #[test]
    fn test_add_rejects_unknown_color() {
        assert!(CliConfig::try_parse_from(["stickies", "add", "orange"]).is_err());
    }
}
