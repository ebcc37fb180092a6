use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub help: String,
    pub start_editing: String,
    pub stop_editing: String,
    pub delete_note: String,
    pub confirm: String,
    pub cancel: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "h".to_string(),
            start_editing: "enter".to_string(),
            stop_editing: "esc".to_string(),
            delete_note: "d".to_string(),
            confirm: "y".to_string(),
            cancel: "n".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub keymap: Keymap,
}

/// A parsed key such as `q`, `enter` or `ctrl-s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        if self.modifiers.is_empty() {
            // Plain bindings must not fire on ctrl/alt chords
            !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        } else {
            key.modifiers.contains(self.modifiers)
        }
    }
}

impl FromStr for KeyBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = KeyModifiers::NONE;
        let mut rest = s.trim();
        loop {
            let lower = rest.to_lowercase();
            if lower.len() > 1 && lower.starts_with("ctrl-") {
                modifiers |= KeyModifiers::CONTROL;
                rest = &rest[5..];
            } else if lower.len() > 1 && lower.starts_with("alt-") {
                modifiers |= KeyModifiers::ALT;
                rest = &rest[4..];
            } else if lower.len() > 1 && lower.starts_with("shift-") {
                modifiers |= KeyModifiers::SHIFT;
                rest = &rest[6..];
            } else {
                break;
            }
        }

        let mut chars = rest.chars();
        let code = match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => match rest.to_lowercase().as_str() {
                "enter" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "delete" | "del" => KeyCode::Delete,
                "backspace" => KeyCode::Backspace,
                "tab" => KeyCode::Tab,
                "space" => KeyCode::Char(' '),
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "pageup" => KeyCode::PageUp,
                "pagedown" => KeyCode::PageDown,
                _ => return Err(format!("unknown key `{}`", s)),
            },
        };
        Ok(Self { code, modifiers })
    }
}

/// The keymap resolved into matchable bindings
#[derive(Debug, Clone)]
pub struct Bindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub start_editing: KeyBinding,
    pub stop_editing: KeyBinding,
    pub delete_note: KeyBinding,
    pub confirm: KeyBinding,
    pub cancel: KeyBinding,
}

impl Keymap {
    pub fn resolve(&self) -> Result<Bindings, String> {
        Ok(Bindings {
            quit: self.quit.parse()?,
            help: self.help.parse()?,
            start_editing: self.start_editing.parse()?,
            stop_editing: self.stop_editing.parse()?,
            delete_note: self.delete_note.parse()?,
            confirm: self.confirm.parse()?,
            cancel: self.cancel.parse()?,
        })
    }
}

impl Config {
    /// Bindings for this config. A key string that does not parse resets the
    /// keymap to the defaults, so shown hints always match the active keys.
    pub fn resolve_bindings(&mut self) -> Bindings {
        match self.keymap.resolve() {
            Ok(bindings) => bindings,
            Err(err) => {
                warn!("event=keymap_invalid error=\"{}\" action=use_defaults", err);
                self.keymap = Keymap::default();
                default_bindings()
            }
        }
    }
}

fn default_bindings() -> Bindings {
    Bindings {
        quit: KeyBinding { code: KeyCode::Char('q'), modifiers: KeyModifiers::NONE },
        help: KeyBinding { code: KeyCode::Char('h'), modifiers: KeyModifiers::NONE },
        start_editing: KeyBinding { code: KeyCode::Enter, modifiers: KeyModifiers::NONE },
        stop_editing: KeyBinding { code: KeyCode::Esc, modifiers: KeyModifiers::NONE },
        delete_note: KeyBinding { code: KeyCode::Char('d'), modifiers: KeyModifiers::NONE },
        confirm: KeyBinding { code: KeyCode::Char('y'), modifiers: KeyModifiers::NONE },
        cancel: KeyBinding { code: KeyCode::Char('n'), modifiers: KeyModifiers::NONE },
    }
}

/// Load the config at `path`, writing the defaults out if it does not exist.
/// Unreadable or invalid files fall back to the defaults.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        let config = Config::default();
        match toml::to_string(&config) {
            Ok(content) => {
                if let Err(err) = fs::write(path, content) {
                    warn!("event=config_write status=failed path={} error=\"{}\"", path.display(), err);
                }
            }
            Err(err) => warn!("event=config_write status=failed error=\"{}\"", err),
        }
        return config;
    }
    read_config(path)
}

/// Like [`load_config`] but never touches the filesystem beyond reading
pub fn read_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("event=config_read status=failed path={} error=\"{}\"", path.display(), err);
            return Config::default();
        }
    };
    toml::from_str(&content).unwrap_or_else(|err| {
        warn!("event=config_parse status=failed path={} error=\"{}\"", path.display(), err);
        Config::default()
    })
}
