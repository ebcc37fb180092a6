use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed palette offered for new notes, in display order.
///
/// Decoding also accepts the `bg-<color>-100` class names used by the
/// browser version of the app, so its exported data loads unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[serde(alias = "bg-yellow-100")]
    Yellow,
    #[serde(alias = "bg-green-100")]
    Green,
    #[serde(alias = "bg-blue-100")]
    Blue,
    #[serde(alias = "bg-pink-100")]
    Pink,
    #[serde(alias = "bg-purple-100")]
    Purple,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Pink,
        Color::Purple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Pink => "pink",
            Color::Purple => "purple",
        }
    }

    /// 1-based position in the palette
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0) + 1
    }

    /// Inverse of [`Color::index`]
    pub fn from_index(index: usize) -> Option<Color> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        let name = name
            .strip_prefix("bg-")
            .and_then(|rest| rest.strip_suffix("-100"))
            .unwrap_or(&name);
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown color: {}", s)))
    }
}
