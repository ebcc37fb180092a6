use super::{now_millis, Color};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single sticky note as stored in the durable mirror.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub text: String,
    /// Creation time in milliseconds since the Unix epoch
    pub time: i64,
    pub color: Color,
}

impl Note {
    /// Create an empty note with a generated id, stamped with the current time
    pub fn new(color: Color) -> Self {
        let time = now_millis();
        Self {
            id: Self::generate_id(time),
            text: String::new(),
            time,
            color,
        }
    }

    /// Create a note with a specific ID (for testing or import)
    pub fn with_id(id: String, text: String, time: i64, color: Color) -> Self {
        Self {
            id,
            text,
            time,
            color,
        }
    }

    /// Millisecond timestamp followed by a random suffix.
    pub fn generate_id(time: i64) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}{}", time, &suffix[..12])
    }
}
