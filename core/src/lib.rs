//! Core note store for stickies.
//!
//! The [`NoteStore`] owns the ordered note collection and mirrors it into a
//! [`KeyValueStore`] after every mutation.

pub mod error;
pub mod models;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use models::{Color, Note};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};
pub use store::{decode_notes, encode_notes, Mutation, NoteStore, NOTES_KEY};
