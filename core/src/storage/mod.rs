mod database;
mod json_file_store;
mod memory_store;
mod sqlite_store;

pub use database::{Connection, Database};
pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

use crate::Result;

/// Durable string-keyed storage the note store mirrors itself into.
///
/// Calls are synchronous and in-process; implementations never retry.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
