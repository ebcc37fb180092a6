//! The note store: the authoritative in-memory collection plus its durable
//! mirror.
//!
//! # Invariants
//! - Note ids in the collection are pairwise distinct.
//! - New notes are appended; existing order never changes.
//! - Once [`NoteStore::apply`] returns `Ok`, the durable mirror holds the
//!   full collection as of that mutation.

use crate::models::{Color, Note};
use crate::storage::KeyValueStore;
use crate::Result;
use log::{debug, info, warn};
use std::collections::HashSet;

/// Key the serialized collection lives under.
pub const NOTES_KEY: &str = "notes-app";

/// A change to the note collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { color: Color },
    UpdateText { id: String, text: String },
    Delete { id: String },
}

/// Ordered note collection mirrored into a [`KeyValueStore`].
pub struct NoteStore<S: KeyValueStore> {
    storage: S,
    notes: Vec<Note>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Load the collection from `storage`.
    ///
    /// Never fails: an absent or unreadable record, or one that is not a JSON
    /// array, yields an empty collection. Array elements that are not valid
    /// notes are skipped.
    pub fn initialize(storage: S) -> Self {
        let notes = match storage.get(NOTES_KEY) {
            Ok(Some(raw)) => match decode_notes(&raw) {
                Some(notes) => dedup_ids(notes),
                None => {
                    warn!("event=store_init status=malformed key={} action=reset", NOTES_KEY);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=store_init status=read_failed key={} error=\"{}\" action=reset",
                    NOTES_KEY, err
                );
                Vec::new()
            }
        };
        info!("event=store_init status=ok notes={}", notes.len());
        Self { storage, notes }
    }

    /// Current snapshot in display order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply `mutation`, then write the full collection to storage.
    ///
    /// Mutations naming a missing id leave the collection unchanged but still
    /// rewrite the mirror. A failed write is returned as an error; the
    /// in-memory change is kept.
    pub fn apply(&mut self, mutation: Mutation) -> Result<&[Note]> {
        match mutation {
            Mutation::Create { color } => {
                self.push_new(color);
            }
            Mutation::UpdateText { id, text } => {
                match self.notes.iter_mut().find(|note| note.id == id) {
                    Some(note) => {
                        note.text = text;
                        debug!("event=note_update id={} chars={}", id, note.text.chars().count());
                    }
                    None => debug!("event=note_update id={} status=missing", id),
                }
            }
            Mutation::Delete { id } => {
                let before = self.notes.len();
                self.notes.retain(|note| note.id != id);
                if self.notes.len() == before {
                    debug!("event=note_delete id={} status=missing", id);
                } else {
                    debug!("event=note_delete id={} remaining={}", id, self.notes.len());
                }
            }
        }
        self.persist()?;
        Ok(&self.notes)
    }

    /// Append an empty note of `color` and return its id
    pub fn create_note(&mut self, color: Color) -> Result<String> {
        self.apply(Mutation::Create { color })?;
        // apply(Create) always appends
        Ok(self
            .notes
            .last()
            .map(|note| note.id.clone())
            .unwrap_or_default())
    }

    pub fn update_text(&mut self, id: &str, text: impl Into<String>) -> Result<&[Note]> {
        self.apply(Mutation::UpdateText {
            id: id.to_string(),
            text: text.into(),
        })
    }

    pub fn delete_note(&mut self, id: &str) -> Result<&[Note]> {
        self.apply(Mutation::Delete { id: id.to_string() })
    }

    fn push_new(&mut self, color: Color) {
        let mut note = Note::new(color);
        while self.get(&note.id).is_some() {
            note.id = Note::generate_id(note.time);
        }
        debug!("event=note_create id={} color={}", note.id, color);
        self.notes.push(note);
    }

    fn persist(&mut self) -> Result<()> {
        let encoded = encode_notes(&self.notes)?;
        self.storage.set(NOTES_KEY, &encoded)
    }
}

/// Serialize a collection into the durable JSON array form
pub fn encode_notes(notes: &[Note]) -> Result<String> {
    Ok(serde_json::to_string(notes)?)
}

/// Parse the durable JSON array form.
///
/// `None` when `raw` is not a JSON array. Elements that do not decode as a
/// note are skipped, the rest keep their order.
pub fn decode_notes(raw: &str) -> Option<Vec<Note>> {
    if raw.trim().is_empty() {
        return None;
    }
    let records: Vec<serde_json::Value> = serde_json::from_str(raw).ok()?;
    let notes = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(note) => Some(note),
            Err(err) => {
                warn!(
                    "event=store_init status=bad_record index={} error=\"{}\" action=skip",
                    index, err
                );
                None
            }
        })
        .collect();
    Some(notes)
}

fn dedup_ids(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes
        .into_iter()
        .filter(|note| {
            let fresh = seen.insert(note.id.clone());
            if !fresh {
                warn!("event=store_init status=duplicate_id id={} action=drop", note.id);
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, MemoryStore, SqliteStore};
    use crate::Error;
    use tempfile::tempdir;

    fn empty_store() -> NoteStore<MemoryStore> {
        NoteStore::initialize(MemoryStore::new())
    }

    fn persisted(store: &NoteStore<MemoryStore>) -> Vec<Note> {
        let raw = store.storage().get(NOTES_KEY).unwrap().unwrap();
        decode_notes(&raw).unwrap()
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::InvalidInput("unavailable".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::InvalidInput("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_round_trip() {
        let notes = vec![
            Note::with_id("1".to_string(), "first".to_string(), 10, Color::Blue),
            Note::with_id("2".to_string(), "".to_string(), 20, Color::Yellow),
            Note::with_id("3".to_string(), "ünïcode\nlines".to_string(), 30, Color::Purple),
        ];
        let raw = encode_notes(&notes).unwrap();
        let store = NoteStore::initialize(MemoryStore::with_entry(NOTES_KEY, &raw));
        assert_eq!(store.notes(), notes.as_slice());
    }

    #[test]
    fn test_empty_start() {
        assert!(empty_store().is_empty());
        for raw in ["", "   ", "not json", "{\"id\":\"1\"}", "42", "[{\"id\":1}]"] {
            let store = NoteStore::initialize(MemoryStore::with_entry(NOTES_KEY, raw));
            assert!(store.is_empty(), "expected empty collection for {:?}", raw);
        }
    }

    #[test]
    fn test_bad_record_skipped_and_good_ones_kept() {
        let raw = r#"[
            {"id":"1","text":"keep me","time":1700000000000,"color":"yellow"},
            {"id":"2","text":"fractional","time":1700000000000.5,"color":"blue"},
            {"id":"3","text":"odd color","time":1700000000000,"color":"orange"},
            {"id":"4","time":1700000000000,"color":"green"}
        ]"#;
        let mut store = NoteStore::initialize(MemoryStore::with_entry(NOTES_KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].text, "keep me");

        store.create_note(Color::Green).unwrap();
        let saved = persisted(&store);
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, "1");
        assert_eq!(saved[0].text, "keep me");

        let reloaded = NoteStore::initialize(store.storage().clone());
        assert_eq!(reloaded.notes(), store.notes());
    }

    #[test]
    fn test_decode_non_array_is_none() {
        assert_eq!(decode_notes("{\"id\":\"1\"}"), None);
        assert_eq!(decode_notes("not json"), None);
        assert_eq!(decode_notes("[]"), Some(Vec::new()));
    }

    #[test]
    fn test_read_failure_starts_empty() {
        let store = NoteStore::initialize(FailingStore);
        assert!(store.is_empty());
    }

    #[test]
    fn test_loads_browser_export() {
        let raw = r#"[{"id":"170000000000042","text":"Buy milk","time":1700000000000,"color":"bg-pink-100"}]"#;
        let store = NoteStore::initialize(MemoryStore::with_entry(NOTES_KEY, raw));
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].color, Color::Pink);
        assert_eq!(store.notes()[0].text, "Buy milk");
    }

    #[test]
    fn test_duplicate_ids_dropped_on_load() {
        let notes = vec![
            Note::with_id("a".to_string(), "keep".to_string(), 1, Color::Green),
            Note::with_id("a".to_string(), "drop".to_string(), 2, Color::Blue),
            Note::with_id("b".to_string(), "".to_string(), 3, Color::Blue),
        ];
        let raw = encode_notes(&notes).unwrap();
        let store = NoteStore::initialize(MemoryStore::with_entry(NOTES_KEY, &raw));
        let ids: Vec<_> = store.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.get("a").unwrap().text, "keep");
    }

    #[test]
    fn test_id_uniqueness() {
        let mut store = empty_store();
        for i in 0..500 {
            store.create_note(Color::ALL[i % Color::ALL.len()]).unwrap();
        }
        let ids: HashSet<_> = store.notes().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_create_appends() {
        let mut store = empty_store();
        store.create_note(Color::Green).unwrap();
        for color in Color::ALL {
            let before = store.len();
            let id = store.create_note(color).unwrap();
            assert_eq!(store.len(), before + 1);
            let last = store.notes().last().unwrap();
            assert_eq!(last.id, id);
            assert_eq!(last.color, color);
            assert!(last.text.is_empty());
        }
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut store = empty_store();
        store.create_note(Color::Yellow).unwrap();
        let before = store.notes().to_vec();

        store.update_text("missing", "x").unwrap();
        assert_eq!(store.notes(), before.as_slice());

        store.delete_note("missing").unwrap();
        assert_eq!(store.notes(), before.as_slice());
    }

    #[test]
    fn test_delete_twice() {
        let mut store = empty_store();
        let a = store.create_note(Color::Yellow).unwrap();
        store.create_note(Color::Blue).unwrap();

        store.delete_note(&a).unwrap();
        let once = store.notes().to_vec();
        store.delete_note(&a).unwrap();
        assert_eq!(store.notes(), once.as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_scenario() {
        let mut store = empty_store();

        let first = store.create_note(Color::Yellow).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].text, "");
        assert_eq!(store.notes()[0].color, Color::Yellow);
        let created = store.notes()[0].clone();

        store.update_text(&first, "Buy milk").unwrap();
        let updated = store.get(&first).unwrap();
        assert_eq!(updated.text, "Buy milk");
        assert_eq!(updated.time, created.time);
        assert_eq!(updated.color, created.color);

        let second = store.create_note(Color::Blue).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[1].id, second);
        assert_eq!(store.notes()[1].text, "");
        assert_eq!(store.notes()[1].color, Color::Blue);

        store.delete_note(&first).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.notes()[0].id, second);
    }

    #[test]
    fn test_mirror_follows_every_mutation() {
        let mut store = empty_store();
        let id = store.create_note(Color::Pink).unwrap();
        assert_eq!(persisted(&store), store.notes());

        store.update_text(&id, "h").unwrap();
        store.update_text(&id, "hi").unwrap();
        assert_eq!(persisted(&store), store.notes());

        store.delete_note(&id).unwrap();
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_noop_still_writes_snapshot() {
        let mut store = empty_store();
        store.delete_note("missing").unwrap();
        assert_eq!(store.storage().get(NOTES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_failure_surfaces_and_keeps_memory() {
        let mut store = NoteStore::initialize(FailingStore);
        assert!(store.create_note(Color::Blue).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reload_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let mut store = NoteStore::initialize(JsonFileStore::new(&path));
        let id = store.create_note(Color::Green).unwrap();
        store.update_text(&id, "persisted").unwrap();
        let expected = store.notes().to_vec();

        let reloaded = NoteStore::initialize(JsonFileStore::new(&path));
        assert_eq!(reloaded.notes(), expected.as_slice());
    }

    #[test]
    fn test_reload_from_sqlite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");

        let expected = {
            let mut store = NoteStore::initialize(SqliteStore::open(&path).unwrap());
            store.create_note(Color::Yellow).unwrap();
            let id = store.create_note(Color::Purple).unwrap();
            store.update_text(&id, "second").unwrap();
            store.notes().to_vec()
        };

        let reloaded = NoteStore::initialize(SqliteStore::open(&path).unwrap());
        assert_eq!(reloaded.notes(), expected.as_slice());
    }
}
