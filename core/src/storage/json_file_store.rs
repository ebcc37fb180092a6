use super::KeyValueStore;
use crate::Result;
use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value store kept as a single JSON object in a file.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "event=kv_file_reset path={} reason=\"{}\"",
                    self.path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_absent() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("notes.json"));
        assert_eq!(store.get("notes-app").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_from_fresh_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.json");

        let mut store = JsonFileStore::new(&path);
        store.set("notes-app", "[]").unwrap();
        store.set("other", "x").unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("notes-app").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
        assert!(!reopened.temp_path().exists());
    }

    #[test]
    fn test_corrupt_file_is_error_on_get_and_replaced_on_set() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(store.get("notes-app").is_err());

        store.set("notes-app", "[]").unwrap();
        assert_eq!(store.get("notes-app").unwrap().as_deref(), Some("[]"));
    }
}
