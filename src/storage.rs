use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{Error, KeyValueStore};

#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.values.remove(key);
        Ok(())
    }
}

/// Keeps the keyed values as one JSON object on disk so a session survives
/// a restart of the process. A missing file is an empty store.
///
/// A file that no longer parses is moved aside to `<path>.bak` on the next
/// write and the store starts over from empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current contents for a read-modify-write. Only a parse failure is
    /// recovered from; IO errors reach the caller.
    fn read_for_update(&self) -> Result<HashMap<String, String>, Error> {
        match self.read_all() {
            Err(Error::Storage(e)) => {
                let backup = self.backup_path();
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Store file is malformed, starting over"
                );
                fs::rename(&self.path, &backup)?;
                Ok(HashMap::new())
            }
            other => other,
        }
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    fn write_all(&self, values: &HashMap<String, String>) -> Result<(), Error> {
        let contents = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let mut values = self.read_for_update()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        let mut values = self.read_for_update()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_and_removes() {
        let mut store = MemoryStore::new();
        store.save("user", "a").unwrap();
        store.save("user", "b").unwrap();
        assert_eq!(store.load("user").unwrap().as_deref(), Some("b"));
        store.remove("user").unwrap();
        store.remove("user").unwrap();
        assert_eq!(store.load("user").unwrap(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = FileStore::new(&path);
        assert_eq!(store.load("user").unwrap(), None);
        store.save("user", r#"{"id":1,"name":"A"}"#).unwrap();
        store.save("token", "t").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.load("user").unwrap().as_deref(),
            Some(r#"{"id":1,"name":"A"}"#)
        );

        let mut reopened = reopened;
        reopened.remove("user").unwrap();
        assert_eq!(FileStore::new(&path).load("user").unwrap(), None);
        assert_eq!(FileStore::new(&path).load("token").unwrap().as_deref(), Some("t"));
    }

    #[test]
    fn corrupt_file_is_an_error_on_load_but_not_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.load("user"), Err(Error::Storage(_))));

        store.save("user", "x").unwrap();
        assert_eq!(store.load("user").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn truncated_file_is_kept_aside_before_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let truncated = r#"{"token":"t","user":"#;
        fs::write(&path, truncated).unwrap();

        let mut store = FileStore::new(&path);
        store.save("user", "x").unwrap();

        assert_eq!(store.load("user").unwrap().as_deref(), Some("x"));
        assert_eq!(store.load("token").unwrap(), None);
        let backup = dir.path().join("store.json.bak");
        assert_eq!(fs::read_to_string(backup).unwrap(), truncated);
    }

    #[test]
    fn io_errors_are_not_swallowed_on_write() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as the store file.
        let mut store = FileStore::new(dir.path());

        assert!(matches!(store.save("user", "x"), Err(Error::IO(_))));
        assert!(matches!(store.remove("user"), Err(Error::IO(_))));
        assert!(dir.path().is_dir());
    }
}
