//! JSON file backend for native builds
//!
//! The whole store is one JSON object of string values, rewritten on every
//! `set` through a temporary file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&entries)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Storage;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("snake-chase-{}-{}", name, std::process::id()))
            .join("store.json")
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let backend = FileBackend::new(scratch_path("missing"));
        assert_eq!(backend.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = scratch_path("reopen");
        let mut storage = Storage::new(FileBackend::new(&path));
        storage.set_high_score(42);

        let reopened = Storage::new(FileBackend::new(&path));
        assert_eq!(reopened.high_score(), 42);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error_but_storage_defaults() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "][").unwrap();

        let backend = FileBackend::new(&path);
        assert!(matches!(backend.get("k"), Err(StorageError::Json(_))));
        assert_eq!(Storage::new(backend).high_score(), 0);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
