//! High score and control binding persistence
//!
//! Features:
//! - Pluggable key/value backends (memory, JSON file, browser LocalStorage)
//! - A [`Storage`] facade that never fails: reads fall back to defaults and
//!   failed writes are dropped after logging

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod local;

pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageBackend;

use thiserror::Error;

use crate::consts::{CONTROLS_KEY, HS_KEY};
use crate::controls::ControlBindings;

/// Backend failure (never surfaced past [`Storage`])
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw string key/value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Failure-tolerant accessors for the two persisted records
#[derive(Debug, Clone, Default)]
pub struct Storage<B> {
    backend: B,
}

impl<B: KeyValueStore> Storage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stored best score, 0 when missing or unreadable
    pub fn high_score(&self) -> u64 {
        match self.backend.get(HS_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                log::debug!("Ignoring unreadable high score {:?}", raw);
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                log::debug!("High score read failed: {}", e);
                0
            }
        }
    }

    pub fn set_high_score(&mut self, score: u64) {
        if let Err(e) = self.backend.set(HS_KEY, &score.to_string()) {
            log::debug!("High score write failed: {}", e);
        }
    }

    /// Store `max(score, stored)` and return it
    pub fn record_score(&mut self, score: u64) -> u64 {
        let best = score.max(self.high_score());
        self.set_high_score(best);
        best
    }

    /// Saved control bindings, if any were saved and parse
    pub fn controls(&self) -> Option<ControlBindings> {
        let raw = match self.backend.get(CONTROLS_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::debug!("Controls read failed: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(bindings) => Some(bindings),
            Err(e) => {
                log::debug!("Ignoring malformed controls: {}", e);
                None
            }
        }
    }

    pub fn set_controls(&mut self, bindings: &ControlBindings) {
        let result = serde_json::to_string(bindings)
            .map_err(StorageError::from)
            .and_then(|json| self.backend.set(CONTROLS_KEY, &json));
        if let Err(e) = result {
            log::debug!("Controls write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ControlScheme, KeyBindings};

    /// Backend whose every operation fails
    struct BrokenBackend;

    impl KeyValueStore for BrokenBackend {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota".to_string()))
        }
    }

    #[test]
    fn test_high_score_round_trip() {
        let mut storage = Storage::new(MemoryBackend::new());
        assert_eq!(storage.high_score(), 0);
        storage.set_high_score(42);
        assert_eq!(storage.high_score(), 42);
    }

    #[test]
    fn test_record_score_never_lowers() {
        let mut storage = Storage::new(MemoryBackend::new());
        storage.set_high_score(42);
        assert_eq!(storage.record_score(10), 42);
        assert_eq!(storage.high_score(), 42);
        assert_eq!(storage.record_score(50), 50);
        assert_eq!(storage.high_score(), 50);
    }

    #[test]
    fn test_garbage_high_score_reads_zero() {
        let mut backend = MemoryBackend::new();
        backend.set(HS_KEY, "lots").unwrap();
        let storage = Storage::new(backend);
        assert_eq!(storage.high_score(), 0);
    }

    #[test]
    fn test_controls_round_trip() {
        let mut storage = Storage::new(MemoryBackend::new());
        assert_eq!(storage.controls(), None);

        let arrows = ControlBindings::from_scheme(ControlScheme::Arrows);
        storage.set_controls(&arrows);
        assert_eq!(storage.controls(), Some(arrows));

        let custom = ControlBindings::custom(KeyBindings {
            up: "KeyI".to_string(),
            left: "KeyJ".to_string(),
            down: "KeyK".to_string(),
            right: "KeyL".to_string(),
            pause: None,
            restart: Some("Escape".to_string()),
            wrap: None,
        });
        storage.set_controls(&custom);
        assert_eq!(storage.controls(), Some(custom));
    }

    #[test]
    fn test_malformed_controls_read_none() {
        let mut backend = MemoryBackend::new();
        backend.set(CONTROLS_KEY, "{not json").unwrap();
        let storage = Storage::new(backend);
        assert_eq!(storage.controls(), None);
    }

    #[test]
    fn test_broken_backend_never_fails() {
        let mut storage = Storage::new(BrokenBackend);
        storage.set_high_score(5);
        assert_eq!(storage.high_score(), 0);
        assert_eq!(storage.record_score(7), 7);
        storage.set_controls(&ControlBindings::default());
        assert_eq!(storage.controls(), None);
    }
}
