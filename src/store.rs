use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{info, warn};

use crate::constants::history::{EMPTY_HISTORY_PAYLOAD, HISTORY_FILENAME};
use crate::errors::MarqueeError;
use crate::history::History;

/// Persistence backend for [`History`].
///
/// The engine loads once before sampling and saves once at the end of a run;
/// nothing is written incrementally.
pub trait HistoryStore: Send + Sync {
    /// Load the persisted history (empty when nothing has been saved yet).
    fn load(&self) -> Result<History, MarqueeError>;
    /// Replace the persisted history with `history`.
    fn save(&self, history: &History) -> Result<(), MarqueeError>;
}

/// File-backed history store holding compact JSON.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl fmt::Debug for FileHistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHistoryStore")
            .field("path", &self.path)
            .finish()
    }
}

impl FileHistoryStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by the default history filename inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(HISTORY_FILENAME))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty history if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), MarqueeError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        warn!(
            "[marquee:history] {} not found; initializing empty history",
            self.path.display()
        );
        fs::write(&self.path, EMPTY_HISTORY_PAYLOAD)?;
        Ok(())
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<History, MarqueeError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "[marquee:history] {} not found; starting from empty history",
                    self.path.display()
                );
                return Ok(History::new());
            }
            Err(err) => return Err(err.into()),
        };
        let history = History::from_json_str(&self.path.display().to_string(), &contents)?;
        info!(
            "[marquee:history] loaded {} domain(s) from {}",
            history.len(),
            self.path.display()
        );
        Ok(history)
    }

    fn save(&self, history: &History) -> Result<(), MarqueeError> {
        let encoded = history.to_json_string()?;
        fs::write(&self.path, encoded)?;
        info!(
            "[marquee:history] wrote {} domain(s) to {}",
            history.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory history store; keeps the encoded payload so saves go through the JSON codec.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    payload: RwLock<Option<String>>,
    saves: RwLock<usize>,
}

impl InMemoryHistoryStore {
    /// Store with nothing saved yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an already-encoded payload.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: RwLock::new(Some(payload.into())),
            saves: RwLock::new(0),
        }
    }

    /// Last encoded payload, if any.
    pub fn payload(&self) -> Option<String> {
        self.payload.read().ok().and_then(|guard| guard.clone())
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.read().map(|guard| *guard).unwrap_or(0)
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self) -> Result<History, MarqueeError> {
        let guard = self
            .payload
            .read()
            .map_err(|_| MarqueeError::Configuration("history store lock poisoned".into()))?;
        match guard.as_deref() {
            Some(payload) => History::from_json_str("memory", payload),
            None => Ok(History::new()),
        }
    }

    fn save(&self, history: &History) -> Result<(), MarqueeError> {
        let encoded = history.to_json_string()?;
        *self
            .payload
            .write()
            .map_err(|_| MarqueeError::Configuration("history store lock poisoned".into()))? =
            Some(encoded);
        *self
            .saves
            .write()
            .map_err(|_| MarqueeError::Configuration("history store lock poisoned".into()))? += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_empty_history() {
        let temp = tempdir().unwrap();
        let store = FileHistoryStore::in_dir(temp.path());
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn ensure_exists_seeds_empty_object() {
        let temp = tempdir().unwrap();
        let store = FileHistoryStore::new(temp.path().join("nested").join("history.json"));
        store.ensure_exists().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_round_trip_preserves_domains() {
        let temp = tempdir().unwrap();
        let store = FileHistoryStore::in_dir(temp.path());
        let history =
            History::from_domains([("fruits", vec!["apple", "raisin"]), ("colors", vec!["red"])]);
        store.save(&history).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains('\n'));
        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn legacy_array_payload_loads_as_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("history.json");
        fs::write(&path, "[]").unwrap();
        assert!(FileHistoryStore::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_propagates_decode_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("history.json");
        fs::write(&path, "{\"fruits\": [").unwrap();
        let err = FileHistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, MarqueeError::Decode { .. }));
    }

    #[test]
    fn in_memory_store_counts_saves() {
        let store = InMemoryHistoryStore::with_payload(r#"{"fruits":["apple"]}"#);
        let mut history = store.load().unwrap();
        assert!(history.has_domain_item("fruits", "apple"));
        history.add_domain_item("fruits", "raisin");
        store.save(&history).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(
            store.payload().as_deref(),
            Some(r#"{"fruits":["apple","raisin"]}"#)
        );
    }
}
