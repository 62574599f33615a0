//! Flat-file JSON persistence for the catalog, subscribers, and admin config.
//!
//! # Documents
//!
//! - `products.json` - the catalog: products plus the category list
//! - `subscribers.json` - deduplicated newsletter email list
//! - `config.json` - the single admin credential record
//!
//! Each document is loaded and saved whole, pretty-printed, on every
//! operation. Writes are plain file writes with no locking or atomic rename:
//! the deployment assumption is a single admin and a single process, so two
//! near-simultaneous writes can lose an update. This is a documented
//! limitation, not an invariant the stores defend.
//!
//! Reads that fail (missing or corrupt document) fall back to built-in
//! defaults instead of propagating an error; write failures do propagate.
//!
//! The stores are written against the [`DocumentStore`] trait rather than the
//! filesystem directly, so a real database backend can be swapped in without
//! touching callers.

pub mod admin;
pub mod catalog;
pub mod subscribers;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use admin::AdminConfigStore;
pub use catalog::{Catalog, CatalogStore, NewProduct, Product, ProductPatch};
pub use subscribers::{SubscribeOutcome, SubscriberStore};

/// Errors that can occur while persisting a document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Abstract named-document storage.
///
/// Implementations only move bytes; JSON encoding and the fallback-to-default
/// policy live in the typed stores built on top.
pub trait DocumentStore: Send + Sync {
    /// Load a document by name. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document exists but cannot be read.
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Save a document by name, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be written.
    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Document store backed by flat files under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory this store writes into.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(name), bytes)?;
        Ok(())
    }
}

/// In-memory document store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let docs = self.docs.lock().map_err(|_| poisoned())?;
        Ok(docs.get(name).cloned())
    }

    fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut docs = self.docs.lock().map_err(|_| poisoned())?;
        docs.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::other("memory store lock poisoned"))
}

/// Load and decode a JSON document, returning `None` on any failure.
///
/// Read failures are swallowed by design: the typed stores substitute their
/// built-in defaults so a corrupt file degrades service instead of taking it
/// down.
pub(crate) fn load_json<T: DeserializeOwned>(store: &dyn DocumentStore, name: &str) -> Option<T> {
    match store.load(name) {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(document = name, error = %e, "Corrupt document, using defaults");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(document = name, error = %e, "Failed to read document, using defaults");
            None
        }
    }
}

/// Encode a value as pretty-printed JSON and save it.
pub(crate) fn save_json<T: Serialize>(
    store: &dyn DocumentStore,
    name: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    store.save(name, &bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Doc {
        value: u32,
    }

    #[test]
    fn test_file_store_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("absent.json").unwrap().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));

        save_json(&store, "doc.json", &Doc { value: 42 }).unwrap();
        let loaded: Doc = load_json(&store, "doc.json").unwrap();
        assert_eq!(loaded, Doc { value: 42 });
    }

    #[test]
    fn test_file_store_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        save_json(&store, "doc.json", &Doc { value: 1 }).unwrap();
        let raw = String::from_utf8(store.load("doc.json").unwrap().unwrap()).unwrap();
        assert!(raw.contains('\n'), "document should be pretty-printed");
    }

    #[test]
    fn test_load_json_swallows_corrupt_document() {
        let store = MemoryStore::new();
        store.save("doc.json", b"{not json").unwrap();
        assert!(load_json::<Doc>(&store, "doc.json").is_none());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        save_json(&store, "doc.json", &Doc { value: 7 }).unwrap();
        let loaded: Doc = load_json(&store, "doc.json").unwrap();
        assert_eq!(loaded.value, 7);
    }
}
