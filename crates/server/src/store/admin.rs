//! Admin config store: the single credential record.

use std::sync::Arc;

use entre_nous_core::AdminCredential;
use serde::{Deserialize, Serialize};

use super::{DocumentStore, StoreError, load_json, save_json};

/// Document name for the admin config.
pub const CONFIG_DOC: &str = "config.json";

/// The persisted config document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    pub admin: AdminCredential,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            admin: AdminCredential {
                username: "admin".to_string(),
                password: "otaku2024".to_string(),
            },
        }
    }
}

/// Repository for the admin config document.
///
/// The credential is re-read on every verification so a password change on
/// disk takes effect without a restart.
#[derive(Clone)]
pub struct AdminConfigStore {
    store: Arc<dyn DocumentStore>,
}

impl AdminConfigStore {
    /// Create a config store over the given document backend.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write the default credential if no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the seed document cannot be written.
    pub fn seed(&self) -> Result<(), StoreError> {
        if self.store.load(CONFIG_DOC)?.is_none() {
            save_json(self.store.as_ref(), CONFIG_DOC, &AdminConfig::default())?;
        }
        Ok(())
    }

    /// The current admin credential. Falls back to the built-in default if
    /// the document is missing or corrupt.
    #[must_use]
    pub fn admin(&self) -> AdminCredential {
        load_json::<AdminConfig>(self.store.as_ref(), CONFIG_DOC)
            .unwrap_or_default()
            .admin
    }
}
