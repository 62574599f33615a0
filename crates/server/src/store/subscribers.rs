//! Subscriber store: the deduplicated newsletter email list.

use std::sync::Arc;

use entre_nous_core::Email;
use serde::{Deserialize, Serialize};

use super::{DocumentStore, StoreError, load_json, save_json};

/// Document name for the subscriber list.
pub const SUBSCRIBERS_DOC: &str = "subscribers.json";

/// The persisted subscriber document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriberList {
    pub subscribers: Vec<String>,
}

/// Result of a subscribe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// The email was added to the list.
    Added,
    /// The email was already present; the list is unchanged.
    AlreadySubscribed,
}

/// Repository for the subscriber document.
#[derive(Clone)]
pub struct SubscriberStore {
    store: Arc<dyn DocumentStore>,
}

impl SubscriberStore {
    /// Create a subscriber store over the given document backend.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write an empty subscriber list if no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the seed document cannot be written.
    pub fn seed(&self) -> Result<(), StoreError> {
        if self.store.load(SUBSCRIBERS_DOC)?.is_none() {
            save_json(self.store.as_ref(), SUBSCRIBERS_DOC, &SubscriberList::default())?;
        }
        Ok(())
    }

    /// All subscribed addresses. Falls back to an empty list if the document
    /// is missing or corrupt.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.read().subscribers
    }

    /// Add an email to the list unless it is already present.
    ///
    /// [`Email`] is already normalized (trimmed, lowercased), so presence is
    /// effectively case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the list cannot be persisted.
    pub fn subscribe(&self, email: &Email) -> Result<SubscribeOutcome, StoreError> {
        let mut list = self.read();

        if list.subscribers.iter().any(|s| s == email.as_str()) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        list.subscribers.push(email.as_str().to_string());
        save_json(self.store.as_ref(), SUBSCRIBERS_DOC, &list)?;
        Ok(SubscribeOutcome::Added)
    }

    fn read(&self) -> SubscriberList {
        load_json(self.store.as_ref(), SUBSCRIBERS_DOC).unwrap_or_default()
    }
}
