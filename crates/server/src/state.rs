//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{CredentialVerifier, Notifier, PlaintextVerifier};
use crate::store::{AdminConfigStore, CatalogStore, JsonFileStore, StoreError, SubscriberStore};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to seed data directory: {0}")]
    Seed(#[from] StoreError),
    #[error("failed to build SMTP transport: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, the credential verifier, and the notifier.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: CatalogStore,
    subscribers: SubscriberStore,
    verifier: Arc<dyn CredentialVerifier>,
    notifier: Notifier,
}

impl AppState {
    /// Create the application state.
    ///
    /// Builds the file-backed stores under the configured data directory and
    /// seeds the default documents on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails or the SMTP transport cannot be
    /// built.
    pub fn new(config: ServerConfig) -> Result<Self, StateError> {
        let documents = Arc::new(JsonFileStore::new(&config.data_dir));

        let catalog = CatalogStore::new(Arc::clone(&documents) as _);
        let subscribers = SubscriberStore::new(Arc::clone(&documents) as _);
        let admin_config = AdminConfigStore::new(documents as _);

        catalog.seed()?;
        subscribers.seed()?;
        admin_config.seed()?;

        let verifier = Arc::new(PlaintextVerifier::new(admin_config));
        let notifier = Notifier::from_config(
            config.email.as_ref(),
            &config.frontend_url,
            &config.backend_url,
        )?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                subscribers,
                verifier,
                notifier,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the subscriber store.
    #[must_use]
    pub fn subscribers(&self) -> &SubscriberStore {
        &self.inner.subscribers
    }

    /// Get a reference to the admin credential verifier.
    #[must_use]
    pub fn verifier(&self) -> &dyn CredentialVerifier {
        self.inner.verifier.as_ref()
    }

    /// Get a reference to the notification sink.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}
