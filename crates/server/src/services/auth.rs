//! Credential verification for the admin auth gate.

use crate::store::AdminConfigStore;

/// Pluggable credential check.
///
/// The auth gate only ever asks "does this pair match" so the comparison
/// scheme can be upgraded (e.g. to hashed passwords) without touching the
/// middleware contract.
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if the supplied pair is valid.
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Verifier that compares against the plaintext credential in the config
/// document.
///
/// Re-reads the document on every call, so editing `config.json` takes
/// effect immediately.
#[derive(Clone)]
pub struct PlaintextVerifier {
    config: AdminConfigStore,
}

impl PlaintextVerifier {
    /// Create a verifier backed by the given config store.
    #[must_use]
    pub const fn new(config: AdminConfigStore) -> Self {
        Self { config }
    }
}

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, username: &str, password: &str) -> bool {
        self.config.admin().matches(username, password)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::store::MemoryStore;

    use super::*;

    fn verifier() -> PlaintextVerifier {
        // Empty backend falls back to the default admin/otaku2024 credential.
        PlaintextVerifier::new(AdminConfigStore::new(Arc::new(MemoryStore::new())))
    }

    #[test]
    fn test_accepts_default_credential() {
        assert!(verifier().verify("admin", "otaku2024"));
    }

    #[test]
    fn test_rejects_wrong_password() {
        assert!(!verifier().verify("admin", "nope"));
    }

    #[test]
    fn test_rejects_unknown_user() {
        assert!(!verifier().verify("root", "otaku2024"));
    }
}
