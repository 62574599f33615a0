//! Admin credential types.

use serde::{Deserialize, Serialize};

/// The single admin credential record.
///
/// Stored in the config document as `{ "admin": { "username", "password" } }`.
/// The password is kept in plaintext to match the on-disk format; comparison
/// happens behind the server's `CredentialVerifier` so a hashed scheme can be
/// introduced without changing this type's consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminCredential {
    /// Admin login name.
    pub username: String,
    /// Admin password (plaintext, compared verbatim).
    pub password: String,
}

impl AdminCredential {
    /// Check whether the supplied pair matches this credential exactly.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
