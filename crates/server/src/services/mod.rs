//! Background services: credential verification and email notification.

pub mod auth;
pub mod notifier;

pub use auth::{CredentialVerifier, PlaintextVerifier};
pub use notifier::{NotificationReport, Notifier};
