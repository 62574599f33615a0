//! Core types for Entre Nous.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;

pub use credential::AdminCredential;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::format_usd;
