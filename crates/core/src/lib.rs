//! Entre Nous Core - Shared types library.
//!
//! This crate provides common types used across the Entre Nous components:
//! - `server` - HTTP API backing the storefront and admin panel
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no file access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
