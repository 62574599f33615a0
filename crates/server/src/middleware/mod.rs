//! Request middleware: the Basic Auth gate for admin routes.

pub mod basic_auth;

pub use basic_auth::RequireAdmin;
