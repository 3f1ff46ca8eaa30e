//! Common error types shared across the crate.

pub mod auth;

pub use auth::AuthError;
