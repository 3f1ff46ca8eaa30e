//! Configuration loading.
//!
//! - [`env`]: helpers for reading typed environment variables
//! - [`auth`]: the [`auth::AuthConfig`] loader used by providers and callers

pub mod auth;
pub mod env;

pub use auth::AuthConfig;
