//! # gatekit
//!
//! Small authentication/authorization foundation library.
//!
//! This crate provides the contract layer shared by concrete auth backends:
//! - The [`auth::User`] trait — an authenticated identity with a principal,
//!   attributes, expiration checking and delegated authorization checks
//! - The [`auth::AuthProvider`] port that backends implement
//! - A canonical [`auth::BasicUser`] carrier that survives serialization
//! - An in-memory [`auth::StaticAuthProvider`] for tests and prototypes
//!
//! ## Example usage (in another crate)
//!
//! ```rust
//! use gatekit::auth::{BasicUser, User};
//! use gatekit::serde_json::json;
//!
//! let user = BasicUser::new(json!({ "username": "tim" }));
//! assert!(!user.expired());
//! ```
// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use async_trait;
pub use chrono;
pub use dotenvy;
pub use serde;
pub use serde_json;
pub use tracing;
pub use uuid;

// ===============================
// Public modules
// ===============================
pub mod auth;
pub mod config;
pub mod error;
pub mod time;
