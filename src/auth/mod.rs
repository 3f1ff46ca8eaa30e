//! Authentication and authorization contract layer.
//!
//! The [`User`] trait is the center of this module: an authenticated
//! identity that carries a principal and attributes, knows whether it has
//! expired, and delegates authorization checks to an [`AuthProvider`].
//!
//! [`BasicUser`] is the canonical carrier providers hand out, and
//! [`StaticAuthProvider`] is an in-memory provider suitable for tests,
//! prototypes, and fixtures.

pub mod authorization;
pub mod basic_user;
pub mod provider;
pub mod static_provider;
pub mod user;

pub use authorization::AuthorizationSet;
pub use basic_user::BasicUser;
pub use provider::AuthProvider;
pub use static_provider::StaticAuthProvider;
pub use user::{EXPIRES_AT_KEY, User};
