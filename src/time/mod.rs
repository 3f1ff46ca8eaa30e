//! Time ports and implementations.
//!
//! Expiration checks on [`crate::auth::User`] are computed against "now".
//! The [`Clock`] port keeps that comparison testable and deterministic.

pub mod clock;
pub mod system_clock;

pub use clock::Clock;
pub use system_clock::SystemClock;
