//! # Auth Configuration Loader
//!
//! Provides a unified configuration loader for the auth layer: expiration
//! leeway, token lifetime, and the authorization-result cache toggle.
//!
//! Automatically loads `.env` files for non-production environments.
//! It checks for a custom `DOTENV_FILE` path first, then falls back to
//! `.env.{APP_ENV}` or `.env`.
//!
//! This configuration is typically initialized once at application startup
//! and shared throughout the system.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `APP_ENV` | Current environment (`development`, `production`, etc.) | `"development"` |
//! | `DOTENV_FILE` | Optional path to a custom dotenv file | *none* |
//! | `AUTH_LEEWAY_SECS` | Clock-drift leeway applied to expiration checks (seconds) | `0` |
//! | `AUTH_TOKEN_TTL_SECS` | Lifetime stamped into `expires_at` at authentication | *none* (no expiry) |
//! | `AUTH_CACHE` | Cache authorization results on the user | `true` |
//!
//! # Example
//! ```rust,no_run
//! use gatekit::auth::{BasicUser, User};
//! use gatekit::config::AuthConfig;
//! use gatekit::serde_json::json;
//!
//! let cfg = AuthConfig::from_env();
//!
//! let user = BasicUser::with_attributes(
//!     json!({ "username": "tim" }),
//!     json!({ "expires_at": 1_700_000_000 }),
//! );
//! if user.expired_with_leeway(cfg.leeway_secs) {
//!     println!("session expired");
//! }
//! ```

use std::env;

use crate::config::env::{read_flag, read_u64, read_u64_opt};

/// Auth-layer configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    /// Leeway in seconds applied to expiration checks, to absorb clock
    /// drift between the issuing and the checking system. Callers pass
    /// this to [`crate::auth::User::expired_with_leeway`].
    pub leeway_secs: u64,
    /// Token lifetime in seconds. When present, providers stamp
    /// `expires_at` into the attributes of every user they authenticate.
    pub token_ttl_secs: Option<u64>,
    /// Whether users cache authorization results between checks.
    pub cache_enabled: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            leeway_secs: 0,
            token_ttl_secs: None,
            cache_enabled: true,
        }
    }
}

impl AuthConfig {
    /// Loads auth configuration from environment variables.
    ///
    /// ## Behavior
    /// - Reads `APP_ENV` (defaults to `"development"`).
    /// - Loads `.env` or `.env.{APP_ENV}` for non-production environments.
    /// - Parses all supported environment variables and falls back to
    ///   defaults.
    ///
    /// # Example
    /// ```rust,no_run
    /// use gatekit::config::AuthConfig;
    ///
    /// let cfg = AuthConfig::from_env();
    /// assert!(cfg.leeway_secs < u64::MAX);
    /// ```
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{}", app_env);
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        AuthConfig {
            leeway_secs: read_u64("AUTH_LEEWAY_SECS", 0),
            token_ttl_secs: read_u64_opt("AUTH_TOKEN_TTL_SECS"),
            cache_enabled: read_flag("AUTH_CACHE", true),
        }
    }
}
