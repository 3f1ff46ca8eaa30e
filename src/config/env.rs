//! # Environment Variable Utilities
//!
//! Provides helpers for reading environment variables with common type conversions.
//! Includes parsing for boolean flags and numeric values with fallback defaults.
//!
//! These functions are typically used in configuration loading (e.g. `AuthConfig`).
//!
//! # Examples
//! ```rust,no_run
//! use gatekit::config::env::{read_flag, read_u64};
//!
//! let cache = read_flag("AUTH_CACHE", true);
//! let leeway = read_u64("AUTH_LEEWAY_SECS", 0);
//! ```

/// Reads a boolean flag from an environment variable.
///
/// Returns `true` for any of the following case-insensitive values:
/// `"1"`, `"true"`, `"yes"`, `"on"`.
///
/// # Example
/// ```rust,no_run
/// use gatekit::config::env::{read_flag, read_flag_from};
///
/// assert!(read_flag_from(|_| Some("yes".into()), "AUTH_CACHE", false));
/// ```
pub fn read_flag(name: &str, default: bool) -> bool {
    read_flag_from(|k| std::env::var(k).ok(), name, default)
}

/// Reads a boolean flag using a custom provider function.
///
/// Useful for testing or mocking environment sources.
///
/// # Example
/// ```rust
/// use gatekit::config::env::read_flag_from;
///
/// let val = read_flag_from(|_| Some("true".into()), "ENABLE_FEATURE", false);
/// assert!(val);
/// ```
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => {
            let s = v.trim().trim_matches(|c| c == '"' || c == '\'');
            matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        None => default,
    }
}

/// Reads an unsigned integer (`u64`) from an environment variable,
/// returning the provided default if parsing fails.
///
/// # Example
/// ```rust,no_run
/// use gatekit::config::env::read_u64;
///
/// let ttl = read_u64("AUTH_TOKEN_TTL_SECS", 3600);
/// ```
pub fn read_u64(name: &str, default: u64) -> u64 {
    read_u64_opt(name).unwrap_or(default)
}

/// Reads an optional unsigned integer (`u64`) from an environment variable.
///
/// Returns `None` when the variable is missing or unparseable.
pub fn read_u64_opt(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
}
