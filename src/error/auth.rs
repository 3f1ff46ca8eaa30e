use thiserror::Error;

/// Errors produced by authentication and authorization resolution.
///
/// This error is shared by the [`crate::auth::User`] contract and every
/// [`crate::auth::AuthProvider`] implementation. It deliberately stays
/// infrastructure-agnostic: transport-level failures of a concrete provider
/// (network, timeouts, backend protocol errors) are folded into
/// [`AuthError::Resolution`] or carried verbatim via [`AuthError::Other`].
///
/// # Design
/// - Authorization failures are always delivered through the `Err` side of
///   the asynchronous result; nothing at this layer panics.
/// - `InvalidCredentials` intentionally does not distinguish an unknown
///   account from a wrong password.
///
/// # Example
/// ```
/// use gatekit::error::AuthError;
///
/// let err = AuthError::ProviderDetached;
/// assert_eq!(err.to_string(), "no auth provider attached to this user");
/// ```
#[derive(Debug, Error)]
pub enum AuthError {
    /// The user has no auth provider attached (e.g. it was deserialized and
    /// never rebound via `set_auth_provider`).
    #[error("no auth provider attached to this user")]
    ProviderDetached,

    /// The supplied credentials record lacks a required field.
    #[error("missing credential field `{0}`")]
    MissingCredential(&'static str),

    /// The supplied credentials do not match any account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The principal record lacks a field the provider needs to resolve it.
    #[error("principal has no `{0}` field")]
    MalformedPrincipal(&'static str),

    /// The principal is well-formed but names an identity the provider does
    /// not know.
    #[error("unknown principal `{0}`")]
    UnknownPrincipal(String),

    /// The authority-resolution round trip itself failed.
    #[error("authority resolution failed: {0}")]
    Resolution(String),

    /// Any other provider-specific failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
