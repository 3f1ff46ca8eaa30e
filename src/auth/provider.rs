use async_trait::async_trait;
use serde_json::Value;

use crate::auth::basic_user::BasicUser;
use crate::error::AuthError;

/// Port trait for authentication backends.
///
/// This trait represents an **abstraction over identity verification and
/// authority resolution**. Implementations may back it with:
///
/// - an in-memory account table ([`crate::auth::StaticAuthProvider`])
/// - a database of credentials
/// - an external identity service (OAuth, LDAP, etc.)
///
/// ## Design notes
///
/// - The trait is intentionally **minimal**:
///   - Credentials and principals are JSON-shaped records; their schema
///     belongs to the implementation
///   - Both operations return `Result` over [`AuthError`]
///
/// - The trait does **not**:
///   - Decide what an authority string means
///   - Cache resolution results (the user carrier does that)
///   - Retry failed round trips
///
/// ## Thread safety
///
/// Implementations must be:
/// - `Send`: usable across thread boundaries
/// - `Sync`: safely shared via `Arc`
///
/// Users hold their provider as `Arc<dyn AuthProvider>`, so one provider
/// instance typically serves every identity it issued.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verifies the given credentials and mints a user on success.
    ///
    /// The returned [`BasicUser`] is **detached**: callers that want the
    /// user to resolve authorizations must attach the provider afterwards
    /// via [`crate::auth::User::set_auth_provider`].
    ///
    /// ## Errors
    ///
    /// - [`AuthError::MissingCredential`] when a required field is absent
    /// - [`AuthError::InvalidCredentials`] when verification fails
    async fn authenticate(&self, credentials: &Value) -> Result<BasicUser, AuthError>;

    /// Resolves whether the identity behind `principal` holds `authority`.
    ///
    /// This is the primitive that [`crate::auth::User::is_authorized`]
    /// delegates to. The principal must have been issued by this provider
    /// (or one of the same kind); anything else is a caller error with
    /// undefined results.
    async fn resolve_authority(&self, principal: &Value, authority: &str)
    -> Result<bool, AuthError>;
}
