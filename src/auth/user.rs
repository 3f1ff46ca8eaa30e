use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::auth::authorization::AuthorizationSet;
use crate::auth::provider::AuthProvider;
use crate::error::AuthError;
use crate::time::{Clock, SystemClock};

/// Reserved attribute key holding the expiration instant as seconds since
/// the UNIX epoch.
pub const EXPIRES_AT_KEY: &str = "expires_at";

/// An authenticated identity.
///
/// # Overview
///
/// `User` represents the *result of authentication*, not a domain user.
/// It combines four concerns:
///
/// - a **principal**: who was authenticated (e.g. `{"username": "tim"}`)
/// - **attributes**: metadata about the authentication outcome (issue time,
///   expiry time, arbitrary extra claims)
/// - a derived **expiration** check against the reserved `expires_at`
///   attribute
/// - delegated **authorization** checks against the [`AuthProvider`] that
///   issued the identity
///
/// # Design Intent
///
/// - Required methods are the minimal object-safe surface a carrier must
///   supply; everything derivable (`expired*`, `authorizations`,
///   `clear_cache`) is implemented once as a provided method.
/// - What an *authority* string means (a resource permission such as
///   `printers:printer34`, a role such as `role:admin`) is decided by the
///   provider, never by this trait.
/// - Authorization failures travel through the `Err` side of the
///   asynchronous result. Nothing here panics or fails synchronously.
///
/// # Typical Usage
///
/// ```ignore
/// let user = provider.authenticate(&credentials).await?;
/// user.set_auth_provider(provider.clone());
///
/// if user.expired() {
///     return Err(Error::SessionExpired);
/// }
/// if !user.is_authorized("role:admin").await? {
///     return Err(Error::Forbidden);
/// }
/// ```
#[async_trait]
pub trait User: Send + Sync {
    /// Returns the identifying record for the user.
    ///
    /// What this actually contains depends on the provider. For a simple
    /// username/password provider it is likely `{"username": "tim"}`.
    fn principal(&self) -> &Value;

    /// Returns extra attributes of the user.
    ///
    /// Attributes describe the outcome of authenticating the user (issue
    /// date, expiry, metadata, etc.). A user that was issued no attributes
    /// returns an empty JSON object.
    fn attributes(&self) -> &Value;

    /// Asks whether the user holds the given authority.
    ///
    /// Resolution is delegated to the attached [`AuthProvider`]; whether
    /// results are cached between calls is implementation-defined.
    ///
    /// # Errors
    /// Fails with [`AuthError::ProviderDetached`] when no provider is
    /// attached, or with whatever the provider's resolution round trip
    /// produced. Failures are never raised synchronously.
    async fn is_authorized(&self, authority: &str) -> Result<bool, AuthError>;

    /// Drops any cached authorization results, so that subsequent
    /// [`User::is_authorized`] calls re-resolve against the provider.
    ///
    /// Calls already in flight may or may not observe the cleared cache.
    fn invalidate_cache(&self);

    /// Rebinds this user to an auth provider.
    ///
    /// Typically used to reattach a detached user after deserialization.
    /// The provider must be of the same kind as the one that originally
    /// issued the principal; no identity check is performed here, and a
    /// mismatched provider yields undefined authorization results.
    fn set_auth_provider(&self, provider: Arc<dyn AuthProvider>);

    /// Fluent wrapper over [`User::invalidate_cache`], returning the
    /// receiver to allow call chaining.
    fn clear_cache(&self) -> &Self
    where
        Self: Sized,
    {
        self.invalidate_cache();
        self
    }

    /// Returns `true` if this user has expired.
    ///
    /// Equivalent to [`User::expired_with_leeway`] with a leeway of zero.
    fn expired(&self) -> bool {
        self.expired_with_leeway(0)
    }

    /// Returns `true` if this user has expired, tolerating `leeway_secs`
    /// seconds of clock drift between the issuing and the checking system.
    ///
    /// A user is considered expired if its attributes contain a numeric
    /// `expires_at` value and the current clock time, shifted back by the
    /// leeway, is past it. A user without `expires_at` (or without
    /// attributes at all) never expires under this check.
    fn expired_with_leeway(&self, leeway_secs: u64) -> bool {
        self.expired_by(&SystemClock, leeway_secs)
    }

    /// Like [`User::expired_with_leeway`], but reading "now" from the given
    /// [`Clock`]. Useful for deterministic checks.
    fn expired_by(&self, clock: &dyn Clock, leeway_secs: u64) -> bool {
        self.expired_at(clock.now(), leeway_secs)
    }

    /// Evaluates the expiration rule against an explicit instant.
    ///
    /// This is the single place the rule is implemented:
    /// `now - leeway > expires_at`. Fractional timestamps truncate to whole
    /// seconds; a missing or non-numeric `expires_at` means the user does
    /// not expire.
    fn expired_at(&self, now: DateTime<Utc>, leeway_secs: u64) -> bool {
        let expires_at = self
            .attributes()
            .get(EXPIRES_AT_KEY)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));
        match expires_at {
            Some(expires_at) => now.timestamp().saturating_sub_unsigned(leeway_secs) > expires_at,
            None => false,
        }
    }

    /// Returns the authorizations known for this user.
    ///
    /// The default is the empty set; carriers that track resolved
    /// authorities override this.
    fn authorizations(&self) -> AuthorizationSet {
        AuthorizationSet::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    /// A minimal test double carrying only a principal and attributes,
    /// used to exercise the provided methods independently of any concrete
    /// carrier.
    struct StubUser {
        principal: Value,
        attributes: Value,
    }

    impl StubUser {
        fn with_attributes(attributes: Value) -> Self {
            Self {
                principal: json!({ "username": "tim" }),
                attributes,
            }
        }
    }

    #[async_trait]
    impl User for StubUser {
        fn principal(&self) -> &Value {
            &self.principal
        }

        fn attributes(&self) -> &Value {
            &self.attributes
        }

        async fn is_authorized(&self, _authority: &str) -> Result<bool, AuthError> {
            Err(AuthError::ProviderDetached)
        }

        fn invalidate_cache(&self) {}

        fn set_auth_provider(&self, _provider: Arc<dyn AuthProvider>) {}
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    // Around the year 2096; safely within chrono's representable range.
    const FAR_FUTURE: i64 = 4_000_000_000;

    #[test]
    fn user_without_expires_at_never_expires() {
        let user = StubUser::with_attributes(json!({}));

        assert!(!user.expired());
        assert!(!user.expired_at(at(FAR_FUTURE), 0));
        assert!(!user.expired_at(at(FAR_FUTURE), 12_345));
    }

    #[test]
    fn user_is_expired_once_now_is_past_expires_at() {
        let user = StubUser::with_attributes(json!({ "expires_at": 1000 }));

        assert!(user.expired_at(at(2000), 0));
        assert!(!user.expired_at(at(1000), 0));
        assert!(!user.expired_at(at(500), 0));
    }

    #[test]
    fn leeway_shifts_the_check_later() {
        let user = StubUser::with_attributes(json!({ "expires_at": 1000 }));

        // now - leeway = 500, which is not past 1000
        assert!(!user.expired_at(at(1000), 500));
        // now - leeway = 1500, which is past 1000
        assert!(user.expired_at(at(2000), 500));
    }

    #[test]
    fn expired_equals_expired_with_zero_leeway() {
        let live = StubUser::with_attributes(json!({ "expires_at": i64::MAX }));
        let stale = StubUser::with_attributes(json!({ "expires_at": 0 }));

        assert_eq!(live.expired(), live.expired_with_leeway(0));
        assert_eq!(stale.expired(), stale.expired_with_leeway(0));
    }

    #[test]
    fn fractional_expires_at_truncates_to_seconds() {
        let user = StubUser::with_attributes(json!({ "expires_at": 1000.5 }));

        assert!(user.expired_at(at(2000), 0));
        assert!(!user.expired_at(at(1000), 0));
    }

    #[test]
    fn non_numeric_expires_at_is_treated_as_absent() {
        let user = StubUser::with_attributes(json!({ "expires_at": "tomorrow" }));

        assert!(!user.expired_at(at(FAR_FUTURE), 0));
    }

    #[test]
    fn huge_leeway_does_not_underflow() {
        let user = StubUser::with_attributes(json!({ "expires_at": -5 }));

        // Saturating arithmetic: i64::MIN is not past -5.
        assert!(!user.expired_at(at(0), u64::MAX));
    }

    #[test]
    fn expired_by_reads_now_from_the_clock() {
        struct FixedClock(DateTime<Utc>);

        impl Clock for FixedClock {
            fn now(&self) -> DateTime<Utc> {
                self.0
            }
        }

        let user = StubUser::with_attributes(json!({ "expires_at": 1000 }));

        assert!(user.expired_by(&FixedClock(at(2000)), 0));
        assert!(!user.expired_by(&FixedClock(at(999)), 0));
    }

    #[test]
    fn default_authorizations_are_empty() {
        let user = StubUser::with_attributes(json!({}));

        assert!(user.authorizations().is_empty());
    }

    #[test]
    fn clear_cache_returns_the_same_instance() {
        let user = StubUser::with_attributes(json!({}));

        let chained = user.clear_cache().clear_cache();
        assert!(std::ptr::eq(chained, &user));
    }

    #[tokio::test]
    async fn stub_user_reports_detached_provider() {
        let user = StubUser::with_attributes(json!({}));

        let err = user.is_authorized("role:admin").await.unwrap_err();
        assert!(matches!(err, AuthError::ProviderDetached));
    }
}
