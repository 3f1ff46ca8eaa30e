use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::auth::basic_user::BasicUser;
use crate::auth::provider::AuthProvider;
use crate::auth::user::EXPIRES_AT_KEY;
use crate::config::AuthConfig;
use crate::error::AuthError;

#[derive(Default)]
struct Account {
    password: Option<String>,
    authorities: BTreeSet<String>,
}

/// An [`AuthProvider`] backed by an in-memory account table.
///
/// # Overview
///
/// `StaticAuthProvider` verifies username/password credentials against a
/// table built up-front and resolves authorities by exact membership. It is
/// meant for tests, prototypes, and fixtures; production systems supply
/// their own [`AuthProvider`] implementation.
///
/// Credentials are expected as `{"username": .., "password": ..}` and the
/// minted principal is `{"username": ..}`. Attributes carry `iat` (seconds
/// since the UNIX epoch), a random `auth_id`, and `expires_at` when a token
/// TTL is configured.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gatekit::auth::{AuthProvider, StaticAuthProvider, User};
/// use gatekit::serde_json::json;
///
/// # async fn demo() -> Result<(), gatekit::error::AuthError> {
/// let provider = Arc::new(
///     StaticAuthProvider::new()
///         .account("tim", "sausages")
///         .grant("tim", "role:admin"),
/// );
///
/// let user = provider
///     .authenticate(&json!({ "username": "tim", "password": "sausages" }))
///     .await?;
/// user.set_auth_provider(provider.clone());
///
/// assert!(user.is_authorized("role:admin").await?);
/// # Ok(())
/// # }
/// ```
pub struct StaticAuthProvider {
    accounts: HashMap<String, Account>,
    token_ttl_secs: Option<u64>,
    caching: bool,
}

impl Default for StaticAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticAuthProvider {
    /// Creates an empty provider with caching enabled and no token TTL.
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            token_ttl_secs: None,
            caching: true,
        }
    }

    /// Creates a provider honoring the TTL and cache settings of the given
    /// configuration.
    pub fn from_config(cfg: &AuthConfig) -> Self {
        Self {
            accounts: HashMap::new(),
            token_ttl_secs: cfg.token_ttl_secs,
            caching: cfg.cache_enabled,
        }
    }

    /// Sets the token lifetime stamped into `expires_at` at authentication.
    #[must_use]
    pub fn with_token_ttl(mut self, secs: u64) -> Self {
        self.token_ttl_secs = Some(secs);
        self
    }

    /// Registers an account with the given password.
    ///
    /// Registering the same username again replaces the password but keeps
    /// any authorities already granted.
    #[must_use]
    pub fn account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.accounts.entry(username.into()).or_default().password = Some(password.into());
        self
    }

    /// Grants an authority to a username.
    ///
    /// The username does not need a password yet; until one is set via
    /// [`StaticAuthProvider::account`], authentication for it fails.
    #[must_use]
    pub fn grant(
        mut self,
        username: impl Into<String>,
        authority: impl Into<String>,
    ) -> Self {
        self.accounts
            .entry(username.into())
            .or_default()
            .authorities
            .insert(authority.into());
        self
    }

    fn credential<'a>(
        credentials: &'a Value,
        field: &'static str,
    ) -> Result<&'a str, AuthError> {
        credentials
            .get(field)
            .and_then(Value::as_str)
            .ok_or(AuthError::MissingCredential(field))
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn authenticate(&self, credentials: &Value) -> Result<BasicUser, AuthError> {
        let username = Self::credential(credentials, "username")?;
        let password = Self::credential(credentials, "password")?;

        // Unknown accounts and wrong passwords are indistinguishable.
        let matches = self
            .accounts
            .get(username)
            .and_then(|account| account.password.as_deref())
            .is_some_and(|expected| expected == password);
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now().timestamp();
        let mut attributes = serde_json::Map::new();
        attributes.insert("iat".into(), json!(now));
        attributes.insert("auth_id".into(), json!(Uuid::new_v4()));
        if let Some(ttl) = self.token_ttl_secs {
            attributes.insert(
                EXPIRES_AT_KEY.into(),
                json!(now.saturating_add_unsigned(ttl)),
            );
        }

        debug!(username, "authenticated against static account table");
        Ok(
            BasicUser::with_attributes(json!({ "username": username }), Value::Object(attributes))
                .caching(self.caching),
        )
    }

    async fn resolve_authority(
        &self,
        principal: &Value,
        authority: &str,
    ) -> Result<bool, AuthError> {
        let username = principal
            .get("username")
            .and_then(Value::as_str)
            .ok_or(AuthError::MalformedPrincipal("username"))?;

        let account = self
            .accounts
            .get(username)
            .ok_or_else(|| AuthError::UnknownPrincipal(username.to_string()))?;

        Ok(account.authorities.contains(authority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::user::User;

    fn provider() -> StaticAuthProvider {
        StaticAuthProvider::new()
            .account("tim", "sausages")
            .grant("tim", "role:admin")
            .grant("tim", "printers:printer34")
    }

    fn good_credentials() -> Value {
        json!({ "username": "tim", "password": "sausages" })
    }

    #[tokio::test]
    async fn authenticate_mints_a_user_with_expected_shape() {
        let user = provider().authenticate(&good_credentials()).await.unwrap();

        assert_eq!(user.principal(), &json!({ "username": "tim" }));
        assert!(user.attributes()["iat"].is_i64());
        assert!(
            user.attributes()["auth_id"]
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .is_some()
        );
        // No TTL configured, so the user never expires.
        assert!(user.attributes().get(EXPIRES_AT_KEY).is_none());
        assert!(!user.expired());
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let err = provider()
            .authenticate(&json!({ "username": "tim", "password": "bangers" }))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_account_identically() {
        let err = provider()
            .authenticate(&json!({ "username": "bob", "password": "sausages" }))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticate_reports_which_credential_is_missing() {
        let err = provider()
            .authenticate(&json!({ "username": "tim" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential("password")));

        let err = provider().authenticate(&json!({})).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredential("username")));
    }

    #[tokio::test]
    async fn grant_before_account_leaves_login_disabled() {
        let p = StaticAuthProvider::new().grant("ghost", "role:admin");

        let err = p
            .authenticate(&json!({ "username": "ghost", "password": "" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        // The grant is still visible through resolution.
        assert!(
            p.resolve_authority(&json!({ "username": "ghost" }), "role:admin")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn default_provider_behaves_like_new() {
        let p = StaticAuthProvider::default().account("tim", "sausages");
        let user = p.authenticate(&good_credentials()).await.unwrap();

        // A default-constructed provider mints caching users, exactly as
        // a `new()`-constructed one does.
        let rendered = format!("{user:?}");
        assert!(rendered.contains("caching: true"));
        assert_eq!(p.token_ttl_secs, StaticAuthProvider::new().token_ttl_secs);
    }

    #[tokio::test]
    async fn token_ttl_stamps_a_future_expires_at() {
        let p = provider().with_token_ttl(3600);
        let user = p.authenticate(&good_credentials()).await.unwrap();

        let iat = user.attributes()["iat"].as_i64().unwrap();
        let expires_at = user.attributes()[EXPIRES_AT_KEY].as_i64().unwrap();

        assert_eq!(expires_at, iat + 3600);
        assert!(!user.expired());
    }

    #[tokio::test]
    async fn resolve_authority_checks_exact_membership() {
        let p = provider();
        let principal = json!({ "username": "tim" });

        assert!(p.resolve_authority(&principal, "role:admin").await.unwrap());
        assert!(
            p.resolve_authority(&principal, "printers:printer34")
                .await
                .unwrap()
        );
        assert!(!p.resolve_authority(&principal, "role:root").await.unwrap());
    }

    #[tokio::test]
    async fn resolve_authority_rejects_foreign_principals() {
        let p = provider();

        let err = p
            .resolve_authority(&json!({ "sub": "tim" }), "role:admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedPrincipal("username")));

        let err = p
            .resolve_authority(&json!({ "username": "bob" }), "role:admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownPrincipal(name) if name == "bob"));
    }

    #[tokio::test]
    async fn from_config_applies_ttl_and_cache_settings() {
        let cfg = AuthConfig {
            leeway_secs: 0,
            token_ttl_secs: Some(60),
            cache_enabled: false,
        };

        let p = StaticAuthProvider::from_config(&cfg).account("tim", "sausages");
        let user = p.authenticate(&good_credentials()).await.unwrap();

        assert!(user.attributes()[EXPIRES_AT_KEY].is_i64());
    }

    #[tokio::test]
    async fn full_flow_authenticate_attach_and_authorize() {
        let p = Arc::new(provider());

        let user = p.authenticate(&good_credentials()).await.unwrap();
        assert!(user.is_detached());

        user.set_auth_provider(p.clone());
        assert!(user.is_authorized("role:admin").await.unwrap());
        assert!(!user.is_authorized("role:root").await.unwrap());

        let auths = user.authorizations();
        assert!(auths.verify("role:admin"));
        assert_eq!(auths.len(), 1);
    }
}
