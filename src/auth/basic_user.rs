use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::authorization::AuthorizationSet;
use crate::auth::provider::AuthProvider;
use crate::auth::user::User;
use crate::error::AuthError;

fn empty_attributes() -> Value {
    Value::Object(serde_json::Map::new())
}

fn caching_default() -> bool {
    true
}

/// The canonical [`User`] carrier handed out by providers in this crate.
///
/// # Overview
///
/// `BasicUser` is a value: it flows through request-handling code, can be
/// serialized into a session store, and deserialized back later. Two pieces
/// of state deliberately do **not** survive serialization:
///
/// - the **authorization cache** (resolved authority → outcome), and
/// - the **provider back-reference**.
///
/// A deserialized user is therefore *detached*: expiration checks and
/// accessors keep working, but [`User::is_authorized`] fails with
/// [`AuthError::ProviderDetached`] until the user is rebound via
/// [`User::set_auth_provider`].
///
/// # Caching
///
/// Resolved authorization outcomes are cached per authority to avoid
/// hitting the provider on every check. Resolution **failures are not
/// cached**. [`User::invalidate_cache`] (or the fluent
/// [`User::clear_cache`]) drops the cache; checks issued afterwards
/// re-resolve. Caching can be disabled entirely with
/// [`BasicUser::caching`], in which case every check goes to the provider.
///
/// # Example
///
/// ```
/// use gatekit::auth::{BasicUser, User};
/// use gatekit::serde_json::json;
///
/// let user = BasicUser::with_attributes(
///     json!({ "username": "tim" }),
///     json!({ "expires_at": 0 }),
/// );
///
/// assert_eq!(user.principal()["username"], "tim");
/// assert!(user.expired());
/// ```
#[derive(Serialize, Deserialize)]
pub struct BasicUser {
    principal: Value,
    #[serde(default = "empty_attributes")]
    attributes: Value,
    #[serde(default = "caching_default")]
    caching: bool,
    #[serde(skip)]
    cache: Mutex<HashMap<String, bool>>,
    #[serde(skip)]
    provider: RwLock<Option<Arc<dyn AuthProvider>>>,
}

impl BasicUser {
    /// Creates a detached user from a principal, with no attributes.
    ///
    /// # Example
    /// ```
    /// use gatekit::auth::{BasicUser, User};
    /// use gatekit::serde_json::json;
    ///
    /// let user = BasicUser::new(json!({ "username": "tim" }));
    /// assert_eq!(user.attributes(), &json!({}));
    /// assert!(!user.expired());
    /// ```
    pub fn new(principal: Value) -> Self {
        Self::with_attributes(principal, empty_attributes())
    }

    /// Creates a detached user from a principal and attributes.
    pub fn with_attributes(principal: Value, attributes: Value) -> Self {
        Self {
            principal,
            attributes,
            caching: true,
            cache: Mutex::new(HashMap::new()),
            provider: RwLock::new(None),
        }
    }

    /// Enables or disables caching of authorization outcomes, returning the
    /// user to allow chaining during construction.
    ///
    /// Disabling the cache also drops anything already cached.
    #[must_use]
    pub fn caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        if !enabled {
            self.cache_lock().clear();
        }
        self
    }

    /// Returns `true` if no provider is currently attached.
    pub fn is_detached(&self) -> bool {
        self.provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn cache_lock(&self) -> MutexGuard<'_, HashMap<String, bool>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_provider(&self) -> Option<Arc<dyn AuthProvider>> {
        self.provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl User for BasicUser {
    fn principal(&self) -> &Value {
        &self.principal
    }

    fn attributes(&self) -> &Value {
        &self.attributes
    }

    async fn is_authorized(&self, authority: &str) -> Result<bool, AuthError> {
        if self.caching {
            if let Some(cached) = self.cache_lock().get(authority).copied() {
                debug!(authority, granted = cached, "authorization cache hit");
                return Ok(cached);
            }
        }

        let Some(provider) = self.current_provider() else {
            warn!(authority, "authorization check on a detached user");
            return Err(AuthError::ProviderDetached);
        };

        let granted = provider.resolve_authority(&self.principal, authority).await?;
        debug!(authority, granted, "authorization resolved by provider");

        if self.caching {
            self.cache_lock().insert(authority.to_string(), granted);
        }
        Ok(granted)
    }

    fn invalidate_cache(&self) {
        self.cache_lock().clear();
    }

    fn set_auth_provider(&self, provider: Arc<dyn AuthProvider>) {
        *self
            .provider
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(provider);
    }

    /// Reports the authorities this user is currently known to hold, i.e.
    /// those resolved to "granted" and still present in the cache.
    fn authorizations(&self) -> AuthorizationSet {
        self.cache_lock()
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(authority, _)| authority.clone())
            .collect()
    }
}

impl Clone for BasicUser {
    fn clone(&self) -> Self {
        Self {
            principal: self.principal.clone(),
            attributes: self.attributes.clone(),
            caching: self.caching,
            cache: Mutex::new(self.cache_lock().clone()),
            provider: RwLock::new(self.current_provider()),
        }
    }
}

impl fmt::Debug for BasicUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicUser")
            .field("principal", &self.principal)
            .field("attributes", &self.attributes)
            .field("caching", &self.caching)
            .field("detached", &self.is_detached())
            .finish_non_exhaustive()
    }
}
