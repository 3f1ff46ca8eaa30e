use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A resolvable collection of granted authorities.
///
/// # Overview
/// Authorities are free-form strings; whether one denotes a resource
/// permission (`printers:printer34`) or a role (`role:admin`) is decided
/// by the provider that granted it. This type only records membership.
///
/// The set is ordered, so iteration and serialization are deterministic.
///
/// # Example
/// ```
/// use gatekit::auth::AuthorizationSet;
///
/// let auths = AuthorizationSet::new()
///     .grant("role:admin")
///     .grant("printers:printer34");
///
/// assert!(auths.verify("role:admin"));
/// assert!(!auths.verify("role:root"));
/// assert_eq!(auths.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationSet {
    granted: BTreeSet<String>,
}

impl AuthorizationSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an authority to the set.
    pub fn add(&mut self, authority: impl Into<String>) {
        self.granted.insert(authority.into());
    }

    /// Adds an authority, returning the set to allow chaining.
    #[must_use]
    pub fn grant(mut self, authority: impl Into<String>) -> Self {
        self.add(authority);
        self
    }

    /// Returns `true` if the given authority has been granted.
    pub fn verify(&self, authority: &str) -> bool {
        self.granted.contains(authority)
    }

    /// Number of granted authorities.
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    /// Returns `true` if nothing has been granted.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Iterates over the granted authorities in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.granted.iter().map(String::as_str)
    }
}

impl FromIterator<String> for AuthorizationSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl Extend<String> for AuthorizationSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.granted.extend(iter);
    }
}
