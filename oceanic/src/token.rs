//! Shared bearer-token storage.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// The bearer token shared by a client root and every endpoint, item and
/// page cursor it produces.
///
/// Clones share one slot, so setting the token after the client is built
/// is visible to everything created from it.
///
/// ## Examples
///
/// ```
/// use oceanic::TokenStore;
///
/// let store = TokenStore::default();
/// let shared = store.clone();
/// assert!(shared.get().is_none());
///
/// store.set("dop_v1_abc");
/// assert_eq!(shared.get().as_deref(), Some("dop_v1_abc"));
/// ```
#[derive(Clone, Default)]
pub struct TokenStore(Arc<RwLock<Option<String>>>);

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenStore")
            .field(&if self.is_set() { "<set>" } else { "<unset>" })
            .finish()
    }
}

impl TokenStore {
    /// Creates a store holding `token`.
    pub fn new(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(token);
        store
    }

    /// Reads the first variable of `chain` that is set and non-empty.
    pub fn from_env<S: AsRef<str>>(chain: &[S]) -> Self {
        let store = Self::default();
        if let Some(token) = chain
            .iter()
            .filter_map(|name| std::env::var(name.as_ref()).ok())
            .find(|value| !value.trim().is_empty())
        {
            store.set(token);
        }
        store
    }

    /// Replaces the token.
    pub fn set(&self, token: impl Into<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Removes the token.
    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the current token.
    pub fn get(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` when a token is set.
    pub fn is_set(&self) -> bool {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
