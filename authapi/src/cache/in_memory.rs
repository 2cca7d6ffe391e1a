//! An in-memory token caching layer

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use authapi_clock::{Clock, DurationSecs, System, UnixTime};

use super::{CacheError, TokenCache};
use crate::AuthToken;

#[derive(Debug)]
struct CacheEntry {
    token: Arc<AuthToken>,
    expiry: UnixTime,
}

/// An in-memory token cache
///
/// Expired entries are reported as misses but stay in memory until they are
/// deleted or overwritten.
#[derive(Debug)]
pub struct InMemoryTokenCache<C = System> {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: C,
}

impl InMemoryTokenCache {
    /// Constructs a new, empty in-memory token cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: System,
        }
    }
}

impl Default for InMemoryTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTokenCache<C> {
    /// Sets a custom clock to be used for expiry
    ///
    /// Useful for testing purposes
    pub fn with_clock<D>(self, clock: D) -> InMemoryTokenCache<D> {
        InMemoryTokenCache {
            entries: Mutex::new(
                self.entries
                    .into_inner()
                    .unwrap_or_else(PoisonError::into_inner),
            ),
            clock,
        }
    }

    /// The number of stored entries, including expired ones
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // A panic while holding the lock cannot leave a half-written entry behind
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> TokenCache for InMemoryTokenCache<C> {
    async fn get(&self, key: &str) -> Result<Option<Arc<AuthToken>>, CacheError> {
        let now = self.clock.now();
        let token = self
            .entries()
            .get(key)
            .filter(|entry| now < entry.expiry)
            .map(|entry| Arc::clone(&entry.token));
        Ok(token)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }

    async fn put(
        &self,
        key: &str,
        token: Arc<AuthToken>,
        ttl: DurationSecs,
    ) -> Result<(), CacheError> {
        let expiry = self.clock.now() + ttl;
        self.entries()
            .insert(key.to_owned(), CacheEntry { token, expiry });
        Ok(())
    }
}
