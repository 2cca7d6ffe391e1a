//! Read-through caching of tokens

use std::{error, sync::Arc};

use async_trait::async_trait;
use authapi_clock::DurationSecs;
use sha2::{Digest, Sha256};

use crate::{
    decorator::Decorator, log_at, AuthApi, AuthApiError, AuthToken, BoxError, LogLevels,
};

mod in_memory;

pub use in_memory::InMemoryTokenCache;

/// The error type reported by token caches
pub type CacheError = BoxError;

/// A key/value store for tokens with time-to-live expiry
///
/// Expiry is the store's responsibility: once an entry's TTL has elapsed,
/// `get` must report a miss.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Looks up the token stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Arc<AuthToken>>, CacheError>;

    /// Removes any entry stored under `key`
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Stores `token` under `key` for `ttl`
    async fn put(&self, key: &str, token: Arc<AuthToken>, ttl: DurationSecs)
        -> Result<(), CacheError>;
}

#[async_trait]
impl<T: TokenCache + ?Sized> TokenCache for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Arc<AuthToken>>, CacheError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key).await
    }

    async fn put(
        &self,
        key: &str,
        token: Arc<AuthToken>,
        ttl: DurationSecs,
    ) -> Result<(), CacheError> {
        (**self).put(key, token, ttl).await
    }
}

/// Derives the cache key for a pair of credentials
///
/// The key is the lowercase hex SHA-256 digest of the username immediately
/// followed by the password, always 64 characters long. There is no
/// delimiter, so `("ab", "c")` and `("a", "bc")` share a key; this keeps
/// keys compatible with entries written by other AuthApi clients.
pub fn cache_key(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A decorator that serves `get_token` from a [`TokenCache`]
///
/// Only `get_token` is cached. `login` and `refresh` always reach the
/// decorated client. Concurrent misses for the same credentials may each
/// call the decorated client; the last token stored wins.
#[derive(Debug)]
pub struct CachedAuthApi<A, S> {
    decorator: Decorator<A>,
    cache: S,
    log_levels: LogLevels,
}

impl<A, S> CachedAuthApi<A, S> {
    /// Wraps `client`, caching its tokens in `cache`
    pub fn new(client: A, cache: S) -> Self {
        Self {
            decorator: Decorator::new(client),
            cache,
            log_levels: LogLevels::default(),
        }
    }

    /// Sets the levels at which cache hits and stores are reported
    pub fn with_log_levels(mut self, log_levels: LogLevels) -> Self {
        self.log_levels = log_levels;
        self
    }

    /// Replaces the token cache, returning the previous one
    pub fn set_cache(&mut self, cache: S) -> S {
        std::mem::replace(&mut self.cache, cache)
    }

    /// Replaces the decorated client, returning the previous one
    pub fn set_client(&mut self, client: A) -> A {
        self.decorator.set_inner(client)
    }

    /// The token cache
    pub fn cache(&self) -> &S {
        &self.cache
    }

    /// The decorated client
    pub fn client(&self) -> &A {
        self.decorator.inner()
    }
}

#[async_trait]
impl<A: AuthApi, S: TokenCache> AuthApi for CachedAuthApi<A, S> {
    async fn get_token(
        &self,
        username: &str,
        password: &str,
        refresh: bool,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        let key = cache_key(username, password);

        match self.cache.get(&key).await {
            Ok(Some(token)) => {
                log_at!(self.log_levels.success(), "token found in cache");
                return Ok(token);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    error = (&*error as &dyn error::Error),
                    "token cache lookup failed, treating as a miss"
                );
            }
        }

        tracing::debug!("token not found in cache or stale, deleting cache entry");
        if let Err(error) = self.cache.delete(&key).await {
            tracing::warn!(
                error = (&*error as &dyn error::Error),
                "unable to delete stale cache entry"
            );
        }

        let token = self.decorator.get_token(username, password, refresh).await?;

        let ttl = token.lifetime();
        log_at!(self.log_levels.success(), ttl = ttl.0, "storing token in cache");
        if let Err(error) = self.cache.put(&key, Arc::clone(&token), ttl).await {
            tracing::warn!(
                error = (&*error as &dyn error::Error),
                "unable to store token in cache"
            );
        }

        Ok(token)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        self.decorator.login(username, password).await
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        self.decorator.refresh(token).await
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Mutex};

    use authapi_clock::{TestClock, UnixTime};
    use tracing::Level;
    use tracing_test::traced_test;

    use super::*;
    use crate::test_util::{ScriptedAuthApi, LOGIN_LIFETIME, REFRESH_LIFETIME};

    /// Records every cache operation before passing it on
    #[derive(Debug, Default)]
    struct RecordingCache {
        inner: InMemoryTokenCache,
        ops: Mutex<Vec<String>>,
    }

    impl RecordingCache {
        fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }

        fn record(&self, op: String) {
            self.ops.lock().unwrap().push(op);
        }
    }

    #[async_trait]
    impl TokenCache for RecordingCache {
        async fn get(&self, key: &str) -> Result<Option<Arc<AuthToken>>, CacheError> {
            self.record(format!("get {}", key));
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.record(format!("delete {}", key));
            self.inner.delete(key).await
        }

        async fn put(
            &self,
            key: &str,
            token: Arc<AuthToken>,
            ttl: DurationSecs,
        ) -> Result<(), CacheError> {
            self.record(format!("put {} {}", key, ttl));
            self.inner.put(key, token, ttl).await
        }
    }

    /// A cache whose backing store is always unavailable
    #[derive(Debug)]
    struct BrokenCache;

    fn unavailable() -> CacheError {
        io::Error::new(io::ErrorKind::Other, "cache unavailable").into()
    }

    #[async_trait]
    impl TokenCache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<Arc<AuthToken>>, CacheError> {
            Err(unavailable())
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(unavailable())
        }

        async fn put(
            &self,
            _key: &str,
            _token: Arc<AuthToken>,
            _ttl: DurationSecs,
        ) -> Result<(), CacheError> {
            Err(unavailable())
        }
    }

    mod cache_key {
        use super::*;

        #[test]
        fn is_the_sha256_hex_of_username_then_password() {
            assert_eq!(
                cache_key("a", "bc"),
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            );
            assert_eq!(
                cache_key("", ""),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn is_64_lowercase_hex_characters() {
            let key = cache_key("username", "password");
            assert_eq!(key.len(), 64);
            assert!(key
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }

        #[test]
        fn is_stable_across_calls() {
            assert_eq!(cache_key("alice", "secret"), cache_key("alice", "secret"));
        }

        #[test]
        fn differs_between_credential_pairs() {
            let keys = [
                cache_key("alice", "secret"),
                cache_key("alice", "Secret"),
                cache_key("bob", "secret"),
                cache_key("secret", "alice"),
            ];
            for (i, a) in keys.iter().enumerate() {
                for b in &keys[i + 1..] {
                    assert_ne!(a, b);
                }
            }
        }

        #[test]
        fn does_not_separate_username_from_password() {
            assert_eq!(cache_key("ab", "c"), cache_key("a", "bc"));
        }
    }

    mod when_token_is_in_cache {
        use super::*;

        #[tokio::test]
        async fn returns_the_cached_token_without_calling_the_client() {
            for refresh in [false, true] {
                let inner = ScriptedAuthApi::new();
                let cache = InMemoryTokenCache::new();
                let cached = Arc::new(AuthToken::new("foobar", DurationSecs(60)));
                cache
                    .put(&cache_key("username", "password"), Arc::clone(&cached), DurationSecs(60))
                    .await
                    .unwrap();

                let sut = CachedAuthApi::new(Arc::clone(&inner), cache);
                let token = sut.get_token("username", "password", refresh).await.unwrap();

                assert!(Arc::ptr_eq(&token, &cached));
                assert_eq!(token.content().as_str(), "foobar");
                assert_eq!(inner.get_token_calls(), 0);
                assert_eq!(inner.login_calls(), 0);
            }
        }

        #[tokio::test]
        #[traced_test]
        async fn reports_the_hit_at_the_success_level() {
            let cache = InMemoryTokenCache::new();
            cache
                .put(
                    &cache_key("username", "password"),
                    Arc::new(AuthToken::new("foobar", DurationSecs(60))),
                    DurationSecs(60),
                )
                .await
                .unwrap();

            let sut = CachedAuthApi::new(ScriptedAuthApi::new(), cache)
                .with_log_levels(LogLevels::default().with_success(Level::WARN));
            sut.get_token("username", "password", false).await.unwrap();

            logs_assert(|lines: &[&str]| {
                lines
                    .iter()
                    .find(|line| line.contains("token found in cache"))
                    .filter(|line| line.contains("WARN"))
                    .map(|_| ())
                    .ok_or_else(|| "no WARN cache hit event".to_owned())
            });
        }
    }

    mod when_token_is_not_in_cache {
        use super::*;

        #[tokio::test]
        async fn deletes_then_delegates_then_stores_with_the_token_lifetime() {
            let inner = ScriptedAuthApi::new();
            let cache = Arc::new(RecordingCache::default());
            let sut = CachedAuthApi::new(Arc::clone(&inner), Arc::clone(&cache));

            let token = sut.get_token("username", "password", false).await.unwrap();

            assert_eq!(token.content().as_str(), "login:username");
            assert_eq!(inner.get_token_calls(), 1);

            let key = cache_key("username", "password");
            assert_eq!(
                cache.ops(),
                vec![
                    format!("get {}", key),
                    format!("delete {}", key),
                    format!("put {} {}", key, LOGIN_LIFETIME),
                ]
            );
        }

        #[tokio::test]
        async fn passes_the_refresh_flag_through() {
            let inner = ScriptedAuthApi::new();
            let cache = Arc::new(RecordingCache::default());
            let sut = CachedAuthApi::new(Arc::clone(&inner), Arc::clone(&cache));

            let token = sut.get_token("username", "password", true).await.unwrap();

            assert_eq!(token.content().as_str(), "refresh:login:username");
            assert_eq!(inner.refreshed(), vec!["login:username".to_owned()]);
            assert!(cache
                .ops()
                .last()
                .unwrap()
                .ends_with(&REFRESH_LIFETIME.to_string()));
        }

        #[tokio::test]
        async fn serves_the_next_call_from_the_cache() {
            let inner = ScriptedAuthApi::new();
            let sut = CachedAuthApi::new(Arc::clone(&inner), InMemoryTokenCache::new());

            let first = sut.get_token("username", "password", false).await.unwrap();
            let second = sut.get_token("username", "password", false).await.unwrap();

            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(inner.get_token_calls(), 1);
        }

        #[tokio::test]
        async fn keeps_credentials_apart() {
            let inner = ScriptedAuthApi::new();
            let sut = CachedAuthApi::new(Arc::clone(&inner), InMemoryTokenCache::new());

            let alice = sut.get_token("alice", "pw", false).await.unwrap();
            let bob = sut.get_token("bob", "pw", false).await.unwrap();

            assert_eq!(alice.content().as_str(), "login:alice");
            assert_eq!(bob.content().as_str(), "login:bob");
            assert_eq!(inner.get_token_calls(), 2);
        }

        #[tokio::test]
        async fn calls_the_client_again_once_the_ttl_elapses() {
            let clock = TestClock::new(UnixTime(1_000));
            let inner = ScriptedAuthApi::new();
            let sut = CachedAuthApi::new(
                Arc::clone(&inner),
                InMemoryTokenCache::new().with_clock(clock.clone()),
            );

            sut.get_token("username", "password", false).await.unwrap();
            clock.advance(DurationSecs(LOGIN_LIFETIME.0 - 1));
            sut.get_token("username", "password", false).await.unwrap();
            assert_eq!(inner.get_token_calls(), 1);

            clock.advance(DurationSecs(1));
            sut.get_token("username", "password", false).await.unwrap();
            assert_eq!(inner.get_token_calls(), 2);
        }

        #[tokio::test]
        async fn stores_nothing_when_the_client_fails() {
            let inner = ScriptedAuthApi::failing();
            let cache = Arc::new(RecordingCache::default());
            let sut = CachedAuthApi::new(Arc::clone(&inner), Arc::clone(&cache));

            let err = sut.get_token("username", "password", false).await.unwrap_err();

            assert!(err.is_request());
            assert!(cache.ops().iter().all(|op| !op.starts_with("put")));
            assert!(cache.inner.is_empty());
        }

        #[tokio::test]
        #[traced_test]
        async fn reports_the_stored_ttl() {
            let sut = CachedAuthApi::new(ScriptedAuthApi::new(), InMemoryTokenCache::new());
            sut.get_token("username", "password", false).await.unwrap();

            assert!(logs_contain("storing token in cache"));
            assert!(logs_contain(&format!("ttl={}", LOGIN_LIFETIME.0)));
        }
    }

    mod when_cache_is_unavailable {
        use super::*;

        #[tokio::test]
        #[traced_test]
        async fn falls_back_to_the_client() {
            let inner = ScriptedAuthApi::new();
            let sut = CachedAuthApi::new(Arc::clone(&inner), BrokenCache);

            let token = sut.get_token("username", "password", false).await.unwrap();

            assert_eq!(token.content().as_str(), "login:username");
            assert_eq!(inner.get_token_calls(), 1);
            assert!(logs_contain("token cache lookup failed"));
            assert!(logs_contain("unable to store token in cache"));
        }
    }

    mod when_login_or_refresh_is_called_directly {
        use super::*;

        #[tokio::test]
        async fn bypasses_the_cache() {
            let inner = ScriptedAuthApi::new();
            let cache = Arc::new(RecordingCache::default());
            let sut = CachedAuthApi::new(Arc::clone(&inner), Arc::clone(&cache));

            let login = sut.login("username", "password").await.unwrap();
            let refreshed = sut.refresh(&login).await.unwrap();

            assert_eq!(refreshed.content().as_str(), "refresh:login:username");
            assert_eq!(inner.login_calls(), 1);
            assert_eq!(inner.get_token_calls(), 0);
            assert!(cache.ops().is_empty());
        }
    }

    #[tokio::test]
    async fn set_cache_swaps_the_store() {
        let mut sut = CachedAuthApi::new(ScriptedAuthApi::new(), InMemoryTokenCache::new());
        sut.get_token("username", "password", false).await.unwrap();

        let previous = sut.set_cache(InMemoryTokenCache::new());
        assert_eq!(previous.len(), 1);
        assert!(sut.cache().is_empty());
    }
}
