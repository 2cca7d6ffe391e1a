//! Composable layers over any [`AuthApi`] client

use std::{error, mem, sync::Arc};

use async_trait::async_trait;

use crate::{log_at, AuthApi, AuthApiError, AuthToken, LogLevels};

/// The base of every decorator: exclusive ownership of an inner client
///
/// On its own, a decorator forwards all three operations to the inner client
/// and hands back whatever it returns. Concrete decorators embed one and
/// forward the operations they do not change.
#[derive(Debug)]
pub struct Decorator<A> {
    inner: A,
}

impl<A> Decorator<A> {
    /// Wraps `inner`
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }

    /// The decorated client
    #[inline]
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// The decorated client, mutably
    #[inline]
    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    /// Replaces the decorated client, returning the previous one
    pub fn set_inner(&mut self, inner: A) -> A {
        mem::replace(&mut self.inner, inner)
    }

    /// Unwraps the decorated client
    pub fn into_inner(self) -> A {
        self.inner
    }
}

#[async_trait]
impl<A: AuthApi> AuthApi for Decorator<A> {
    async fn get_token(
        &self,
        username: &str,
        password: &str,
        refresh: bool,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        self.inner.get_token(username, password, refresh).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        self.inner.login(username, password).await
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        self.inner.refresh(token).await
    }
}

/// A decorator that reports the outcome of every operation
#[derive(Debug)]
pub struct LoggedAuthApi<A> {
    decorator: Decorator<A>,
    log_levels: LogLevels,
}

impl<A> LoggedAuthApi<A> {
    /// Wraps `client` using the default log levels
    pub fn new(client: A) -> Self {
        Self {
            decorator: Decorator::new(client),
            log_levels: LogLevels::default(),
        }
    }

    /// Sets the levels at which outcomes are reported
    pub fn with_log_levels(mut self, log_levels: LogLevels) -> Self {
        self.log_levels = log_levels;
        self
    }

    /// Replaces the decorated client, returning the previous one
    pub fn set_client(&mut self, client: A) -> A {
        self.decorator.set_inner(client)
    }

    /// The decorated client
    pub fn client(&self) -> &A {
        self.decorator.inner()
    }

    fn report(
        &self,
        operation: &'static str,
        result: Result<Arc<AuthToken>, AuthApiError>,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        match &result {
            Ok(token) => {
                log_at!(
                    self.log_levels.success(),
                    operation,
                    lifetime = token.lifetime().0,
                    "AuthApi operation succeeded"
                );
            }
            Err(error) => {
                log_at!(
                    self.log_levels.failure(),
                    operation,
                    error = (error as &dyn error::Error),
                    "AuthApi operation failed"
                );
            }
        }
        result
    }
}

#[async_trait]
impl<A: AuthApi> AuthApi for LoggedAuthApi<A> {
    async fn get_token(
        &self,
        username: &str,
        password: &str,
        refresh: bool,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        let result = self.decorator.get_token(username, password, refresh).await;
        self.report("get_token", result)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        let result = self.decorator.login(username, password).await;
        self.report("login", result)
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        let result = self.decorator.refresh(token).await;
        self.report("refresh", result)
    }
}
