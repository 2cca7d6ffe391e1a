use std::sync::Arc;

use async_trait::async_trait;

use crate::{AuthApiError, AuthToken};

/// A client able to obtain tokens from the AuthApi
///
/// Transports implement [`login`][AuthApi::login] and
/// [`refresh`][AuthApi::refresh]. Decorators implement all three operations,
/// forwarding the ones whose behavior they leave alone.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Obtains a token for the given credentials
    ///
    /// Always performs a login. When `refresh` is set, the login token is
    /// immediately exchanged via [`refresh`][AuthApi::refresh] and the
    /// refreshed token is returned instead.
    async fn get_token(
        &self,
        username: &str,
        password: &str,
        refresh: bool,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        let token = self.login(username, password).await?;
        if refresh {
            self.refresh(&token).await
        } else {
            Ok(token)
        }
    }

    /// Exchanges credentials for a fresh token
    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError>;

    /// Exchanges an existing token for a renewed one
    ///
    /// The refresh call is authenticated with the existing token as a bearer
    /// credential.
    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError>;
}

macro_rules! forward_auth_api {
    ($($ty:ty),+) => {$(
        #[async_trait]
        impl<A: AuthApi + ?Sized> AuthApi for $ty {
            async fn get_token(
                &self,
                username: &str,
                password: &str,
                refresh: bool,
            ) -> Result<Arc<AuthToken>, AuthApiError> {
                (**self).get_token(username, password, refresh).await
            }

            async fn login(
                &self,
                username: &str,
                password: &str,
            ) -> Result<Arc<AuthToken>, AuthApiError> {
                (**self).login(username, password).await
            }

            async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
                (**self).refresh(token).await
            }
        }
    )+};
}

forward_auth_api!(Arc<A>, Box<A>);
