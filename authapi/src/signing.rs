use http::{header::AUTHORIZATION, request, Method};

use crate::{
    transport::{HttpFactory, RequestFactory},
    AccessToken, AccessTokenRef, AuthToken,
};

/// A request factory that signs every request with a fixed bearer token
///
/// All other request construction is left to the wrapped factory.
#[derive(Clone, Debug)]
pub struct AuthTokenRequestFactory<F = HttpFactory> {
    auth_token: AccessToken,
    request_factory: F,
}

impl<F> AuthTokenRequestFactory<F> {
    /// Signs requests from `request_factory` with `auth_token`
    pub fn new(auth_token: impl Into<String>, request_factory: F) -> Self {
        Self {
            auth_token: AccessToken::new(auth_token.into()),
            request_factory,
        }
    }

    /// Signs requests from `request_factory` with the content of `token`
    pub fn from_token(token: &AuthToken, request_factory: F) -> Self {
        Self {
            auth_token: token.content().to_owned(),
            request_factory,
        }
    }

    /// The token attached to requests
    pub fn token(&self) -> &AccessTokenRef {
        &self.auth_token
    }
}

impl<F: RequestFactory> RequestFactory for AuthTokenRequestFactory<F> {
    fn create_request(&self, method: Method, uri: &str) -> request::Builder {
        self.request_factory
            .create_request(method, uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.auth_token.as_str()))
    }
}
