use std::{error, sync::Arc};

use async_trait::async_trait;
use http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Method, Request,
};

use super::{HttpClient, HttpFactory, RequestFactory, StreamFactory};
use crate::{
    dto::{self, LoginForm},
    log_at, AuthApi, AuthApiError, AuthToken, BoxError, LogLevels, ResponseError,
};

/// An AuthApi client built on the request/stream/client triad
///
/// Endpoints are resolved by appending their path to the base URL, so the
/// base URL should end with `/`. Responses are decoded whatever their status;
/// only failures to send a request are reported as request errors.
#[derive(Debug)]
pub struct HttpClientAuthApi<C, R = HttpFactory, S = HttpFactory> {
    base_url: String,
    client: C,
    request_factory: R,
    stream_factory: S,
    log_levels: LogLevels,
}

impl<C> HttpClientAuthApi<C> {
    /// Constructs a new client using the default `http` factories
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            request_factory: HttpFactory,
            stream_factory: HttpFactory,
            log_levels: LogLevels::default(),
        }
    }
}

impl<C, R, S> HttpClientAuthApi<C, R, S> {
    /// Replaces the factory used to start requests
    pub fn with_request_factory<R2>(self, request_factory: R2) -> HttpClientAuthApi<C, R2, S> {
        HttpClientAuthApi {
            base_url: self.base_url,
            client: self.client,
            request_factory,
            stream_factory: self.stream_factory,
            log_levels: self.log_levels,
        }
    }

    /// Replaces the factory used to create request bodies
    pub fn with_stream_factory<S2>(self, stream_factory: S2) -> HttpClientAuthApi<C, R, S2> {
        HttpClientAuthApi {
            base_url: self.base_url,
            client: self.client,
            request_factory: self.request_factory,
            stream_factory,
            log_levels: self.log_levels,
        }
    }

    /// Sets the levels at which outcomes are reported
    pub fn with_log_levels(mut self, log_levels: LogLevels) -> Self {
        self.log_levels = log_levels;
        self
    }

    /// Replaces the AuthApi base URL
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Replaces the HTTP client, returning the previous one
    pub fn set_http_client(&mut self, client: C) -> C {
        std::mem::replace(&mut self.client, client)
    }

    /// The AuthApi base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request_failed(&self, error: impl Into<BoxError>) -> AuthApiError {
        let error = error.into();
        log_at!(
            self.log_levels.failure(),
            error = (&*error as &dyn error::Error),
            "AuthApi request failed"
        );
        AuthApiError::Request(error)
    }

    fn response_failed(&self, error: ResponseError) -> AuthApiError {
        log_at!(
            self.log_levels.failure(),
            error = (&error as &dyn error::Error),
            "AuthApi response unusable"
        );
        AuthApiError::Response(error)
    }
}

impl<C, R, S> HttpClientAuthApi<C, R, S>
where
    C: HttpClient<S::Body>,
    R: RequestFactory,
    S: StreamFactory,
{
    async fn exchange(
        &self,
        request: Result<Request<S::Body>, http::Error>,
    ) -> Result<Arc<AuthToken>, AuthApiError> {
        let request = request.map_err(|e| self.request_failed(e))?;

        tracing::trace!(uri = %request.uri(), "sending request to AuthApi");
        let response = self
            .client
            .send_request(request)
            .await
            .map_err(|e| self.request_failed(e))?;

        tracing::debug!(
            response.status = response.status().as_u16(),
            "received response from AuthApi"
        );

        let resp = dto::decode_token_response(response.body()).map_err(|e| self.response_failed(e))?;
        Ok(Arc::new(AuthToken::from(resp)))
    }
}

#[async_trait]
impl<C, R, S> AuthApi for HttpClientAuthApi<C, R, S>
where
    C: HttpClient<S::Body>,
    R: RequestFactory,
    S: StreamFactory,
{
    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        let form = serde_urlencoded::to_string(LoginForm { username, password })
            .map_err(|e| self.request_failed(e))?;

        let request = self
            .request_factory
            .create_request(Method::POST, &self.endpoint(dto::LOGIN_PATH))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(self.stream_factory.create_stream(form));

        let token = self.exchange(request).await?;
        log_at!(
            self.log_levels.success(),
            lifetime = token.lifetime().0,
            "token successfully retrieved"
        );
        Ok(token)
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        let request = self
            .request_factory
            .create_request(Method::GET, &self.endpoint(dto::REFRESH_PATH))
            .header(AUTHORIZATION, token.bearer())
            .body(self.stream_factory.create_stream(String::new()));

        let token = self.exchange(request).await?;
        log_at!(
            self.log_levels.success(),
            lifetime = token.lifetime().0,
            "token successfully refreshed"
        );
        Ok(token)
    }
}
