use std::{error, sync::Arc};

use async_trait::async_trait;
use authapi::{
    dto::{self, LoginForm},
    log_at, AuthApi, AuthApiError, AuthToken, BoxError, LogLevels, ResponseError,
};
use reqwest::{Client, RequestBuilder, Url};

/// An AuthApi client backed by [`reqwest`]
///
/// Endpoints are resolved relative to the base URL, so the base URL should
/// end with `/`. Error statuses are reported as request errors.
#[derive(Debug)]
pub struct ReqwestAuthApi {
    client: Client,
    base_url: Url,
    log_levels: LogLevels,
}

impl ReqwestAuthApi {
    /// Constructs a new client against the AuthApi at `base_url`
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            log_levels: LogLevels::default(),
        }
    }

    /// Sets the levels at which outcomes are reported
    pub fn with_log_levels(mut self, log_levels: LogLevels) -> Self {
        self.log_levels = log_levels;
        self
    }

    /// Replaces the HTTP client, returning the previous one
    pub fn set_client(&mut self, client: Client) -> Client {
        std::mem::replace(&mut self.client, client)
    }

    /// Replaces the AuthApi base URL, returning the previous one
    pub fn set_base_url(&mut self, base_url: Url) -> Url {
        std::mem::replace(&mut self.base_url, base_url)
    }

    /// The AuthApi base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthApiError> {
        self.base_url.join(path).map_err(|e| self.request_failed(e))
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

    async fn exchange(&self, req: RequestBuilder) -> Result<Arc<AuthToken>, AuthApiError> {
        tracing::trace!("sending request to AuthApi");

        let resp = req.send().await.map_err(|e| self.request_failed(e))?;

        tracing::debug!(
            response.status = resp.status().as_u16(),
            "received response from AuthApi"
        );

        let body = resp
            .error_for_status()
            .map_err(|e| self.request_failed(e))?
            .bytes()
            .await
            .map_err(|e| self.request_failed(e))?;

        let resp = dto::decode_token_response(&body).map_err(|e| self.response_failed(e))?;
        Ok(Arc::new(AuthToken::from(resp)))
    }
}

#[async_trait]
impl AuthApi for ReqwestAuthApi {
    async fn login(&self, username: &str, password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
        let req = self
            .client
            .post(self.endpoint(dto::LOGIN_PATH)?)
            .form(&LoginForm { username, password });

        let token = self.exchange(req).await?;
        log_at!(
            self.log_levels.success(),
            lifetime = token.lifetime().0,
            "token successfully retrieved"
        );
        Ok(token)
    }

    async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
        let req = self
            .client
            .get(self.endpoint(dto::REFRESH_PATH)?)
            .bearer_auth(token.content().as_str());

        let token = self.exchange(req).await?;
        log_at!(
            self.log_levels.success(),
            lifetime = token.lifetime().0,
            "token successfully refreshed"
        );
        Ok(token)
    }
}
