use std::error;

use thiserror::Error;

/// A boxed error from a collaborator such as an HTTP client or token cache
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// An error while obtaining a token from the AuthApi
#[derive(Debug, Error)]
pub enum AuthApiError {
    /// The remote call itself failed
    ///
    /// Covers network failures, HTTP client errors, timeouts, and error
    /// statuses. The underlying transport error is available as the source.
    #[error("error sending request to AuthApi")]
    Request(#[source] BoxError),
    /// The remote call succeeded but returned an unusable payload
    #[error("unusable response from AuthApi")]
    Response(#[from] ResponseError),
}

impl AuthApiError {
    /// Wraps a transport failure
    pub fn request(source: impl Into<BoxError>) -> Self {
        Self::Request(source.into())
    }

    /// Whether the remote call itself failed
    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Whether the remote call returned an unusable payload
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}

/// A response body that cannot be turned into a token
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The body is not valid JSON
    #[error("could not decode AuthApi response")]
    Undecodable(#[from] serde_json::Error),
    /// `access_token` is absent, null, empty, or `"0"`
    #[error("AuthApi response: access token missing")]
    MissingAccessToken,
    /// `expires_in` is absent or null
    #[error("AuthApi response: expiration lifetime missing")]
    MissingExpiresIn,
    /// `expires_in` is not a non-negative number of seconds
    #[error("AuthApi response: expiration lifetime is not a number of seconds")]
    InvalidExpiresIn,
}
