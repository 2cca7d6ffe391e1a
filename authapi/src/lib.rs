//! Obtain, refresh, and cache short-lived bearer tokens from an AuthApi authority
//!
//! An AuthApi exposes two endpoints: `login`, which exchanges a username and
//! password for a token, and `refresh`, which exchanges a still-valid token
//! for a new one with a fresh lifetime. The [`AuthApi`] trait models both and
//! provides [`get_token()`][AuthApi::get_token()], which logs in and
//! optionally refreshes in one step.
//!
//! Clients are layered with decorators. Each decorator owns the client it
//! wraps, implements [`AuthApi`] itself, and adds one concern:
//!
//! * [`CachedAuthApi`] serves tokens from a [`TokenCache`] and only reaches
//!   the AuthApi on a miss, storing the fresh token for its lifetime.
//! * [`LoggedAuthApi`] reports the outcome of every operation.
//!
//! Transports live at the leaves. [`HttpClientAuthApi`][transport::HttpClientAuthApi]
//! works over any HTTP stack that implements the small
//! [`transport`] traits, and the `authapi_reqwest` crate provides a client
//! built directly on `reqwest`.
//!
//! Once a token is in hand, [`AuthTokenRequestFactory`] signs every request
//! built through it with that token.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use authapi::{
//!     AuthApi, AuthApiError, AuthToken, CachedAuthApi, InMemoryTokenCache,
//! };
//! use authapi_clock::DurationSecs;
//!
//! struct FixedAuthApi;
//!
//! #[async_trait::async_trait]
//! impl AuthApi for FixedAuthApi {
//!     async fn login(&self, username: &str, _password: &str) -> Result<Arc<AuthToken>, AuthApiError> {
//!         Ok(Arc::new(AuthToken::new(format!("token-for-{}", username), DurationSecs(300))))
//!     }
//!
//!     async fn refresh(&self, token: &AuthToken) -> Result<Arc<AuthToken>, AuthApiError> {
//!         Ok(Arc::new(AuthToken::new(token.content().as_str(), DurationSecs(3600))))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() -> Result<(), AuthApiError> {
//! let client = CachedAuthApi::new(FixedAuthApi, InMemoryTokenCache::new());
//!
//! let first = client.get_token("alice", "secret", false).await?;
//! let second = client.get_token("alice", "secret", false).await?;
//!
//! assert!(Arc::ptr_eq(&first, &second));
//! assert_eq!(first.bearer(), "Bearer token-for-alice");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

mod api;
mod braids;
pub mod cache;
pub mod decorator;
pub mod dto;
mod error;
mod logging;
mod signing;
mod token;
pub mod transport;

#[cfg(test)]
mod test_util;

pub use api::AuthApi;
pub use braids::*;
pub use cache::{cache_key, CachedAuthApi, InMemoryTokenCache, TokenCache};
pub use decorator::{Decorator, LoggedAuthApi};
pub use error::{AuthApiError, BoxError, ResponseError};
pub use logging::LogLevels;
pub use signing::AuthTokenRequestFactory;
pub use token::AuthToken;

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
