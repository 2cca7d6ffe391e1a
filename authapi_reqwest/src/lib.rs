//! reqwest transports and request signing for AuthApi bearer tokens
//!
//! [`ReqwestAuthApi`] talks to an AuthApi directly through a
//! [`reqwest::Client`]. [`ReqwestHttpClient`] instead adapts a client to the
//! [`HttpClient`](authapi::transport::HttpClient) trait so it can drive
//! [`HttpClientAuthApi`](authapi::transport::HttpClientAuthApi).
//!
//! ```no_run
//! use authapi::{AuthApi, CachedAuthApi, InMemoryTokenCache};
//! use authapi_reqwest::ReqwestAuthApi;
//! use reqwest::{Client, Url};
//!
//! # #[tokio::main(flavor = "current_thread")] async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let base_url = Url::parse("https://auth.example.com/api/")?;
//! let client = CachedAuthApi::new(
//!     ReqwestAuthApi::new(Client::new(), base_url),
//!     InMemoryTokenCache::new(),
//! );
//!
//! let token = client.get_token("alice", "secret", true).await?;
//! println!("{}", token.bearer());
//! # Ok(())
//! # }
//! ```
//!
//! With the `middleware` feature, the [`BearerTokenMiddleware`] attaches a
//! token to every request sent through a
//! [`ClientWithMiddleware`](reqwest_middleware::ClientWithMiddleware). A
//! request that already carries an `Authorization` header keeps it.
//!
//! ```
//! # #[cfg(feature = "middleware")] {
//! use authapi_reqwest::BearerTokenMiddleware;
//! use reqwest::Client;
//! use reqwest_middleware::ClientBuilder;
//!
//! let client = ClientBuilder::new(Client::default())
//!     .with(BearerTokenMiddleware::new("token").unwrap())
//!     .build();
//! # let _ = client;
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

mod client;
mod http_client;
#[cfg(feature = "middleware")]
mod middleware;

pub use client::ReqwestAuthApi;
pub use http_client::ReqwestHttpClient;
#[cfg(feature = "middleware")]
#[cfg_attr(docsrs, doc(cfg(feature = "middleware")))]
pub use middleware::BearerTokenMiddleware;
