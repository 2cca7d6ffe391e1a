//! A minimal request/stream/client triad for plugging in any HTTP stack
//!
//! [`HttpClientAuthApi`] needs only three capabilities: something that starts
//! building a request, something that turns a string into a request body,
//! and something that sends the finished request. Each is a separate trait
//! so lightweight stacks can be mixed and matched.

use std::{error, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use http::{request, Method, Request, Response};

mod http_client;

pub use http_client::HttpClientAuthApi;

/// Starts building outgoing requests
pub trait RequestFactory: Send + Sync {
    /// Begins a request with the given method and URI
    ///
    /// Invalid input is reported when the builder is finished, not here.
    fn create_request(&self, method: Method, uri: &str) -> request::Builder;
}

/// Creates request bodies
pub trait StreamFactory: Send + Sync {
    /// The body type produced
    type Body: Send + 'static;

    /// Creates a body holding `content`
    fn create_stream(&self, content: String) -> Self::Body;
}

/// Sends requests and returns the buffered responses
#[async_trait]
pub trait HttpClient<B: Send + 'static>: Send + Sync {
    /// The error returned when a request cannot be completed
    type Error: error::Error + Send + Sync + 'static;

    /// Sends `request`, returning the response
    ///
    /// Responses with error statuses are not errors at this level.
    async fn send_request(&self, request: Request<B>) -> Result<Response<Bytes>, Self::Error>;
}

#[async_trait]
impl<B, C> HttpClient<B> for Arc<C>
where
    B: Send + 'static,
    C: HttpClient<B> + ?Sized,
{
    type Error = C::Error;

    async fn send_request(&self, request: Request<B>) -> Result<Response<Bytes>, Self::Error> {
        (**self).send_request(request).await
    }
}

impl<F: RequestFactory + ?Sized> RequestFactory for Arc<F> {
    fn create_request(&self, method: Method, uri: &str) -> request::Builder {
        (**self).create_request(method, uri)
    }
}

/// Request and stream factory backed by the `http` crate, producing `Bytes` bodies
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpFactory;

impl RequestFactory for HttpFactory {
    fn create_request(&self, method: Method, uri: &str) -> request::Builder {
        Request::builder().method(method).uri(uri)
    }
}

impl StreamFactory for HttpFactory {
    type Body = Bytes;

    fn create_stream(&self, content: String) -> Self::Body {
        Bytes::from(content)
    }
}
