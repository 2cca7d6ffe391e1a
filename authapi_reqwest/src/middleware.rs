use authapi::AuthToken;
use bytes::{BufMut, BytesMut};
use reqwest::{header, Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// A middleware that attaches a fixed bearer token to outgoing requests
///
/// The header value is marked sensitive so it is elided from debug output.
#[derive(Clone, Debug)]
pub struct BearerTokenMiddleware {
    header_value: header::HeaderValue,
}

impl BearerTokenMiddleware {
    /// Construct a new middleware that sends `access_token`
    ///
    /// Fails if the token contains bytes that cannot appear in a header.
    pub fn new(access_token: impl AsRef<str>) -> std::result::Result<Self, header::InvalidHeaderValue> {
        let access_token = access_token.as_ref();
        let mut header_value = BytesMut::with_capacity(access_token.len() + 7);
        header_value.put_slice(b"Bearer ");
        header_value.put_slice(access_token.as_bytes());

        let mut header_value = header::HeaderValue::from_maybe_shared(header_value.freeze())?;
        header_value.set_sensitive(true);
        Ok(Self { header_value })
    }

    /// Construct a new middleware that sends the content of `token`
    pub fn from_token(token: &AuthToken) -> std::result::Result<Self, header::InvalidHeaderValue> {
        Self::new(token.content().as_str())
    }
}

#[async_trait::async_trait]
impl Middleware for BearerTokenMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        req.headers_mut()
            .entry(header::AUTHORIZATION)
            .or_insert_with(|| self.header_value.clone());

        next.run(req, extensions).await
    }
}
