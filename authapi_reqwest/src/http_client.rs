use async_trait::async_trait;
use authapi::transport::HttpClient;
use bytes::Bytes;
use reqwest::Client;

/// Adapts a [`reqwest::Client`] to the [`HttpClient`] trait
///
/// Response bodies are buffered in full. Error statuses are returned as
/// ordinary responses.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Wraps `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The wrapped client
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl From<Client> for ReqwestHttpClient {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl HttpClient<Bytes> for ReqwestHttpClient {
    type Error = reqwest::Error;

    async fn send_request(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, Self::Error> {
        let request = reqwest::Request::try_from(request)?;
        let resp = self.client.execute(request).await?;

        let status = resp.status();
        let version = resp.version();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;

        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        *response.version_mut() = version;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
