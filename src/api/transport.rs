// HTTP transport.
// The GET primitive the client is built on; reqwest by default, replaceable for tests.

use std::future::Future;

use reqwest::{
    Client, ClientBuilder, StatusCode, Url,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{CakewalkError, Result};

const USER_AGENT_VALUE: &str = concat!("cakewalk-rs/", env!("CARGO_PKG_VERSION"));

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Reason phrase for the status, empty for non-standard codes.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }
}

/// Issues GET requests.
///
/// Network failures are returned as errors; HTTP error statuses are not, the
/// client interprets them.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url, headers: &HeaderMap)
    -> impl Future<Output = Result<RawResponse>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = client_builder().build().map_err(CakewalkError::Transport)?;
        Ok(Self { client })
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS settings).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn client_builder() -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    Client::builder().default_headers(headers)
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url, headers: &HeaderMap) -> Result<RawResponse> {
        let response = self
            .client
            .get(url.clone())
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
