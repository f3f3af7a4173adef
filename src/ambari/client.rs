use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use super::error::FetchError;
use super::types::{ConnectionParams, Secret};

/// Ambari rejects API calls without this header (CSRF protection).
pub const REQUESTED_BY_HEADER: &str = "X-Requested-By";
pub const REQUESTED_BY_VALUE: &str = "ambari";

/// Status and body of one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Issues a single authenticated GET against the Ambari API.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: Url) -> Result<RawResponse, FetchError>;
}

/// reqwest-backed transport. Every request carries basic auth, the
/// `X-Requested-By` header and the configured per-request timeout.
pub struct AmbariClient {
    client: Client,
    username: String,
    password: Secret,
}

impl AmbariClient {
    pub fn new(params: &ConnectionParams) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_sec))
            .build()
            .map_err(|e| FetchError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            username: params.username.clone(),
            password: params.password.clone(),
        })
    }
}

impl Transport for AmbariClient {
    async fn get(&self, url: Url) -> Result<RawResponse, FetchError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.username, Some(self.password.expose()))
            .header(REQUESTED_BY_HEADER, REQUESTED_BY_VALUE)
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| classify(&url, e))?;
        debug!(%url, status, bytes = body.len(), "response");

        Ok(RawResponse { status, body })
    }
}

fn classify(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_connect() || e.is_timeout() {
        FetchError::ConnectionFailure {
            url: url.to_string(),
            source: Box::new(e),
        }
    } else {
        FetchError::Unknown(format!("request to {url} failed: {e}"))
    }
}
