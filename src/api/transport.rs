use crate::config::Credentials;
use crate::error::{Error, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const BASE_URL: &str = "https://api.hackerone.com/v1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and body of an HTTP response. Non-2xx is not an error at this layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An authenticated connection able to issue GET requests relative to the API root.
pub trait Transport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> impl Future<Output = Result<RawResponse>> + Send;
}

/// Builds a [`Transport`] from credentials. Called at most once per client family.
pub trait Connector {
    type Transport: Transport;

    fn connect(&self, credentials: &Credentials) -> Result<Self::Transport>;
}

#[derive(Clone, Debug)]
pub struct HttpConnector {
    pub base_url: String,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }
}

impl Connector for HttpConnector {
    type Transport = HttpTransport;

    fn connect(&self, credentials: &Credentials) -> Result<HttpTransport> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(HttpTransport {
            client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            credentials: credentials.clone(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<RawResponse> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, params = query.len(), "GET");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.token_name, Some(&self.credentials.token))
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to send request to {}: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to get response text: {}", e)))?;

        debug!(url = %url, status, bytes = body.len(), "Response received");
        Ok(RawResponse { status, body })
    }
}
