//! Probe client for the remote verification service

use crate::proxy::models::{CheckPayload, ProbeVerdict};
use crate::Result;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default URL of the verification service
pub const DEFAULT_VERIFIER_URL: &str = crate::DEFAULT_ENDPOINT;

/// Anything that can turn an `address:port` into a verdict.
///
/// Implementations must not fail: every problem is reported as a
/// [`ProbeVerdict::Failure`].
pub trait Probe: Send + Sync + 'static {
    fn probe(&self, address: &str, port: u16) -> BoxFuture<'static, ProbeVerdict>;
}

/// Configuration for the verifier client
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Endpoint queried as `<endpoint>?ip=<address>:<port>`
    pub endpoint: String,
    /// Deadline for the whole request, body included
    pub timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_VERIFIER_URL.to_string(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl VerifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the verification service
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct VerifierClient {
    config: VerifierConfig,
    client: Client,
}

impl VerifierClient {
    /// Create a new verifier client with custom configuration
    pub fn with_config(config: VerifierConfig) -> Result<Self> {
        let client = Client::builder().connect_timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Check a single proxy
    ///
    /// Performs one GET with no retries. The timeout covers the request
    /// and the body; when it fires the request is dropped.
    pub async fn check(&self, address: &str, port: u16) -> ProbeVerdict {
        let target = format!("{}:{}", address, port);
        match tokio::time::timeout(self.config.timeout, self.request(&target)).await {
            Ok(verdict) => verdict,
            Err(_) => ProbeVerdict::timeout(),
        }
    }

    async fn request(&self, target: &str) -> ProbeVerdict {
        let response = match self
            .client
            .get(&self.config.endpoint)
            .query(&[("ip", target)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProbeVerdict::failure(e.to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return ProbeVerdict::failure(status_text(status));
        }

        match response.json::<CheckPayload>().await {
            Ok(payload) => ProbeVerdict::from_response(payload.into()),
            Err(e) => ProbeVerdict::failure(e.to_string()),
        }
    }
}

impl Probe for VerifierClient {
    fn probe(&self, address: &str, port: u16) -> BoxFuture<'static, ProbeVerdict> {
        let client = self.clone();
        let address = address.to_string();
        async move { client.check(&address, port).await }.boxed()
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
