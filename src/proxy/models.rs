//! Proxy data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed proxy endpoint awaiting verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyCandidate {
    pub address: String,
    pub port: u16,
    pub country: String,
    pub org: String,
}

impl ProxyCandidate {
    pub fn new(address: String, port: u16, country: String, org: String) -> Self {
        Self {
            address,
            port,
            country,
            org,
        }
    }

    /// Identity key in `address:port` format
    pub fn key(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// Line in `address,port,country,org` format
    pub fn to_entry(&self) -> String {
        format!("{},{},{},{}", self.address, self.port, self.country, self.org)
    }
}

impl fmt::Display for ProxyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A verified proxy as reported by the verification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSuccess {
    pub proxy: String,
    pub ip: String,
    pub port: u16,
    pub delay_ms: f64,
    pub country: String,
    pub organization: String,
}

impl ProbeSuccess {
    /// Line in `proxy,port,country,organization` format
    pub fn to_entry(&self) -> String {
        format!(
            "{},{},{},{}",
            self.proxy, self.port, self.country, self.organization
        )
    }

    /// Sample map value in `proxy:port` format
    pub fn sample_key(&self) -> String {
        format!("{}:{}", self.proxy, self.port)
    }
}

/// Classified outcome of probing one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbeVerdict {
    Success(ProbeSuccess),
    Failure { reason: String },
}

impl ProbeVerdict {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::failure("timeout")
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeVerdict::Success(_))
    }

    /// Classify a decoded verifier answer.
    ///
    /// Only `error == false`, `proxyip == true` and a non-empty country
    /// count as a success.
    pub fn from_response(response: CheckResponse) -> Self {
        if response.error {
            return Self::failure(
                response
                    .message
                    .unwrap_or_else(|| "verifier reported an error".to_string()),
            );
        }

        let Some(result) = response.result else {
            return Self::failure("verifier returned no result");
        };

        if !result.proxyip {
            return Self::failure("not a proxy ip");
        }

        let country = result.country.trim();
        if country.is_empty() {
            return Self::failure("missing country");
        }

        Self::Success(ProbeSuccess {
            country: country.to_string(),
            proxy: result.proxy,
            ip: result.ip,
            port: result.port,
            delay_ms: result.delay,
            organization: result.as_organization,
        })
    }
}

/// Verdict envelope of the verification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CheckResult>,
}

impl From<CheckResult> for CheckResponse {
    fn from(result: CheckResult) -> Self {
        Self {
            error: false,
            message: None,
            result: Some(result),
        }
    }
}

/// Per-proxy payload of the verification service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub proxy: String,
    pub proxyip: bool,
    #[serde(default)]
    pub ip: String,
    pub port: u16,
    #[serde(default)]
    pub delay: f64,
    #[serde(default)]
    pub country: String,
    #[serde(rename = "asOrganization", default)]
    pub as_organization: String,
}

/// A 200 body is either the full envelope or the bare result object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CheckPayload {
    Envelope(CheckResponse),
    Bare(CheckResult),
}

impl From<CheckPayload> for CheckResponse {
    fn from(payload: CheckPayload) -> Self {
        match payload {
            CheckPayload::Envelope(response) => response,
            CheckPayload::Bare(result) => result.into(),
        }
    }
}
