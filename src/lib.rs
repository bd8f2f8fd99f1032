//! Proxy Sift - Proxy List Verifier
//!
//! Reads a list of candidate proxies, deduplicates them, probes each one
//! through a remote verification service with bounded concurrency and writes
//! the working proxies out, ranked by a country priority table.

pub mod error;
pub mod proxy;
pub mod runner;

pub use error::{Error, ParseError, Result};
pub use proxy::*;
pub use runner::{run, run_candidates, RunOutcome, RunReport};

use std::path::PathBuf;
use std::time::Duration;

/// Default input file, rewritten in place with the deduplicated list
pub const DEFAULT_RAW_LIST_FILE: &str = "./rawProxyList.txt";

/// Default output file for verified proxies
pub const DEFAULT_ACTIVE_LIST_FILE: &str = "./proxyList.txt";

/// Default output file for the country sample map
pub const DEFAULT_SAMPLE_MAP_FILE: &str = "./kvProxyList.json";

/// Default verification endpoint
pub const DEFAULT_ENDPOINT: &str = "https://id1.foolvpn.me/api/v1/check";

/// Default ceiling on in-flight probes
pub const DEFAULT_CONCURRENCY: usize = 99;

/// Default per-probe timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Application configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Line-delimited candidate list
    pub input: PathBuf,
    /// Where the deduplicated, sorted raw list is written
    pub raw_output: PathBuf,
    /// Where the verified proxy list is written
    pub active_output: PathBuf,
    /// Where the country sample map is written
    pub sample_output: PathBuf,
    /// Verification endpoint, queried as `<endpoint>?ip=<address>:<port>`
    pub endpoint: String,
    /// Maximum number of probes in flight
    pub concurrency: usize,
    /// Hard deadline for each probe
    pub timeout: Duration,
    /// Maximum entries per country in the sample map
    pub sample_cap: usize,
    /// Country codes in descending priority
    pub priority: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RAW_LIST_FILE),
            raw_output: PathBuf::from(DEFAULT_RAW_LIST_FILE),
            active_output: PathBuf::from(DEFAULT_ACTIVE_LIST_FILE),
            sample_output: PathBuf::from(DEFAULT_SAMPLE_MAP_FILE),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sample_cap: DEFAULT_SAMPLE_CAP,
            priority: PriorityTable::default().countries().to_vec(),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    pub fn with_raw_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.raw_output = path.into();
        self
    }

    pub fn with_active_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.active_output = path.into();
        self
    }

    pub fn with_sample_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.sample_output = path.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_sample_cap(mut self, cap: usize) -> Self {
        self.sample_cap = cap;
        self
    }

    pub fn with_priority(mut self, priority: Vec<String>) -> Self {
        self.priority = priority;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if self.sample_cap == 0 {
            return Err(Error::Config("sample cap must be at least 1".into()));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be non-zero".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("endpoint must not be empty".into()));
        }
        Ok(())
    }
}
