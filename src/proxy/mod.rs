//! Proxy module for parsing and verifying proxies
//!
//! This module provides functionality for:
//! - Parsing `address,port,country,org` candidate lists
//! - Verifying candidates through a remote checker with bounded concurrency
//! - Collecting verified proxies into lists and per-country samples
//! - Ranking lists by a country priority table and writing them out

pub mod aggregator;
pub mod checker;
pub mod governor;
pub mod models;
pub mod output;
pub mod parser;
pub mod sorter;

pub use aggregator::{Aggregate, Aggregator, CountrySampleMap, DEFAULT_SAMPLE_CAP};
pub use checker::{Probe, VerifierClient, VerifierConfig};
pub use governor::{DrainReport, Governor, InFlight};
pub use models::{CheckPayload, CheckResponse, CheckResult, ProbeSuccess, ProbeVerdict, ProxyCandidate};
pub use output::ArtifactWriter;
pub use parser::CandidateParser;
pub use sorter::{PriorityTable, DEFAULT_PRIORITY};
