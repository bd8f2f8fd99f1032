//! Error types for the verifier pipeline

use std::path::PathBuf;
use thiserror::Error;

/// A malformed input line. Any of these aborts the whole run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: invalid port {value:?}")]
    InvalidPort { line: usize, value: String },

    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },
}

/// Crate-level errors.
///
/// Probe failures are not errors; they are carried as
/// [`ProbeVerdict::Failure`](crate::proxy::ProbeVerdict::Failure) values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize sample map: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Library result type
pub type Result<T> = std::result::Result<T, Error>;
