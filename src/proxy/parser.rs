//! Candidate parser for comma-separated proxy lists

use crate::error::ParseError;
use crate::proxy::models::ProxyCandidate;
use std::collections::HashSet;

/// Parser for `address,port,country,org...` lines
pub struct CandidateParser;

impl CandidateParser {
    /// Parse a single candidate line
    ///
    /// The org is everything after the third comma, so it may itself contain
    /// commas. Literal `+` characters in the org are restored to spaces.
    /// Returns `Ok(None)` for blank lines.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<ProxyCandidate>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let mut fields = line.splitn(4, ',');
        let address = fields.next().unwrap_or_default().trim();
        let port_field = fields.next().ok_or(ParseError::MissingField {
            line: line_no,
            field: "port",
        })?;
        let country = fields.next().ok_or(ParseError::MissingField {
            line: line_no,
            field: "country",
        })?;
        let org = fields.next().unwrap_or_default();

        let port: u16 = port_field
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidPort {
                line: line_no,
                value: port_field.trim().to_string(),
            })?;

        Ok(Some(ProxyCandidate::new(
            address.to_string(),
            port,
            country.trim().to_string(),
            org.trim().replace('+', " "),
        )))
    }

    /// Parse candidates from a string (multiple lines)
    ///
    /// Fails on the first malformed line; a single corrupt line taints the
    /// whole input.
    pub fn parse_string(content: &str) -> Result<Vec<ProxyCandidate>, ParseError> {
        let mut candidates = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if let Some(candidate) = Self::parse_line(line, idx + 1)? {
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }

    /// Drop every candidate whose `address:port` was already seen, keeping
    /// first occurrences in input order.
    pub fn dedup(candidates: Vec<ProxyCandidate>) -> Vec<ProxyCandidate> {
        let mut seen = HashSet::with_capacity(candidates.len());
        candidates
            .into_iter()
            .filter(|candidate| seen.insert(candidate.key()))
            .collect()
    }
}
