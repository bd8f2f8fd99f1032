//! Country priority ordering for proxy list entries

use once_cell::sync::Lazy;
use std::cmp::Ordering;

/// Country codes in descending priority
pub const DEFAULT_PRIORITY: [&str; 8] = ["ID", "SG", "US", "KR", "JP", "CN", "HK", "MY"];

static DEFAULT_TABLE: Lazy<PriorityTable> = Lazy::new(|| PriorityTable::new(DEFAULT_PRIORITY));

/// Ranks entries by the country in their third comma-separated field.
///
/// Ranked countries come first, in table order. Unranked countries follow,
/// compared by plain byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    countries: Vec<String>,
}

impl Default for PriorityTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl PriorityTable {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    /// Country codes, highest priority first
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn rank(&self, country: &str) -> Option<usize> {
        self.countries.iter().position(|c| c == country)
    }

    /// Compare two `address,port,country,org` entries.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let a_country = country_of(a);
        let b_country = country_of(b);

        match (self.rank(a_country), self.rank(b_country)) {
            (Some(a_rank), Some(b_rank)) => a_rank.cmp(&b_rank),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a_country.cmp(b_country),
        }
    }

    /// Stable sort; entries with the same country keep their order.
    pub fn sort<S: AsRef<str>>(&self, entries: &mut [S]) {
        entries.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }
}

/// Third comma-separated field, or `""` when absent
fn country_of(entry: &str) -> &str {
    entry.split(',').nth(2).unwrap_or_default()
}
