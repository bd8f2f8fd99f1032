//! Aggregator collecting verified proxies

use crate::proxy::models::ProbeSuccess;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Default number of samples kept per country
pub const DEFAULT_SAMPLE_CAP: usize = 10;

/// Country code to the first `address:port` entries verified for it
pub type CountrySampleMap = BTreeMap<String, Vec<String>>;

/// Everything collected once all probes have finished
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// `proxy,port,country,organization` entries in arrival order
    pub active: Vec<String>,
    pub samples: CountrySampleMap,
    pub saved: usize,
}

#[derive(Debug, Default)]
struct State {
    active: Vec<String>,
    samples: CountrySampleMap,
    saved: usize,
}

/// Collects successful verdicts from many concurrent probes.
///
/// Cloning yields another handle to the same collection.
#[derive(Debug, Clone)]
pub struct Aggregator {
    sample_cap: usize,
    state: Arc<Mutex<State>>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_CAP)
    }
}

impl Aggregator {
    pub fn new(sample_cap: usize) -> Self {
        Self {
            sample_cap,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Record one verified proxy and return the running saved count.
    ///
    /// `outstanding` is only used for the progress line.
    pub async fn record(&self, success: &ProbeSuccess, outstanding: usize) -> usize {
        let mut state = self.state.lock().await;

        state.active.push(success.to_entry());

        let cap = self.sample_cap;
        match state.samples.get_mut(&success.country) {
            Some(samples) if samples.len() < cap => samples.push(success.sample_key()),
            Some(_) => {}
            None if cap > 0 => {
                state
                    .samples
                    .insert(success.country.clone(), vec![success.sample_key()]);
            }
            None => {}
        }

        state.saved += 1;
        let saved = state.saved;
        drop(state);

        info!("[{}] proxy saved: {}", outstanding, saved);
        saved
    }

    pub async fn saved(&self) -> usize {
        self.state.lock().await.saved
    }

    /// Take everything recorded so far, leaving the aggregator empty.
    pub async fn take(&self) -> Aggregate {
        let mut state = self.state.lock().await;
        let state = std::mem::take(&mut *state);
        Aggregate {
            active: state.active,
            samples: state.samples,
            saved: state.saved,
        }
    }
}
