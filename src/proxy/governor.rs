//! Concurrency governor bounding the number of in-flight probes

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::warn;

/// Shared view of the number of probes currently running
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

/// Counts of admitted and finished work after a drain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    pub admitted: usize,
    pub completed: usize,
    pub panicked: usize,
}

/// Holds one permit for the lifetime of one task.
struct Slot {
    _permit: OwnedSemaphorePermit,
    in_flight: InFlight,
}

impl Slot {
    fn occupy(permit: OwnedSemaphorePermit, in_flight: InFlight, peak: &AtomicUsize) -> Self {
        let now = in_flight.0.fetch_add(1, Ordering::AcqRel) + 1;
        peak.fetch_max(now, Ordering::AcqRel);
        Self {
            _permit: permit,
            in_flight,
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.in_flight.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Admits work while at most `ceiling` items run at once.
///
/// [`admit`](Governor::admit) suspends the caller until a slot is free;
/// [`drain`](Governor::drain) suspends until every admitted item has
/// finished. Completions are unordered.
pub struct Governor {
    ceiling: usize,
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<()>,
    in_flight: InFlight,
    peak: Arc<AtomicUsize>,
    report: DrainReport,
}

impl Governor {
    /// Create a governor; a ceiling of zero is raised to one.
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            ceiling,
            semaphore: Arc::new(Semaphore::new(ceiling)),
            tasks: JoinSet::new(),
            in_flight: InFlight::default(),
            peak: Arc::new(AtomicUsize::new(0)),
            report: DrainReport::default(),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    /// Highest number of simultaneously running items seen so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    /// Wait for a free slot, then spawn `work` on it.
    pub async fn admit<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // The semaphore is private and never closed.
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("governor semaphore closed");
        let slot = Slot::occupy(permit, self.in_flight.clone(), &self.peak);

        self.tasks.spawn(async move {
            let _slot = slot;
            work.await;
        });
        self.report.admitted += 1;

        // Reap whatever already finished so the set stays small.
        while let Some(joined) = self.tasks.try_join_next() {
            self.settle(joined);
        }
    }

    /// Wait until nothing is in flight.
    pub async fn drain(&mut self) -> DrainReport {
        while let Some(joined) = self.tasks.join_next().await {
            self.settle(joined);
        }
        self.report
    }

    fn settle(&mut self, joined: std::result::Result<(), JoinError>) {
        match joined {
            Ok(()) => self.report.completed += 1,
            Err(e) => {
                warn!("probe task did not complete: {}", e);
                self.report.panicked += 1;
            }
        }
    }
}
