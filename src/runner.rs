//! Run driver wiring parser, governor, probe client and aggregator together

use crate::error::Result;
use crate::proxy::{
    Aggregator, ArtifactWriter, CandidateParser, CountrySampleMap, Governor, PriorityTable, Probe,
    ProbeVerdict, ProxyCandidate, VerifierClient, VerifierConfig,
};
use crate::RunConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Counters describing one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Candidates parsed from the input, duplicates included
    pub total: usize,
    /// Distinct `address:port` candidates
    pub unique: usize,
    /// Probes that ran to completion
    pub probed: usize,
    pub saved: usize,
    pub failed: usize,
    /// Highest number of probes in flight at once
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

/// Sorted artifacts of a run, ready to be written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// Deduplicated input in `address,port,country,org` format
    pub raw: Vec<String>,
    /// Verified proxies in `address,port,country,org` format
    pub active: Vec<String>,
    pub samples: CountrySampleMap,
    pub report: RunReport,
}

/// Probe every distinct candidate and collect the results.
///
/// `probe` is only called once a governor slot is held, so a probe that
/// starts work eagerly still counts against the ceiling. Returns only after
/// every admitted probe has finished; both lists are sorted by
/// `config.priority`.
pub async fn run_candidates<P: Probe>(
    candidates: Vec<ProxyCandidate>,
    probe: Arc<P>,
    config: &RunConfig,
) -> Result<RunOutcome> {
    config.validate()?;
    let started = Instant::now();
    let total = candidates.len();
    let candidates = CandidateParser::dedup(candidates);
    let mut raw: Vec<String> = candidates.iter().map(ProxyCandidate::to_entry).collect();

    info!(
        "Probing {} unique proxies ({} listed) with up to {} in flight",
        candidates.len(),
        total,
        config.concurrency
    );

    let aggregator = Aggregator::new(config.sample_cap);
    let failed = Arc::new(AtomicUsize::new(0));
    let mut governor = Governor::new(config.concurrency);
    let in_flight = governor.in_flight();

    for candidate in &candidates {
        let probe = probe.clone();
        let address = candidate.address.clone();
        let port = candidate.port;
        let aggregator = aggregator.clone();
        let failed = failed.clone();
        let in_flight = in_flight.clone();
        let key = candidate.key();

        governor
            .admit(async move {
                match probe.probe(&address, port).await {
                    ProbeVerdict::Success(success) => {
                        aggregator.record(&success, in_flight.get()).await;
                    }
                    ProbeVerdict::Failure { reason } => {
                        debug!("{} failed: {}", key, reason);
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
            .await;
    }

    let drained = governor.drain().await;
    if drained.panicked > 0 {
        warn!("{} probes aborted before recording a verdict", drained.panicked);
    }
    info!("All {} probes finished", drained.completed);

    let aggregate = aggregator.take().await;
    let mut active = aggregate.active;

    let table = PriorityTable::new(config.priority.iter().cloned());
    table.sort(&mut raw);
    table.sort(&mut active);

    Ok(RunOutcome {
        raw,
        active,
        samples: aggregate.samples,
        report: RunReport {
            total,
            unique: candidates.len(),
            probed: drained.completed,
            saved: aggregate.saved,
            failed: failed.load(Ordering::Relaxed),
            peak_in_flight: governor.peak(),
            elapsed: started.elapsed(),
        },
    })
}

/// Read the input, verify it against the remote checker and write all
/// three artifacts.
///
/// Nothing is written unless every probe has finished.
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    let started = Instant::now();
    config.validate()?;

    let content = ArtifactWriter::read_input(&config.input)?;
    let candidates = CandidateParser::parse_string(&content)?;

    let client = Arc::new(VerifierClient::with_config(
        VerifierConfig::new()
            .with_endpoint(config.endpoint.clone())
            .with_timeout(config.timeout),
    )?);

    let outcome = run_candidates(candidates, client, config).await?;

    ArtifactWriter::save_samples(&outcome.samples, &config.sample_output)?;
    ArtifactWriter::save_list(&outcome.raw, &config.raw_output)?;
    ArtifactWriter::save_list(&outcome.active, &config.active_output)?;
    info!(
        "Wrote {} unique proxies to {:?}, {} active to {:?}, samples to {:?}",
        outcome.raw.len(),
        config.raw_output,
        outcome.active.len(),
        config.active_output,
        config.sample_output
    );

    let mut report = outcome.report;
    report.elapsed = started.elapsed();
    info!("Process time: {:.2} seconds", report.elapsed.as_secs_f64());

    Ok(report)
}
