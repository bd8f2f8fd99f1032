use anyhow::Result;
use clap::Parser;
use proxy_sift::{
    run, RunConfig, DEFAULT_ACTIVE_LIST_FILE, DEFAULT_CONCURRENCY, DEFAULT_ENDPOINT,
    DEFAULT_RAW_LIST_FILE, DEFAULT_SAMPLE_CAP, DEFAULT_SAMPLE_MAP_FILE, DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Verify a proxy list through a remote checker and rank the working ones by country
#[derive(Parser)]
#[command(name = "proxy-sift", version)]
#[command(about = "Verify a proxy list through a remote checker and rank the working ones by country")]
struct Cli {
    /// Input file with `address,port,country,org` lines
    #[arg(short, long, default_value = DEFAULT_RAW_LIST_FILE)]
    input: PathBuf,

    /// Output file for the deduplicated list (defaults to the input file)
    #[arg(long)]
    raw_output: Option<PathBuf>,

    /// Output file for verified proxies
    #[arg(short, long, default_value = DEFAULT_ACTIVE_LIST_FILE)]
    active_output: PathBuf,

    /// Output file for the per-country sample map
    #[arg(short, long, default_value = DEFAULT_SAMPLE_MAP_FILE)]
    sample_output: PathBuf,

    /// Verification endpoint
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Maximum number of probes in flight
    #[arg(short = 'n', long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Maximum samples kept per country
    #[arg(long, default_value_t = DEFAULT_SAMPLE_CAP)]
    sample_cap: usize,

    /// Country priority, highest first (comma-separated)
    #[arg(long, value_delimiter = ',')]
    priority: Vec<String>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let raw_output = self.raw_output.unwrap_or_else(|| self.input.clone());
        let mut config = RunConfig::new()
            .with_input(self.input)
            .with_raw_output(raw_output)
            .with_active_output(self.active_output)
            .with_sample_output(self.sample_output)
            .with_endpoint(self.endpoint)
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_sample_cap(self.sample_cap);

        if !self.priority.is_empty() {
            config = config.with_priority(self.priority);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config();
    let report = run(&config).await?;

    println!(
        "Results: {} unique, {} active, {} failed ({:.2}s)",
        report.unique,
        report.saved,
        report.failed,
        report.elapsed.as_secs_f64()
    );

    Ok(())
}
