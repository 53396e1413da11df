//! Certscan command line interface.
//!
//! Reads certificate IDs from a text file, resolves each against the ACE
//! Grading public registry through a real browser, and writes a CSV of
//! results. Per-identifier failures never abort the run; the process exits
//! non-zero only for resource-level failures such as an unreadable input
//! file, a browser that will not launch, or an unwritable output file.

mod input;
mod progress;
mod report;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use certscan_browser::{BrowserEngine, EngineConfig};
use certscan_core::AppConfig;
use certscan_pipeline::{
    AdmissionGate, CertFetcher, Fetcher, LookupUrlBuilder, ProgressObserver, RetryPolicy,
    Scheduler, SnapshotRecorder,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::progress::ConsoleObserver;

#[derive(Debug, Parser)]
#[command(name = "certscan")]
#[command(version)]
#[command(about = "Batch certificate lookups against the ACE Grading public registry")]
struct Cli {
    /// Input file with one certificate ID per line
    #[arg(short, long, default_value = "certs.txt")]
    input: PathBuf,

    /// Output CSV path [default: cert_lookup_results_<timestamp>.csv]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of concurrent lookups [default: 5]
    #[arg(short, long)]
    concurrency: Option<u32>,

    /// Content wait per fetch, in milliseconds [default: 15000]
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Total attempt budget per certificate [default: 3]
    #[arg(short, long)]
    retries: Option<u32>,

    /// Base retry backoff in seconds, doubled after each failure [default: 2.0]
    #[arg(short, long)]
    delay: Option<f64>,

    /// Minimum spacing between page loads in seconds [default: 1.0]
    #[arg(long)]
    rate_limit: Option<f64>,

    /// Run the browser without a visible window
    #[arg(long)]
    headless: bool,

    /// Directory for HTML snapshots of failed lookups [default: debug_snapshots]
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging(cli.verbose)?;

    info!("Starting certscan");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }
    info!("Logging to {}", log_path.display());

    let mut config = AppConfig::load_with_env().context("Failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let cert_ids = input::load_cert_ids(&cli.input)?;
    info!("Loaded {} certificate IDs", cert_ids.len());

    let output_path = cli.output.clone().unwrap_or_else(default_output_path);

    let engine = Arc::new(
        BrowserEngine::launch(EngineConfig {
            headless: config.browser.headless,
            window_width: config.browser.window_width,
            window_height: config.browser.window_height,
        })
        .await
        .context("Failed to launch browser")?,
    );

    let urls =
        LookupUrlBuilder::new(&config.lookup.base_url).context("Invalid lookup base URL")?;
    let fetcher = CertFetcher::new(
        Arc::clone(&engine),
        urls,
        Duration::from_millis(config.scanning.timeout_ms),
    )
    .with_settle(Duration::from_millis(config.scanning.settle_ms))
    .with_snapshot_settle(Duration::from_millis(config.snapshots.settle_ms));

    let observer: Arc<dyn ProgressObserver> = Arc::new(ConsoleObserver);
    let policy = RetryPolicy::new(
        Arc::new(fetcher) as Arc<dyn Fetcher>,
        Arc::new(AdmissionGate::new(Duration::from_secs_f64(
            config.scanning.rate_limit_secs,
        ))),
        Arc::new(SnapshotRecorder::new(config.snapshots.dir.clone())),
        config.scanning.max_retries,
        Duration::from_secs_f64(config.scanning.retry_base_delay_secs),
    )
    .with_observer(Arc::clone(&observer));

    let scheduler =
        Scheduler::new(Arc::new(policy), config.scanning.concurrency as usize).with_observer(observer);

    let records = scheduler.run(cert_ids).await;
    drop(scheduler);

    if let Ok(engine) = Arc::try_unwrap(engine) {
        engine.shutdown().await;
    }

    report::write_csv(&output_path, &records)?;
    info!("Saved results to {}", output_path.display());

    Ok(())
}

/// Wire tracing to the console and to a timestamped log file, returning the
/// log file's path.
fn init_logging(verbose: bool) -> anyhow::Result<PathBuf> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "info,certscan_cli=debug,certscan_core=debug,certscan_browser=debug,certscan_pipeline=debug",
            )
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let log_path = PathBuf::from(format!(
        "certscan_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ));
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    Ok(log_path)
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(concurrency) = cli.concurrency {
        config.scanning.concurrency = concurrency;
    }
    if let Some(timeout_ms) = cli.timeout {
        config.scanning.timeout_ms = timeout_ms;
    }
    if let Some(retries) = cli.retries {
        config.scanning.max_retries = retries;
    }
    if let Some(delay) = cli.delay {
        config.scanning.retry_base_delay_secs = delay;
    }
    if let Some(rate_limit) = cli.rate_limit {
        config.scanning.rate_limit_secs = rate_limit;
    }
    if cli.headless {
        config.browser.headless = true;
    }
    if let Some(dir) = &cli.snapshot_dir {
        config.snapshots.dir = dir.clone();
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "cert_lookup_results_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}
