use std::time::Duration;

use clap::Parser;
use convergence_core::config::ConvergenceConfig;
use convergence_scheduler::{IntervalTicker, JobEngine, PollingJob};
use convergence_sink::{DashboardSink, HttpSink, LogSink};
use convergence_source::{PercentSource, SqliteSource};
use tracing::info;

/// Publish the latest closed-trade profit percentage to the convergence widget.
#[derive(Debug, Parser)]
#[command(name = "convergence-job", version)]
struct Cli {
    /// Path to convergence.toml (falls back to CONVERGENCE_CONFIG, then ~/.convergence/).
    #[arg(short, long)]
    config: Option<String>,

    /// Run a single tick and exit (for cron-style invocation).
    #[arg(long)]
    once: bool,

    /// Log events instead of pushing them to the dashboard.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "convergence_job=info,convergence_scheduler=info,convergence_source=info,convergence_sink=info"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > CONVERGENCE_CONFIG env > ~/.convergence/convergence.toml
    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var("CONVERGENCE_CONFIG").ok());
    let config = ConvergenceConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        let defaults = ConvergenceConfig::default();
        tracing::warn!(
            config = config_path.as_deref().unwrap_or("~/.convergence/convergence.toml"),
            database = %defaults.database.path,
            "Config load failed ({}), using defaults",
            e
        );
        defaults
    });

    info!(path = %config.database.path, "opening percentage database");
    let source = SqliteSource::open(&config.database.path, config.database.query.clone())?;

    let sink: Box<dyn DashboardSink> = if cli.dry_run {
        Box::new(LogSink)
    } else {
        Box::new(HttpSink::new(&config.dashboard)?)
    };

    let job = if config.job.backfill {
        PollingJob::backfilled(&config.job.event, config.job.window, &source)
    } else {
        PollingJob::zeroed(&config.job.event, config.job.window)
    };
    let mut engine = JobEngine::new(job, Box::new(source) as Box<dyn PercentSource>, sink);

    if cli.once {
        let outcome = engine.run_once().await;
        info!(?outcome, "single tick complete");
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let ticker = IntervalTicker::new(Duration::from_secs(config.job.interval_secs));
    let handle = tokio::spawn(engine.run(ticker, shutdown_rx));
    info!(
        interval_secs = config.job.interval_secs,
        event = %config.job.event,
        "convergence job scheduled"
    );

    tokio::signal::ctrl_c().await?;
    info!("interrupt received");

    // signal engine to stop and wait for the in-flight tick
    let _ = shutdown_tx.send(true);
    let job = handle.await?;
    info!(last_x = job.last_x(), "convergence job stopped");
    Ok(())
}
