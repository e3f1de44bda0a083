use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsroom::config::Config;
use newsroom::pipeline::{fetch_and_store_articles, FetchOrchestrator, IngestReport};
use newsroom::scheduler::{run_scheduler, IngestSchedule};
use newsroom::server::ApiServer;
use newsroom::storage::open_repository;

#[derive(Parser)]
#[command(
    name = "newsroom",
    version,
    about = "News aggregation backend: pulls NewsAPI, The Guardian and the NYT into one searchable store",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (environment variables are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Keep articles in memory instead of SQLite
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one ingestion pass over every provider and section
    Fetch,

    /// Serve the read API with scheduled ingestion
    Serve {
        /// Serve only; do not run scheduled ingestion
        #[arg(long, default_value = "false")]
        no_schedule: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "newsroom starting");

    match cli.command {
        Commands::Fetch => fetch(&config, cli.memory).await,
        Commands::Serve { no_schedule } => serve(config, cli.memory, no_schedule).await,
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => tracing_subscriber::EnvFilter::new("newsroom=debug,tower_http=debug,info"),
        Err(_) => tracing_subscriber::EnvFilter::try_new(format!("newsroom={level},tower_http={level},warn"))
            .with_context(|| format!("Invalid log level: {level}"))?,
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn fetch(config: &Config, in_memory: bool) -> Result<()> {
    let repo = open_repository(&config.database, in_memory)?;
    let orchestrator = FetchOrchestrator::from_config(config, repo)?;

    let report = fetch_and_store_articles(&orchestrator)
        .await
        .context("Ingestion run aborted")?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &IngestReport) {
    println!("Ingestion finished in {} ms", report.elapsed_ms);
    for provider in &report.providers {
        let status = if provider.crashed { " (crashed)" } else { "" };
        println!(
            "  {}{}: {} section(s) ok, {} failed, {} fetched, {} created, {} updated, {} not stored",
            provider.provider,
            status,
            provider.sections_succeeded,
            provider.sections_failed,
            provider.fetched,
            provider.store.created,
            provider.store.updated,
            provider.store.failed,
        );
    }

    let store = report.store();
    println!(
        "  Total: {} fetched, {} created, {} updated, {} not stored",
        report.fetched(),
        store.created,
        store.updated,
        store.failed
    );
}

async fn serve(config: Config, in_memory: bool, no_schedule: bool) -> Result<()> {
    let repo = open_repository(&config.database, in_memory)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if no_schedule {
        tracing::info!("Scheduled ingestion disabled");
        None
    } else {
        let orchestrator = Arc::new(FetchOrchestrator::from_config(&config, repo.clone())?);
        let schedule = IngestSchedule::new(&config.schedule.hours_utc)?;
        Some(tokio::spawn(run_scheduler(
            orchestrator,
            schedule,
            config.schedule.run_on_startup,
            shutdown_rx,
        )))
    };

    let server = ApiServer::new(config.server.clone(), repo);
    let served = server.start_with_shutdown(shutdown_signal()).await;

    // Stop the scheduler whether or not the server exited cleanly
    let _ = shutdown_tx.send(true);
    if let Some(handle) = scheduler {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
    }

    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
