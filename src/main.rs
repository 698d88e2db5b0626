//! alertmanager-relay - alert lifecycle service
//!
//! Builds the configured storage backend, runs the retention sweeper for
//! durable storage and waits for a shutdown signal.

#![allow(missing_docs)]

use alertmanager_relay::config::StorageKind;
use alertmanager_relay::utils::logging::init_logging;
use alertmanager_relay::utils::shutdown::create_shutdown_token;
use alertmanager_relay::{
    AlertStore, Config, LifecycleCoordinator, RetentionSweeper, VERSION, build_info,
    create_backend,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "alertmanager-relay", version, about)]
struct Cli {
    /// YAML configuration file; environment variables alone are used when omitted
    #[arg(short, long, env = "ALERT_RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => Config::from_file(path).await,
        None => Config::from_env(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.logging()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> alertmanager_relay::Result<()> {
    let build = build_info();
    info!(
        "Starting alertmanager-relay {} ({})",
        VERSION, build.git_hash
    );

    let backend = create_backend(&config.relay).await?;
    let store = AlertStore::new(backend.clone());
    let coordinator = LifecycleCoordinator::new(store.clone(), config.lifecycle());
    info!(
        "Lifecycle coordinator ready (storage: {}, display timezone: {})",
        coordinator.store().kind(),
        coordinator.display_timezone()
    );

    let shutdown = create_shutdown_token();

    let sweeper = match backend.kind() {
        StorageKind::Durable if config.retention().enabled => {
            let sweeper = Arc::new(RetentionSweeper::new(backend.clone(), config.retention())?);
            Some(sweeper.spawn(shutdown.child_token()))
        }
        StorageKind::Durable => {
            info!("Retention sweeper disabled");
            None
        }
        StorageKind::Ephemeral => None,
    };

    shutdown.cancelled().await;
    info!("Shutting down");

    if let Some(handle) = sweeper {
        if let Err(e) = handle.await {
            warn!("Retention sweeper task ended abnormally: {}", e);
        }
    }

    store.close().await?;
    info!("Shutdown complete");
    Ok(())
}
