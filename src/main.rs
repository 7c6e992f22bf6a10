use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use submission_service::config;
use submission_service::lifecycle::{self, Shutdown};
use submission_service::observability;
use submission_service::SubmissionServer;

#[derive(Parser)]
#[command(name = "submission-service", version)]
#[command(about = "Accepts name/message submissions and serves them back", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(short, long, env = "SUBMISSION_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    observability::init_logging(&config.observability);

    tracing::info!("submission-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = ?config.database,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Nothing is served unless the store is connected, reachable and provisioned.
    let store = match lifecycle::bootstrap_postgres(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    let metrics = if config.observability.metrics_enabled {
        let handle = observability::init_metrics()?;
        observability::spawn_upkeep(handle.clone(), observability::UPKEEP_INTERVAL);
        Some(handle)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = SubmissionServer::new(config, store, metrics);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
