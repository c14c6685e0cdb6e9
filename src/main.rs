//! steward service entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steward::{http, LifecycleController, ServerConfig};

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Minimal HTTP service with a managed lifecycle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service and run until interrupted
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steward=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            let config = ServerConfig::from_env()?;
            tracing::info!(
                bind_address = %config.bind_address,
                shutdown_wait_secs = config.shutdown_wait.as_secs(),
                "configuration loaded"
            );

            let router = http::build_router(&config);
            let handle = LifecycleController::new(config).start(router);
            handle.wait_and_shutdown().await;
        }
    }

    Ok(())
}
