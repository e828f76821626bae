use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gym_journal_api::{app, config, database::DatabaseManager, AppState};

#[derive(Parser, Debug)]
#[command(name = "gym-journal-api")]
#[command(about = "Gym Journal API server", version)]
struct Args {
    /// Port to listen on (overrides API_PORT / PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Keep all data in process memory even when DATABASE_URL is set
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and friends are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gym_journal_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = config::config();
    tracing::info!("Starting Gym Journal API in {:?} mode", config.environment);

    let state = if args.in_memory || config.database.url.is_none() {
        tracing::warn!("No database configured, data is kept in memory only");
        AppState::in_memory(config)
    } else {
        AppState::connect(config)
            .await
            .context("failed to initialise database")?
    };

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Gym Journal API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return std::future::pending().await;
    }
    tracing::info!("Shutdown signal received");
}
