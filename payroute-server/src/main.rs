//! PayRoute Server
//!
//! Resolves how a payment settles: directly in the payee's token, or through
//! a DEX swap quoted by an aggregator.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, CredentialOverrides};
use payroute_core::audit::{AuditLog, DatabaseAuditLog, NoopAuditLog, SwapRecorder};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// PayRoute - payment route resolution backend
#[derive(Parser, Debug)]
#[command(name = "payroute-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./payroute-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "PAYROUTE_LISTEN")]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,

    /// Postgres URL for the swap audit log; audit records are only logged when unset
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Aggregator API key
    #[arg(long, env = "PAYROUTE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Aggregator secret key used for request signing
    #[arg(long, env = "PAYROUTE_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Aggregator API passphrase
    #[arg(long, env = "PAYROUTE_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Aggregator project id
    #[arg(long, env = "PAYROUTE_PROJECT_ID")]
    project_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting payroute-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let credentials = CredentialOverrides {
        api_key: args.api_key.clone(),
        secret_key: args.secret_key.clone(),
        passphrase: args.passphrase.clone(),
        project_id: args.project_id.clone(),
    };
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen, credentials));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Create database connection pool, if configured
    let db_pool = match &args.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    e
                })?;
            tracing::info!("Database connection established");
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, completed swaps will not be persisted");
            None
        }
    };

    // Run migrations if requested
    if args.migrate {
        let Some(pool) = &db_pool else {
            anyhow::bail!("--migrate requires DATABASE_URL");
        };
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(pool).await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            e
        })?;
        tracing::info!("Migrations completed successfully");
    }

    // Create application state
    let audit_log: Arc<dyn AuditLog> = match &db_pool {
        Some(pool) => Arc::new(DatabaseAuditLog::new(pool.clone())),
        None => Arc::new(NoopAuditLog),
    };
    let state = AppState::new(&loaded_config, SwapRecorder::new(audit_log)).map_err(|e| {
        tracing::error!("Failed to build quote provider: {}", e);
        e
    })?;

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    // Close database connections gracefully
    if let Some(pool) = db_pool {
        tracing::info!("Closing database connections...");
        pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
