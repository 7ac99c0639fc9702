use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod routes;
mod state;

use auth::{JwtConfig, JwtService, RevocationList, SessionManager};
use common::{Database, DatabaseConfig};
use notifier::NotifierConfig;
use store::Store;
use tokio::net::TcpListener;

use crate::{config::ServerConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting LeadConnect API service");

    let server_config = ServerConfig::from_env()?;

    // Initialize the entity store, degrading to SQLite if the primary is down
    let db_config = DatabaseConfig::from_env()?;
    let database = Database::connect_with_fallback(&db_config).await?;
    if database.health_check().await? {
        info!(backend = ?database.backend(), "Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    let store = Store::open(database).await?;

    let jwt_service = JwtService::new(&JwtConfig::from_env()?);
    let sessions = SessionManager::new(
        jwt_service,
        RevocationList::new(store.revoked_tokens.clone()),
    );

    // The notifier reaches the API only through HTTP
    let notifier_config = NotifierConfig::from_env(server_config.port)?;
    info!(
        url = %notifier_config.url,
        at = %notifier_config.at,
        timezone = %notifier_config.timezone,
        "Scheduling daily notification"
    );
    let notifier = notifier::from_config(&notifier_config)?.spawn();

    let app = routes::create_router(AppState { store, sessions });

    let listener = TcpListener::bind(server_config.addr()).await?;
    info!(addr = %server_config.addr(), "API service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    notifier.shutdown().await;
    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
