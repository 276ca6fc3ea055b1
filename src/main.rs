// API server entry point

use anyhow::{Context, Result};
use approval_cms::adapters::memory::InMemoryStore;
use approval_cms::app::{build_router, embedding_provider, AppPorts};
use approval_cms::config::{AppConfig, DatabaseConfig};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.as_str().into());
    let json = config.is_production();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn connect(database: &DatabaseConfig, url: &str) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = database
        .pool_options()
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if database.run_migrations {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Migrations complete");
    }

    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("Invalid configuration")?;
    tracing::info!(environment = ?config.server.environment, "Configuration loaded");

    let embeddings =
        embedding_provider(&config.embedding).context("Failed to build embedding provider")?;
    tracing::info!(model = embeddings.model(), "Embedding provider ready");

    let pool = match config.database.url() {
        Some(url) => Some(connect(&config.database, url).await?),
        None => {
            tracing::warn!("No database URL configured, using in-memory storage");
            None
        }
    };
    let ports = match &pool {
        Some(pool) => AppPorts::postgres(pool.clone(), embeddings),
        None => AppPorts::in_memory(InMemoryStore::new(), embeddings),
    };

    let app = build_router(&ports, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}
