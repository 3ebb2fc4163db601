use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use energy_api::{
    build_router,
    config::{AppConfig, StorageBackend},
    metrics_server, observability, AppState,
};
use energy_client::{db::schema, EnergyStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let store: Arc<dyn EnergyStore> = match cfg.storage.backend {
        StorageBackend::Postgres => {
            let pool = cfg.database.pool_options().connect(&cfg.database.uri).await?;
            tracing::info!(
                max_connections = cfg.database.max_connections,
                min_connections = cfg.database.min_connections,
                "connected to PostgreSQL"
            );
            if cfg.database.apply_schema {
                schema::apply_schema(&pool).await?;
            }
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let app = build_router(AppState::new(store), &cfg.server.base_path);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, base_path = %cfg.server.base_path, "energy API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("energy API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
