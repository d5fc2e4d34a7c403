//! # Memoria API Server
//!
//! Serves the Memoria REST API and the uploaded files under `/static`.
//! Image uploads start OCR analysis in the background; the separate
//! `memoria-worker` binary picks up analysis tasks this process abandons.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p memoria-api
//! ```

use memoria_api::{
    app::{build_router, AppState},
    config::Config,
};
use memoria_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, PoolSettings},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memoria_api=debug,memoria_worker=info,tower_http=debug".into());
    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Memoria API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(PoolSettings {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..PoolSettings::default()
    })
    .await?;

    if config.database.run_migrations {
        run_migrations(&pool).await?;
    }

    tokio::fs::create_dir_all(&config.storage.static_dir).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    tracing::info!(analyzer = state.runner.analyzer_name(), "Image analyzer ready");

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received, exiting...");
        })
        .await?;

    close_pool(pool).await;
    Ok(())
}
