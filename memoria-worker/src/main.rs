//! # Memoria Worker
//!
//! Re-runs image analysis tasks left pending or running by an API process
//! that stopped mid-job.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p memoria-worker
//! ```

use memoria_shared::db::migrations::run_migrations;
use memoria_shared::db::pool::{close_pool, create_pool, PoolSettings};
use memoria_worker::config::WorkerConfig;
use memoria_worker::recovery::RecoveryWorker;
use memoria_worker::runner::AnalysisRunner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WorkerConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "memoria_worker=debug,memoria_shared=info".into());
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

    tracing::info!("Memoria Worker v{} starting...", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(PoolSettings {
        url: config.database_url.clone(),
        max_connections: config.database_max_connections,
        ..PoolSettings::default()
    })
    .await?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let analyzer = config.analyzer.build();
    let runner = AnalysisRunner::new(pool.clone(), analyzer);
    let worker = RecoveryWorker::new(pool.clone(), runner, config.recovery.clone());

    let token = worker.shutdown_token();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
        tracing::info!("Shutdown signal received");
        token.cancel();
    });

    worker.run().await;
    close_pool(pool).await;

    Ok(())
}
