/// Stale analysis task recovery
///
/// Analysis jobs run inside the API process. If that process dies mid-job the
/// task is left `pending` or `running` forever. The recovery worker sweeps
/// for such tasks on an interval and re-runs them through the same
/// [`AnalysisRunner`].
///
/// # Example
///
/// ```no_run
/// use memoria_worker::analyzer::MockAnalyzer;
/// use memoria_worker::recovery::{RecoveryConfig, RecoveryWorker};
/// use memoria_worker::runner::AnalysisRunner;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example(pool: PgPool) {
/// let runner = AnalysisRunner::new(pool.clone(), Arc::new(MockAnalyzer::default()));
/// let worker = RecoveryWorker::new(pool, runner, RecoveryConfig::default());
///
/// let token = worker.shutdown_token();
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     token.cancel();
/// });
///
/// worker.run().await;
/// # }
/// ```

use crate::runner::AnalysisRunner;
use memoria_shared::models::analysis_task::AnalysisTask;
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Recovery worker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Delay between sweeps
    pub poll_interval: Duration,

    /// Age after which a pending or running task counts as abandoned
    pub stale_after: Duration,

    /// Maximum tasks re-claimed per sweep
    pub batch_size: i64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        RecoveryConfig {
            poll_interval: Duration::from_secs(5),
            stale_after: Duration::from_secs(300),
            batch_size: 10,
        }
    }
}

pub struct RecoveryWorker {
    db: PgPool,
    runner: AnalysisRunner,
    config: RecoveryConfig,
    shutdown_token: CancellationToken,
}

impl RecoveryWorker {
    pub fn new(db: PgPool, runner: AnalysisRunner, config: RecoveryConfig) -> Self {
        RecoveryWorker {
            db,
            runner,
            config,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Token that stops [`RecoveryWorker::run`] when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Sweeps until the shutdown token is cancelled
    ///
    /// A sweep in progress finishes its batch before the loop exits.
    pub async fn run(&self) {
        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            stale_after_secs = self.config.stale_after.as_secs(),
            analyzer = self.runner.analyzer_name(),
            "Recovery worker starting"
        );

        loop {
            tokio::select! {
                _ = self.shutdown_token.cancelled() => break,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            match self.sweep().await {
                Ok(0) => {}
                Ok(count) => info!(count, "Recovered stale analysis tasks"),
                Err(e) => error!(error = %e, "Failed to claim stale analysis tasks"),
            }
        }

        info!("Recovery worker shut down");
    }

    /// Re-claims one batch of stale tasks and runs them to completion
    ///
    /// Returns how many tasks were picked up.
    pub async fn sweep(&self) -> Result<usize, sqlx::Error> {
        let tasks =
            AnalysisTask::claim_stale(&self.db, self.config.stale_after, self.config.batch_size)
                .await?;
        let count = tasks.len();

        let mut jobs = JoinSet::new();
        for task in tasks {
            let runner = self.runner.clone();
            jobs.spawn(async move { runner.execute(task).await });
        }

        while let Some(joined) = jobs.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Recovered analysis job panicked");
            }
        }

        Ok(count)
    }
}
