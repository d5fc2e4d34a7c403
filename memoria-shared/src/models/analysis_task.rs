/// Deferred image analysis tasks
///
/// An image upload does not create its image row directly. It records an
/// analysis task and returns the task id to the caller, who can poll it. The
/// job that runs the task writes the image and marks the task succeeded in a
/// single transaction.
///
/// # State Machine
///
/// ```text
/// pending → running → succeeded
///                   → failed
/// ```
///
/// A task stuck in `pending` or `running` past a threshold (for example
/// because the API process restarted mid-job) can be re-claimed with
/// [`AnalysisTask::claim_stale`].
///
/// Every claim increments `attempt`. Finishing a task requires the attempt
/// the job claimed, so a job whose claim was taken over cannot write an
/// image or change the task's state.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE analysis_state AS ENUM ('pending', 'running', 'succeeded', 'failed');
///
/// CREATE TABLE analysis_tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     file_id BIGINT NOT NULL REFERENCES files(id),
///     reminder_id BIGINT REFERENCES reminders(id),
///     event_id BIGINT REFERENCES events(id),
///     is_proof BOOLEAN NOT NULL DEFAULT FALSE,
///     state analysis_state NOT NULL DEFAULT 'pending',
///     image_id BIGINT REFERENCES images(id),
///     error TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     started_at TIMESTAMPTZ,
///     finished_at TIMESTAMPTZ,
///     attempt INTEGER NOT NULL DEFAULT 0
/// );
/// ```

use crate::models::image::CreateImage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

const COLUMNS: &str = "id, file_id, reminder_id, event_id, is_proof, state, image_id, error, \
     created_at, started_at, finished_at, attempt";

/// Lifecycle of an analysis task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "analysis_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnalysisState {
    /// Recorded, not yet picked up
    Pending,

    /// Claimed by a job
    Running,

    /// Image row written
    Succeeded,

    /// Analysis or persistence failed; see `error`
    Failed,
}

impl AnalysisState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisState::Pending => "pending",
            AnalysisState::Running => "running",
            AnalysisState::Succeeded => "succeeded",
            AnalysisState::Failed => "failed",
        }
    }

    /// Whether the task can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisState::Succeeded | AnalysisState::Failed)
    }
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisTask {
    /// Correlation token handed to the uploader
    pub id: Uuid,
    pub file_id: i64,
    pub reminder_id: Option<i64>,
    pub event_id: Option<i64>,
    pub is_proof: bool,
    pub state: AnalysisState,

    /// Set once the task succeeds
    pub image_id: Option<i64>,

    /// Set once the task fails
    pub error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of times the task has been claimed
    pub attempt: i32,
}

/// Input for [`AnalysisTask::create`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAnalysisTask {
    pub file_id: i64,
    pub reminder_id: Option<i64>,
    pub event_id: Option<i64>,
    pub is_proof: bool,
}

impl AnalysisTask {
    /// Builds the image insert for this task from analysis output
    pub fn image_input(&self, analyzed_text: String, ai_tags: String) -> CreateImage {
        CreateImage {
            file_id: self.file_id,
            reminder_id: self.reminder_id,
            event_id: self.event_id,
            is_proof: self.is_proof,
            analyzed_text: Some(analyzed_text),
            ai_tags: Some(ai_tags),
        }
    }

    /// Records a new task in `pending`
    pub async fn create(pool: &PgPool, data: CreateAnalysisTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTask>(&format!(
            r#"
            INSERT INTO analysis_tasks (file_id, reminder_id, event_id, is_proof)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.file_id)
        .bind(data.reminder_id)
        .bind(data.event_id)
        .bind(data.is_proof)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTask>(&format!(
            "SELECT {COLUMNS} FROM analysis_tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Moves a pending task to `running`
    ///
    /// Returns `None` if the task is missing or someone else claimed it first.
    pub async fn claim(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTask>(&format!(
            r#"
            UPDATE analysis_tasks
            SET state = $2, started_at = NOW(), attempt = attempt + 1
            WHERE id = $1 AND state = $3
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(AnalysisState::Running)
        .bind(AnalysisState::Pending)
        .fetch_optional(pool)
        .await
    }

    /// Claims up to `limit` tasks that have been pending or running longer than `stale_after`
    ///
    /// Claimed tasks are moved to `running` with a fresh `started_at` and a
    /// new attempt, which fences out the job that held the previous claim.
    /// Rows locked by a concurrent claimer or finishing job are skipped.
    pub async fn claim_stale(
        pool: &PgPool,
        stale_after: Duration,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTask>(&format!(
            r#"
            WITH stale AS (
                SELECT id
                FROM analysis_tasks
                WHERE (state = $1 AND created_at < NOW() - make_interval(secs => $3))
                   OR (state = $2 AND started_at < NOW() - make_interval(secs => $3))
                ORDER BY created_at ASC
                LIMIT $4
                FOR UPDATE SKIP LOCKED
            )
            UPDATE analysis_tasks
            SET state = $2, started_at = NOW(), attempt = analysis_tasks.attempt + 1
            FROM stale
            WHERE analysis_tasks.id = stale.id
            RETURNING {}
            "#,
            qualified_columns()
        ))
        .bind(AnalysisState::Pending)
        .bind(AnalysisState::Running)
        .bind(stale_after.as_secs_f64())
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Locks the task row for the attempt that claimed it
    ///
    /// Returns `false` if the task is no longer `running` under `attempt`.
    /// Call inside the transaction that writes the job's result; the lock
    /// holds off re-claims until it commits.
    pub async fn lock_claim<'e, E>(executor: E, id: Uuid, attempt: i32) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM analysis_tasks
            WHERE id = $1 AND state = $2 AND attempt = $3
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(AnalysisState::Running)
        .bind(attempt)
        .fetch_optional(executor)
        .await?;

        Ok(row.is_some())
    }

    /// Marks the task succeeded, pointing at the image it produced
    ///
    /// Takes an executor so it can share the transaction that inserted the
    /// image. Returns `false`, changing nothing, if `attempt` no longer holds
    /// the claim.
    pub async fn mark_succeeded<'e, E>(
        executor: E,
        id: Uuid,
        attempt: i32,
        image_id: i64,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE analysis_tasks
            SET state = $2, image_id = $3, error = NULL, finished_at = NOW()
            WHERE id = $1 AND state = $4 AND attempt = $5
            "#,
        )
        .bind(id)
        .bind(AnalysisState::Succeeded)
        .bind(image_id)
        .bind(AnalysisState::Running)
        .bind(attempt)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Marks the task failed with `error`
    ///
    /// Returns `false`, changing nothing, if `attempt` no longer holds the claim.
    pub async fn mark_failed(
        pool: &PgPool,
        id: Uuid,
        attempt: i32,
        error: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE analysis_tasks
            SET state = $2, error = $3, finished_at = NOW()
            WHERE id = $1 AND state = $4 AND attempt = $5
            "#,
        )
        .bind(id)
        .bind(AnalysisState::Failed)
        .bind(error)
        .bind(AnalysisState::Running)
        .bind(attempt)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Column list prefixed with the table name, for UPDATE ... FROM statements
fn qualified_columns() -> String {
    COLUMNS
        .split(',')
        .map(|column| format!("analysis_tasks.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> AnalysisTask {
        AnalysisTask {
            id: Uuid::new_v4(),
            file_id: 12,
            reminder_id: Some(3),
            event_id: None,
            is_proof: true,
            state: AnalysisState::Running,
            image_id: None,
            error: None,
            created_at: Utc::now(),
            started_at: Some(Utc::now()),
            finished_at: None,
            attempt: 1,
        }
    }

    #[test]
    fn test_state_strings_and_terminality() {
        assert_eq!(AnalysisState::Pending.as_str(), "pending");
        assert_eq!(AnalysisState::Failed.to_string(), "failed");
        assert!(!AnalysisState::Pending.is_terminal());
        assert!(!AnalysisState::Running.is_terminal());
        assert!(AnalysisState::Succeeded.is_terminal());
        assert!(AnalysisState::Failed.is_terminal());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let json = serde_json::to_value(AnalysisState::Succeeded).unwrap();
        assert_eq!(json, "succeeded");
    }

    #[test]
    fn test_image_input_copies_task_links() {
        let task = task();
        let input = task.image_input("cat dog".to_string(), "cat, dog".to_string());

        assert_eq!(input.file_id, 12);
        assert_eq!(input.reminder_id, Some(3));
        assert_eq!(input.event_id, None);
        assert!(input.is_proof);
        assert_eq!(input.analyzed_text.as_deref(), Some("cat dog"));
        assert_eq!(input.ai_tags.as_deref(), Some("cat, dog"));
    }

    #[test]
    fn test_qualified_columns() {
        let columns = qualified_columns();
        assert!(columns.starts_with("analysis_tasks.id, analysis_tasks.file_id"));
        assert!(columns.ends_with("analysis_tasks.attempt"));
        assert!(!columns.contains("analysis_tasks. "));
    }
}
