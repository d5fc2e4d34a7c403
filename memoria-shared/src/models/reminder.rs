/// Reminder model and database operations
///
/// A reminder belongs to one user and may hang off an [`Event`] through
/// `parent_event_id`. `recurrence` is stored verbatim; nothing schedules it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reminders (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     date TIMESTAMP,
///     time VARCHAR(10),
///     recurrence VARCHAR(50),
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     priority VARCHAR(50) NOT NULL DEFAULT 'normal',
///     parent_event_id BIGINT REFERENCES events(id)
/// );
/// ```
///
/// [`Event`]: crate::models::event::Event

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Status given to reminders created without one
pub const DEFAULT_STATUS: &str = "pending";

/// Priority given to reminders created without one
pub const DEFAULT_PRIORITY: &str = "normal";

/// Status marking a reminder as finished
pub const STATUS_DONE: &str = "done";

const COLUMNS: &str = "id, user_id, title, description, date, time, recurrence, status, priority, parent_event_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub time: Option<String>,
    pub recurrence: Option<String>,
    pub status: String,
    pub priority: String,
    pub parent_event_id: Option<i64>,
}

/// Input for [`Reminder::create`]
///
/// `status` and `priority` fall back to [`DEFAULT_STATUS`] and
/// [`DEFAULT_PRIORITY`] when `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateReminder {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub time: Option<String>,
    pub recurrence: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub parent_event_id: Option<i64>,
}

impl Reminder {
    /// Whether the reminder has been completed
    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }

    /// Inserts a reminder for `user_id`
    ///
    /// The user is not looked up first; a dangling id fails on the foreign key.
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateReminder,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO reminders
                (user_id, title, description, date, time, recurrence, status, priority, parent_event_id)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{DEFAULT_STATUS}'), COALESCE($8, '{DEFAULT_PRIORITY}'), $9)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Reminder>(&query)
            .bind(user_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.date)
            .bind(data.time)
            .bind(data.recurrence)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.parent_event_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(&format!("SELECT {COLUMNS} FROM reminders WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All reminders of a user, in database order
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Reminder>(&format!(
            "SELECT {COLUMNS} FROM reminders WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Reminders whose parent is any of `event_ids`
    pub async fn list_by_events<'e, E>(
        executor: E,
        event_ids: &[i64],
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Reminder>(&format!(
            "SELECT {COLUMNS} FROM reminders WHERE parent_event_id = ANY($1) ORDER BY id"
        ))
        .bind(event_ids)
        .fetch_all(executor)
        .await
    }

    /// Points every reminder in `ids` that belongs to `user_id` at `event_id`
    ///
    /// Returns the ids that were actually linked. Ids that do not exist or
    /// belong to someone else are left untouched.
    pub async fn attach_to_event<'e, E>(
        executor: E,
        event_id: i64,
        user_id: i64,
        ids: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let linked: Vec<(i64,)> = sqlx::query_as(
            r#"
            UPDATE reminders
            SET parent_event_id = $1
            WHERE id = ANY($2) AND user_id = $3
            RETURNING id
            "#,
        )
        .bind(event_id)
        .bind(ids)
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(linked.into_iter().map(|(id,)| id).collect())
    }
}
