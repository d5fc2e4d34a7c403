/// Uploaded file records
///
/// The row only describes a file; the bytes live on disk at `path`, which
/// [`crate::storage`] derives from the owner's id and the upload's filename.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE files (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     filename VARCHAR(255) NOT NULL,
///     path VARCHAR(512) NOT NULL,
///     file_type VARCHAR(255),
///     uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     folder_id BIGINT REFERENCES folders(id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

const COLUMNS: &str = "id, user_id, filename, path, file_type, uploaded_at, folder_id";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct File {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub path: String,
    pub file_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub folder_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    pub filename: String,
    pub path: String,
    pub file_type: Option<String>,
    pub folder_id: Option<i64>,
}

impl File {
    /// Takes an executor so the insert can share the upload's transaction
    pub async fn create<'e, E>(executor: E, user_id: i64, data: CreateFile) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, File>(&format!(
            r#"
            INSERT INTO files (user_id, filename, path, file_type, folder_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.filename)
        .bind(data.path)
        .bind(data.file_type)
        .bind(data.folder_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, File>(&format!("SELECT {COLUMNS} FROM files WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, File>(&format!("SELECT {COLUMNS} FROM files WHERE user_id = $1"))
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
