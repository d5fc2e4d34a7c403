/// Folder model
///
/// Folders nest through the self-referencing `parent_folder_id`. Nesting
/// depth is not limited.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE folders (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     name VARCHAR(255) NOT NULL,
///     parent_folder_id BIGINT REFERENCES folders(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const COLUMNS: &str = "id, user_id, name, parent_folder_id, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Folder {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub parent_folder_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    pub name: String,
    pub parent_folder_id: Option<i64>,
}

impl Folder {
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateFolder,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Folder>(&format!(
            r#"
            INSERT INTO folders (user_id, name, parent_folder_id)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.name)
        .bind(data.parent_folder_id)
        .fetch_one(pool)
        .await
    }

    /// Looks up a folder only if it belongs to `user_id`
    pub async fn find_for_user(
        pool: &PgPool,
        id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {COLUMNS} FROM folders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {COLUMNS} FROM folders WHERE user_id = $1"))
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
