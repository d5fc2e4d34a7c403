/// Image model and database operations
///
/// An image row annotates an uploaded [`File`] with OCR output and may mark
/// it as proof for a reminder or an event. Rows are written by the analysis
/// job, never by the upload request itself, so `create` takes whatever
/// executor the job's unit of work provides.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE images (
///     id BIGSERIAL PRIMARY KEY,
///     file_id BIGINT NOT NULL REFERENCES files(id),
///     reminder_id BIGINT REFERENCES reminders(id),
///     event_id BIGINT REFERENCES events(id),
///     uploaded_at TIMESTAMPTZ DEFAULT NOW(),
///     analyzed_text TEXT,
///     ai_tags TEXT,
///     is_proof BOOLEAN NOT NULL DEFAULT FALSE,
///     comments TEXT
/// );
/// ```
///
/// [`File`]: crate::models::file::File

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

const COLUMNS: &str =
    "id, file_id, reminder_id, event_id, uploaded_at, analyzed_text, ai_tags, is_proof, comments";

const JOINED_COLUMNS: &str = "i.id, i.file_id, i.reminder_id, i.event_id, i.uploaded_at, \
     i.analyzed_text, i.ai_tags, i.is_proof, i.comments";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Image {
    pub id: i64,
    pub file_id: i64,
    pub reminder_id: Option<i64>,
    pub event_id: Option<i64>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub analyzed_text: Option<String>,
    pub ai_tags: Option<String>,
    pub is_proof: bool,
    pub comments: Option<String>,
}

/// Input for [`Image::create`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateImage {
    pub file_id: i64,
    pub reminder_id: Option<i64>,
    pub event_id: Option<i64>,
    pub is_proof: bool,
    pub analyzed_text: Option<String>,
    pub ai_tags: Option<String>,
}

/// An image joined with the on-disk path of its file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageWithPath {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub image: Image,

    pub file_path: String,
}

impl Image {
    /// Stand-in returned before the real row exists
    ///
    /// Carries id 0 and no timestamps or analysis output.
    pub fn placeholder(file_id: i64, reminder_id: Option<i64>, event_id: Option<i64>, is_proof: bool) -> Self {
        Image {
            id: 0,
            file_id,
            reminder_id,
            event_id,
            uploaded_at: None,
            analyzed_text: None,
            ai_tags: None,
            is_proof,
            comments: None,
        }
    }

    pub async fn create<'e, E>(executor: E, data: CreateImage) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Image>(&format!(
            r#"
            INSERT INTO images (file_id, reminder_id, event_id, is_proof, analyzed_text, ai_tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(data.file_id)
        .bind(data.reminder_id)
        .bind(data.event_id)
        .bind(data.is_proof)
        .bind(data.analyzed_text)
        .bind(data.ai_tags)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(&format!("SELECT {COLUMNS} FROM images WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Images whose file is owned by `user_id`
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}
            FROM images i
            JOIN files f ON f.id = i.file_id
            WHERE f.user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Same rows as [`Image::list_by_user`], each paired with its file path
    pub async fn list_with_paths_by_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<ImageWithPath>, sqlx::Error> {
        sqlx::query_as::<_, ImageWithPath>(&format!(
            r#"
            SELECT {JOINED_COLUMNS}, f.path AS file_path
            FROM images i
            JOIN files f ON f.id = i.file_id
            WHERE f.user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_by_event(pool: &PgPool, event_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(&format!("SELECT {COLUMNS} FROM images WHERE event_id = $1"))
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_reminder(
        pool: &PgPool,
        reminder_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(&format!(
            "SELECT {COLUMNS} FROM images WHERE reminder_id = $1"
        ))
        .bind(reminder_id)
        .fetch_all(pool)
        .await
    }

    /// Replaces the comment on an image
    ///
    /// Returns `None` when no image has that id.
    pub async fn update_comment(
        pool: &PgPool,
        id: i64,
        comments: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Image>(&format!(
            "UPDATE images SET comments = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(comments)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_no_identity_or_timestamps() {
        let image = Image::placeholder(1, Some(2), None, true);

        assert_eq!(image.id, 0);
        assert_eq!(image.file_id, 1);
        assert_eq!(image.reminder_id, Some(2));
        assert!(image.uploaded_at.is_none());
        assert!(image.analyzed_text.is_none());
        assert!(image.ai_tags.is_none());
        assert!(image.is_proof);
    }

    #[test]
    fn test_image_with_path_serializes_flat() {
        let row = ImageWithPath {
            image: Image::placeholder(3, None, Some(8), false),
            file_path: "static/uploads/user_1/cat.png".to_string(),
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["file_id"], 3);
        assert_eq!(json["event_id"], 8);
        assert_eq!(json["file_path"], "static/uploads/user_1/cat.png");
        assert!(json["uploaded_at"].is_null());
    }
}
