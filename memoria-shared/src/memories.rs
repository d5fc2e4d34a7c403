/// The "memories" feed
///
/// One slide per image a user owns (through the image's file), newest
/// upload first. Slides come from a single image/file join; there is no
/// pagination.

use crate::models::image::{Image, ImageWithPath};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub image_id: i64,
    pub file_path: String,
    pub reminder_id: Option<i64>,
    pub event_id: Option<i64>,
    pub is_proof: bool,
    pub analyzed_text: Option<String>,
    pub ai_tags: Option<String>,
    pub comments: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Response body of the memories endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memories {
    pub slides: Vec<Slide>,
}

impl From<ImageWithPath> for Slide {
    fn from(row: ImageWithPath) -> Self {
        let ImageWithPath { image, file_path } = row;
        let Image {
            id,
            reminder_id,
            event_id,
            uploaded_at,
            analyzed_text,
            ai_tags,
            is_proof,
            comments,
            ..
        } = image;

        Slide {
            image_id: id,
            file_path,
            reminder_id,
            event_id,
            is_proof,
            analyzed_text,
            ai_tags,
            comments,
            uploaded_at,
        }
    }
}

/// Newest first; slides without a timestamp go last
fn newest_first(a: &Slide, b: &Slide) -> Ordering {
    match (&a.uploaded_at, &b.uploaded_at) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Turns joined rows into slides ordered for display
pub fn build_slides(rows: Vec<ImageWithPath>) -> Vec<Slide> {
    let mut slides: Vec<Slide> = rows.into_iter().map(Slide::from).collect();
    slides.sort_by(newest_first);
    slides
}

/// Loads and orders the memories feed for `user_id`
pub async fn memories_for_user(pool: &PgPool, user_id: i64) -> Result<Memories, sqlx::Error> {
    let rows = Image::list_with_paths_by_user(pool, user_id).await?;
    Ok(Memories {
        slides: build_slides(rows),
    })
}
