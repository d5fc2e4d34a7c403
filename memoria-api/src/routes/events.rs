/// Event endpoints
///
/// - `POST /api/events/?user_id=` - create an event and link reminders to it
/// - `GET /api/events/?user_id=` - list events with their reminders
/// - `GET /api/events/:id/images/` - images attached to an event
///
/// Linking only touches reminders the user owns. Requested ids that are
/// missing or belong to someone else come back in `skipped_reminder_ids`.

use super::UserQuery;
use crate::{app::AppState, error::ApiResult, forms};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDateTime;
use memoria_shared::models::{
    event::{CreateEvent, CreatedEvent, Event, EventWithReminders},
    image::Image,
};
use serde::Deserialize;
use validator::Validate;

/// New event request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "forms::optional_datetime")]
    pub date: Option<NaiveDateTime>,

    #[serde(default)]
    #[validate(length(max = 10, message = "Time must be at most 10 characters"))]
    pub time: Option<String>,

    #[serde(default)]
    pub reminder_ids: Vec<i64>,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(req: CreateEventRequest) -> Self {
        CreateEvent {
            title: req.title,
            description: req.description,
            date: req.date,
            time: req.time,
            reminder_ids: req.reminder_ids,
        }
    }
}

pub async fn create_event(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<Json<CreatedEvent>> {
    req.validate()?;

    let created = Event::create(&state.db, query.user_id, req.into()).await?;

    tracing::debug!(
        event_id = created.event.id,
        linked = created.reminders.len(),
        skipped = created.skipped_reminder_ids.len(),
        "Event created"
    );
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<EventWithReminders>>> {
    Ok(Json(Event::list_by_user(&state.db, query.user_id).await?))
}

/// An unknown event id yields an empty list
pub async fn event_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(Image::list_by_event(&state.db, id).await?))
}
