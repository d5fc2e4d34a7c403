/// Reminder endpoints
///
/// - `POST /api/reminders/` - create from a form
/// - `GET /api/reminders/?user_id=` - list a user's reminders
/// - `GET /api/reminders/:id/images/` - images attached to a reminder

use super::UserQuery;
use crate::{app::AppState, error::ApiResult, forms};
use axum::{
    extract::{Path, Query, State},
    Form, Json,
};
use chrono::NaiveDateTime;
use memoria_shared::models::{
    image::Image,
    reminder::{CreateReminder, Reminder},
};
use serde::Deserialize;
use validator::Validate;

/// Reminder form
///
/// Blank optional inputs are treated as absent; `status` and `priority`
/// default to `pending` and `normal`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReminderForm {
    pub user_id: i64,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[serde(default, deserialize_with = "forms::blank_text_as_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "forms::optional_datetime")]
    pub date: Option<NaiveDateTime>,

    #[serde(default, deserialize_with = "forms::blank_text_as_none")]
    #[validate(length(max = 10, message = "Time must be at most 10 characters"))]
    pub time: Option<String>,

    #[serde(default, deserialize_with = "forms::blank_text_as_none")]
    #[validate(length(max = 50, message = "Recurrence must be at most 50 characters"))]
    pub recurrence: Option<String>,

    #[serde(default, deserialize_with = "forms::blank_text_as_none")]
    #[validate(length(max = 50, message = "Status must be at most 50 characters"))]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "forms::blank_text_as_none")]
    #[validate(length(max = 50, message = "Priority must be at most 50 characters"))]
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "forms::blank_as_none")]
    pub parent_event_id: Option<i64>,
}

impl From<CreateReminderForm> for CreateReminder {
    fn from(form: CreateReminderForm) -> Self {
        CreateReminder {
            title: form.title,
            description: form.description,
            date: form.date,
            time: form.time,
            recurrence: form.recurrence,
            status: form.status,
            priority: form.priority,
            parent_event_id: form.parent_event_id,
        }
    }
}

pub async fn create_reminder(
    State(state): State<AppState>,
    Form(form): Form<CreateReminderForm>,
) -> ApiResult<Json<Reminder>> {
    form.validate()?;

    let user_id = form.user_id;
    let reminder = Reminder::create(&state.db, user_id, form.into()).await?;

    tracing::debug!(reminder_id = reminder.id, user_id, "Reminder created");
    Ok(Json(reminder))
}

pub async fn list_reminders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(Reminder::list_by_user(&state.db, query.user_id).await?))
}

/// An unknown reminder id yields an empty list
pub async fn reminder_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(Image::list_by_reminder(&state.db, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_form_uses_defaults() {
        let form: CreateReminderForm =
            serde_urlencoded::from_str("user_id=7&title=Water+plants&date=&parent_event_id=").unwrap();
        assert!(form.validate().is_ok());

        let input = CreateReminder::from(form);
        assert_eq!(input.title, "Water plants");
        assert_eq!(input.date, None);
        assert_eq!(input.status, None);
        assert_eq!(input.priority, None);
        assert_eq!(input.parent_event_id, None);
    }

    #[test]
    fn test_full_form() {
        let form: CreateReminderForm = serde_urlencoded::from_str(
            "user_id=7&title=Gym&description=Leg+day&date=2024-06-01T07:00&time=07%3A00\
             &recurrence=weekly&status=done&priority=high&parent_event_id=3",
        )
        .unwrap();

        let input = CreateReminder::from(form);
        assert_eq!(input.description.as_deref(), Some("Leg day"));
        assert_eq!(input.time.as_deref(), Some("07:00"));
        assert_eq!(input.recurrence.as_deref(), Some("weekly"));
        assert_eq!(input.status.as_deref(), Some("done"));
        assert_eq!(input.priority.as_deref(), Some("high"));
        assert_eq!(input.parent_event_id, Some(3));
        assert!(input.date.is_some());
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let form: CreateReminderForm = serde_urlencoded::from_str("user_id=7&title=").unwrap();
        assert!(form.validate().is_err());
    }
}
