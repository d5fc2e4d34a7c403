/// Image endpoints
///
/// - `POST /api/images/` - register an image for an uploaded file and start
///   its analysis
/// - `GET /api/images/tasks/:task_id/` - poll an analysis task
/// - `PATCH /api/images/:id/comment/` - set an image's comment
/// - `GET /api/images/?user_id=` - list images on a user's files
///
/// # Upload flow
///
/// ```text
/// POST /api/images/  ──► analysis task (pending) ──► 202 { placeholder image, task_id }
///                              │
///                              └─► background job: OCR ─► image row + task succeeded
/// ```
///
/// The placeholder has `id` 0 and no analysis fields. The real image id
/// appears on the task once it succeeds.

use super::UserQuery;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use memoria_shared::models::{
    analysis_task::{AnalysisTask, CreateAnalysisTask},
    file::File,
    image::Image,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of an accepted image upload
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageAccepted {
    #[serde(flatten)]
    pub image: Image,

    /// Poll `GET /api/images/tasks/<task_id>/` for the outcome
    pub task_id: Uuid,
}

async fn read_task_input(mut multipart: Multipart) -> ApiResult<CreateAnalysisTask> {
    let mut file_id = None;
    let mut reminder_id = None;
    let mut event_id = None;
    let mut is_proof = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await?;

        match name.as_str() {
            "file_id" => file_id = Some(forms::number_field("file_id", &value)?),
            "reminder_id" => reminder_id = forms::optional_number_field("reminder_id", &value)?,
            "event_id" => event_id = forms::optional_number_field("event_id", &value)?,
            "is_proof" => {
                is_proof = forms::parse_flag(&value).ok_or_else(|| {
                    ApiError::BadRequest("Field 'is_proof' must be a boolean".to_string())
                })?
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(CreateAnalysisTask {
        file_id: file_id.ok_or_else(|| forms::missing_field("file_id"))?,
        reminder_id,
        event_id,
        is_proof,
    })
}

pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ImageAccepted>)> {
    let input = read_task_input(multipart).await?;

    File::find_by_id(&state.db, input.file_id)
        .await?
        .ok_or_else(|| ApiError::not_found("File"))?;

    let task = AnalysisTask::create(&state.db, input).await?;
    state.runner.spawn(task.id);

    tracing::info!(task_id = %task.id, file_id = task.file_id, "Image analysis scheduled");

    Ok((
        StatusCode::ACCEPTED,
        Json(ImageAccepted {
            image: Image::placeholder(task.file_id, task.reminder_id, task.event_id, task.is_proof),
            task_id: task.id,
        }),
    ))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<AnalysisTask>> {
    AnalysisTask::find_by_id(&state.db, task_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Analysis task"))
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub comments: String,
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> ApiResult<Json<Image>> {
    Image::update_comment(&state.db, id, &form.comments)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Image"))
}

pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<Image>>> {
    Ok(Json(Image::list_by_user(&state.db, query.user_id).await?))
}
