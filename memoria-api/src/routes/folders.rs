/// Folder endpoints
///
/// - `POST /api/folders/?user_id=` - create a folder
/// - `GET /api/folders/?user_id=` - list a user's folders
///
/// A parent folder must belong to the same user.

use super::UserQuery;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Json,
};
use memoria_shared::models::folder::{CreateFolder, Folder};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[serde(default)]
    pub parent_folder_id: Option<i64>,
}

pub async fn create_folder(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<Folder>> {
    req.validate()?;

    if let Some(parent_id) = req.parent_folder_id {
        Folder::find_for_user(&state.db, parent_id, query.user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Parent folder"))?;
    }

    let folder = Folder::create(
        &state.db,
        query.user_id,
        CreateFolder {
            name: req.name,
            parent_folder_id: req.parent_folder_id,
        },
    )
    .await?;

    Ok(Json(folder))
}

pub async fn list_folders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<Folder>>> {
    Ok(Json(Folder::list_by_user(&state.db, query.user_id).await?))
}
