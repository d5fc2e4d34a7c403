/// File endpoints
///
/// - `POST /api/files/` - multipart upload with `user_id`, optional
///   `folder_id` and the `file` part
/// - `GET /api/files/?user_id=` - list a user's files
///
/// Bytes are written under `<static_dir>/uploads/user_<id>/` and the row
/// records that path, so the upload is reachable under `/static`. The bytes
/// are staged beside the destination and only replace it once the row is
/// inserted; a failed insert leaves the previous upload in place.

use super::UserQuery;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    forms,
};
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use memoria_shared::{
    models::{
        file::{CreateFile, File},
        folder::Folder,
        user::User,
    },
    storage,
};
use std::path::Path;

/// Parts of an upload request, before validation
#[derive(Debug, Default)]
struct UploadParts {
    user_id: Option<i64>,
    folder_id: Option<i64>,
    file: Option<(Option<String>, Bytes)>,
}

async fn read_parts(mut multipart: Multipart) -> ApiResult<UploadParts> {
    let mut parts = UploadParts::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "user_id" => parts.user_id = Some(forms::number_field("user_id", &field.text().await?)?),
            "folder_id" => parts.folder_id = forms::optional_number_field("folder_id", &field.text().await?)?,
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                parts.file = Some((filename, data));
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    Ok(parts)
}

pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<File>> {
    let parts = read_parts(multipart).await?;

    let user_id = parts.user_id.ok_or_else(|| forms::missing_field("user_id"))?;
    let (raw_name, data) = parts.file.ok_or_else(|| forms::missing_field("file"))?;
    let filename = raw_name
        .as_deref()
        .and_then(storage::sanitize_filename)
        .ok_or_else(|| ApiError::BadRequest("Upload has no usable filename".to_string()))?;

    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if let Some(folder_id) = parts.folder_id {
        Folder::find_for_user(&state.db, folder_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Folder"))?;
    }

    let destination = storage::upload_path(&state.config.storage.static_dir, user_id, &filename);
    let staged = storage::stage_upload(&destination, &data).await?;

    let record = CreateFile {
        file_type: Some(storage::file_type_of(&filename)),
        path: destination.to_string_lossy().into_owned(),
        filename,
        folder_id: parts.folder_id,
    };
    let file = match store_file(&state, user_id, record, &staged, &destination).await {
        Ok(file) => file,
        Err(e) => {
            storage::discard_upload(&staged).await;
            return Err(e);
        }
    };

    tracing::info!(file_id = file.id, user_id, size = data.len(), "File uploaded");
    Ok(Json(file))
}

/// Inserts the row and moves the staged bytes into place, committing only if both succeed
async fn store_file(
    state: &AppState,
    user_id: i64,
    record: CreateFile,
    staged: &Path,
    destination: &Path,
) -> ApiResult<File> {
    let mut tx = state.db.begin().await?;
    let file = File::create(&mut *tx, user_id, record).await?;
    storage::commit_upload(staged, destination).await?;
    tx.commit().await?;
    Ok(file)
}

pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<File>>> {
    Ok(Json(File::list_by_user(&state.db, query.user_id).await?))
}
