/// `GET /api/memories/?user_id=`
///
/// Slideshow feed of every image on the user's files, newest first.

use super::UserQuery;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use memoria_shared::memories::{memories_for_user, Memories};

pub async fn memories(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Memories>> {
    Ok(Json(memories_for_user(&state.db, query.user_id).await?))
}
