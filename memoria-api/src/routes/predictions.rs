use super::UserQuery;
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use memoria_shared::predictions::{predictions_for_user, Predictions};

/// `GET /api/predictions/?user_id=`: retry suggestions for unfinished reminders
pub async fn predictions(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Predictions>> {
    Ok(Json(predictions_for_user(&state.db, query.user_id).await?))
}
