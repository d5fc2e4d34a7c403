/// Login endpoint
///
/// `POST /api/login/` takes a form with `email` and `password` and answers
/// with the matching user. There are no sessions or tokens; the client keeps
/// the returned user id. Unknown email and wrong password produce the same
/// 401 so the response does not reveal which accounts exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Form, Json};
use memoria_shared::{auth::password, models::user::User};
use serde::Deserialize;

/// Login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<User>> {
    let email = form.email.trim();

    let Some(user) = User::find_by_email(&state.db, email).await? else {
        tracing::info!("Login attempt for unknown email");
        return Err(invalid_credentials());
    };

    if !password::verify_password(&form.password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    tracing::debug!(user_id = user.id, "User logged in");
    Ok(Json(user))
}
