use axum::Json;
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "Welcome to the To-Do/Reminder API!";

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// `GET /api/welcome/`
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}
