/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`, `welcome`: liveness and greeting
/// - `auth`: login
/// - `users`, `reminders`, `events`, `folders`, `files`, `images`: CRUD
/// - `memories`, `predictions`: read-only views over a user's data

pub mod auth;
pub mod events;
pub mod files;
pub mod folders;
pub mod health;
pub mod images;
pub mod memories;
pub mod predictions;
pub mod reminders;
pub mod users;
pub mod welcome;

use serde::Deserialize;

/// `?user_id=` query string shared by the per-user list endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}
