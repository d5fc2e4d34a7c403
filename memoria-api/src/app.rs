/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use memoria_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = memoria_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use memoria_worker::runner::AnalysisRunner;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Spawns background image analysis
    pub runner: AnalysisRunner,
}

impl AppState {
    /// Creates state with the analyzer named in `config`
    pub fn new(db: PgPool, config: Config) -> Self {
        let runner = AnalysisRunner::new(db.clone(), config.analyzer.build());
        Self::with_runner(db, config, runner)
    }

    pub fn with_runner(db: PgPool, config: Config, runner: AnalysisRunner) -> Self {
        Self {
            db,
            config: Arc::new(config),
            runner,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /health                              GET
/// /api/welcome/                        GET
/// /api/login/                          POST (form)
/// /api/users/                          POST (json)
/// /api/users/:id/                      GET
/// /api/reminders/                      POST (form), GET ?user_id
/// /api/reminders/:id/images/           GET
/// /api/events/                         POST (json) ?user_id, GET ?user_id
/// /api/events/:id/images/              GET
/// /api/folders/                        POST (json) ?user_id, GET ?user_id
/// /api/files/                          POST (multipart), GET ?user_id
/// /api/images/                         POST (multipart) -> 202, GET ?user_id
/// /api/images/tasks/:task_id/          GET
/// /api/images/:id/comment/             PATCH (form)
/// /api/memories/                       GET ?user_id
/// /api/predictions/                    GET ?user_id
/// /static/*                            uploaded files
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Body size limit (uploads)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let api_routes = Router::new()
        .route("/welcome/", get(routes::welcome::welcome))
        .route("/login/", post(routes::auth::login))
        .route("/users/", post(routes::users::create_user))
        .route("/users/:id/", get(routes::users::get_user))
        .route(
            "/reminders/",
            post(routes::reminders::create_reminder).get(routes::reminders::list_reminders),
        )
        .route("/reminders/:id/images/", get(routes::reminders::reminder_images))
        .route(
            "/events/",
            post(routes::events::create_event).get(routes::events::list_events),
        )
        .route("/events/:id/images/", get(routes::events::event_images))
        .route(
            "/folders/",
            post(routes::folders::create_folder).get(routes::folders::list_folders),
        )
        .route(
            "/files/",
            post(routes::files::upload_file).get(routes::files::list_files),
        )
        .route(
            "/images/",
            post(routes::images::upload_image).get(routes::images::list_images),
        )
        .route("/images/tasks/:task_id/", get(routes::images::get_task))
        .route("/images/:id/comment/", patch(routes::images::update_comment))
        .route("/memories/", get(routes::memories::memories))
        .route("/predictions/", get(routes::predictions::predictions));

    let cors = if state.config.cors_allows_any() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let static_files = ServeDir::new(&state.config.storage.static_dir);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(state.config.api.max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
