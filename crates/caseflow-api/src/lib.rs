pub mod auth;
pub mod cases;
pub mod error;
pub mod files;
pub mod filter;
pub mod middleware;
pub mod processed;
pub mod projects;
pub mod reviews;
pub mod users;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post, put},
};

pub use auth::{AppState, AppStateInner};
use error::ApiError;

/// Cap on raw upload bodies (and, incidentally, JSON payloads).
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Run blocking rusqlite work off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("blocking task join error: {}", e)))?
        .map_err(ApiError::from)
}

/// Assemble the full route tree over the shared state. The server binary adds
/// CORS and tracing layers on top.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/topics", get(topics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/files/{file_id}", get(files::download_file))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/users/me", get(users::me).put(users::update_profile))
        .route("/users/{user_id}", get(users::profile))
        .route("/files", post(files::upload_file))
        .route("/cases", post(cases::create_case).get(cases::list_cases))
        .route("/cases/{case_id}", get(cases::get_case))
        .route("/cases/{case_id}/accept", put(cases::accept_case))
        .route("/processed-cases", get(processed::list_processed_cases))
        .route("/processed-cases/{id}", get(processed::get_processed_case))
        .route(
            "/processed-cases/{id}/upload-files",
            post(processed::append_files),
        )
        .route(
            "/processed-cases/{id}/complete",
            put(processed::complete_case),
        )
        .route("/projects", get(projects::list_projects))
        .route("/projects/{project_id}", get(projects::get_project))
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::add_review),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
}

async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.clone();
    blocking(move || db.db.ping()).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

async fn topics(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.topics.clone())
}
