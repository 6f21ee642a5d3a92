use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use caseflow_db::models::ProjectRow;
use caseflow_types::api::{Claims, ProjectResponse};
use caseflow_types::models::{parse_created_at, parse_file_refs, parse_status, parse_uuid};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::filter::{self, ListingQuery};

pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let db = state.clone();
    let owner = query.user_id.map(|u| u.to_string());
    let executor_email = query.executor_email.clone();
    let rows =
        blocking(move || db.db.list_projects(owner.as_deref(), executor_email.as_deref())).await?;

    let items: Vec<ProjectResponse> = rows.into_iter().map(project_response).collect();
    let filtered = filter::filter(
        items,
        query.search_term(),
        &query.selected_topics(),
        query.status.as_deref(),
    );
    Ok(Json(filtered))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let db = state.clone();
    let id = project_id.to_string();
    let row = blocking(move || db.db.get_project(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("project not found".into()))?;
    Ok(Json(project_response(row)))
}

fn project_response(row: ProjectRow) -> ProjectResponse {
    ProjectResponse {
        id: parse_uuid(&row.id, "project id"),
        case_id: parse_uuid(&row.case_id, "project case_id"),
        owner_id: parse_uuid(&row.owner_id, "project owner_id"),
        owner_email: row.owner_email,
        title: row.title,
        theme: row.theme,
        description: row.description,
        cover: row.cover,
        files: parse_file_refs(&row.files, "project files"),
        status: parse_status(&row.status, "project status"),
        executor_email: row.executor_email,
        created_at: parse_created_at(&row.created_at, "project created_at"),
    }
}
