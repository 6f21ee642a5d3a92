use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use caseflow_db::models::{CompleteOutcome, ProcessedCaseRow, ProjectOverrides};
use caseflow_types::api::{
    AppendFilesRequest, AppendFilesResponse, Claims, CompleteCaseRequest, CompleteCaseResponse,
    ProcessedCaseResponse,
};
use caseflow_types::models::{parse_created_at, parse_file_refs, parse_status, parse_uuid};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::filter::{self, ListingQuery};

pub async fn list_processed_cases(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<ProcessedCaseResponse>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.list_processed_cases()).await?;

    let items: Vec<ProcessedCaseResponse> = rows.into_iter().map(processed_response).collect();
    let filtered = filter::filter(
        items,
        query.search_term(),
        &query.selected_topics(),
        query.status.as_deref(),
    );
    Ok(Json(filtered))
}

pub async fn get_processed_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<ProcessedCaseResponse>, ApiError> {
    let db = state.clone();
    let pid = id.to_string();
    let row = blocking(move || db.db.get_processed_case(&pid))
        .await?
        .ok_or_else(|| ApiError::NotFound("processed case not found".into()))?;
    Ok(Json(processed_response(row)))
}

/// Append work files to a live processed case. Order preserved, duplicates
/// allowed, no cap — unlike creation.
pub async fn append_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<AppendFilesRequest>,
) -> Result<Json<AppendFilesResponse>, ApiError> {
    if req.files.is_empty() {
        return Err(ApiError::Validation("no files supplied".into()));
    }

    let db = state.clone();
    let pid = id.to_string();
    let files = blocking(move || db.db.append_processed_files(&pid, &req.files))
        .await?
        .ok_or_else(|| ApiError::NotFound("processed case not found".into()))?;

    Ok(Json(AppendFilesResponse { files }))
}

/// In_process→closed transition. Only the assigned executor may complete;
/// override fields default to the snapshot read in the completing
/// transaction.
pub async fn complete_case(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CompleteCaseRequest>,
) -> Result<Json<CompleteCaseResponse>, ApiError> {
    let project_id = Uuid::new_v4();
    let overrides = ProjectOverrides {
        title: req.title,
        theme: req.theme,
        description: req.description,
        cover: req.cover,
        files: req.files,
    };

    let db = state.clone();
    let pid = id.to_string();
    let prj = project_id.to_string();
    let requester = claims.sub.to_string();
    let outcome =
        blocking(move || db.db.complete_case(&prj, &pid, &requester, &overrides)).await?;

    match outcome {
        CompleteOutcome::Completed { .. } => Ok(Json(CompleteCaseResponse { project_id })),
        CompleteOutcome::NotAssigned => {
            Err(ApiError::Forbidden("case is not assigned to you".into()))
        }
        CompleteOutcome::NotFound => Err(ApiError::NotFound("processed case not found".into())),
    }
}

fn processed_response(row: ProcessedCaseRow) -> ProcessedCaseResponse {
    ProcessedCaseResponse {
        id: parse_uuid(&row.id, "processed case id"),
        case_id: parse_uuid(&row.case_id, "processed case case_id"),
        owner_id: parse_uuid(&row.owner_id, "processed case owner_id"),
        owner_email: row.owner_email,
        title: row.title,
        theme: row.theme,
        description: row.description,
        cover: row.cover,
        files: parse_file_refs(&row.files, "processed case files"),
        status: parse_status(&row.status, "processed case status"),
        executor_id: parse_uuid(&row.executor_id, "processed case executor_id"),
        executor_email: row.executor_email,
        created_at: parse_created_at(&row.created_at, "processed case created_at"),
    }
}
