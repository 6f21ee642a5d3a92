use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use caseflow_db::models::{AcceptOutcome, CaseRow};
use caseflow_types::api::{
    AcceptCaseResponse, CaseResponse, Claims, CreateCaseRequest, CreateCaseResponse,
};
use caseflow_types::models::{parse_created_at, parse_file_refs, parse_status, parse_uuid};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::filter::{self, ListingQuery};

/// Cap on file refs at creation time. Deliberately not re-applied to
/// post-acceptance appends.
pub const MAX_CASE_FILES: usize = 15;

pub async fn create_case(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Reject before any storage write; the client re-prompts.
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if req.files.len() > MAX_CASE_FILES {
        return Err(ApiError::Validation(format!(
            "a case may carry at most {} files",
            MAX_CASE_FILES
        )));
    }

    let id = Uuid::new_v4();
    let db = state.clone();
    let cid = id.to_string();
    let owner = claims.sub.to_string();
    blocking(move || {
        let files_json = serde_json::to_string(&req.files)?;
        db.db.insert_case(
            &cid,
            &owner,
            req.title.trim(),
            &req.theme,
            &req.description,
            req.cover.as_deref(),
            &files_json,
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreateCaseResponse { id })))
}

pub async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<CaseResponse>>, ApiError> {
    let db = state.clone();
    let owner = query.user_id.map(|u| u.to_string());
    let rows = blocking(move || db.db.list_cases(owner.as_deref())).await?;

    let items: Vec<CaseResponse> = rows.into_iter().map(case_response).collect();
    let filtered = filter::filter(
        items,
        query.search_term(),
        &query.selected_topics(),
        query.status.as_deref(),
    );
    Ok(Json(filtered))
}

pub async fn get_case(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<CaseResponse>, ApiError> {
    let db = state.clone();
    let id = case_id.to_string();
    let row = blocking(move || db.db.get_case(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("case not found".into()))?;
    Ok(Json(case_response(row)))
}

/// Open→accepted transition. The executor is the authenticated actor; the
/// losing side of a concurrent accept gets InvalidState.
pub async fn accept_case(
    State(state): State<AppState>,
    Path(case_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AcceptCaseResponse>, ApiError> {
    let processed_case_id = Uuid::new_v4();

    let db = state.clone();
    let cid = case_id.to_string();
    let pid = processed_case_id.to_string();
    let executor = claims.sub.to_string();
    let outcome = blocking(move || db.db.accept_case(&pid, &cid, &executor)).await?;

    match outcome {
        AcceptOutcome::Accepted { .. } => Ok(Json(AcceptCaseResponse { processed_case_id })),
        AcceptOutcome::AlreadyAccepted => {
            Err(ApiError::InvalidState("case already accepted".into()))
        }
        AcceptOutcome::CaseNotFound => Err(ApiError::NotFound("case not found".into())),
        AcceptOutcome::ExecutorNotFound => Err(ApiError::NotFound("executor not found".into())),
    }
}

fn case_response(row: CaseRow) -> CaseResponse {
    CaseResponse {
        id: parse_uuid(&row.id, "case id"),
        owner_id: parse_uuid(&row.owner_id, "case owner_id"),
        owner_email: row.owner_email,
        title: row.title,
        theme: row.theme,
        description: row.description,
        cover: row.cover,
        files: parse_file_refs(&row.files, "case files"),
        status: parse_status(&row.status, "case status"),
        executor_id: row.executor_id.map(|id| parse_uuid(&id, "case executor_id")),
        created_at: parse_created_at(&row.created_at, "case created_at"),
    }
}
