use axum::{
    Extension, Json,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use caseflow_types::api::{Claims, UploadResponse};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /files — accepts raw bytes, stores the blob plus a metadata row,
/// returns the opaque `/files/{id}` reference callers embed in cases and
/// profiles. Nothing here limits how a reference is later used; the ≤15 and
/// single-cover rules live with case creation.
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Validation("no file supplied".into()));
    }

    let file_id = Uuid::new_v4();
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let name = query.name.unwrap_or_else(|| file_id.to_string());
    let size = bytes.len() as i64;

    let checksum = state.storage.save(&file_id.to_string(), &bytes).await?;

    let db = state.clone();
    let fid = file_id.to_string();
    let uid = claims.sub.to_string();
    let sum = checksum.clone();
    blocking(move || db.db.insert_file(&fid, &uid, &name, &mime, size, &sum)).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_ref: format!("/files/{}", file_id),
            size: size as u64,
            sha256: checksum,
        }),
    ))
}

/// GET /files/{id} — streams the blob back with its recorded content type.
/// Public: profile photos and case covers render without a session.
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let db = state.clone();
    let fid = file_id.to_string();
    let row = blocking(move || db.db.get_file(&fid))
        .await?
        .ok_or_else(|| ApiError::NotFound("file not found".into()))?;

    let file = state
        .storage
        .open(&file_id.to_string())
        .await?
        .ok_or_else(|| ApiError::NotFound("file not found".into()))?;

    let body = Body::from_stream(ReaderStream::new(file));
    Ok(([(header::CONTENT_TYPE, row.mime)], body).into_response())
}
