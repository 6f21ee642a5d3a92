use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Status;

// -- JWT Claims --

/// JWT claims shared between the auth handlers and the request middleware.
/// Canonical definition lives here in caseflow-types: the `sub` field is the
/// verified actor id every protected operation trusts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub token: String,
}

// -- Users --

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Profile view: the user plus their review aggregate.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: Option<String>,
    pub description: String,
    pub average_rating: f64,
    pub review_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub description: String,
}

// -- Cases --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCaseRequest {
    pub title: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCaseResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CaseResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: Vec<String>,
    pub status: Status,
    pub executor_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AcceptCaseResponse {
    pub processed_case_id: Uuid,
}

// -- Processed cases --

#[derive(Debug, Serialize)]
pub struct ProcessedCaseResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: Vec<String>,
    pub status: Status,
    pub executor_id: Uuid,
    pub executor_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendFilesRequest {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AppendFilesResponse {
    pub files: Vec<String>,
}

/// Optional field overrides supplied at completion; anything absent keeps the
/// processed case's value as snapshotted in the completing transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompleteCaseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CompleteCaseResponse {
    pub project_id: Uuid,
}

// -- Projects --

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub title: String,
    pub theme: String,
    pub description: String,
    pub cover: Option<String>,
    pub files: Vec<String>,
    pub status: Status,
    pub executor_email: String,
    pub created_at: DateTime<Utc>,
}

// -- Reviews --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateReviewRequest {
    /// The reviewed user. The reviewer is the authenticated actor.
    pub user_id: Uuid,
    pub text: String,
    pub rating: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_photo: Option<String>,
    pub text: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
}

// -- Files --

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Opaque reference path, e.g. `/files/{id}`.
    pub file_ref: String,
    pub size: u64,
    pub sha256: String,
}
