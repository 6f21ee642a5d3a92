use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use caseflow_db::models::UserRow;
use caseflow_types::api::{Claims, ProfileResponse, UpdateProfileRequest, UserResponse};
use caseflow_types::models::{parse_created_at, parse_uuid};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;
use crate::reviews::average_rating;

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, ApiError> {
    let db = state.clone();
    let id = claims.sub.to_string();
    let user = blocking(move || db.db.get_user_by_id(&id))
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(user_response(user)))
}

/// Profile view of any user, with their review aggregate.
pub async fn profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let db = state.clone();
    let id = user_id.to_string();
    let (user, reviews) = blocking(move || {
        let user = db.db.get_user_by_id(&id)?;
        let reviews = db.db.list_reviews(&id)?;
        Ok((user, reviews))
    })
    .await?;
    let user = user.ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();

    Ok(Json(ProfileResponse {
        id: parse_uuid(&user.id, "user id"),
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        photo: user.photo,
        description: user.description,
        average_rating: average_rating(&ratings),
        review_count: reviews.len(),
    }))
}

/// Profile edits are scoped to the authenticated actor; there is no way to
/// address another user's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let db = state.clone();
    let id = claims.sub.to_string();
    let user = blocking(move || {
        let updated = db.db.update_profile(
            &id,
            &req.first_name,
            &req.last_name,
            req.photo.as_deref(),
            &req.description,
        )?;
        if !updated {
            return Ok(None);
        }
        db.db.get_user_by_id(&id)
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(user_response(user)))
}

fn user_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: parse_uuid(&row.id, "user id"),
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        photo: row.photo,
        description: row.description,
        created_at: parse_created_at(&row.created_at, "user created_at"),
    }
}
