use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use caseflow_db::models::ReviewRow;
use caseflow_types::api::{Claims, CreateReviewRequest, ReviewResponse};
use caseflow_types::models::{parse_created_at, parse_uuid};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub user_id: Uuid,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let db = state.clone();
    let target = query.user_id.to_string();
    let rows = blocking(move || db.db.list_reviews(&target)).await?;
    Ok(Json(rows.into_iter().map(review_response).collect()))
}

/// Append a review about another user. The reviewer identity and its
/// name/photo snapshot come from the authenticated actor's profile, not the
/// request. Returns the target's full updated review list.
pub async fn add_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("review text required".into()));
    }
    if !(1..=5).contains(&req.rating) {
        return Err(ApiError::Validation("rating required".into()));
    }
    if req.user_id == claims.sub {
        return Err(ApiError::Forbidden("cannot review yourself".into()));
    }

    let db = state.clone();
    let id = Uuid::new_v4().to_string();
    let target = req.user_id.to_string();
    let reviewer = claims.sub.to_string();
    let text = req.text.trim().to_string();
    let rating = req.rating;
    let rows = blocking(move || {
        if db.db.get_user_by_id(&target)?.is_none() {
            return Ok(None);
        }
        let Some(author) = db.db.get_user_by_id(&reviewer)? else {
            return Ok(None);
        };

        let display_name = {
            let full = format!("{} {}", author.first_name, author.last_name);
            let full = full.trim();
            if full.is_empty() { "Anonymous".to_string() } else { full.to_string() }
        };

        db.db.insert_review(
            &id,
            &target,
            &reviewer,
            &display_name,
            author.photo.as_deref(),
            &text,
            rating,
        )?;
        db.db.list_reviews(&target).map(Some)
    })
    .await?
    .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(rows.into_iter().map(review_response).collect()))
}

/// Average of the given ratings, rounded to one decimal place. An empty
/// slice averages to 0, not NaN.
pub fn average_rating(ratings: &[i64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().sum();
    let avg = sum as f64 / ratings.len() as f64;
    (avg * 10.0).round() / 10.0
}

fn review_response(row: ReviewRow) -> ReviewResponse {
    ReviewResponse {
        id: parse_uuid(&row.id, "review id"),
        user_id: parse_uuid(&row.user_id, "review user_id"),
        reviewer_id: parse_uuid(&row.reviewer_id, "review reviewer_id"),
        reviewer_name: row.reviewer_name,
        reviewer_photo: row.reviewer_photo,
        text: row.text,
        rating: row.rating,
        created_at: parse_created_at(&row.created_at, "review created_at"),
    }
}
