use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};
use validator::Validate;

use super::{
    dto::{FeedbackRequest, FeedbackResponse},
    repo::{self, Feedback},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/feedback", post(submit).get(list_mine))
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<FeedbackResponse>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let row = repo::insert(&state.db, user.id, &body).await?;
    info!(feedback_id = row.id, "feedback stored");

    Ok((
        StatusCode::CREATED,
        Json(FeedbackResponse {
            id: row.id,
            created_at: row.created_at,
        }),
    ))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Feedback>>> {
    let rows = repo::list_by_user(&state.db, user.id).await?;
    Ok(Json(rows))
}
