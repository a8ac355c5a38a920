use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use super::dto::FeedbackRequest;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: Option<i64>,
    pub profile: Option<String>,
    pub target_sector: Option<String>,
    pub ease_rating: i32,
    pub time_spent: Option<String>,
    pub obstacles: Option<String>,
    pub alternative: Option<String>,
    pub suggestions: Option<String>,
    pub nps: Option<i32>,
    pub future_help: Option<String>,
    pub created_at: OffsetDateTime,
}

pub async fn insert(
    db: &PgPool,
    user_id: i64,
    req: &FeedbackRequest,
) -> anyhow::Result<Feedback> {
    let row = sqlx::query_as::<_, Feedback>(
        r#"
        INSERT INTO feedbacks (user_id, profile, target_sector, ease_rating, time_spent,
                               obstacles, alternative, suggestions, nps, future_help)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, user_id, profile, target_sector, ease_rating, time_spent,
                  obstacles, alternative, suggestions, nps, future_help, created_at
        "#,
    )
    .bind(user_id)
    .bind(&req.profile)
    .bind(&req.target_sector)
    .bind(req.ease_rating_or_default())
    .bind(&req.time_spent)
    .bind(&req.obstacles)
    .bind(&req.alternative)
    .bind(&req.suggestions)
    .bind(req.nps)
    .bind(&req.future_help)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_by_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Feedback>> {
    let rows = sqlx::query_as::<_, Feedback>(
        r#"
        SELECT id, user_id, profile, target_sector, ease_rating, time_spent,
               obstacles, alternative, suggestions, nps, future_help, created_at
        FROM feedbacks
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
