//! Postgres-backed tests. Skipped unless `TEST_DATABASE_URL` points at a
//! scratch database; they apply and revert migrations.

use std::collections::BTreeMap;

use cvsaas::{
    auth::{repo::PgCredentialStore, store::CredentialStore},
    feedback::{dto::FeedbackRequest, repo as feedback_repo},
    AppError, MIGRATOR,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use time::OffsetDateTime;
use tokio::sync::Mutex;

const SURVEY_VERSION: i64 = 20260214110000;
const BEFORE_SURVEY: i64 = 20260207100000;

// the round-trip test reverts the schema; keep the others from migrating under it
static SCHEMA_LOCK: Mutex<()> = Mutex::const_new(());

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skip postgres test: set TEST_DATABASE_URL");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect TEST_DATABASE_URL");
    MIGRATOR.run(&pool).await.expect("migrate up");
    Some(pool)
}

/// column name -> default expression, for the feedbacks table
async fn feedback_columns(pool: &PgPool) -> BTreeMap<String, Option<String>> {
    sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT column_name::text, column_default::text
        FROM information_schema.columns
        WHERE table_name = 'feedbacks'
        "#,
    )
    .fetch_all(pool)
    .await
    .expect("read columns")
    .into_iter()
    .collect()
}

fn unique_email(tag: &str) -> String {
    format!(
        "{tag}-{}@example.com",
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    )
}

#[tokio::test]
async fn survey_migration_round_trips() {
    let _guard = SCHEMA_LOCK.lock().await;
    let Some(pool) = test_pool().await else { return };

    let upgraded = feedback_columns(&pool).await;
    assert!(upgraded.contains_key("ease_rating"));
    assert!(!upgraded.contains_key("rating"));
    assert_eq!(upgraded["ease_rating"].as_deref(), Some("5"));

    MIGRATOR.undo(&pool, BEFORE_SURVEY).await.expect("migrate down");
    let downgraded = feedback_columns(&pool).await;
    let restored: Vec<&str> = downgraded.keys().map(String::as_str).collect();
    assert_eq!(
        restored,
        vec!["created_at", "id", "improvement", "liked", "rating", "user_id"]
    );
    assert_eq!(downgraded["rating"].as_deref(), Some("3"));
    assert_eq!(downgraded["liked"], None);

    MIGRATOR.run(&pool).await.expect("migrate up again");
    assert_eq!(feedback_columns(&pool).await, upgraded);

    let applied: Option<(i64,)> =
        sqlx::query_as("SELECT version FROM _sqlx_migrations WHERE version = $1")
            .bind(SURVEY_VERSION)
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(applied.is_some());
}

#[tokio::test]
async fn pg_store_enforces_unique_email() {
    let _guard = SCHEMA_LOCK.lock().await;
    let Some(pool) = test_pool().await else { return };
    let store = PgCredentialStore::new(pool);
    let email = unique_email("dup");

    let first = store.insert(&email, "hash-1").await.expect("first insert");
    let err = store.insert(&email, "hash-2").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateEmail), "{err:?}");

    let kept = store.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(kept.id, first.id);
    assert_eq!(kept.password_hash, "hash-1");
}

#[tokio::test]
async fn pg_store_lookup_misses_unknown_email() {
    let _guard = SCHEMA_LOCK.lock().await;
    let Some(pool) = test_pool().await else { return };
    let store = PgCredentialStore::new(pool);
    assert!(store
        .find_by_email(&unique_email("missing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn feedback_insert_fills_defaults() {
    let _guard = SCHEMA_LOCK.lock().await;
    let Some(pool) = test_pool().await else { return };
    let store = PgCredentialStore::new(pool.clone());
    let user = store.insert(&unique_email("fb"), "hash").await.unwrap();

    let row = feedback_repo::insert(
        &pool,
        user.id,
        &FeedbackRequest {
            profile: Some("student".into()),
            nps: Some(9),
            ..Default::default()
        },
    )
    .await
    .expect("insert feedback");

    assert_eq!(row.user_id, Some(user.id));
    assert_eq!(row.ease_rating, 5);
    assert_eq!(row.profile.as_deref(), Some("student"));
    assert_eq!(row.nps, Some(9));
    assert_eq!(row.suggestions, None);
}

#[tokio::test]
async fn feedback_list_is_newest_first_and_scoped_to_the_user() {
    let _guard = SCHEMA_LOCK.lock().await;
    let Some(pool) = test_pool().await else { return };
    let store = PgCredentialStore::new(pool.clone());
    let me = store.insert(&unique_email("me"), "hash").await.unwrap();
    let other = store.insert(&unique_email("other"), "hash").await.unwrap();

    let first = feedback_repo::insert(
        &pool,
        me.id,
        &FeedbackRequest {
            ease_rating: Some(2),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second = feedback_repo::insert(&pool, me.id, &FeedbackRequest::default())
        .await
        .unwrap();
    feedback_repo::insert(&pool, other.id, &FeedbackRequest::default())
        .await
        .unwrap();

    let mine = feedback_repo::list_by_user(&pool, me.id).await.unwrap();
    let ids: Vec<i64> = mine.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(mine[1].ease_rating, 2);
    assert!(mine.iter().all(|f| f.user_id == Some(me.id)));
}
