use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::WordReviewItem;

/// Appends a review only when the owning session is still in progress.
/// Returns `None` when no in-progress session with that id exists.
pub async fn insert_review_for_open_session(
    pool: &SqlitePool,
    session_id: i64,
    word_id: i64,
    is_correct: bool,
    reviewed_at: DateTime<Utc>,
) -> Result<Option<i64>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO "word_review_items" ("session_id", "word_id", "is_correct", "reviewed_at")
        SELECT "id", ?, ?, ? FROM "study_sessions"
        WHERE "id" = ? AND "status" = 'in_progress'
        "#,
    )
    .bind(word_id)
    .bind(is_correct)
    .bind(reviewed_at)
    .bind(session_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(result.last_insert_rowid()))
}

/// Earliest first; rows sharing a timestamp keep insertion order.
pub async fn list_review_items(
    pool: &SqlitePool,
    session_id: i64,
) -> Result<Vec<WordReviewItem>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "id", "session_id", "word_id", "is_correct", "reviewed_at"
        FROM "word_review_items"
        WHERE "session_id" = ?
        ORDER BY "reviewed_at" ASC, "id" ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    rows.iter().map(map_review_item).collect()
}

pub async fn count_review_items(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "word_review_items""#)
        .fetch_one(pool)
        .await
}

/// Percentage (0-100) of correct answers over the whole ledger; 0 when empty.
pub async fn success_rate(pool: &SqlitePool) -> Result<f64, sqlx::Error> {
    let rate: Option<f64> = sqlx::query_scalar(
        r#"SELECT AVG(CASE WHEN "is_correct" THEN 100.0 ELSE 0.0 END) FROM "word_review_items""#,
    )
    .fetch_one(pool)
    .await?;
    Ok(rate.unwrap_or(0.0))
}

pub async fn count_distinct_reviewed_words(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(DISTINCT "word_id") FROM "word_review_items""#)
        .fetch_one(pool)
        .await
}

/// (reviewed, correct) across every session recorded under one activity.
pub async fn activity_review_counts(
    pool: &SqlitePool,
    activity_id: i64,
) -> Result<(i64, i64), sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS "reviewed",
            COALESCE(SUM(CASE WHEN wri."is_correct" THEN 1 ELSE 0 END), 0) AS "correct"
        FROM "word_review_items" wri
        JOIN "study_sessions" ss ON ss."id" = wri."session_id"
        WHERE ss."study_activity_id" = ?
        "#,
    )
    .bind(activity_id)
    .fetch_one(pool)
    .await?;
    Ok((row.try_get("reviewed")?, row.try_get("correct")?))
}

fn map_review_item(row: &SqliteRow) -> Result<WordReviewItem, sqlx::Error> {
    Ok(WordReviewItem {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        word_id: row.try_get("word_id")?,
        is_correct: row.try_get("is_correct")?,
        reviewed_at: row.try_get("reviewed_at")?,
    })
}
