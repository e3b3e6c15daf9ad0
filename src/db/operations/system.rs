use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Checks a table by counting at most one row. `table` must come from a fixed allow-list.
pub async fn check_table(pool: &SqlitePool, table: &str) -> Result<(), sqlx::Error> {
    let sql = format!(r#"SELECT COUNT(*) FROM (SELECT 1 FROM "{table}" LIMIT 1)"#);
    let _: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
    Ok(())
}

pub async fn database_size_bytes(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let page_count: i64 = sqlx::query_scalar("PRAGMA page_count").fetch_one(pool).await?;
    let page_size: i64 = sqlx::query_scalar("PRAGMA page_size").fetch_one(pool).await?;
    Ok(page_count * page_size)
}

/// Review items whose session is about to expire; they leave through the session cascade.
pub async fn count_expiring_review_items(
    conn: &mut SqliteConnection,
    cutoff: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM "word_review_items"
        WHERE "session_id" IN (
            SELECT "id" FROM "study_sessions"
            WHERE "status" = 'completed' AND "end_time" < ?
        )
        "#,
    )
    .bind(cutoff)
    .fetch_one(conn)
    .await
}

pub async fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    cutoff: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"DELETE FROM "study_sessions" WHERE "status" = 'completed' AND "end_time" < ?"#,
    )
    .bind(cutoff)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_orphaned_review_items(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM "word_review_items"
        WHERE "session_id" NOT IN (SELECT "id" FROM "study_sessions")
        "#,
    )
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
