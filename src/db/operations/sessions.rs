use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};

use crate::models::{SessionStatus, SessionUpdate, StudySession};

const SESSION_COLUMNS: &str =
    r#""id", "start_time", "end_time", "score", "status", "study_activity_id""#;

pub async fn insert_session(
    pool: &SqlitePool,
    activity_id: i64,
    start_time: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO "study_sessions" ("start_time", "status", "study_activity_id") VALUES (?, ?, ?)"#,
    )
    .bind(start_time)
    .bind(SessionStatus::InProgress.as_str())
    .bind(activity_id)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch_session<'e, E>(executor: E, id: i64) -> Result<Option<StudySession>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(r#"SELECT {SESSION_COLUMNS} FROM "study_sessions" WHERE "id" = ?"#);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(map_session).transpose()
}

pub async fn fetch_session_status<'e, E>(
    executor: E,
    id: i64,
) -> Result<Option<SessionStatus>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let raw: Option<String> =
        sqlx::query_scalar(r#"SELECT "status" FROM "study_sessions" WHERE "id" = ?"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;
    raw.map(|s| parse_status(&s)).transpose()
}

pub async fn list_sessions(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<StudySession>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {SESSION_COLUMNS} FROM "study_sessions" ORDER BY "start_time" DESC, "id" DESC LIMIT ? OFFSET ?"#
    );
    let rows = sqlx::query(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    rows.iter().map(map_session).collect()
}

pub async fn count_sessions(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "study_sessions""#)
        .fetch_one(pool)
        .await
}

pub async fn count_completed_sessions(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "study_sessions" WHERE "status" = 'completed'"#)
        .fetch_one(pool)
        .await
}

pub async fn list_activity_sessions(
    pool: &SqlitePool,
    activity_id: i64,
) -> Result<Vec<StudySession>, sqlx::Error> {
    let sql = format!(
        r#"SELECT {SESSION_COLUMNS} FROM "study_sessions" WHERE "study_activity_id" = ? ORDER BY "start_time" DESC, "id" DESC"#
    );
    let rows = sqlx::query(&sql).bind(activity_id).fetch_all(pool).await?;
    rows.iter().map(map_session).collect()
}

/// Overwrites end time, score and status of a session that is still in progress.
/// Returns affected rows; zero means the id is unknown or the session is closed.
pub async fn update_open_session(
    pool: &SqlitePool,
    update: &SessionUpdate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE "study_sessions"
        SET "end_time" = ?, "score" = ?, "status" = ?
        WHERE "id" = ? AND "status" = 'in_progress'
        "#,
    )
    .bind(update.end_time)
    .bind(update.score)
    .bind(update.status.as_str())
    .bind(update.id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// (start, end) of every completed session that carries an end time.
pub async fn completed_session_spans(
    pool: &SqlitePool,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT "start_time", "end_time" FROM "study_sessions"
        WHERE "status" = 'completed' AND "end_time" IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await?;
    rows.iter()
        .map(|row| -> Result<_, sqlx::Error> {
            Ok((row.try_get("start_time")?, row.try_get("end_time")?))
        })
        .collect()
}

pub async fn session_start_times(pool: &SqlitePool) -> Result<Vec<DateTime<Utc>>, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT "start_time" FROM "study_sessions""#)
        .fetch_all(pool)
        .await
}

pub async fn average_completed_score(pool: &SqlitePool) -> Result<f64, sqlx::Error> {
    let avg: Option<f64> = sqlx::query_scalar(
        r#"SELECT AVG("score") FROM "study_sessions" WHERE "status" = 'completed'"#,
    )
    .fetch_one(pool)
    .await?;
    Ok(avg.unwrap_or(0.0))
}

fn map_session(row: &SqliteRow) -> Result<StudySession, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(StudySession {
        id: row.try_get("id")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        score: row.try_get("score")?,
        status: parse_status(&status)?,
        study_activity_id: row.try_get("study_activity_id")?,
    })
}

pub(crate) fn parse_status(raw: &str) -> Result<SessionStatus, sqlx::Error> {
    SessionStatus::parse(raw)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown session status `{raw}`").into()))
}
