use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::db::operations::reviews;
use crate::db::operations::sessions::parse_status;
use crate::models::SessionStatus;

/// The most recently started session with its activity, group and review tallies.
/// Tallies cover every review recorded under the session's activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastSessionSummary {
    pub session_id: i64,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub status: SessionStatus,
    pub study_activity_id: i64,
    pub activity_type: String,
    pub group_id: i64,
    pub group_name: String,
    pub words_reviewed: i64,
    pub correct_answers: i64,
}

pub async fn fetch_last_session(pool: &SqlitePool) -> Result<Option<LastSessionSummary>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            ss."id" AS "session_id",
            ss."start_time",
            ss."end_time",
            ss."score",
            ss."status",
            sa."id" AS "study_activity_id",
            sa."activity_type",
            g."id" AS "group_id",
            g."name" AS "group_name"
        FROM "study_sessions" ss
        JOIN "study_activities" sa ON sa."id" = ss."study_activity_id"
        JOIN "groups" g ON g."id" = sa."group_id"
        ORDER BY ss."start_time" DESC, ss."id" DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let status: String = row.try_get("status")?;
    let study_activity_id: i64 = row.try_get("study_activity_id")?;
    let (words_reviewed, correct_answers) =
        reviews::activity_review_counts(pool, study_activity_id).await?;

    Ok(Some(LastSessionSummary {
        session_id: row.try_get("session_id")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        score: row.try_get("score")?,
        status: parse_status(&status)?,
        study_activity_id,
        activity_type: row.try_get("activity_type")?,
        group_id: row.try_get("group_id")?,
        group_name: row.try_get("group_name")?,
        words_reviewed,
        correct_answers,
    }))
}
