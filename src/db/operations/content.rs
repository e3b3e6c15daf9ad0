use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::{Group, NewWord, StudyActivity, Word, WordParts};

/// `parts` is the already-encoded JSON text of `word.parts`.
pub async fn insert_word(pool: &SqlitePool, word: &NewWord, parts: &str) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO "words" ("japanese", "romaji", "english", "parts") VALUES (?, ?, ?, ?)"#,
    )
    .bind(&word.japanese)
    .bind(&word.romaji)
    .bind(&word.english)
    .bind(parts)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch_word(pool: &SqlitePool, id: i64) -> Result<Option<Word>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT "id", "japanese", "romaji", "english", "parts" FROM "words" WHERE "id" = ?"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.as_ref().map(map_word).transpose()
}

pub async fn count_words(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "words""#)
        .fetch_one(pool)
        .await
}

pub async fn insert_group(
    pool: &SqlitePool,
    name: &str,
    description: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(r#"INSERT INTO "groups" ("name", "description") VALUES (?, ?)"#)
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch_group(pool: &SqlitePool, id: i64) -> Result<Option<Group>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT "id", "name", "description" FROM "groups" WHERE "id" = ?"#)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(|r| -> Result<Group, sqlx::Error> {
        Ok(Group {
            id: r.try_get("id")?,
            name: r.try_get("name")?,
            description: r.try_get("description")?,
        })
    })
    .transpose()
}

pub async fn count_groups(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "groups""#)
        .fetch_one(pool)
        .await
}

/// Idempotent: an existing membership is left untouched.
pub async fn insert_word_group(
    pool: &SqlitePool,
    word_id: i64,
    group_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"INSERT OR IGNORE INTO "word_groups" ("word_id", "group_id") VALUES (?, ?)"#)
        .bind(word_id)
        .bind(group_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_group_word_ids(pool: &SqlitePool, group_id: i64) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT "word_id" FROM "word_groups" WHERE "group_id" = ? ORDER BY "word_id" ASC"#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_activity(
    pool: &SqlitePool,
    group_id: i64,
    activity_type: &str,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"INSERT INTO "study_activities" ("group_id", "activity_type", "created_at") VALUES (?, ?, ?)"#,
    )
    .bind(group_id)
    .bind(activity_type)
    .bind(created_at)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn fetch_activity(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<StudyActivity>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT "id", "group_id", "activity_type", "created_at" FROM "study_activities" WHERE "id" = ?"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(|r| -> Result<StudyActivity, sqlx::Error> {
        Ok(StudyActivity {
            id: r.try_get("id")?,
            group_id: r.try_get("group_id")?,
            activity_type: r.try_get("activity_type")?,
            created_at: r.try_get("created_at")?,
        })
    })
    .transpose()
}

fn map_word(row: &SqliteRow) -> Result<Word, sqlx::Error> {
    let raw_parts: String = row.try_get("parts")?;
    let parts = WordParts::from_json_str(&raw_parts)
        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;
    Ok(Word {
        id: row.try_get("id")?,
        japanese: row.try_get("japanese")?,
        romaji: row.try_get("romaji")?,
        english: row.try_get("english")?,
        parts,
    })
}
