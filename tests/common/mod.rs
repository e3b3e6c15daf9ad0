#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use lang_portal_backend::db::config::SqliteConfig;
use lang_portal_backend::models::{NewWord, WordParts};
use lang_portal_backend::{AppState, Store};

/// A store on a fresh database file; the directory lives as long as the fixture.
pub struct TestStore {
    pub state: AppState,
    _dir: TempDir,
}

impl TestStore {
    pub fn store(&self) -> &Store {
        self.state.store()
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        self.state.store().pool()
    }
}

pub async fn test_store() -> TestStore {
    let dir = TempDir::new().expect("temp dir");
    let config = SqliteConfig::at_path(dir.path().join("words.db"));
    let store = Store::open(&config).await.expect("open store");
    TestStore {
        state: AppState::new(store),
        _dir: dir,
    }
}

pub fn new_word(japanese: &str, romaji: &str, english: &str) -> NewWord {
    NewWord {
        japanese: japanese.to_string(),
        romaji: romaji.to_string(),
        english: english.to_string(),
        parts: WordParts::new(),
    }
}

/// Group + activity under it. Returns (group_id, activity_id).
pub async fn seed_activity(ts: &TestStore) -> (i64, i64) {
    let catalog = ts.state.catalog();
    let group_id = catalog
        .create_group("Core Verbs", "everyday verbs")
        .await
        .expect("group");
    let activity_id = catalog
        .create_activity(group_id, "flashcards")
        .await
        .expect("activity");
    (group_id, activity_id)
}

pub async fn seed_words(ts: &TestStore, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let word = new_word(&format!("言葉{i}"), &format!("kotoba{i}"), &format!("word {i}"));
        ids.push(ts.state.catalog().create_word(&word).await.expect("word"));
    }
    ids
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Inserts a session row directly, bypassing the lifecycle so timestamps can be in the past.
pub async fn insert_session_at(
    ts: &TestStore,
    activity_id: i64,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    score: Option<f64>,
    status: &str,
) -> i64 {
    sqlx::query(
        r#"INSERT INTO "study_sessions" ("start_time", "end_time", "score", "status", "study_activity_id") VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(start)
    .bind(end)
    .bind(score)
    .bind(status)
    .bind(activity_id)
    .execute(ts.pool())
    .await
    .expect("insert session")
    .last_insert_rowid()
}

pub async fn insert_completed_session(
    ts: &TestStore,
    activity_id: i64,
    start: DateTime<Utc>,
    duration: Duration,
    score: f64,
) -> i64 {
    insert_session_at(ts, activity_id, start, Some(start + duration), Some(score), "completed").await
}

pub async fn insert_review_at(
    ts: &TestStore,
    session_id: i64,
    word_id: i64,
    is_correct: bool,
    reviewed_at: DateTime<Utc>,
) -> i64 {
    sqlx::query(
        r#"INSERT INTO "word_review_items" ("session_id", "word_id", "is_correct", "reviewed_at") VALUES (?, ?, ?, ?)"#,
    )
    .bind(session_id)
    .bind(word_id)
    .bind(is_correct)
    .bind(reviewed_at)
    .execute(ts.pool())
    .await
    .expect("insert review")
    .last_insert_rowid()
}

pub async fn count_rows(ts: &TestStore, table: &str) -> i64 {
    let sql = format!(r#"SELECT COUNT(*) FROM "{table}""#);
    sqlx::query_scalar(&sql)
        .fetch_one(ts.pool())
        .await
        .expect("count rows")
}
