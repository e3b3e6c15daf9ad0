//! Dashboard aggregates. Every call recomputes from the store; an empty store
//! yields zero-valued results rather than errors.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::db::operations::{content, dashboard, reviews, sessions, LastSessionSummary};
use crate::db::Store;
use crate::error::ServiceResult;
use crate::models::session::rounded_secs;
use crate::services::streak::{active_dates, study_streak};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    /// Seconds across completed sessions.
    pub total_study_time: i64,
    pub sessions_completed: i64,
    pub total_words_reviewed: i64,
    /// Percentage of correct reviews, 0 to 100.
    pub success_rate: f64,
    pub study_streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub overall_completion: f64,
    pub total_words_studied: i64,
    pub total_available_words: i64,
}

#[derive(Clone, Debug)]
pub struct StatisticsService {
    store: Store,
}

impl StatisticsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Most recently started session, or `None` when nothing has been studied yet.
    pub async fn get_last_session(&self) -> ServiceResult<Option<LastSessionSummary>> {
        let last = dashboard::fetch_last_session(self.store.pool()).await?;
        debug!(found = last.is_some(), "fetched last study session");
        Ok(last)
    }

    pub async fn get_stats(&self) -> ServiceResult<StatsSummary> {
        let pool = self.store.pool();
        let (spans, sessions_completed, total_words_reviewed, success_rate, starts) = tokio::try_join!(
            sessions::completed_session_spans(pool),
            sessions::count_completed_sessions(pool),
            reviews::count_review_items(pool),
            reviews::success_rate(pool),
            sessions::session_start_times(pool),
        )?;

        let total_study_time = spans
            .into_iter()
            .map(|(start, end)| rounded_secs(start, end))
            .sum();
        let study_streak_days = study_streak(&active_dates(starts), Utc::now().date_naive());

        let stats = StatsSummary {
            total_study_time,
            sessions_completed,
            total_words_reviewed,
            success_rate,
            study_streak_days,
        };
        debug!(?stats, "computed study stats");
        Ok(stats)
    }

    pub async fn get_progress(&self) -> ServiceResult<ProgressSummary> {
        let pool = self.store.pool();
        let (total_words_studied, total_available_words) = tokio::try_join!(
            reviews::count_distinct_reviewed_words(pool),
            content::count_words(pool),
        )?;

        Ok(ProgressSummary {
            overall_completion: completion_percent(total_words_studied, total_available_words),
            total_words_studied,
            total_available_words,
        })
    }
}

/// `studied / available` as a percentage with one decimal; 0.0 for an empty vocabulary.
fn completion_percent(studied: i64, available: i64) -> f64 {
    if available <= 0 {
        return 0.0;
    }
    let percent = studied as f64 / available as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}
