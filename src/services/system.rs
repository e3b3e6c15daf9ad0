//! Store-wide statistics, health probing and retention pruning.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::operations::{content, sessions, system};
use crate::db::sqlite_schema::ESSENTIAL_TABLES;
use crate::db::Store;
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStats {
    pub total_words: i64,
    pub total_groups: i64,
    pub total_sessions: i64,
    pub average_session_score: f64,
    pub total_study_time_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SystemHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Rows removed by one retention run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub sessions_deleted: u64,
    pub review_items_deleted: u64,
}

#[derive(Clone, Debug)]
pub struct SystemService {
    store: Store,
}

impl SystemService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_system_stats(&self) -> ServiceResult<SystemStats> {
        let pool = self.store.pool();
        let (total_words, total_groups, total_sessions, average_session_score, spans) = tokio::try_join!(
            content::count_words(pool),
            content::count_groups(pool),
            sessions::count_sessions(pool),
            sessions::average_completed_score(pool),
            sessions::completed_session_spans(pool),
        )?;

        // Each session is truncated to whole minutes before summing.
        let total_study_time_minutes = spans
            .into_iter()
            .map(|(start, end)| (end - start).num_seconds().max(0) / 60)
            .sum();

        Ok(SystemStats {
            total_words,
            total_groups,
            total_sessions,
            average_session_score,
            total_study_time_minutes,
        })
    }

    /// Checks connectivity and the core tables. A failing check is reported as
    /// `unhealthy` rather than returned as an error.
    pub async fn get_system_health(&self) -> SystemHealth {
        let pool = self.store.pool();
        let timestamp = Utc::now();

        if let Err(err) = system::ping(pool).await {
            warn!(error = %err, "database ping failed");
            return SystemHealth {
                status: HealthStatus::Unhealthy,
                message: format!("database connection failed: {err}"),
                timestamp,
            };
        }

        for table in ESSENTIAL_TABLES {
            if let Err(err) = system::check_table(pool, table).await {
                warn!(table, error = %err, "table check failed");
                return SystemHealth {
                    status: HealthStatus::Unhealthy,
                    message: format!("table {table} is not accessible: {err}"),
                    timestamp,
                };
            }
        }

        debug!("system health check passed");
        SystemHealth {
            status: HealthStatus::Healthy,
            message: "all systems operational".to_string(),
            timestamp,
        }
    }

    /// Size of the database file in bytes.
    pub async fn get_database_size(&self) -> ServiceResult<i64> {
        Ok(system::database_size_bytes(self.store.pool()).await?)
    }

    /// Deletes completed sessions that ended more than `retention_days` ago,
    /// their review items, and any review item left without a session.
    /// Runs as one transaction; any failure leaves the store untouched.
    pub async fn prune_old_data(&self, retention_days: i64) -> ServiceResult<PruneReport> {
        if retention_days <= 0 {
            return Err(ServiceError::invalid_argument(format!(
                "retention days must be positive, got {retention_days}"
            )));
        }
        let cutoff = Duration::try_days(retention_days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| {
                ServiceError::invalid_argument(format!(
                    "retention days out of range: {retention_days}"
                ))
            })?;

        let mut tx = self.store.pool().begin().await?;
        let expiring_items = system::count_expiring_review_items(&mut *tx, cutoff).await?;
        let sessions_deleted = system::delete_expired_sessions(&mut *tx, cutoff).await?;
        let orphans_deleted = system::delete_orphaned_review_items(&mut *tx).await?;
        tx.commit().await?;

        let report = PruneReport {
            sessions_deleted,
            review_items_deleted: expiring_items.max(0) as u64 + orphans_deleted,
        };
        info!(
            retention_days,
            %cutoff,
            sessions_deleted = report.sessions_deleted,
            review_items_deleted = report.review_items_deleted,
            "old study data pruned"
        );
        Ok(report)
    }
}
