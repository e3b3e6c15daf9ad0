pub mod config;
pub mod operations;
pub mod sqlite_schema;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::db::config::SqliteConfig;
use crate::db::sqlite_schema::{split_sql_statements, SCHEMA_SQL, SCHEMA_VERSION};

/// Shared handle to the relational store. Cloning is cheap; every clone uses the same pool.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn open(config: &SqliteConfig) -> Result<Self, StoreInitError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreInitError::Io(e.to_string()))?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", config.path.display());
        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(|e| StoreInitError::Config(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(config.journal_mode.to_sqlx())
            .synchronous(config.synchronous.to_sqlx())
            .busy_timeout(config.busy_timeout);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(path = %config.path.display(), "sqlite store opened");

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn schema_version(&self) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT "value" FROM "_db_metadata" WHERE "key" = 'schema_version'"#)
            .fetch_optional(&self.pool)
            .await
    }

    /// Applies the embedded schema once; later calls see the recorded version and return.
    pub async fn migrate(&self) -> Result<(), StoreInitError> {
        // A fresh file has no metadata table yet; any other read failure is real.
        let has_metadata: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM "sqlite_master" WHERE "type" = 'table' AND "name" = '_db_metadata'"#,
        )
        .fetch_one(&self.pool)
        .await?;
        if has_metadata > 0 {
            if let Some(version) = self.schema_version().await? {
                debug!(%version, "schema already applied");
                return Ok(());
            }
        }

        let mut tx = self.pool.begin().await?;
        for stmt in split_sql_statements(SCHEMA_SQL) {
            sqlx::query(&stmt).execute(&mut *tx).await?;
        }
        sqlx::query(
            r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', ?)"#,
        )
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(version = SCHEMA_VERSION, "schema applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, Error)]
pub enum StoreInitError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
