use std::path::PathBuf;

use crate::db::config::{env_bool, env_i64, SqliteConfig};

pub const DEFAULT_RETENTION_DAYS: i64 = 90;
pub const DEFAULT_RETENTION_SCHEDULE: &str = "0 0 3 * * *";
pub const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub sqlite: SqliteConfig,
    pub retention: RetentionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `lang_portal_backend=debug`.
    pub level: String,
    /// Directory for the daily rolling file; `None` logs to stdout only.
    pub file_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let file_dir = env_bool("ENABLE_FILE_LOGS", false).then(|| {
            std::env::var("LOG_DIR")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
        });
        Self {
            level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            file_dir,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    pub enabled: bool,
    pub days: i64,
    /// Six-field cron expression: sec min hour day-of-month month day-of-week.
    pub schedule: String,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            days: DEFAULT_RETENTION_DAYS,
            schedule: DEFAULT_RETENTION_SCHEDULE.to_string(),
        }
    }
}

impl RetentionConfig {
    pub fn from_env() -> Self {
        let days = env_i64("RETENTION_DAYS", DEFAULT_RETENTION_DAYS);
        Self {
            enabled: env_bool("ENABLE_RETENTION_WORKER", true),
            days: if days > 0 { days } else { DEFAULT_RETENTION_DAYS },
            schedule: std::env::var("RETENTION_SCHEDULE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RETENTION_SCHEDULE.to_string()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            logging: LoggingConfig::from_env(),
            sqlite: SqliteConfig::from_env(),
            retention: RetentionConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_log_to_stdout_and_prune_nightly() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.file_dir.is_none());

        let retention = RetentionConfig::default();
        assert!(retention.enabled);
        assert_eq!(retention.days, DEFAULT_RETENTION_DAYS);
        assert_eq!(retention.schedule, DEFAULT_RETENTION_SCHEDULE);
    }
}
