use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "lang-portal.log";
const FALLBACK_LEVEL: &str = "info";

/// Per-statement sqlx logging drowns out session events at `info`.
const QUIET_DEPENDENCIES: &str = "sqlx=warn";

/// Keeps the non-blocking file writer flushing; drop it only at process exit.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Filter directives for `level`, quieting sqlx unless the level already names it.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { FALLBACK_LEVEL } else { level };
    if level.split(',').any(|directive| directive.trim_start().starts_with("sqlx")) {
        level.to_string()
    } else {
        format!("{level},{QUIET_DEPENDENCIES}")
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directives(level)).unwrap_or_else(|err| {
        eprintln!("invalid log filter {level:?} ({err}), using {FALLBACK_LEVEL}");
        EnvFilter::new(filter_directives(FALLBACK_LEVEL))
    })
}

/// Installs the global subscriber: stdout always, plus a daily file when `file_dir` is set.
pub fn init_tracing(config: &LoggingConfig) -> Option<FileLogGuard> {
    let env_filter = build_filter(&config.level);
    let stdout_layer = fmt::layer().with_target(true);

    if let Some(log_dir) = &config.file_dir {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .init();

                tracing::info!(log_dir = %log_dir.display(), "file logging enabled");
                return Some(FileLogGuard { _guard: guard });
            }
            Err(err) => eprintln!("cannot create log directory {}: {err}", log_dir.display()),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .init();

    None
}
