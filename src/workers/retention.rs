use std::time::Instant;

use tracing::{debug, info};

use crate::services::SystemService;

/// One retention cycle: prune completed sessions older than `retention_days`.
pub async fn run_retention_cycle(
    system: SystemService,
    retention_days: i64,
) -> Result<(), super::WorkerError> {
    let start = Instant::now();
    debug!(retention_days, "starting retention cycle");

    let report = system.prune_old_data(retention_days).await?;

    info!(
        sessions_deleted = report.sessions_deleted,
        review_items_deleted = report.review_items_deleted,
        duration_secs = format!("{:.2}", start.elapsed().as_secs_f64()),
        "retention cycle completed"
    );
    Ok(())
}
