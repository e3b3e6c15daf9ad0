mod retention;

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, Mutex};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::RetentionConfig;
use crate::error::ServiceError;
use crate::services::SystemService;

pub use retention::run_retention_cycle;

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    shutdown_tx: broadcast::Sender<()>,
    running: AtomicBool,
    system: SystemService,
    retention: RetentionConfig,
}

impl WorkerManager {
    pub async fn new(system: SystemService, retention: RetentionConfig) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            shutdown_tx,
            running: AtomicBool::new(false),
            system,
            retention,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Schedules the enabled jobs and starts the scheduler. Returns without
    /// starting anything when every job is disabled.
    pub async fn start(&self) -> Result<(), WorkerError> {
        if !self.retention.enabled {
            info!("retention worker disabled, skipping worker startup");
            return Ok(());
        }
        if self.retention.days <= 0 {
            return Err(ServiceError::invalid_argument(format!(
                "retention days must be positive, got {}",
                self.retention.days
            ))
            .into());
        }

        let scheduler = self.scheduler.lock().await;

        let system = self.system.clone();
        let retention_days = self.retention.days;
        let shutdown_rx = self.shutdown_tx.subscribe();
        let job = Job::new_async(self.retention.schedule.as_str(), move |_uuid, _lock| {
            let system = system.clone();
            let mut rx = shutdown_rx.resubscribe();
            Box::pin(async move {
                tokio::select! {
                    _ = rx.recv() => {},
                    result = run_retention_cycle(system, retention_days) => {
                        if let Err(e) = result {
                            error!(error = %e, "retention worker error");
                        }
                    }
                }
            })
        })?;
        scheduler.add(job).await?;
        info!(
            schedule = %self.retention.schedule,
            retention_days,
            "retention worker scheduled"
        );

        scheduler.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!("workers started");

        Ok(())
    }

    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::Relaxed) {
            return;
        }

        info!("stopping workers");
        let _ = self.shutdown_tx.send(());

        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "error shutting down scheduler");
        }
        info!("workers stopped");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}
