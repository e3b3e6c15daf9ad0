use lang_portal_backend::config::Config;
use lang_portal_backend::db::Store;
use lang_portal_backend::logging;
use lang_portal_backend::state::AppState;
use lang_portal_backend::workers::WorkerManager;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.logging);

    let store = match Store::open(&config.sqlite).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, path = %config.sqlite.path.display(), "failed to open store");
            std::process::exit(1);
        }
    };
    let state = AppState::new(store);

    let health = state.system().get_system_health().await;
    if health.is_healthy() {
        tracing::info!(message = %health.message, "store health check passed");
    } else {
        tracing::warn!(message = %health.message, "store health check failed");
    }

    let worker_manager = match WorkerManager::new(state.system().clone(), config.retention.clone()).await {
        Ok(manager) => {
            if let Err(e) = manager.start().await {
                tracing::error!(error = %e, "failed to start workers");
            }
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(error = %e, "worker manager not initialized");
            None
        }
    };

    tracing::info!("lang-portal backend running, waiting for shutdown signal");
    shutdown_signal().await;
    tracing::info!("shutdown signal received, stopping");

    if let Some(ref manager) = worker_manager {
        manager.stop().await;
    }
    state.store().close().await;

    tracing::info!("graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
