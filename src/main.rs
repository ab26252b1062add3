use habit_tracker::reminders::{LogNotifier, Notifier};
use habit_tracker::store::Moment;
use habit_tracker::{AppState, Config, HabitStore, load_data, router};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    info!("using data file {}", config.data_path.display());

    // An unusable file is left for the user to repair; nothing is written over it.
    let store = HabitStore::from_data(load_data(&config.data_path).await?);

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let state = AppState::new(
        config.data_path.clone(),
        store,
        notifier,
        config.reminders_enabled,
    );
    if let Err(err) = state.refresh_achievements(Moment::now()).await {
        warn!("initial save failed: {}", err.message);
    }
    state.rearm_reminders().await;

    let app = router(state.clone());
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.reminders.lock().await.cancel_all();
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
