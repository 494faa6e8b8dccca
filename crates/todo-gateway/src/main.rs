use std::sync::Arc;

use todo_core::config::TodoConfig;
use todo_gateway::app;
use todo_scheduler::{SqliteTaskStore, TaskService};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "todo_gateway=info,todo_scheduler=info,tower_http=debug".into()
            }),
        )
        .init();

    // load config: TODO_CONFIG file (default ./todo.toml) + TODO_* env vars
    let config_path = std::env::var("TODO_CONFIG").ok();
    let config = TodoConfig::load(config_path.as_deref())
        .inspect_err(|e| error!(code = e.code(), "config load failed: {e}"))?;

    // open the task store; schema creation failures abort startup
    let db_path = config.db_path()?;
    info!(path = %db_path.display(), "opening SQLite database");
    let store = SqliteTaskStore::open(&db_path)?;
    if !db_path.exists() {
        anyhow::bail!("database file {} was not created", db_path.display());
    }
    info!(path = %db_path.display(), "database schema ready");

    let addr = config.listen_addr()?;
    info!(webdir = %config.webdir, "serving static files");

    let state = Arc::new(app::AppState::new(config, TaskService::new(Arc::new(store))));
    let router = app::build_router(state);

    info!("todo gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("todo gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
