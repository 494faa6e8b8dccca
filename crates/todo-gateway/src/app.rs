use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use todo_core::config::TodoConfig;
use todo_scheduler::TaskService;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::http;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: TodoConfig,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(config: TodoConfig, tasks: TaskService) -> Self {
        Self { config, tasks }
    }
}

/// Assemble the full Axum router: the JSON API plus static files from the web root.
pub fn build_router(state: Arc<AppState>) -> Router {
    let web_root = ServeDir::new(&state.config.webdir);

    Router::new()
        .route("/api/nextdate", get(http::nextdate::next_date_handler))
        .route(
            "/api/task",
            post(http::task::create_task)
                .get(http::task::get_task)
                .put(http::task::update_task)
                .delete(http::task::delete_task),
        )
        .route("/api/tasks", get(http::task::list_tasks))
        .route("/api/task/done", post(http::task::complete_task))
        .fallback_service(web_root)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
