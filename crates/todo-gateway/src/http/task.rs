//! Task CRUD — /api/task, /api/tasks, /api/task/done
//!
//! Success bodies: `{"id":"<n>"}` on create, the task on GET, `{"tasks":[...]}`
//! on list and `{}` otherwise. Errors: `{"error":"..."}`.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use todo_core::{NewTask, RawId, Task};
use todo_scheduler::Completion;
use tracing::{debug, warn};

use super::{ApiError, JsonBody};
use crate::app::AppState;

type ApiResult<T> = Result<JsonBody<T>, ApiError>;

#[derive(Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// PUT body: a full task; `id` may arrive as a string or a number.
#[derive(Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(flatten)]
    pub task: NewTask,
}

#[derive(Serialize)]
pub struct CreatedTask {
    pub id: String,
}

#[derive(Serialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejected request body");
        ApiError::bad_request("invalid request body")
    })
}

fn parse_id(raw: Option<&str>) -> Result<i64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Err(ApiError::bad_request("id required")),
        Some(s) => s.parse().map_err(|_| ApiError::bad_request("invalid id")),
    }
}

fn update_id(raw: Option<RawId>) -> Result<Option<i64>, ApiError> {
    match raw {
        None => Ok(None),
        Some(RawId::Num(n)) => Ok(Some(n)),
        Some(RawId::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(RawId::Str(s)) => parse_id(Some(&s)).map(Some),
    }
}

/// POST /api/task
pub async fn create_task(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<CreatedTask> {
    let draft: NewTask = parse_body(&body)?;
    let id = state.tasks.create(draft).map_err(|e| {
        warn!(error = %e, "POST /api/task failed");
        ApiError::from(e)
    })?;
    Ok(JsonBody(CreatedTask { id: id.to_string() }))
}

/// GET /api/task?id=<n>
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Task> {
    let id = parse_id(query.id.as_deref())?;
    Ok(JsonBody(state.tasks.get(id)?))
}

/// PUT /api/task
pub async fn update_task(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<Value> {
    let update: TaskUpdate = parse_body(&body)?;
    let id = update_id(update.id)?;
    state.tasks.update(id, update.task).map_err(|e| {
        warn!(error = %e, "PUT /api/task failed");
        ApiError::from(e)
    })?;
    Ok(JsonBody(json!({})))
}

/// DELETE /api/task?id=<n>
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Value> {
    let id = parse_id(query.id.as_deref())?;
    state.tasks.delete(id)?;
    Ok(JsonBody(json!({})))
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<TaskList> {
    let tasks = state.tasks.list()?;
    Ok(JsonBody(TaskList { tasks }))
}

/// POST /api/task/done?id=<n>
pub async fn complete_task(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Value> {
    let id = parse_id(query.id.as_deref())?;
    match state.tasks.complete(id)? {
        Completion::Deleted => debug!(task_id = id, "done: deleted"),
        Completion::Rescheduled { date } => debug!(task_id = id, %date, "done: rescheduled"),
    }
    Ok(JsonBody(json!({})))
}
