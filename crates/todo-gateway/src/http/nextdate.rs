//! Date-picker helper — GET /api/nextdate
//!
//! Query: `?now=YYYYMMDD&date=YYYYMMDD&repeat=<rule>`
//! Response: the next date as plain text, or a plain-text error with 400.

use axum::{extract::Query, http::StatusCode};
use serde::Deserialize;
use todo_core::parse_date;
use todo_scheduler::TaskService;

#[derive(Deserialize)]
pub struct NextDateQuery {
    #[serde(default)]
    pub now: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub repeat: String,
}

pub async fn next_date_handler(
    Query(query): Query<NextDateQuery>,
) -> Result<String, (StatusCode, String)> {
    let now = parse_date(&query.now)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Invalid now parameter".to_string()))?;

    TaskService::preview(now, &query.date, &query.repeat)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}
