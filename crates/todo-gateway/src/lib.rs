//! `todo-gateway` — HTTP front end for the task scheduler.

pub mod app;
pub mod http;
