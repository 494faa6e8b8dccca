//! `todo-core` — types and configuration shared by the scheduler crates.

pub mod config;
pub mod error;
pub mod types;

pub use error::{Result, TodoError};
pub use types::{format_date, parse_date, NewTask, RawId, Task, DATE_FORMAT};
