//! `todo-scheduler` — recurrence rules, SQLite task storage and the task service.
//!
//! # Overview
//!
//! Tasks live in a single SQLite `scheduler` table indexed on `date`. The
//! [`service::TaskService`] validates and normalises incoming tasks, asks
//! [`repeat`] for the next occurrence of recurring ones and persists them
//! through a [`store::TaskRepository`].
//!
//! # Repeat rules
//!
//! | Rule    | Behaviour                                  |
//! |---------|--------------------------------------------|
//! | `d <n>` | Every `n` days, `1 <= n <= 400`            |
//! | `y`     | Every year on the same month and day       |

pub mod db;
pub mod error;
pub mod repeat;
pub mod service;
pub mod store;

pub use error::{RepeatError, Result, ServiceError, StoreError};
pub use repeat::{next_date, RepeatRule};
pub use service::{Clock, Completion, FixedClock, LocalClock, TaskService};
pub use store::{SqliteTaskStore, TaskRepository, LIST_LIMIT};
