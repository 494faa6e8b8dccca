pub mod error;
pub mod nextdate;
pub mod task;

pub use error::{ApiError, JsonBody};
