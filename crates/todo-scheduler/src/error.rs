use thiserror::Error;

/// Errors produced while parsing or applying a recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepeatError {
    /// The start date is not a valid `YYYYMMDD` date, or stepping left the calendar range.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("repeat rule is empty")]
    EmptyRule,

    /// Right rule kind, wrong number of tokens.
    #[error("invalid repeat rule format: {0:?}")]
    MalformedRule(String),

    /// The day count of a `d <n>` rule is not an integer in `1..=400`.
    #[error("invalid number of days: {0:?}")]
    InvalidInterval(String),

    #[error("unsupported repeat rule format: {0:?}")]
    UnsupportedRule(String),
}

/// Errors raised by the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the given ID exists.
    #[error("task not found: {id}")]
    NotFound { id: i64 },

    /// Underlying SQLite / rusqlite error, constraint violations included.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Errors surfaced by [`crate::service::TaskService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing client input.
    #[error("{0}")]
    Validation(String),

    #[error("task not found")]
    NotFound { id: i64 },

    #[error("storage error: {0}")]
    Storage(#[source] StoreError),

    /// A stored rule could not be applied. Stored rules are validated on
    /// write, so this is a server fault rather than a client one.
    #[error("failed to calculate next date: {0}")]
    Repeat(#[from] RepeatError),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => ServiceError::NotFound { id },
            other => ServiceError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
pub type RepeatResult<T> = std::result::Result<T, RepeatError>;
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
