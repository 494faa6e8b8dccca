use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{Connection, OptionalExtension};
use todo_core::{NewTask, Task};
use tracing::{debug, info, instrument};

use crate::db::init_db;
use crate::error::{Result, StoreError};

/// Fixed cap on the upcoming-tasks listing.
pub const LIST_LIMIT: usize = 50;

/// Persistence contract for task records.
///
/// Every method is one autocommit statement; callers hold no locks or
/// transactions across calls.
pub trait TaskRepository: Send + Sync {
    /// Insert a row and return the store-assigned ID.
    fn insert(&self, task: &NewTask) -> Result<i64>;

    fn get(&self, id: i64) -> Result<Task>;

    /// Overwrite every column of `task.id`. `NotFound` if no row matched.
    fn update(&self, task: &Task) -> Result<()>;

    /// Overwrite only the date column of `id`. `NotFound` if no row matched.
    fn update_date(&self, id: i64, date: &str) -> Result<()>;

    fn delete(&self, id: i64) -> Result<()>;

    /// At most [`LIST_LIMIT`] tasks, earliest date first.
    fn list_upcoming(&self) -> Result<Vec<Task>>;
}

/// SQLite-backed [`TaskRepository`].
///
/// Wraps a single connection in a `Mutex`; SQLite's own locking covers any
/// other process touching the same file.
pub struct SqliteTaskStore {
    db: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Wrap `conn`, initialising the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves nothing half-applied at the SQLite level.
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskRepository for SqliteTaskStore {
    #[instrument(skip(self, task), fields(date = %task.date))]
    fn insert(&self, task: &NewTask) -> Result<i64> {
        let db = self.conn();
        db.execute(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![task.date, task.title, task.comment, task.repeat],
        )?;
        let id = db.last_insert_rowid();
        info!(task_id = id, "task inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    fn get(&self, id: i64) -> Result<Task> {
        self.conn()
            .query_row(
                "SELECT id, date, title, comment, repeat FROM scheduler WHERE id = ?1",
                [id],
                row_to_task,
            )
            .optional()?
            .ok_or(StoreError::NotFound { id })
    }

    #[instrument(skip(self, task), fields(task_id = task.id))]
    fn update(&self, task: &Task) -> Result<()> {
        let n = self.conn().execute(
            "UPDATE scheduler SET date = ?1, title = ?2, comment = ?3, repeat = ?4 WHERE id = ?5",
            rusqlite::params![task.date, task.title, task.comment, task.repeat, task.id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id: task.id });
        }
        debug!("task updated");
        Ok(())
    }

    #[instrument(skip(self))]
    fn update_date(&self, id: i64, date: &str) -> Result<()> {
        let n = self.conn().execute(
            "UPDATE scheduler SET date = ?1 WHERE id = ?2",
            rusqlite::params![date, id],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        debug!("task rescheduled");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete(&self, id: i64) -> Result<()> {
        let n = self
            .conn()
            .execute("DELETE FROM scheduler WHERE id = ?1", [id])?;
        if n == 0 {
            return Err(StoreError::NotFound { id });
        }
        info!(task_id = id, "task deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_upcoming(&self) -> Result<Vec<Task>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(
            "SELECT id, date, title, comment, repeat FROM scheduler
             ORDER BY date ASC
             LIMIT ?1",
        )?;
        let tasks = stmt
            .query_map([LIST_LIMIT as i64], row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }
}

/// Map a `SELECT id, date, title, comment, repeat` row. NULL text columns read as empty.
fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        date: row.get(1)?,
        title: row.get(2)?,
        comment: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        repeat: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}
