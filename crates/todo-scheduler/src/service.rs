//! Task validation, date normalisation and completion on top of a [`TaskRepository`].

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use todo_core::{format_date, parse_date, NewTask, Task};
use tracing::{info, warn};

use crate::error::{RepeatResult, ServiceError, ServiceResult};
use crate::repeat::next_date;
use crate::store::TaskRepository;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// What completing a task did to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// One-off task, removed.
    Deleted,
    /// Recurring task, moved to `date`.
    Rescheduled { date: String },
}

pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self::with_clock(repo, Arc::new(LocalClock))
    }

    pub fn with_clock(repo: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validate `draft` and pin its date: empty or past dates become today,
    /// and a recurring task moves to its next occurrence after today.
    fn normalize(&self, mut draft: NewTask) -> ServiceResult<NewTask> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::validation("title required"));
        }

        let today = self.today();
        let date = if draft.date.is_empty() {
            today
        } else {
            let date =
                parse_date(&draft.date).ok_or_else(|| ServiceError::validation("invalid date"))?;
            date.max(today)
        };
        draft.date = format_date(date);

        if !draft.repeat.is_empty() {
            draft.date = next_date(today, &draft.date, &draft.repeat).map_err(|e| {
                warn!(repeat = %draft.repeat, error = %e, "rejected repeat rule");
                ServiceError::validation("invalid repeat rule")
            })?;
        }

        Ok(draft)
    }

    pub fn create(&self, draft: NewTask) -> ServiceResult<i64> {
        let task = self.normalize(draft)?;
        let id = self.repo.insert(&task)?;
        info!(task_id = id, date = %task.date, "task created");
        Ok(id)
    }

    pub fn get(&self, id: i64) -> ServiceResult<Task> {
        Ok(self.repo.get(id)?)
    }

    /// Full-record update; `id` is required.
    pub fn update(&self, id: Option<i64>, draft: NewTask) -> ServiceResult<()> {
        let id = id.ok_or_else(|| ServiceError::validation("id required"))?;
        let task = self.normalize(draft)?.into_task(id);
        self.repo.update(&task)?;
        info!(task_id = id, date = %task.date, "task updated");
        Ok(())
    }

    pub fn delete(&self, id: i64) -> ServiceResult<()> {
        Ok(self.repo.delete(id)?)
    }

    pub fn list(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_upcoming()?)
    }

    /// Mark a task done: one-off tasks are deleted, recurring ones move to
    /// their next occurrence after today.
    pub fn complete(&self, id: i64) -> ServiceResult<Completion> {
        let task = self.repo.get(id)?;

        if task.repeat.is_empty() {
            self.repo.delete(id)?;
            info!(task_id = id, "one-off task completed");
            return Ok(Completion::Deleted);
        }

        let date = next_date(self.today(), &task.date, &task.repeat)?;
        self.repo.update_date(id, &date)?;
        info!(task_id = id, %date, "recurring task rescheduled");
        Ok(Completion::Rescheduled { date })
    }

    /// Next date for `repeat` from `date`, relative to `now`. No storage access.
    pub fn preview(now: NaiveDate, date: &str, repeat: &str) -> RepeatResult<String> {
        next_date(now, date, repeat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RepeatError;
    use crate::store::SqliteTaskStore;

    const TODAY: &str = "20240315";

    fn service() -> TaskService {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        let today = parse_date(TODAY).unwrap();
        TaskService::with_clock(Arc::new(store), Arc::new(FixedClock(today)))
    }

    fn draft(date: &str, title: &str, repeat: &str) -> NewTask {
        NewTask {
            date: date.into(),
            title: title.into(),
            comment: String::new(),
            repeat: repeat.into(),
        }
    }

    #[test]
    fn empty_date_becomes_today() {
        let svc = service();
        let id = svc.create(draft("", "call mom", "")).unwrap();
        assert_eq!(svc.get(id).unwrap().date, TODAY);
    }

    #[test]
    fn past_date_becomes_today_and_future_date_is_kept() {
        let svc = service();
        let past = svc.create(draft("20200101", "old", "")).unwrap();
        let future = svc.create(draft("20240401", "later", "")).unwrap();
        assert_eq!(svc.get(past).unwrap().date, TODAY);
        assert_eq!(svc.get(future).unwrap().date, "20240401");
    }

    #[test]
    fn recurring_task_starts_at_next_occurrence() {
        let svc = service();
        let id = svc.create(draft("20240301", "water plants", "d 7")).unwrap();
        // Clamped to today, then advanced one interval.
        assert_eq!(svc.get(id).unwrap().date, "20240322");
    }

    #[test]
    fn short_daily_rules_are_not_pinned_to_today() {
        let svc = service();
        let id = svc.create(draft("", "stretch", "d 1")).unwrap();
        assert_eq!(svc.get(id).unwrap().date, "20240316");
    }

    #[test]
    fn validation_errors() {
        let svc = service();
        let cases = [
            (draft("", "", ""), "title required"),
            (draft("", "   ", ""), "title required"),
            (draft("2024-03-20", "t", ""), "invalid date"),
            (draft("", "t", "w 3"), "invalid repeat rule"),
            (draft("", "t", "d 401"), "invalid repeat rule"),
        ];
        for (input, expected) in cases {
            match svc.create(input) {
                Err(ServiceError::Validation(msg)) => assert_eq!(msg, expected),
                other => panic!("expected validation error {expected:?}, got {other:?}"),
            }
        }
        assert!(svc.list().unwrap().is_empty());
    }

    #[test]
    fn update_requires_id_and_existing_row() {
        let svc = service();
        assert!(matches!(
            svc.update(None, draft("", "t", "")),
            Err(ServiceError::Validation(msg)) if msg == "id required"
        ));
        assert!(matches!(
            svc.update(Some(404), draft("", "t", "")),
            Err(ServiceError::NotFound { id: 404 })
        ));
    }

    #[test]
    fn update_normalizes_like_create() {
        let svc = service();
        let id = svc.create(draft("20240401", "plan", "")).unwrap();
        svc.update(Some(id), draft("20240101", "plan v2", "y")).unwrap();

        let task = svc.get(id).unwrap();
        assert_eq!(task.title, "plan v2");
        assert_eq!(task.date, "20250315");
        assert_eq!(task.repeat, "y");
    }

    #[test]
    fn completing_one_off_removes_it() {
        let svc = service();
        let id = svc.create(draft("", "buy milk", "")).unwrap();
        assert_eq!(svc.complete(id).unwrap(), Completion::Deleted);
        assert!(svc.list().unwrap().iter().all(|t| t.id != id));
        assert!(matches!(svc.get(id), Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn completing_recurring_advances_it() {
        let svc = service();
        let id = svc.create(draft("", "weekly review", "d 7")).unwrap();
        let before = svc.get(id).unwrap().date;

        let Completion::Rescheduled { date } = svc.complete(id).unwrap() else {
            panic!("recurring task should be rescheduled");
        };
        let gap = parse_date(&date).unwrap() - parse_date(&before).unwrap();
        assert!(gap.num_days() >= 7);

        let listed = svc.list().unwrap();
        let task = listed.iter().find(|t| t.id == id).expect("still listed");
        assert_eq!(task.date, date);
        assert_eq!(task.title, "weekly review");
    }

    #[test]
    fn completing_missing_task_is_not_found() {
        let svc = service();
        assert!(matches!(svc.complete(5), Err(ServiceError::NotFound { id: 5 })));
    }

    #[test]
    fn completing_task_with_corrupt_rule_is_a_repeat_error() {
        let store = Arc::new(SqliteTaskStore::open_in_memory().unwrap());
        let id = store.insert(&draft("20240101", "legacy", "m 1")).unwrap();
        let svc = TaskService::with_clock(store, Arc::new(FixedClock(parse_date(TODAY).unwrap())));

        assert!(matches!(
            svc.complete(id),
            Err(ServiceError::Repeat(RepeatError::UnsupportedRule(_)))
        ));
    }

    #[test]
    fn preview_is_pure() {
        let now = parse_date("20240110").unwrap();
        let first = TaskService::preview(now, "20240101", "d 5").unwrap();
        let second = TaskService::preview(now, "20240101", "d 5").unwrap();
        assert_eq!(first, "20240111");
        assert_eq!(first, second);
    }
}
