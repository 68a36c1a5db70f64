//! Task use cases shared by the CLI and the TUI.
//!
//! Every operation takes the current session explicitly. Mutations without
//! one fail with [`Error::NotSignedIn`]; listing without one is just empty.

use chrono::NaiveDate;
use tracing::info;

use crate::auth::{require_session, Session};
use crate::codec::{self, fields, FormData};
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, User};
use crate::storage::Store;

/// Creates a task from add-task form fields.
///
/// `title` and `dueDate` are required; the recurrence is assembled from the
/// `repetitionType` field and its companions and silently dropped when
/// incomplete.
pub fn create_task(store: &Store, session: Option<&Session>, form: &FormData) -> Result<Task> {
    let session = require_session(session)?;

    let title = form.get(fields::TITLE).map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(Error::MissingTitle);
    }
    let due = form
        .get(fields::DUE_DATE)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(Error::MissingDueDate)?;
    let due_date = parse_due_date(due)?;

    let user = store.find_or_create_user(
        &session.email,
        session.name.as_deref(),
        session.image.as_deref(),
    )?;
    let repetition = codec::from_user_input(form.get(fields::REPETITION_TYPE), form);

    let task = store.insert_task(NewTask {
        title: title.to_string(),
        owner_id: Some(user.id),
        due_date,
        repetition,
    })?;
    info!(
        task_id = task.task_id,
        repetition = task.repetition.as_ref().map(|r| r.kind().as_str()).unwrap_or("none"),
        "task created"
    );
    Ok(task)
}

/// Parses a `YYYY-MM-DD` due date.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDueDate(raw.to_string()))
}

/// The signed-in user's tasks, earliest due date first.
pub fn get_tasks(store: &Store, session: Option<&Session>) -> Result<Vec<Task>> {
    let Some(session) = session else {
        return Ok(Vec::new());
    };
    match store.find_user_by_email(&session.email)? {
        Some(user) => store.tasks_for_owner(user.id),
        None => Ok(Vec::new()),
    }
}

/// Flips a task between pending and completed. Returns the updated task.
pub fn toggle_task_completion(
    store: &Store,
    session: Option<&Session>,
    task_id: u64,
) -> Result<Task> {
    let user = current_user(store, session)?;
    let mut task = store
        .find_task(task_id, user.id)?
        .ok_or(Error::TaskNotFound)?;
    task.is_completed = !task.is_completed;
    store.set_completed(task_id, task.is_completed)?;
    info!(task_id, is_completed = task.is_completed, "task toggled");
    Ok(task)
}

/// Deletes one of the signed-in user's tasks.
pub fn delete_task(store: &Store, session: Option<&Session>, task_id: u64) -> Result<()> {
    let user = current_user(store, session)?;
    store.delete_task(task_id, user.id)?;
    info!(task_id, "task deleted");
    Ok(())
}

fn current_user(store: &Store, session: Option<&Session>) -> Result<User> {
    let session = require_session(session)?;
    store
        .find_user_by_email(&session.email)?
        .ok_or(Error::UserNotFound)
}
