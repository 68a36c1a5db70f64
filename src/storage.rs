//! JSON-file persistence for tasks and users under the data directory.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::codec;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{NewTask, Task, User};

/// A task record as persisted in `tasks.json`.
///
/// The recurrence is kept in its storage form: a discriminator plus a flat
/// JSON object, both `None` when the task does not repeat.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub task_id: u64,
    pub title: String,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub is_completed: bool,
    /// Stored as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    #[serde(default)]
    pub repetition_type: Option<String>,
    #[serde(default)]
    pub repetition_data: Option<Value>,
}

impl StoredTask {
    fn from_new(task_id: u64, task: NewTask) -> StoredTask {
        let (repetition_type, repetition_data) = codec::encode(task.repetition.as_ref());
        StoredTask {
            task_id,
            title: task.title,
            owner_id: task.owner_id,
            is_completed: false,
            due_date: task.due_date,
            repetition_type,
            repetition_data,
        }
    }
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Task {
        let repetition = codec::decode(
            stored.repetition_type.as_deref(),
            stored.repetition_data.as_ref(),
        );
        Task {
            task_id: stored.task_id,
            title: stored.title,
            owner_id: stored.owner_id,
            is_completed: stored.is_completed,
            due_date: stored.due_date,
            repetition,
        }
    }
}

/// JSON-file record store for users and tasks.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// A store rooted at `dir`. The directory must exist before writing.
    pub fn new(dir: impl Into<PathBuf>) -> Store {
        Store { dir: dir.into() }
    }

    /// Opens the store in the configured data directory, creating it if needed.
    pub fn open(config: &Config) -> Result<Store> {
        config.ensure_data_dir()?;
        Ok(Store::new(config.data_dir()))
    }

    fn tasks_path(&self) -> PathBuf {
        self.dir.join("tasks.json")
    }

    fn users_path(&self) -> PathBuf {
        self.dir.join("users.json")
    }

    /// Loads every task record. A missing file is an empty store.
    pub fn load_tasks(&self) -> Result<Vec<StoredTask>> {
        read_json(&self.tasks_path())
    }

    /// Overwrites the task file with `tasks`.
    pub fn save_tasks(&self, tasks: &[StoredTask]) -> Result<()> {
        write_json(&self.tasks_path(), tasks)
    }

    pub fn load_users(&self) -> Result<Vec<User>> {
        read_json(&self.users_path())
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        write_json(&self.users_path(), users)
    }

    /// Tasks owned by `owner_id`, earliest due date first.
    pub fn tasks_for_owner(&self, owner_id: u64) -> Result<Vec<Task>> {
        let mut tasks: Vec<StoredTask> = self
            .load_tasks()?
            .into_iter()
            .filter(|t| t.owner_id == Some(owner_id))
            .collect();
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.task_id.cmp(&b.task_id)));
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    /// Inserts a new, not yet completed task and returns it with its id.
    pub fn insert_task(&self, task: NewTask) -> Result<Task> {
        let mut tasks = self.load_tasks()?;
        let next_id = tasks.iter().map(|t| t.task_id).max().unwrap_or(0) + 1;
        let stored = StoredTask::from_new(next_id, task);
        tasks.push(stored.clone());
        self.save_tasks(&tasks)?;
        debug!(task_id = next_id, "task inserted");
        Ok(Task::from(stored))
    }

    /// Looks up a task only if it belongs to `owner_id`.
    pub fn find_task(&self, task_id: u64, owner_id: u64) -> Result<Option<Task>> {
        Ok(self
            .load_tasks()?
            .into_iter()
            .find(|t| t.task_id == task_id && t.owner_id == Some(owner_id))
            .map(Task::from))
    }

    pub fn set_completed(&self, task_id: u64, is_completed: bool) -> Result<()> {
        let mut tasks = self.load_tasks()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.task_id == task_id)
            .ok_or(Error::TaskNotFound)?;
        task.is_completed = is_completed;
        self.save_tasks(&tasks)
    }

    /// Deletes a task owned by `owner_id`; anyone else's task is "not found".
    pub fn delete_task(&self, task_id: u64, owner_id: u64) -> Result<()> {
        let mut tasks = self.load_tasks()?;
        let len_before = tasks.len();
        tasks.retain(|t| !(t.task_id == task_id && t.owner_id == Some(owner_id)));
        if tasks.len() == len_before {
            return Err(Error::TaskNotFound);
        }
        self.save_tasks(&tasks)?;
        debug!(task_id, "task deleted");
        Ok(())
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|u| u.email == email))
    }

    /// Returns the user with `email`, creating it on first use.
    pub fn find_or_create_user(
        &self,
        email: &str,
        name: Option<&str>,
        image: Option<&str>,
    ) -> Result<User> {
        let mut users = self.load_users()?;
        if let Some(user) = users.iter().find(|u| u.email == email) {
            return Ok(user.clone());
        }
        let user = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            name: name.unwrap_or("Usuário").to_string(),
            email: email.to_string(),
            image: image.map(str::to_string),
        };
        users.push(user.clone());
        self.save_users(&users)?;
        debug!(user_id = user.id, "user created");
        Ok(user)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(serde_json::from_str(&s)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

