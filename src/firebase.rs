//! Task persistence against the hosted Firebase Realtime Database.
//!
//! The drag engines emit `PersistStatus` effects; the host forwards them
//! here. Writes are optimistic: the board has already moved the card when
//! the PATCH goes out, and a failed PATCH is reported back so the host can
//! ask the engine for a `RevertCard` and surface the error.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::types::{Task, TaskStatus};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage scope of the current user. Guest data lives under a shared
/// subtree, registered users each get their own.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UserScope {
    Guest,
    Registered { user_id: String },
}

impl UserScope {
    pub fn path_segment(&self) -> String {
        match self {
            UserScope::Guest => "guest".to_string(),
            UserScope::Registered { user_id } => format!("users/{user_id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FirebaseTaskStore {
    client: reqwest::Client,
    base_url: String,
    scope: UserScope,
}

impl FirebaseTaskStore {
    pub fn new(base_url: impl Into<String>, scope: UserScope) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            scope,
        })
    }

    pub fn task_url(&self, task_id: &str) -> String {
        format!(
            "{}/{}/tasks/{}.json",
            self.base_url,
            self.scope.path_segment(),
            task_id
        )
    }

    pub fn tasks_url(&self) -> String {
        format!("{}/{}/tasks.json", self.base_url, self.scope.path_segment())
    }

    /// Persist a column change for one task.
    pub async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> Result<()> {
        let url = self.task_url(task_id);
        debug!(task_id, status = status.as_str(), "patching task status");

        let response = self
            .client
            .patch(&url)
            .json(&json!({ "Status": status.as_str() }))
            .send()
            .await
            .with_context(|| format!("failed to reach task store for task '{task_id}'"))?;

        response
            .error_for_status()
            .with_context(|| format!("task store rejected status update for task '{task_id}'"))?;
        Ok(())
    }

    /// Fetch the scope's full task map. Firebase returns an object keyed by
    /// push id (or `null` for an empty subtree).
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let url = self.tasks_url();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("failed to reach task store")?
            .error_for_status()
            .context("task store rejected task fetch")?;

        let raw: Option<BTreeMap<String, Task>> = response
            .json()
            .await
            .context("failed to decode task list")?;

        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .map(|(id, mut task)| {
                task.id = id;
                task
            })
            .collect())
    }
}

/// In-memory task list kept consistent with successful writes so the next
/// render does not need a refetch.
#[derive(Debug, Default, Clone)]
pub struct TaskCache {
    tasks: Vec<Task>,
}

impl TaskCache {
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn reconcile_status(&mut self, task_id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == task_id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => {
                warn!(task_id, "status reconcile for unknown task");
                false
            }
        }
    }

    pub fn tasks_with_status(&self, status: TaskStatus) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |task| task.status == status)
    }
}

/// Glue for a drop: PATCH first, reconcile the cache only on success. The
/// caller reverts the optimistic DOM move when this errors.
pub async fn persist_drop(
    store: &FirebaseTaskStore,
    cache: &mut TaskCache,
    task_id: &str,
    status: TaskStatus,
) -> Result<()> {
    store.update_task_status(task_id, status).await?;
    cache.reconcile_status(task_id, status);
    Ok(())
}
