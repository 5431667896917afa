//! Task domain types shared across the drag engine and the Firebase store.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kanban column a task belongs to. Serialized with the wire casing the
/// Join backend stores (`"toDo"`, `"inProgress"`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "toDo")]
    ToDo,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "awaitingFeedback")]
    AwaitingFeedback,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "toDo",
            TaskStatus::InProgress => "inProgress",
            TaskStatus::AwaitingFeedback => "awaitingFeedback",
            TaskStatus::Done => "done",
        }
    }

    pub fn all() -> [TaskStatus; 4] {
        [
            TaskStatus::ToDo,
            TaskStatus::InProgress,
            TaskStatus::AwaitingFeedback,
            TaskStatus::Done,
        ]
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "toDo" => Ok(Self::ToDo),
            "inProgress" => Ok(Self::InProgress),
            "awaitingFeedback" => Ok(Self::AwaitingFeedback),
            "done" => Ok(Self::Done),
            _ => Err(()),
        }
    }
}

/// The slice of a Join task the drag subsystem and its cache care about.
/// Field names follow the capitalised casing of the hosted JSON tree.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Task {
    #[serde(skip, default)]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Status")]
    pub status: TaskStatus,
    #[serde(rename = "Priority", default)]
    pub priority: Option<String>,
    #[serde(rename = "DueDate", default)]
    pub due_date: Option<String>,
}
