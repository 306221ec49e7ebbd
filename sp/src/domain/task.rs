//! Task domain type
//!
//! A Task is a schedulable unit of study work. It is either standalone or a
//! subtask owned by a Plan through `plan_id`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::now_ms;
use super::id::generate_id;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Every status, in display order
    pub const ALL: [TaskStatus; 4] = [Self::Pending, Self::InProgress, Self::Completed, Self::Cancelled];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    /// Only the four exact status tokens are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!(
                "Unknown status: {}. Use: pending, in_progress, completed, or cancelled",
                s
            )),
        }
    }
}

/// Caller-supplied fields for a new Task, validated by the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    /// Raw due date (`YYYY-MM-DD` or RFC 3339)
    pub due_date: String,
    pub plan_id: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, description: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
            plan_id: None,
        }
    }

    /// Attach the task to a plan
    pub fn in_plan(mut self, plan_id: impl Into<String>) -> Self {
        self.plan_id = Some(plan_id.into());
        self
    }
}

/// A study task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (e.g., "3fa2c91b-task-read-chapter-4")
    pub id: String,

    pub title: String,

    /// Free text, may be empty
    pub description: String,

    pub due_date: NaiveDate,

    pub status: TaskStatus,

    /// Owning plan; None for standalone tasks
    pub plan_id: Option<String>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Task {
    /// Create a new pending Task with generated ID
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: NaiveDate,
        plan_id: Option<String>,
    ) -> Self {
        let title = title.into();
        let now = now_ms();
        Self {
            id: generate_id("task", &title),
            title,
            description: description.into(),
            due_date,
            status: TaskStatus::Pending,
            plan_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the status
    ///
    /// Returns false and leaves the task untouched when the status is unchanged.
    pub fn set_status(&mut self, status: TaskStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = now_ms();
        true
    }

    pub fn is_standalone(&self) -> bool {
        self.plan_id.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}
