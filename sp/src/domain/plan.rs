//! Plan domain type
//!
//! A Plan is a named container owning the subtasks generated for one
//! assignment. All of its tasks share the plan's terminal due date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date::now_ms;
use super::id::generate_id;

/// Caller-supplied fields for a new Plan, validated by the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlan {
    pub name: String,
    pub description: String,
    pub assignment_description: String,
    /// Raw due date (`YYYY-MM-DD` or RFC 3339)
    pub due_date: String,
}

impl NewPlan {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        assignment_description: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            assignment_description: assignment_description.into(),
            due_date: due_date.into(),
        }
    }
}

/// A study plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier (e.g., "3fa2c91b-plan-final-essay")
    pub id: String,

    pub name: String,

    pub description: String,

    /// Source text the subtasks were derived from
    pub assignment_description: String,

    /// Terminal deadline for every subtask
    pub due_date: NaiveDate,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Plan {
    /// Create a new Plan with generated ID
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        assignment_description: impl Into<String>,
        due_date: NaiveDate,
    ) -> Self {
        let name = name.into();
        let now = now_ms();
        Self {
            id: generate_id("plan", &name),
            name,
            description: description.into(),
            assignment_description: assignment_description.into(),
            due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a Plan with a specific ID (for testing or recovery)
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, due_date: NaiveDate) -> Self {
        let now = now_ms();
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            assignment_description: String::new(),
            due_date,
            created_at: now,
            updated_at: now,
        }
    }
}
