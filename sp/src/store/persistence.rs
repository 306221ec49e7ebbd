//! Persistence collaborators behind the TaskStore
//!
//! Every method is a single all-or-nothing unit: on error nothing was written.

use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

use crate::domain::{Plan, Task, TaskStatus};
use crate::error::{StoreError, StoreResult};

use super::Snapshot;

/// Durable storage for plans and tasks
pub trait Persistence: Send {
    /// Load every stored plan and task in insertion order
    fn load(&mut self) -> StoreResult<Snapshot>;

    /// Insert an optional plan and its tasks in one unit
    fn insert(&mut self, plan: Option<&Plan>, tasks: &[Task]) -> StoreResult<()>;

    /// Overwrite a stored task
    fn update_task(&mut self, task: &Task) -> StoreResult<()>;

    fn delete_task(&mut self, id: &str) -> StoreResult<()>;

    /// Delete a plan together with every task it owns
    fn delete_plan(&mut self, id: &str) -> StoreResult<()>;
}

/// No durability; the TaskStore's in-memory snapshot is the only copy
#[derive(Debug, Default)]
pub struct MemoryPersistence;

impl Persistence for MemoryPersistence {
    fn load(&mut self) -> StoreResult<Snapshot> {
        Ok(Snapshot::default())
    }

    fn insert(&mut self, _plan: Option<&Plan>, _tasks: &[Task]) -> StoreResult<()> {
        Ok(())
    }

    fn update_task(&mut self, _task: &Task) -> StoreResult<()> {
        Ok(())
    }

    fn delete_task(&mut self, _id: &str) -> StoreResult<()> {
        Ok(())
    }

    fn delete_plan(&mut self, _id: &str) -> StoreResult<()> {
        Ok(())
    }
}

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS plans (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    assignment_description TEXT NOT NULL,
    due_date TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    due_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    plan_id TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    FOREIGN KEY (plan_id) REFERENCES plans(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_tasks_plan ON tasks(plan_id);
"#;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed persistence
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Open or create a database file
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "SqlitePersistence::open: called");
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Persistence(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        info!("SQLite schema ready");
        Ok(Self { conn })
    }

    fn insert_task_row(tx: &rusqlite::Transaction<'_>, task: &Task) -> rusqlite::Result<usize> {
        tx.execute(
            "INSERT INTO tasks (id, title, description, due_date, status, plan_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.format(DATE_FORMAT).to_string(),
                task.status.to_string(),
                task.plan_id,
                task.created_at,
                task.updated_at,
            ],
        )
    }
}

fn parse_column<T, E: std::fmt::Display>(idx: usize, parsed: Result<T, E>) -> rusqlite::Result<T> {
    parsed.map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
        )
    })
}

fn plan_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plan> {
    let due: String = row.get(4)?;
    Ok(Plan {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        assignment_description: row.get(3)?,
        due_date: parse_column(4, NaiveDate::parse_from_str(&due, DATE_FORMAT))?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let due: String = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        due_date: parse_column(3, NaiveDate::parse_from_str(&due, DATE_FORMAT))?,
        status: parse_column(4, status.parse::<TaskStatus>())?,
        plan_id: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Persistence for SqlitePersistence {
    fn load(&mut self) -> StoreResult<Snapshot> {
        debug!("SqlitePersistence::load: called");
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, assignment_description, due_date, created_at, updated_at
             FROM plans ORDER BY seq",
        )?;
        let plans = stmt.query_map([], plan_from_row)?.collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, due_date, status, plan_id, created_at, updated_at
             FROM tasks ORDER BY seq",
        )?;
        let tasks = stmt.query_map([], task_from_row)?.collect::<Result<Vec<_>, _>>()?;

        info!(plans = plans.len(), tasks = tasks.len(), "Loaded snapshot from SQLite");
        Ok(Snapshot { plans, tasks })
    }

    fn insert(&mut self, plan: Option<&Plan>, tasks: &[Task]) -> StoreResult<()> {
        debug!(plan_id = ?plan.map(|p| p.id.as_str()), task_count = tasks.len(), "SqlitePersistence::insert: called");
        let tx = self.conn.transaction()?;
        if let Some(plan) = plan {
            tx.execute(
                "INSERT INTO plans (id, name, description, assignment_description, due_date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    plan.id,
                    plan.name,
                    plan.description,
                    plan.assignment_description,
                    plan.due_date.format(DATE_FORMAT).to_string(),
                    plan.created_at,
                    plan.updated_at,
                ],
            )?;
        }
        for task in tasks {
            Self::insert_task_row(&tx, task)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        debug!(task_id = %task.id, status = %task.status, "SqlitePersistence::update_task: called");
        let changed = self.conn.execute(
            "UPDATE tasks SET title = ?2, description = ?3, due_date = ?4, status = ?5, updated_at = ?6
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.due_date.format(DATE_FORMAT).to_string(),
                task.status.to_string(),
                task.updated_at,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::Persistence(format!("task row {} missing", task.id)));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> StoreResult<()> {
        debug!(%id, "SqlitePersistence::delete_task: called");
        self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_plan(&mut self, id: &str) -> StoreResult<()> {
        debug!(%id, "SqlitePersistence::delete_plan: called");
        let tx = self.conn.transaction()?;
        let removed_tasks = tx.execute("DELETE FROM tasks WHERE plan_id = ?1", params![id])?;
        tx.execute("DELETE FROM plans WHERE id = ?1", params![id])?;
        tx.commit()?;
        debug!(%id, removed_tasks, "SqlitePersistence::delete_plan: committed");
        Ok(())
    }
}
