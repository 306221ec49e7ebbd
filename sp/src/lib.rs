//! studyplan - study tasks and auto-scheduled plans
//!
//! Users create study tasks, optionally grouped into plans. Generating a plan
//! from an assignment spreads N subtask deadlines proportionally between today
//! and the assignment's due date.
//!
//! # Modules
//!
//! - [`schedule`] - deadline distribution and plan generation
//! - [`store`] - TaskStore and its persistence collaborators
//! - [`aggregate`] - grouping tasks by plan with progress
//! - [`state`] - actor serializing access to the store
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//!
//! # Example
//!
//! ```ignore
//! use studyplan::{GenerateRequest, ScheduleOrchestrator, TaskStore, aggregate};
//!
//! let mut store = TaskStore::in_memory();
//! let generated = ScheduleOrchestrator::default()
//!     .generate_plan(&mut store, GenerateRequest::new("Essay", "2024-06-10", 5))?;
//! let view = aggregate(&store.list_tasks(), &store.list_plans());
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod schedule;
pub mod state;
pub mod store;

pub use aggregate::{Aggregate, PlanGroup, StatusCounts, aggregate};
pub use config::Config;
pub use domain::{IdResolver, NewPlan, NewTask, Plan, Task, TaskStatus, parse_date};
pub use error::{StoreError, StoreResult};
pub use schedule::{
    Clock, FixedClock, GenerateRequest, GeneratedPlan, ScheduleMode, ScheduleOrchestrator, SystemClock, clamp_steps,
    distribute,
};
pub use state::{StateCommand, StateManager, StateResponse};
pub use store::{MemoryPersistence, Persistence, Snapshot, SqlitePersistence, TaskStore};

/// Fewest subtasks a generated plan can have
pub const MIN_STEPS: u32 = 1;

/// Most subtasks a generated plan can have
pub const MAX_STEPS: u32 = 10;

/// Step count used when none is given
pub const DEFAULT_STEPS: u32 = 5;
