//! Domain types for studyplan
//!
//! Core domain types: Task, Plan, TaskStatus, plus ID and date helpers.

mod date;
mod id;
mod plan;
mod task;

pub use date::{now_ms, parse_date};
pub use id::{IdResolver, generate_id};
pub use plan::{NewPlan, Plan};
pub use task::{NewTask, Task, TaskStatus};
