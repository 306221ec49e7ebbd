//! State management with actor pattern
//!
//! StateManager owns the TaskStore and processes messages via channels,
//! providing serialized access to plans and tasks from concurrent callers.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateResponse};
