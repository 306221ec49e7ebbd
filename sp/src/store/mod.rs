//! Task and plan storage
//!
//! TaskStore owns the in-memory records and writes every mutation through a
//! Persistence collaborator (SQLite or memory-only).

mod persistence;
mod task_store;

pub use persistence::{MemoryPersistence, Persistence, SqlitePersistence};
pub use task_store::{Snapshot, TaskStore};
