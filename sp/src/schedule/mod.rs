//! Deadline scheduling
//!
//! `distribute` computes proportional deadlines; `ScheduleOrchestrator` uses it
//! with a `Clock` to generate plans of dated subtasks.

mod clock;
mod distribute;
mod orchestrator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use distribute::{clamp_steps, distribute};
pub use orchestrator::{GenerateRequest, GeneratedPlan, ScheduleMode, ScheduleOrchestrator};
