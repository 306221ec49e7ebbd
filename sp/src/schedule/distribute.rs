//! Proportional deadline distribution

use chrono::{Duration, NaiveDate};

use crate::{MAX_STEPS, MIN_STEPS};

/// Clamp a requested step count into `[MIN_STEPS, MAX_STEPS]`
pub fn clamp_steps(steps: i64) -> u32 {
    steps.clamp(i64::from(MIN_STEPS), i64::from(MAX_STEPS)) as u32
}

/// Spread `steps` deadlines between `start` and `due`
///
/// The i-th deadline (1-based) is `start + floor(total_days * i / steps)`, so the
/// last one always lands on `due`. A due date before `start` is not an error: the
/// sequence clusters backwards from `start` and still ends on `due`.
pub fn distribute(start: NaiveDate, due: NaiveDate, steps: u32) -> Vec<NaiveDate> {
    let steps = i64::from(steps.max(1));
    let total_days = due.signed_duration_since(start).num_days();

    (1..=steps)
        .map(|i| start + Duration::days((total_days * i).div_euclid(steps)))
        .collect()
}
