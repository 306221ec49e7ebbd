//! ScheduleOrchestrator - turns an assignment into dated subtasks
//!
//! Clamps the step count, spreads deadlines between today and the due date,
//! and stores the plan and its subtasks as one batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{NewPlan, NewTask, Plan, Task, parse_date};
use crate::error::{StoreError, StoreResult};
use crate::store::TaskStore;

use super::clock::{Clock, SystemClock};
use super::distribute::{clamp_steps, distribute};

/// Maximum length of a plan name derived from assignment text
const PLAN_NAME_MAX_CHARS: usize = 60;

/// Whether generated subtasks get an owning plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    #[default]
    WithPlan,
    Standalone,
}

/// Input to `generate_plan`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub assignment_description: String,
    /// Raw due date (`YYYY-MM-DD` or RFC 3339)
    pub due_date: String,
    /// Requested step count; clamped, never rejected
    pub steps: i64,
    pub mode: ScheduleMode,
}

impl GenerateRequest {
    pub fn new(assignment_description: impl Into<String>, due_date: impl Into<String>, steps: i64) -> Self {
        Self {
            assignment_description: assignment_description.into(),
            due_date: due_date.into(),
            steps,
            mode: ScheduleMode::WithPlan,
        }
    }

    pub fn standalone(mut self) -> Self {
        self.mode = ScheduleMode::Standalone;
        self
    }
}

/// Output of `generate_plan`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlan {
    /// None in standalone mode
    pub plan: Option<Plan>,
    pub tasks: Vec<Task>,
}

/// Derive a plan name from the first non-empty line of the assignment
fn plan_name(assignment: &str) -> String {
    let first_line = assignment.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    first_line.chars().take(PLAN_NAME_MAX_CHARS).collect::<String>().trim_end().to_string()
}

#[derive(Clone)]
pub struct ScheduleOrchestrator {
    clock: Arc<dyn Clock>,
}

impl Default for ScheduleOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ScheduleOrchestrator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Deadlines `generate_plan` would assign, without writing anything
    pub fn preview(&self, request: &GenerateRequest) -> StoreResult<Vec<NaiveDate>> {
        debug!(steps = request.steps, due = %request.due_date, "preview: called");
        let due = parse_date(&request.due_date)?;
        Ok(distribute(self.clock.today(), due, clamp_steps(request.steps)))
    }

    /// Create `steps` subtasks spread from today to the due date
    pub fn generate_plan(&self, store: &mut TaskStore, request: GenerateRequest) -> StoreResult<GeneratedPlan> {
        debug!(steps = request.steps, mode = ?request.mode, "generate_plan: called");
        let assignment = request.assignment_description.trim();
        if assignment.is_empty() {
            return Err(StoreError::validation("assignment description must not be empty"));
        }
        let due = parse_date(&request.due_date)?;
        let steps = clamp_steps(request.steps);
        if i64::from(steps) != request.steps {
            debug!(requested = request.steps, steps, "generate_plan: step count clamped");
        }

        let today = self.clock.today();
        let deadlines = distribute(today, due, steps);

        let tasks: Vec<NewTask> = deadlines
            .iter()
            .enumerate()
            .map(|(i, deadline)| {
                let n = i + 1;
                NewTask::new(
                    format!("Step {} of {}", n, steps),
                    format!("Step {} of {} for: {}", n, steps, assignment),
                    deadline.format("%Y-%m-%d").to_string(),
                )
            })
            .collect();

        let plan = match request.mode {
            ScheduleMode::WithPlan => Some(NewPlan::new(
                plan_name(assignment),
                format!("Auto-scheduled in {} steps", steps),
                assignment,
                due.format("%Y-%m-%d").to_string(),
            )),
            ScheduleMode::Standalone => None,
        };

        let (plan, tasks) = store.create_plan_with_tasks(plan, tasks)?;
        info!(
            plan_id = ?plan.as_ref().map(|p| p.id.as_str()),
            %today,
            %due,
            steps,
            "Generated schedule"
        );
        Ok(GeneratedPlan { plan, tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn orchestrator_at(today: NaiveDate) -> ScheduleOrchestrator {
        ScheduleOrchestrator::new(Arc::new(FixedClock(today)))
    }

    #[test]
    fn test_single_step_lands_on_due_date() {
        let mut store = TaskStore::in_memory();
        let generated = orchestrator_at(date(2024, 6, 1))
            .generate_plan(&mut store, GenerateRequest::new("Essay", "2024-06-10", 1))
            .unwrap();

        assert_eq!(generated.tasks.len(), 1);
        assert_eq!(generated.tasks[0].due_date, date(2024, 6, 10));
        let plan = generated.plan.unwrap();
        assert_eq!(plan.name, "Essay");
        assert_eq!(plan.assignment_description, "Essay");
        assert_eq!(generated.tasks[0].plan_id.as_deref(), Some(plan.id.as_str()));
    }

    #[test]
    fn test_five_steps_over_ten_days() {
        let mut store = TaskStore::in_memory();
        let generated = orchestrator_at(date(2024, 1, 1))
            .generate_plan(&mut store, GenerateRequest::new("Lab report", "2024-01-11", 5))
            .unwrap();

        let dues: Vec<NaiveDate> = generated.tasks.iter().map(|t| t.due_date).collect();
        assert_eq!(
            dues,
            vec![
                date(2024, 1, 3),
                date(2024, 1, 5),
                date(2024, 1, 7),
                date(2024, 1, 9),
                date(2024, 1, 11),
            ]
        );
        assert_eq!(generated.tasks[0].title, "Step 1 of 5");
        assert!(generated.tasks[4].description.contains("Lab report"));
        assert_eq!(store.list_tasks().len(), 5);
        assert_eq!(store.list_plans().len(), 1);
    }

    #[test]
    fn test_steps_are_clamped() {
        let mut store = TaskStore::in_memory();
        let orchestrator = orchestrator_at(date(2024, 1, 1));

        let many = orchestrator
            .generate_plan(&mut store, GenerateRequest::new("Thesis", "2024-12-31", 50))
            .unwrap();
        assert_eq!(many.tasks.len(), 10);

        let none = orchestrator
            .generate_plan(&mut store, GenerateRequest::new("Quiz", "2024-01-05", 0))
            .unwrap();
        assert_eq!(none.tasks.len(), 1);

        let negative = orchestrator
            .generate_plan(&mut store, GenerateRequest::new("Quiz", "2024-01-05", -4))
            .unwrap();
        assert_eq!(negative.tasks.len(), 1);
    }

    #[test]
    fn test_standalone_mode_creates_no_plan() {
        let mut store = TaskStore::in_memory();
        let generated = orchestrator_at(date(2024, 1, 1))
            .generate_plan(&mut store, GenerateRequest::new("Reading", "2024-01-04", 3).standalone())
            .unwrap();

        assert!(generated.plan.is_none());
        assert!(generated.tasks.iter().all(|t| t.is_standalone()));
        assert!(store.list_plans().is_empty());
    }

    #[test]
    fn test_past_due_date_is_accepted() {
        let mut store = TaskStore::in_memory();
        let generated = orchestrator_at(date(2024, 1, 10))
            .generate_plan(&mut store, GenerateRequest::new("Late", "2024-01-05", 2))
            .unwrap();
        let dues: Vec<NaiveDate> = generated.tasks.iter().map(|t| t.due_date).collect();
        assert_eq!(dues, vec![date(2024, 1, 7), date(2024, 1, 5)]);
    }

    #[test]
    fn test_bad_due_date_is_validation_error() {
        let mut store = TaskStore::in_memory();
        let err = orchestrator_at(date(2024, 1, 1))
            .generate_plan(&mut store, GenerateRequest::new("Essay", "next week", 3))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.list_tasks().is_empty());
        assert!(store.list_plans().is_empty());
    }

    #[test]
    fn test_empty_assignment_is_validation_error() {
        let mut store = TaskStore::in_memory();
        let err = orchestrator_at(date(2024, 1, 1))
            .generate_plan(&mut store, GenerateRequest::new("  ", "2024-02-01", 3))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_preview_matches_generated_deadlines() {
        let orchestrator = orchestrator_at(date(2024, 1, 1));
        let request = GenerateRequest::new("Lab report", "2024-01-11", 5);

        let preview = orchestrator.preview(&request).unwrap();
        let mut store = TaskStore::in_memory();
        let generated = orchestrator.generate_plan(&mut store, request).unwrap();

        let dues: Vec<NaiveDate> = generated.tasks.iter().map(|t| t.due_date).collect();
        assert_eq!(preview, dues);
    }

    #[test]
    fn test_preview_clamps_and_validates() {
        let orchestrator = orchestrator_at(date(2024, 1, 1));
        assert_eq!(
            orchestrator
                .preview(&GenerateRequest::new("Thesis", "2024-12-31", 40))
                .unwrap()
                .len(),
            10
        );
        assert!(
            orchestrator
                .preview(&GenerateRequest::new("Thesis", "someday", 3))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn test_plan_name_from_first_line() {
        assert_eq!(plan_name("\n  History essay  \nTwo thousand words"), "History essay");
        let long = "x".repeat(100);
        assert_eq!(plan_name(&long).chars().count(), PLAN_NAME_MAX_CHARS);
    }
}
