//! Plan aggregation
//!
//! Derives, from a snapshot of plans and tasks, the per-plan grouping with
//! completion progress and the list of standalone tasks. Recomputed on every
//! read; nothing is cached.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::{Plan, Task, TaskStatus};

/// A plan with the tasks it owns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanGroup {
    pub plan: Plan,
    /// Owned tasks, in snapshot order
    pub tasks: Vec<Task>,
    pub completed: usize,
    pub total: usize,
    /// 0.0 for an empty plan, otherwise `100 * completed / total`
    pub progress_pct: f64,
}

impl PlanGroup {
    fn new(plan: Plan) -> Self {
        Self {
            plan,
            tasks: Vec::new(),
            completed: 0,
            total: 0,
            progress_pct: 0.0,
        }
    }

    fn finish(&mut self) {
        self.total = self.tasks.len();
        self.completed = self.tasks.iter().filter(|t| t.is_completed()).count();
        self.progress_pct = if self.total == 0 {
            0.0
        } else {
            100.0 * self.completed as f64 / self.total as f64
        };
    }
}

/// Task counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed + self.cancelled
    }

    fn add(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Cancelled => self.cancelled += 1,
        }
    }
}

/// Grouped view of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregate {
    /// One group per plan, in plan order; empty plans included
    pub plan_groups: Vec<PlanGroup>,
    /// Tasks with no owning plan, in snapshot order
    pub standalone: Vec<Task>,
}

impl Aggregate {
    /// Look up a plan's group by plan ID
    pub fn group(&self, plan_id: &str) -> Option<&PlanGroup> {
        self.plan_groups.iter().find(|g| g.plan.id == plan_id)
    }

    /// Status counts across every task in the view
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        self.plan_groups
            .iter()
            .flat_map(|g| g.tasks.iter())
            .chain(self.standalone.iter())
            .for_each(|t| counts.add(t.status));
        counts
    }
}

/// Group tasks under their plans and compute progress
///
/// A task whose `plan_id` names a plan missing from `plans` is placed with the
/// standalone tasks so that every task lands in exactly one bucket.
pub fn aggregate(tasks: &[Task], plans: &[Plan]) -> Aggregate {
    debug!(tasks = tasks.len(), plans = plans.len(), "aggregate: called");
    let mut plan_groups: Vec<PlanGroup> = Vec::with_capacity(plans.len());
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(plans.len());

    for plan in plans {
        if index.contains_key(plan.id.as_str()) {
            warn!(plan_id = %plan.id, "aggregate: duplicate plan ignored");
            continue;
        }
        index.insert(plan.id.as_str(), plan_groups.len());
        plan_groups.push(PlanGroup::new(plan.clone()));
    }

    let mut standalone = Vec::new();
    for task in tasks {
        match task.plan_id.as_deref() {
            Some(plan_id) => match index.get(plan_id) {
                Some(&idx) => plan_groups[idx].tasks.push(task.clone()),
                None => {
                    warn!(task_id = %task.id, %plan_id, "aggregate: task references unknown plan");
                    standalone.push(task.clone());
                }
            },
            None => standalone.push(task.clone()),
        }
    }

    plan_groups.iter_mut().for_each(PlanGroup::finish);

    Aggregate {
        plan_groups,
        standalone,
    }
}
