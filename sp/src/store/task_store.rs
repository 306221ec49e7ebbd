//! TaskStore - authoritative collection of tasks and plans
//!
//! Mutations are validated, written through to the persistence collaborator,
//! and only then applied to the in-memory snapshot. A failed write leaves the
//! store exactly as it was.

use tracing::{debug, info, warn};

use crate::domain::{NewPlan, NewTask, Plan, Task, TaskStatus, generate_id, parse_date};
use crate::error::{StoreError, StoreResult};

use super::persistence::{MemoryPersistence, Persistence};

/// Consistent copy of every plan and task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub plans: Vec<Plan>,
    pub tasks: Vec<Task>,
}

pub struct TaskStore {
    plans: Vec<Plan>,
    tasks: Vec<Task>,
    persistence: Box<dyn Persistence>,
}

impl std::fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskStore")
            .field("plans", &self.plans.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

fn require(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

impl TaskStore {
    /// Open a store, loading whatever the persistence collaborator already holds
    pub fn open(mut persistence: Box<dyn Persistence>) -> StoreResult<Self> {
        let Snapshot { plans, tasks } = persistence.load()?;
        info!(plans = plans.len(), tasks = tasks.len(), "TaskStore opened");
        Ok(Self {
            plans,
            tasks,
            persistence,
        })
    }

    /// Store with no durability
    pub fn in_memory() -> Self {
        Self {
            plans: Vec::new(),
            tasks: Vec::new(),
            persistence: Box::new(MemoryPersistence),
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.plans.iter().any(|p| p.id == id) || self.tasks.iter().any(|t| t.id == id)
    }

    /// Regenerate an ID until it is unused by any record
    fn unique_id(&self, mut id: String, record_type: &str, title: &str, pending: &[Task]) -> String {
        while self.contains_id(&id) || pending.iter().any(|t| t.id == id) {
            warn!(%id, "unique_id: collision, regenerating");
            id = generate_id(record_type, title);
        }
        id
    }

    /// A task may only reference a plan that already exists
    fn check_plan_ref(&self, plan_id: Option<&str>) -> StoreResult<()> {
        match plan_id {
            Some(id) if self.get_plan(id).is_none() => {
                Err(StoreError::validation(format!("plan {} does not exist", id)))
            }
            _ => Ok(()),
        }
    }

    fn build_task(&self, fields: NewTask, pending: &[Task]) -> StoreResult<Task> {
        require("title", &fields.title)?;
        let due_date = parse_date(&fields.due_date)?;
        let mut task = Task::new(fields.title, fields.description, due_date, fields.plan_id);
        task.id = self.unique_id(task.id, "task", &task.title, pending);
        Ok(task)
    }

    fn build_plan(&self, fields: NewPlan) -> StoreResult<Plan> {
        require("name", &fields.name)?;
        require("description", &fields.description)?;
        require("assignment_description", &fields.assignment_description)?;
        let due_date = parse_date(&fields.due_date)?;
        let mut plan = Plan::new(fields.name, fields.description, fields.assignment_description, due_date);
        plan.id = self.unique_id(plan.id, "plan", &plan.name, &[]);
        Ok(plan)
    }

    /// Create a pending task
    pub fn create_task(&mut self, fields: NewTask) -> StoreResult<Task> {
        debug!(title = %fields.title, plan_id = ?fields.plan_id, "create_task: called");
        self.check_plan_ref(fields.plan_id.as_deref())?;
        let task = self.build_task(fields, &[])?;

        self.persistence.insert(None, std::slice::from_ref(&task))?;
        self.tasks.push(task.clone());
        info!(task_id = %task.id, due_date = %task.due_date, "Task created");
        Ok(task)
    }

    /// Create an empty plan
    pub fn create_plan(&mut self, fields: NewPlan) -> StoreResult<Plan> {
        debug!(name = %fields.name, "create_plan: called");
        let plan = self.build_plan(fields)?;

        self.persistence.insert(Some(&plan), &[])?;
        self.plans.push(plan.clone());
        info!(plan_id = %plan.id, due_date = %plan.due_date, "Plan created");
        Ok(plan)
    }

    /// Create an optional plan and a batch of tasks as one unit
    ///
    /// When a plan is given every task is attached to it, overriding any
    /// `plan_id` in the task fields. Either every record is stored or none is.
    pub fn create_plan_with_tasks(
        &mut self,
        plan: Option<NewPlan>,
        tasks: Vec<NewTask>,
    ) -> StoreResult<(Option<Plan>, Vec<Task>)> {
        debug!(with_plan = plan.is_some(), task_count = tasks.len(), "create_plan_with_tasks: called");
        let plan = plan.map(|fields| self.build_plan(fields)).transpose()?;

        let mut built = Vec::with_capacity(tasks.len());
        for mut fields in tasks {
            match &plan {
                Some(plan) => fields.plan_id = Some(plan.id.clone()),
                None => self.check_plan_ref(fields.plan_id.as_deref())?,
            }
            let task = self.build_task(fields, &built)?;
            built.push(task);
        }

        self.persistence.insert(plan.as_ref(), &built)?;
        if let Some(plan) = &plan {
            self.plans.push(plan.clone());
        }
        self.tasks.extend(built.iter().cloned());
        info!(plan_id = ?plan.as_ref().map(|p| p.id.as_str()), task_count = built.len(), "Batch created");
        Ok((plan, built))
    }

    /// Change a task's status from a status token
    ///
    /// Unknown IDs fail with NotFound before the token is checked.
    pub fn update_task_status(&mut self, task_id: &str, status: &str) -> StoreResult<Task> {
        debug!(%task_id, %status, "update_task_status: called");
        if self.get_task(task_id).is_none() {
            return Err(StoreError::task_not_found(task_id));
        }
        let status: TaskStatus = status.parse().map_err(StoreError::Validation)?;
        self.set_task_status(task_id, status)
    }

    /// Change a task's status; setting the current status is a successful no-op
    pub fn set_task_status(&mut self, task_id: &str, status: TaskStatus) -> StoreResult<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))?;

        let mut updated = self.tasks[idx].clone();
        if !updated.set_status(status) {
            debug!(%task_id, %status, "set_task_status: unchanged");
            return Ok(updated);
        }

        self.persistence.update_task(&updated)?;
        self.tasks[idx] = updated.clone();
        info!(%task_id, %status, "Task status updated");
        Ok(updated)
    }

    pub fn delete_task(&mut self, task_id: &str) -> StoreResult<()> {
        debug!(%task_id, "delete_task: called");
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| StoreError::task_not_found(task_id))?;

        self.persistence.delete_task(task_id)?;
        self.tasks.remove(idx);
        info!(%task_id, "Task deleted");
        Ok(())
    }

    /// Delete a plan and every task it owns
    pub fn delete_plan(&mut self, plan_id: &str) -> StoreResult<()> {
        debug!(%plan_id, "delete_plan: called");
        let idx = self
            .plans
            .iter()
            .position(|p| p.id == plan_id)
            .ok_or_else(|| StoreError::plan_not_found(plan_id))?;

        self.persistence.delete_plan(plan_id)?;
        self.plans.remove(idx);
        let before = self.tasks.len();
        self.tasks.retain(|t| t.plan_id.as_deref() != Some(plan_id));
        info!(%plan_id, removed_tasks = before - self.tasks.len(), "Plan deleted");
        Ok(())
    }

    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn get_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn list_plans(&self) -> Vec<Plan> {
        self.plans.clone()
    }

    /// Tasks owned by a plan, in insertion order
    pub fn tasks_for_plan(&self, plan_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.plan_id.as_deref() == Some(plan_id))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            plans: self.plans.clone(),
            tasks: self.tasks.clone(),
        }
    }
}
