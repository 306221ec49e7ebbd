//! StateManager - actor that owns the TaskStore
//!
//! Processes commands one at a time via a channel, so mutations never
//! interleave and every read sees a consistent snapshot.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::aggregate::{Aggregate, aggregate};
use crate::domain::{NewPlan, NewTask, Plan, Task};
use crate::error::StoreError;
use crate::schedule::{GenerateRequest, GeneratedPlan, ScheduleOrchestrator};
use crate::store::{Snapshot, TaskStore};

use super::messages::{StateCommand, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor owning `store`
    pub fn spawn(store: TaskStore, orchestrator: ScheduleOrchestrator) -> Self {
        debug!(?store, "spawn: called");
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(store, orchestrator, rx));

        info!("StateManager spawned");
        Self { tx }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(build(reply_tx)).await.map_err(|_| StoreError::Channel)?;
        reply_rx.await.map_err(|_| StoreError::Channel)?
    }

    // === Task operations ===

    pub async fn create_task(&self, fields: NewTask) -> StateResponse<Task> {
        debug!(title = %fields.title, "create_task: called");
        self.request(|reply| StateCommand::CreateTask { fields, reply }).await
    }

    pub async fn get_task(&self, id: &str) -> StateResponse<Option<Task>> {
        debug!(%id, "get_task: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetTask { id, reply }).await
    }

    /// Change a task's status from a status token
    pub async fn update_task_status(&self, id: &str, status: &str) -> StateResponse<Task> {
        debug!(%id, %status, "update_task_status: called");
        let id = id.to_string();
        let status = status.to_string();
        self.request(|reply| StateCommand::UpdateTaskStatus { id, status, reply }).await
    }

    pub async fn delete_task(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_task: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteTask { id, reply }).await
    }

    pub async fn list_tasks(&self) -> StateResponse<Vec<Task>> {
        debug!("list_tasks: called");
        self.request(|reply| StateCommand::ListTasks { reply }).await
    }

    // === Plan operations ===

    pub async fn create_plan(&self, fields: NewPlan) -> StateResponse<Plan> {
        debug!(name = %fields.name, "create_plan: called");
        self.request(|reply| StateCommand::CreatePlan { fields, reply }).await
    }

    pub async fn get_plan(&self, id: &str) -> StateResponse<Option<Plan>> {
        debug!(%id, "get_plan: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetPlan { id, reply }).await
    }

    /// Delete a plan and every task it owns
    pub async fn delete_plan(&self, id: &str) -> StateResponse<()> {
        debug!(%id, "delete_plan: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeletePlan { id, reply }).await
    }

    pub async fn list_plans(&self) -> StateResponse<Vec<Plan>> {
        debug!("list_plans: called");
        self.request(|reply| StateCommand::ListPlans { reply }).await
    }

    // === Scheduling ===

    /// Generate dated subtasks, optionally under a new plan
    pub async fn generate_plan(&self, request: GenerateRequest) -> StateResponse<GeneratedPlan> {
        debug!(steps = request.steps, due_date = %request.due_date, "generate_plan: called");
        self.request(|reply| StateCommand::GeneratePlan { request, reply }).await
    }

    // === Reads ===

    pub async fn snapshot(&self) -> StateResponse<Snapshot> {
        debug!("snapshot: called");
        self.request(|reply| StateCommand::Snapshot { reply }).await
    }

    /// Aggregate a fresh snapshot; computed outside the actor
    pub async fn aggregate(&self) -> StateResponse<Aggregate> {
        debug!("aggregate: called");
        let snapshot = self.snapshot().await?;
        Ok(aggregate(&snapshot.tasks, &snapshot.plans))
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("shutdown: called");
        self.tx.send(StateCommand::Shutdown).await.map_err(|_| StoreError::Channel)
    }
}

/// The actor loop that owns the store and processes commands
async fn actor_loop(mut store: TaskStore, orchestrator: ScheduleOrchestrator, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::CreateTask { fields, reply } => {
                debug!(title = %fields.title, "actor_loop: CreateTask command");
                let _ = reply.send(store.create_task(fields));
            }

            StateCommand::GetTask { id, reply } => {
                debug!(%id, "actor_loop: GetTask command");
                let _ = reply.send(Ok(store.get_task(&id).cloned()));
            }

            StateCommand::UpdateTaskStatus { id, status, reply } => {
                debug!(%id, %status, "actor_loop: UpdateTaskStatus command");
                let _ = reply.send(store.update_task_status(&id, &status));
            }

            StateCommand::DeleteTask { id, reply } => {
                debug!(%id, "actor_loop: DeleteTask command");
                let _ = reply.send(store.delete_task(&id));
            }

            StateCommand::ListTasks { reply } => {
                debug!("actor_loop: ListTasks command");
                let _ = reply.send(Ok(store.list_tasks()));
            }

            StateCommand::CreatePlan { fields, reply } => {
                debug!(name = %fields.name, "actor_loop: CreatePlan command");
                let _ = reply.send(store.create_plan(fields));
            }

            StateCommand::GetPlan { id, reply } => {
                debug!(%id, "actor_loop: GetPlan command");
                let _ = reply.send(Ok(store.get_plan(&id).cloned()));
            }

            StateCommand::DeletePlan { id, reply } => {
                debug!(%id, "actor_loop: DeletePlan command");
                let _ = reply.send(store.delete_plan(&id));
            }

            StateCommand::ListPlans { reply } => {
                debug!("actor_loop: ListPlans command");
                let _ = reply.send(Ok(store.list_plans()));
            }

            StateCommand::GeneratePlan { request, reply } => {
                debug!(steps = request.steps, "actor_loop: GeneratePlan command");
                let _ = reply.send(orchestrator.generate_plan(&mut store, request));
            }

            StateCommand::Snapshot { reply } => {
                debug!("actor_loop: Snapshot command");
                let _ = reply.send(Ok(store.snapshot()));
            }

            StateCommand::Shutdown => {
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}
