//! State manager messages
//!
//! Commands and responses for the actor pattern.

use tokio::sync::oneshot;

use crate::domain::{NewPlan, NewTask, Plan, Task};
use crate::error::StoreResult;
use crate::schedule::{GenerateRequest, GeneratedPlan};
use crate::store::Snapshot;

/// Response from state operations
pub type StateResponse<T> = StoreResult<T>;

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    // Task operations
    CreateTask {
        fields: NewTask,
        reply: oneshot::Sender<StateResponse<Task>>,
    },
    GetTask {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<Task>>>,
    },
    UpdateTaskStatus {
        id: String,
        status: String,
        reply: oneshot::Sender<StateResponse<Task>>,
    },
    DeleteTask {
        id: String,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    ListTasks {
        reply: oneshot::Sender<StateResponse<Vec<Task>>>,
    },

    // Plan operations
    CreatePlan {
        fields: NewPlan,
        reply: oneshot::Sender<StateResponse<Plan>>,
    },
    GetPlan {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<Plan>>>,
    },
    DeletePlan {
        id: String,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    ListPlans {
        reply: oneshot::Sender<StateResponse<Vec<Plan>>>,
    },

    // Scheduling
    GeneratePlan {
        request: GenerateRequest,
        reply: oneshot::Sender<StateResponse<GeneratedPlan>>,
    },

    // Consistent read of everything, for aggregation
    Snapshot {
        reply: oneshot::Sender<StateResponse<Snapshot>>,
    },

    // Shutdown
    Shutdown,
}
