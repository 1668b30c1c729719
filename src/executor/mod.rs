//! Path execution: the controller loop and its background tasks.

mod constant_velocity;
mod hallway_tracker;
mod validation;

pub use constant_velocity::ConstantVelocityExecutor;
pub use hallway_tracker::HallwayTracker;
pub use validation::PathValidator;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ExecutorConfig;
use crate::core::Path;
use crate::robot::Robot;
use crate::shared::ExecutionState;

/// Terminal status of one `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Success,
    Canceled,
    ExecutionFailure,
    PreconditionFailure,
}

/// Outcome of one `execute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub message: String,
}

impl ExecutionResult {
    pub fn new(status: ExecutionStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Handle for canceling an in-flight execution from another thread.
///
/// Cancellation is cooperative: the controller consumes the request
/// once per trajectory step, so latency is bounded by one time step.
#[derive(Clone)]
pub struct CancelHandle {
    state: Arc<ExecutionState>,
}

impl CancelHandle {
    pub(crate) fn new(state: Arc<ExecutionState>) -> Self {
        Self { state }
    }

    pub fn cancel(&self) {
        self.state.request_cancel();
    }
}

/// A path executor drives a robot along a geometric path.
///
/// Variants differ in how they turn the path into motion; all of them
/// share the same lifecycle: attach a robot, execute one path at a
/// time, serialize their settings as an [`ExecutorConfig`].
pub trait PathExecutor: Send {
    /// Attach the robot this executor drives.
    fn attach_robot(&mut self, robot: Arc<Robot>);

    /// Drive the attached robot along `path`. Returns exactly one
    /// terminal result; the executor is reusable afterwards.
    fn execute(
        &mut self,
        path: &Path,
        realtime_factor: f32,
        battery_usage: f32,
    ) -> ExecutionResult;

    /// Handle for canceling an in-flight execution.
    fn cancel_handle(&self) -> CancelHandle;

    /// Serialize the executor settings.
    fn to_config(&self) -> ExecutorConfig;
}
