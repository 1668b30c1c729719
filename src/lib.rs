//! GatiNav - Trajectory execution core for mobile robot navigation
//!
//! Takes a geometric path, synthesizes a constant-velocity trajectory,
//! and drives a simulated robot along it in paced real time while two
//! background loops watch over the run:
//!
//! - **Path validation loop**: re-checks the remaining trajectory for
//!   collisions under the robot's own (possibly stale) hallway
//!   knowledge and raises an abort on violation.
//! - **Hallway tracking loop**: samples a 2D ranging sensor and
//!   updates the robot's recorded-closed hallway set when sensed
//!   geometry disagrees with what the robot believes.
//!
//! The controller and both loops share state through atomics and
//! lock-protected sets ([`shared`]); background loops are spawned with
//! retained handles and always reclaimed before `execute` returns.
//! Every run ends in exactly one terminal result: success, cancel,
//! execution failure (collision abort or battery depletion), or
//! precondition failure.

pub mod config;
pub mod core;
pub mod error;
pub mod executor;
pub mod robot;
pub mod sensors;
pub mod shared;
pub mod world;

pub use crate::config::{ExecutorConfig, ExecutorKind};
pub use crate::core::{
    constant_speed_trajectory, interpolate_trajectory, Path, Point2D, Pose, Trajectory,
};
pub use crate::error::{GatiError, Result};
pub use crate::executor::{
    CancelHandle, ConstantVelocityExecutor, ExecutionResult, ExecutionStatus, HallwayTracker,
    PathExecutor, PathValidator,
};
pub use crate::robot::{Robot, WorldObject};
pub use crate::sensors::{RangeSensor2D, Sensor};
pub use crate::world::{Hallway, PathPlanner, Polygon, WorldModel};
