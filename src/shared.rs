//! Shared state between the execution controller and its background
//! loops.
//!
//! One controller thread and up to two background threads (path
//! validation, hallway tracking) exchange state through this module:
//! - Scalar flags and the trajectory clock are atomics.
//! - The robot pose is packed into atomics so readers never observe a
//!   torn value.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use crate::core::Pose;

/// Atomic wrapper for f32 values.
/// Uses AtomicU32 with bit reinterpretation.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

/// Atomic wrapper for a robot pose.
///
/// Packs x and y (as i32 millimeters) into one AtomicU64 and yaw (as
/// fixed-point, ×10000) into an AtomicU32, so a concurrent reader
/// never sees a half-written position.
#[derive(Debug)]
pub struct AtomicPose {
    xy: AtomicU64,
    yaw: AtomicU32,
}

impl AtomicPose {
    pub fn new(pose: Pose) -> Self {
        let (xy, yaw) = Self::pack(pose);
        Self {
            xy: AtomicU64::new(xy),
            yaw: AtomicU32::new(yaw),
        }
    }

    pub fn load(&self, order: Ordering) -> Pose {
        let xy = self.xy.load(order);
        let x_mm = (xy >> 32) as i32;
        let y_mm = xy as i32;
        let yaw_fp = self.yaw.load(order) as i32;
        Pose::new(
            x_mm as f32 / 1000.0,
            y_mm as f32 / 1000.0,
            yaw_fp as f32 / 10000.0,
        )
    }

    pub fn store(&self, pose: Pose, order: Ordering) {
        let (xy, yaw) = Self::pack(pose);
        self.xy.store(xy, order);
        self.yaw.store(yaw, order);
    }

    fn pack(pose: Pose) -> (u64, u32) {
        let x_mm = (pose.x * 1000.0) as i32;
        let y_mm = (pose.y * 1000.0) as i32;
        let xy = ((x_mm as u64) << 32) | (y_mm as u32 as u64);
        let yaw = (pose.yaw * 10000.0) as i32 as u32;
        (xy, yaw)
    }
}

/// Per-execution shared state.
///
/// Created fresh for every `execute` call, mutated by up to three
/// concurrent actors, and reset to baseline before the call returns.
/// Writer roles: the controller owns `following_path` and consumes
/// `cancel_execution`; the validator is the sole writer of
/// `abort_execution`; the hallway tracker is the sole writer of
/// `hallway_states_updated`; external callers set `cancel_execution`.
#[derive(Debug, Default)]
pub struct ExecutionState {
    /// Trajectory clock: timestamp of the sample the controller most
    /// recently pushed to the robot.
    current_traj_time: AtomicF32,
    /// True while the controller is stepping through a trajectory.
    following_path: AtomicBool,
    /// Set by the validator when the remaining path is in collision.
    abort_execution: AtomicBool,
    /// Set by an external caller to request cancellation.
    cancel_execution: AtomicBool,
    /// Set by the hallway tracker when recorded knowledge changed.
    hallway_states_updated: AtomicBool,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset every field to its baseline. Called at the start and end
    /// of each execution; the end-of-run reset is what signals the
    /// background loops to exit.
    pub fn reset(&self) {
        self.current_traj_time.store(0.0, Ordering::Release);
        self.following_path.store(false, Ordering::Release);
        self.abort_execution.store(false, Ordering::Release);
        self.cancel_execution.store(false, Ordering::Release);
        self.hallway_states_updated.store(false, Ordering::Release);
    }

    pub fn current_traj_time(&self) -> f32 {
        self.current_traj_time.load(Ordering::Acquire)
    }

    pub fn set_current_traj_time(&self, t: f32) {
        self.current_traj_time.store(t, Ordering::Release);
    }

    pub fn is_following_path(&self) -> bool {
        self.following_path.load(Ordering::Acquire)
    }

    pub fn set_following_path(&self, following: bool) {
        self.following_path.store(following, Ordering::Release);
    }

    pub fn abort_requested(&self) -> bool {
        self.abort_execution.load(Ordering::Acquire)
    }

    pub fn signal_abort(&self) {
        self.abort_execution.store(true, Ordering::Release);
    }

    pub fn request_cancel(&self) {
        self.cancel_execution.store(true, Ordering::Release);
    }

    /// Consume a pending cancellation request. Returns true if one was
    /// pending.
    pub fn take_cancel(&self) -> bool {
        self.cancel_execution.swap(false, Ordering::AcqRel)
    }

    pub fn hallway_states_updated(&self) -> bool {
        self.hallway_states_updated.load(Ordering::Acquire)
    }

    pub fn mark_hallway_states_updated(&self) {
        self.hallway_states_updated.store(true, Ordering::Release);
    }
}
