//! Path validation loop.
//!
//! Runs alongside the execution controller and re-checks the
//! remaining trajectory for collisions under the robot's current
//! hallway knowledge. Its sole externally visible effect is raising
//! the abort flag.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::{Path, Trajectory};
use crate::robot::Robot;
use crate::shared::ExecutionState;
use crate::world::WorldModel;

/// Background task that validates the remaining path at a fixed rate.
pub struct PathValidator {
    state: Arc<ExecutionState>,
    robot: Arc<Robot>,
    world: Arc<dyn WorldModel>,
    traj: Arc<Trajectory>,
    validation_dt: f32,
    step_dist: f32,
}

impl PathValidator {
    pub fn new(
        state: Arc<ExecutionState>,
        robot: Arc<Robot>,
        world: Arc<dyn WorldModel>,
        traj: Arc<Trajectory>,
        validation_dt: f32,
        step_dist: f32,
    ) -> Self {
        Self {
            state,
            robot,
            world,
            traj,
            validation_dt,
            step_dist,
        }
    }

    /// Run the validation loop until execution ends, an abort is
    /// raised, or the remaining path becomes trivially valid.
    pub fn run(&self) {
        tracing::debug!("Path validation loop started");
        let loop_interval = Duration::from_secs_f32(self.validation_dt);

        while self.state.is_following_path() && !self.state.abort_requested() {
            let loop_start = Instant::now();
            let cur_pose = self.robot.pose();
            let cur_time = self.state.current_traj_time();

            // First trajectory sample not yet reached.
            let idx = self
                .traj
                .t_pts
                .iter()
                .position(|&t| t >= cur_time)
                .unwrap_or(self.traj.num_points() - 1);
            if idx == self.traj.num_points() - 1 {
                // Nothing left to validate.
                break;
            }

            let mut poses = Vec::with_capacity(1 + self.traj.num_points() - idx);
            poses.push(cur_pose);
            poses.extend_from_slice(&self.traj.poses[idx..]);
            if poses.len() > 2 {
                let remaining_path = Path::new(poses);
                // Snapshot the knowledge set so no lock is held
                // across the collision check.
                let recorded = self.robot.recorded_closed_hallways();
                if !self.world.is_path_collision_free(
                    &remaining_path,
                    self.step_dist,
                    self.robot.fog_hallways(),
                    &recorded,
                ) {
                    tracing::warn!("Remaining path is in collision. Aborting execution.");
                    self.state.signal_abort();
                }
            }

            let elapsed = loop_start.elapsed();
            if elapsed < loop_interval {
                std::thread::sleep(loop_interval - elapsed);
            }
        }
        tracing::debug!("Path validation loop exited");
    }
}
