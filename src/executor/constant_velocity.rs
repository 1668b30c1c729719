//! Constant-velocity path executor.
//!
//! Executes a path with a linear trajectory assuming constant linear
//! and angular velocity, and that the robot can perfectly reach each
//! interpolated pose. Owns the main real-time loop and the lifecycle
//! of the validation and hallway-tracking background loops.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{ExecutorConfig, ExecutorKind};
use crate::core::{constant_speed_trajectory, interpolate_trajectory, Path};
use crate::robot::Robot;
use crate::shared::ExecutionState;

use super::{
    CancelHandle, ExecutionResult, ExecutionStatus, HallwayTracker, PathExecutor, PathValidator,
};

/// Constant-velocity trajectory-following executor.
///
/// One execution may be in flight per instance; the `&mut self`
/// receiver on [`execute`](PathExecutor::execute) enforces that.
pub struct ConstantVelocityExecutor {
    dt: f32,
    linear_velocity: f32,
    max_angular_velocity: Option<f32>,
    validate_during_execution: bool,
    validation_dt: f32,
    validation_step_dist: f32,
    lidar_sensor_name: Option<String>,
    lidar_sensor_measurement_dt: f32,
    robot: Option<Arc<Robot>>,
    state: Arc<ExecutionState>,
}

impl ConstantVelocityExecutor {
    /// Create an executor from a configuration record.
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            dt: config.dt,
            linear_velocity: config.linear_velocity,
            max_angular_velocity: config.max_angular_velocity,
            validate_during_execution: config.validate_during_execution,
            validation_dt: config.validation_dt,
            validation_step_dist: config.validation_step_dist,
            lidar_sensor_name: config.lidar_sensor_name,
            lidar_sensor_measurement_dt: config.lidar_sensor_measurement_dt,
            robot: None,
            state: Arc::new(ExecutionState::new()),
        }
    }

    fn precondition_failure(message: impl Into<String>) -> ExecutionResult {
        let message = message.into();
        tracing::warn!("{}", message);
        ExecutionResult::new(ExecutionStatus::PreconditionFailure, message)
    }
}

impl Default for ConstantVelocityExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

/// Join a background loop handle if it is still retained.
fn join_background(handle: &mut Option<JoinHandle<()>>) {
    if let Some(h) = handle.take() {
        if let Err(e) = h.join() {
            tracing::error!("Background loop panicked: {:?}", e);
        }
    }
}

impl PathExecutor for ConstantVelocityExecutor {
    fn attach_robot(&mut self, robot: Arc<Robot>) {
        self.robot = Some(robot);
    }

    fn execute(
        &mut self,
        path: &Path,
        realtime_factor: f32,
        battery_usage: f32,
    ) -> ExecutionResult {
        let robot = match &self.robot {
            Some(r) => Arc::clone(r),
            None => {
                return Self::precondition_failure("No robot attached to execute the trajectory.");
            }
        };
        if path.num_poses() < 2 {
            return Self::precondition_failure("Not enough waypoints in path to execute.");
        }
        if realtime_factor <= 0.0 {
            return Self::precondition_failure(format!(
                "Realtime factor must be positive, got {realtime_factor}."
            ));
        }

        // Convert the path to an interpolated trajectory.
        let traj = match constant_speed_trajectory(
            path,
            self.linear_velocity,
            self.max_angular_velocity,
        ) {
            Ok(t) => Arc::new(t),
            Err(e) => {
                return Self::precondition_failure(format!(
                    "Failed to get trajectory from path: {e}"
                ));
            }
        };
        let traj_interp = match interpolate_trajectory(&traj, self.dt) {
            Ok(t) => t,
            Err(e) => {
                return Self::precondition_failure(format!("Failed to interpolate trajectory: {e}"));
            }
        };

        self.state.reset();
        self.state.set_following_path(true);

        // Kick off the background loops: path validation only with a
        // world to check against, hallway tracking only under partial
        // hallway visibility.
        let mut validation_handle: Option<JoinHandle<()>> = None;
        if self.validate_during_execution {
            if let Some(world) = robot.world() {
                let validator = PathValidator::new(
                    Arc::clone(&self.state),
                    Arc::clone(&robot),
                    world,
                    Arc::clone(&traj),
                    self.validation_dt,
                    self.validation_step_dist,
                );
                match thread::Builder::new()
                    .name("path-validation".into())
                    .spawn(move || validator.run())
                {
                    Ok(handle) => validation_handle = Some(handle),
                    Err(e) => tracing::error!("Failed to spawn validation loop: {}", e),
                }
            }
        }

        let mut tracker_handle: Option<JoinHandle<()>> = None;
        if robot.fog_hallways() {
            let tracker = HallwayTracker::new(
                Arc::clone(&self.state),
                Arc::clone(&robot),
                self.lidar_sensor_name.clone(),
                self.lidar_sensor_measurement_dt,
            );
            match thread::Builder::new()
                .name("hallway-tracker".into())
                .spawn(move || tracker.run())
            {
                Ok(handle) => tracker_handle = Some(handle),
                Err(e) => tracing::error!("Failed to spawn hallway tracking loop: {}", e),
            }
        }

        // Execute the trajectory.
        let mut status = ExecutionStatus::Success;
        let mut message = String::new();
        let sleep_time = Duration::from_secs_f32(self.dt / realtime_factor);
        let mut prev_pose = traj_interp.poses[0];

        for i in 0..traj_interp.num_points() {
            let loop_start = Instant::now();
            let cur_pose = traj_interp.poses[i];
            robot.set_pose(cur_pose);
            if let Some(object) = robot.manipulated_object() {
                object.set_pose(cur_pose);
            }
            self.state.set_current_traj_time(traj_interp.t_pts[i]);

            if self.state.abort_requested() {
                // The loops stop on the abort flag; reclaim them
                // before reporting the failure.
                join_background(&mut validation_handle);
                join_background(&mut tracker_handle);
                message = "Trajectory execution aborted.".to_string();
                tracing::info!("{}", message);
                status = ExecutionStatus::ExecutionFailure;
                break;
            }
            if self.state.take_cancel() {
                message = "Trajectory execution canceled by user.".to_string();
                tracing::info!("{}", message);
                status = ExecutionStatus::Canceled;
                break;
            }

            // Simulate battery usage and exit if fully depleted.
            let level = robot.drain_battery(battery_usage * cur_pose.linear_distance(&prev_pose));
            if level <= 0.0 {
                message = "Battery depleted while navigating.".to_string();
                tracing::warn!("{}", message);
                status = ExecutionStatus::ExecutionFailure;
                break;
            }

            prev_pose = cur_pose;
            // Pace to simulated real time. Each step's sleep comes
            // from that step's own elapsed time, so a slow step never
            // extends the next sleep.
            let elapsed = loop_start.elapsed();
            if elapsed < sleep_time {
                thread::sleep(sleep_time - elapsed);
            }
        }

        // Planner structures that encode hallway topology are stale
        // once knowledge changed during the run.
        if self.state.hallway_states_updated() {
            robot.invalidate_path_planner();
        }

        // Finalize: the reset drops `following_path`, which is the
        // exit signal for any loop still running; the grace period
        // covers one polling interval of the slower loop.
        self.state.reset();
        let mut grace = 0.0f32;
        if validation_handle.is_some() {
            grace = grace.max(self.validation_dt);
        }
        if tracker_handle.is_some() {
            grace = grace.max(self.lidar_sensor_measurement_dt);
        }
        if grace > 0.0 {
            thread::sleep(Duration::from_secs_f32(grace));
            join_background(&mut validation_handle);
            join_background(&mut tracker_handle);
        }

        let result = ExecutionResult::new(status, message);
        robot.set_last_nav_result(result.clone());
        result
    }

    fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(Arc::clone(&self.state))
    }

    fn to_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            kind: ExecutorKind::ConstantVelocity,
            dt: self.dt,
            linear_velocity: self.linear_velocity,
            max_angular_velocity: self.max_angular_velocity,
            validate_during_execution: self.validate_during_execution,
            validation_dt: self.validation_dt,
            validation_step_dist: self.validation_step_dist,
            lidar_sensor_name: self.lidar_sensor_name.clone(),
            lidar_sensor_measurement_dt: self.lidar_sensor_measurement_dt,
        }
    }
}
