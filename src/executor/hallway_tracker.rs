//! Hallway knowledge tracking loop.
//!
//! Samples a 2D ranging sensor at a fixed rate, converts beam returns
//! to world-frame points, and updates the robot's recorded-closed
//! hallway set wherever a sensed point lands inside a hallway polygon
//! whose ground-truth state disagrees with the recorded knowledge.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::Point2D;
use crate::robot::Robot;
use crate::shared::ExecutionState;

/// Background task that discovers hallway state changes by sensing.
pub struct HallwayTracker {
    state: Arc<ExecutionState>,
    robot: Arc<Robot>,
    sensor_name: Option<String>,
    measurement_dt: f32,
}

impl HallwayTracker {
    pub fn new(
        state: Arc<ExecutionState>,
        robot: Arc<Robot>,
        sensor_name: Option<String>,
        measurement_dt: f32,
    ) -> Self {
        Self {
            state,
            robot,
            sensor_name,
            measurement_dt,
        }
    }

    /// Run the tracking loop until execution ends or an abort is
    /// raised.
    ///
    /// Exits early (warning log, no abort) when no world is available,
    /// no sensor name is configured, the name resolves to nothing, or
    /// the sensor is not a 2D ranging sensor. A misconfigured tracker
    /// never fails the trajectory execution itself.
    pub fn run(&self) {
        let world = match self.robot.world() {
            Some(w) => w,
            None => {
                tracing::warn!("No world available. Cannot detect closed hallways.");
                return;
            }
        };
        let sensor_name = match &self.sensor_name {
            Some(name) => name,
            None => {
                tracing::warn!("No ranging sensor name provided. Cannot detect closed hallways.");
                return;
            }
        };
        let sensor = match self.robot.sensor(sensor_name) {
            Some(s) => s,
            None => {
                tracing::warn!(
                    "Sensor '{}' not found on robot '{}'. Cannot detect closed hallways.",
                    sensor_name,
                    self.robot.name()
                );
                return;
            }
        };
        let range_sensor = match sensor.as_range_sensor() {
            Some(r) => r,
            None => {
                tracing::warn!(
                    "Sensor '{}' is not a 2D ranging sensor. Cannot detect closed hallways.",
                    sensor_name
                );
                return;
            }
        };

        tracing::debug!("Hallway tracking loop started");
        let angles = range_sensor.angles().to_vec();
        let max_range = range_sensor.max_range();
        let loop_interval = Duration::from_secs_f32(self.measurement_dt);

        while self.state.is_following_path() && !self.state.abort_requested() {
            let loop_start = Instant::now();
            let cur_pose = self.robot.pose();

            // Beams shorter than max range hit something; convert
            // them to world-frame points.
            let ranges = range_sensor.measurement();
            let mut hit_points = Vec::new();
            for (angle, range) in angles.iter().zip(ranges.iter()) {
                if *range < max_range {
                    let world_angle = angle + cur_pose.yaw;
                    hit_points.push(Point2D::new(
                        cur_pose.x + range * world_angle.cos(),
                        cur_pose.y + range * world_angle.sin(),
                    ));
                }
            }

            for point in &hit_points {
                // First-match policy: the scan for this point stops at
                // the first hallway whose recorded state changes.
                // Known limitation: multiple hallways affected by one
                // measurement cycle are not all updated in the same
                // tick.
                for hallway in world.hallways() {
                    if !hallway.collision_polygon().contains(point) {
                        continue;
                    }
                    if !hallway.is_open() {
                        if self.robot.record_closed_hallway(hallway.name()) {
                            tracing::info!(
                                "Added {} to closed hallway knowledge.",
                                hallway.name()
                            );
                            self.state.mark_hallway_states_updated();
                            break;
                        }
                    } else if self.robot.forget_closed_hallway(hallway.name()) {
                        tracing::info!(
                            "Removed {} from closed hallway knowledge.",
                            hallway.name()
                        );
                        self.state.mark_hallway_states_updated();
                        break;
                    }
                }
            }

            let elapsed = loop_start.elapsed();
            if elapsed < loop_interval {
                std::thread::sleep(loop_interval - elapsed);
            }
        }
        tracing::debug!("Hallway tracking loop exited");
    }
}
