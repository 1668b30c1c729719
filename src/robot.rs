//! Robot embodiment: pose, battery, sensors, and hallway knowledge.
//!
//! The robot is shared by reference between the execution controller
//! and its background loops, so every mutable field sits behind an
//! atomic or a lock. Scalar state (pose, battery, mode flags) is
//! atomic; composite state (sensor map, hallway knowledge) is
//! lock-protected.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::core::Pose;
use crate::executor::ExecutionResult;
use crate::sensors::Sensor;
use crate::shared::{AtomicF32, AtomicPose};
use crate::world::{PathPlanner, WorldModel};

/// An object rigidly attached to the robot while being carried.
///
/// Minimal pose-mutation contract: while attached, the executor
/// pushes every robot pose update to the object as well.
#[derive(Debug)]
pub struct WorldObject {
    name: String,
    pose: AtomicPose,
}

impl WorldObject {
    pub fn new(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            pose: AtomicPose::new(pose),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> Pose {
        self.pose.load(Ordering::Acquire)
    }

    pub fn set_pose(&self, pose: Pose) {
        self.pose.store(pose, Ordering::Release);
    }
}

/// A simulated mobile robot.
pub struct Robot {
    name: String,
    pose: AtomicPose,
    /// Battery level in percent, clamped to [0, 100].
    battery_level: AtomicF32,
    /// When true, hallway openness is known only through sensing, not
    /// ground truth.
    fog_hallways: AtomicBool,
    sensors: RwLock<HashMap<String, Arc<dyn Sensor>>>,
    world: RwLock<Option<Arc<dyn WorldModel>>>,
    path_planner: RwLock<Option<Box<dyn PathPlanner>>>,
    /// The robot's private belief set of closed hallways, keyed by
    /// hallway name. Persists across executions; written by the
    /// hallway tracker, read by the path validator.
    recorded_closed_hallways: RwLock<HashSet<String>>,
    manipulated_object: RwLock<Option<Arc<WorldObject>>>,
    last_nav_result: RwLock<Option<ExecutionResult>>,
}

impl Robot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pose: AtomicPose::new(Pose::identity()),
            battery_level: AtomicF32::new(100.0),
            fog_hallways: AtomicBool::new(false),
            sensors: RwLock::new(HashMap::new()),
            world: RwLock::new(None),
            path_planner: RwLock::new(None),
            recorded_closed_hallways: RwLock::new(HashSet::new()),
            manipulated_object: RwLock::new(None),
            last_nav_result: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pose(&self) -> Pose {
        self.pose.load(Ordering::Acquire)
    }

    pub fn set_pose(&self, pose: Pose) {
        self.pose.store(pose, Ordering::Release);
    }

    pub fn battery_level(&self) -> f32 {
        self.battery_level.load(Ordering::Acquire)
    }

    pub fn set_battery_level(&self, level: f32) {
        self.battery_level
            .store(level.clamp(0.0, 100.0), Ordering::Release);
    }

    /// Drain the battery by `amount` percent, clamped at 0. Returns
    /// the new level.
    pub fn drain_battery(&self, amount: f32) -> f32 {
        let level = (self.battery_level() - amount).max(0.0);
        self.battery_level.store(level, Ordering::Release);
        level
    }

    pub fn fog_hallways(&self) -> bool {
        self.fog_hallways.load(Ordering::Acquire)
    }

    pub fn set_fog_hallways(&self, enabled: bool) {
        self.fog_hallways.store(enabled, Ordering::Release);
    }

    pub fn add_sensor(&self, name: impl Into<String>, sensor: Arc<dyn Sensor>) {
        if let Ok(mut sensors) = self.sensors.write() {
            sensors.insert(name.into(), sensor);
        }
    }

    pub fn sensor(&self, name: &str) -> Option<Arc<dyn Sensor>> {
        self.sensors.read().ok()?.get(name).cloned()
    }

    pub fn set_world(&self, world: Arc<dyn WorldModel>) {
        if let Ok(mut guard) = self.world.write() {
            *guard = Some(world);
        }
    }

    pub fn world(&self) -> Option<Arc<dyn WorldModel>> {
        self.world.read().ok()?.clone()
    }

    pub fn set_path_planner(&self, planner: Box<dyn PathPlanner>) {
        if let Ok(mut guard) = self.path_planner.write() {
            *guard = Some(planner);
        }
    }

    /// Invoke the planner's knowledge-change hook. Called by the
    /// controller after a run during which hallway knowledge changed.
    pub fn invalidate_path_planner(&self) {
        if let Ok(mut guard) = self.path_planner.write() {
            if let Some(planner) = guard.as_mut() {
                planner.reset_on_knowledge_change();
            }
        }
    }

    /// Snapshot of the recorded-closed hallway names.
    pub fn recorded_closed_hallways(&self) -> HashSet<String> {
        self.recorded_closed_hallways
            .read()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Record a hallway as closed. Returns true if it was not already
    /// recorded. Tracker-side of the knowledge contract.
    pub fn record_closed_hallway(&self, name: &str) -> bool {
        self.recorded_closed_hallways
            .write()
            .map(|mut g| g.insert(name.to_string()))
            .unwrap_or(false)
    }

    /// Remove a hallway from the closed set. Returns true if it was
    /// recorded. Tracker-side of the knowledge contract.
    pub fn forget_closed_hallway(&self, name: &str) -> bool {
        self.recorded_closed_hallways
            .write()
            .map(|mut g| g.remove(name))
            .unwrap_or(false)
    }

    pub fn set_manipulated_object(&self, object: Option<Arc<WorldObject>>) {
        if let Ok(mut guard) = self.manipulated_object.write() {
            *guard = object;
        }
    }

    pub fn manipulated_object(&self) -> Option<Arc<WorldObject>> {
        self.manipulated_object.read().ok()?.clone()
    }

    pub fn set_last_nav_result(&self, result: ExecutionResult) {
        if let Ok(mut guard) = self.last_nav_result.write() {
            *guard = Some(result);
        }
    }

    pub fn last_nav_result(&self) -> Option<ExecutionResult> {
        self.last_nav_result.read().ok()?.clone()
    }
}
