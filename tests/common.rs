//! Test fixtures: scripted worlds, sensors, and planners.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gati_nav::{
    Hallway, Path, PathPlanner, Point2D, Polygon, Pose, RangeSensor2D, Robot, Sensor, WorldModel,
};

/// World with scriptable collision answers and a fixed hallway list.
pub struct StaticWorld {
    hallways: Vec<Arc<Hallway>>,
    collision_free: AtomicBool,
}

impl StaticWorld {
    pub fn new(hallways: Vec<Arc<Hallway>>) -> Self {
        Self {
            hallways,
            collision_free: AtomicBool::new(true),
        }
    }

    /// Empty world where every path is collision-free.
    pub fn open() -> Self {
        Self::new(Vec::new())
    }

    pub fn set_collision_free(&self, free: bool) {
        self.collision_free.store(free, Ordering::Release);
    }
}

impl WorldModel for StaticWorld {
    fn is_path_collision_free(
        &self,
        _path: &Path,
        _step_dist: f32,
        _fog_hallways: bool,
        _recorded_closed_hallways: &HashSet<String>,
    ) -> bool {
        self.collision_free.load(Ordering::Acquire)
    }

    fn hallways(&self) -> &[Arc<Hallway>] {
        &self.hallways
    }
}

/// World where a path collides exactly when the robot has recorded a
/// closed hallway while operating under fog. Exercises the
/// knowledge-aware side of remaining-path validation.
pub struct FogAwareWorld {
    hallways: Vec<Arc<Hallway>>,
}

impl FogAwareWorld {
    pub fn new(hallways: Vec<Arc<Hallway>>) -> Self {
        Self { hallways }
    }
}

impl WorldModel for FogAwareWorld {
    fn is_path_collision_free(
        &self,
        _path: &Path,
        _step_dist: f32,
        fog_hallways: bool,
        recorded_closed_hallways: &HashSet<String>,
    ) -> bool {
        !(fog_hallways && !recorded_closed_hallways.is_empty())
    }

    fn hallways(&self) -> &[Arc<Hallway>] {
        &self.hallways
    }
}

/// 2D ranging sensor that replays scripted ranges.
pub struct ScriptedLidar {
    angles: Vec<f32>,
    ranges: Mutex<Vec<f32>>,
    max_range: f32,
}

impl ScriptedLidar {
    pub fn new(angles: Vec<f32>, ranges: Vec<f32>, max_range: f32) -> Self {
        Self {
            angles,
            ranges: Mutex::new(ranges),
            max_range,
        }
    }

    pub fn set_ranges(&self, ranges: Vec<f32>) {
        *self.ranges.lock().unwrap() = ranges;
    }
}

impl Sensor for ScriptedLidar {
    fn as_range_sensor(&self) -> Option<&dyn RangeSensor2D> {
        Some(self)
    }
}

impl RangeSensor2D for ScriptedLidar {
    fn angles(&self) -> &[f32] {
        &self.angles
    }

    fn measurement(&self) -> Vec<f32> {
        self.ranges.lock().unwrap().clone()
    }

    fn max_range(&self) -> f32 {
        self.max_range
    }
}

/// A sensor that is not a 2D ranging sensor.
pub struct CameraSensor;

impl Sensor for CameraSensor {}

/// Planner that counts knowledge-change invalidations.
pub struct CountingPlanner {
    resets: Arc<AtomicUsize>,
}

impl CountingPlanner {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let resets = Arc::new(AtomicUsize::new(0));
        (
            Self {
                resets: Arc::clone(&resets),
            },
            resets,
        )
    }
}

impl PathPlanner for CountingPlanner {
    fn reset_on_knowledge_change(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// A closed hallway occupying the rectangle [2, 3] x [0, 1].
pub fn closed_hallway(name: &str) -> Arc<Hallway> {
    Arc::new(Hallway::new(
        name,
        false,
        Polygon::rectangle(2.0, 0.0, 3.0, 1.0),
    ))
}

/// Straight path along +x from the origin.
pub fn straight_path(length: f32, waypoints: usize) -> Path {
    let spacing = length / (waypoints - 1) as f32;
    Path::new(
        (0..waypoints)
            .map(|i| Pose::new(i as f32 * spacing, 0.0, 0.0))
            .collect(),
    )
}

/// A robot with a full battery at the origin.
pub fn test_robot(name: &str) -> Arc<Robot> {
    Arc::new(Robot::new(name))
}

/// A point for beam-landing assertions.
pub fn beam_point(x: f32, y: f32) -> Point2D {
    Point2D::new(x, y)
}

/// Initialize logging for a test binary. Safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
