//! World, hallway, and planner capability contracts.
//!
//! The execution core has no world geometry of its own: collision
//! checking lives behind [`WorldModel`], and hallways are the one
//! entity the core reads directly (identity, ground-truth open flag,
//! collision polygon) so the hallway tracker can compare sensed
//! geometry against ground truth.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{Path, Point2D};

/// A simple polygon given by its vertices in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point2D>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2D>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle helper.
    pub fn rectangle(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self::new(vec![
            Point2D::new(min_x, min_y),
            Point2D::new(max_x, min_y),
            Point2D::new(max_x, max_y),
            Point2D::new(min_x, max_y),
        ])
    }

    /// Even-odd ray-cast containment test.
    ///
    /// Degenerate polygons (fewer than 3 vertices) contain nothing.
    pub fn contains(&self, point: &Point2D) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = &self.vertices[i];
            let b = &self.vertices[j];
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// A hallway connecting two regions of the world.
///
/// Read-only to the execution core apart from the ground-truth open
/// flag, which the world owner may flip at any time (e.g. a door
/// closing mid-run).
#[derive(Debug)]
pub struct Hallway {
    name: String,
    is_open: AtomicBool,
    polygon: Polygon,
}

impl Hallway {
    pub fn new(name: impl Into<String>, is_open: bool, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            is_open: AtomicBool::new(is_open),
            polygon,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ground-truth openness.
    pub fn is_open(&self) -> bool {
        self.is_open.load(Ordering::Acquire)
    }

    /// Flip the ground-truth openness. World-owner side of the
    /// contract; the core never calls this.
    pub fn set_open(&self, open: bool) {
        self.is_open.store(open, Ordering::Release);
    }

    /// Collision polygon for sensed-point containment tests.
    pub fn collision_polygon(&self) -> &Polygon {
        &self.polygon
    }
}

/// Collision-checking capability the execution core needs from a
/// world.
///
/// When `fog_hallways` is true, the check must treat the hallways in
/// `recorded_closed_hallways` (keyed by hallway name) as impassable
/// instead of consulting ground truth.
pub trait WorldModel: Send + Sync {
    /// Whether the discretized path is collision-free.
    fn is_path_collision_free(
        &self,
        path: &Path,
        step_dist: f32,
        fog_hallways: bool,
        recorded_closed_hallways: &HashSet<String>,
    ) -> bool;

    /// All hallways in the world.
    fn hallways(&self) -> &[Arc<Hallway>];
}

/// Path-planner capability: invalidation on hallway-knowledge change.
///
/// Planners whose internal structures encode hallway topology
/// (graph/roadmap planners) rebuild them here; planners with no such
/// dependency keep the default no-op. The controller calls this once
/// after an execution during which the robot's recorded hallway
/// knowledge changed, never mid-run. Must be idempotent.
pub trait PathPlanner: Send + Sync {
    fn reset_on_knowledge_change(&mut self) {}
}
