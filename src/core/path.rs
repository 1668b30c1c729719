//! Geometric paths: ordered waypoints without timing information.

use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// An ordered sequence of waypoint poses with no timing information.
///
/// Paths come from a planner; executing one requires at least two
/// poses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Waypoints in traversal order
    pub poses: Vec<Pose>,
}

impl Path {
    /// Create a path from a list of waypoints.
    pub fn new(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    /// Number of waypoints in the path.
    #[inline]
    pub fn num_poses(&self) -> usize {
        self.poses.len()
    }

    /// Total straight-line length over consecutive waypoints.
    pub fn total_length(&self) -> f32 {
        self.poses
            .windows(2)
            .map(|w| w[0].linear_distance(&w[1]))
            .sum()
    }
}
