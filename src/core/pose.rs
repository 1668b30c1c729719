//! Pose and point types for trajectory execution.

use serde::{Deserialize, Serialize};

use super::math::{angle_diff, angle_lerp, normalize_angle};

/// A 2D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Robot pose in 2D space.
///
/// Position (x, y) in meters and heading (yaw) in radians, normalized
/// to [-π, π]. Immutable value type; pose updates replace the whole
/// pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in radians, normalized to [-π, π]
    pub yaw: f32,
}

impl Pose {
    /// Create a new pose with yaw normalized to [-π, π].
    #[inline]
    pub fn new(x: f32, y: f32, yaw: f32) -> Self {
        Self {
            x,
            y,
            yaw: normalize_angle(yaw),
        }
    }

    /// Pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            yaw: 0.0,
        }
    }

    /// Position component of the pose.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Straight-line distance to another pose.
    #[inline]
    pub fn linear_distance(&self, other: &Pose) -> f32 {
        self.position().distance(&other.position())
    }

    /// Shortest signed yaw delta to another pose.
    #[inline]
    pub fn angular_distance(&self, other: &Pose) -> f32 {
        angle_diff(self.yaw, other.yaw)
    }

    /// Interpolate between two poses.
    ///
    /// `t` should be in [0, 1]. Position interpolates linearly; yaw
    /// takes the shortest angular path.
    pub fn interpolate(start: &Pose, end: &Pose, t: f32) -> Pose {
        Pose {
            x: start.x + t * (end.x - start.x),
            y: start.y + t * (end.y - start.y),
            yaw: angle_lerp(start.yaw, end.yaw, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
