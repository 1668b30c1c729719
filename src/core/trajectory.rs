//! Time-parameterized trajectories.
//!
//! A trajectory pairs each pose with a timestamp under a constant
//! velocity motion model. Trajectories are generated once per
//! execution and are immutable afterwards; the execution loop steps
//! through a fixed-`dt` resampling of the generated trajectory.

use crate::error::{GatiError, Result};

use super::pose::Pose;
use super::path::Path;

/// An ordered sequence of timestamped poses.
///
/// Invariants: timestamps are monotonically non-decreasing and the
/// first timestamp is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Timestamps in seconds, starting at 0
    pub t_pts: Vec<f32>,
    /// Poses aligned with `t_pts`
    pub poses: Vec<Pose>,
}

impl Trajectory {
    /// Number of samples in the trajectory.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.t_pts.len()
    }

    /// Total duration in seconds (0 for an empty trajectory).
    #[inline]
    pub fn duration(&self) -> f32 {
        self.t_pts.last().copied().unwrap_or(0.0)
    }
}

/// Generate a constant-speed trajectory from a path.
///
/// Each segment's duration is `distance / linear_velocity`. If
/// `max_angular_velocity` is set and a segment's implied yaw rate
/// would exceed it, the segment is stretched to
/// `|yaw_delta| / max_angular_velocity` instead, so neither velocity
/// limit is ever exceeded.
pub fn constant_speed_trajectory(
    path: &Path,
    linear_velocity: f32,
    max_angular_velocity: Option<f32>,
) -> Result<Trajectory> {
    if linear_velocity <= 0.0 {
        return Err(GatiError::Trajectory(format!(
            "Linear velocity must be positive, got {linear_velocity}"
        )));
    }
    if let Some(max_w) = max_angular_velocity {
        if max_w <= 0.0 {
            return Err(GatiError::Trajectory(format!(
                "Max angular velocity must be positive, got {max_w}"
            )));
        }
    }
    if path.num_poses() < 2 {
        return Err(GatiError::Trajectory(
            "Path must have at least 2 poses to build a trajectory".into(),
        ));
    }

    let mut t_pts = Vec::with_capacity(path.num_poses());
    let mut t = 0.0f32;
    t_pts.push(t);
    for pair in path.poses.windows(2) {
        let mut seg_time = pair[0].linear_distance(&pair[1]) / linear_velocity;
        if let Some(max_w) = max_angular_velocity {
            let turn_time = pair[0].angular_distance(&pair[1]).abs() / max_w;
            seg_time = seg_time.max(turn_time);
        }
        t += seg_time;
        t_pts.push(t);
    }

    Ok(Trajectory {
        t_pts,
        poses: path.poses.clone(),
    })
}

/// Resample a trajectory at a fixed time step `dt`.
///
/// Samples land at `t = 0, dt, 2*dt, ...`; the final sample is always
/// exactly the input trajectory's last time and pose, even when the
/// duration is not a multiple of `dt`. Position interpolates linearly
/// and yaw takes the shortest angular path between the two bounding
/// input samples.
pub fn interpolate_trajectory(traj: &Trajectory, dt: f32) -> Result<Trajectory> {
    if dt <= 0.0 {
        return Err(GatiError::Trajectory(format!(
            "Interpolation time step must be positive, got {dt}"
        )));
    }
    if traj.num_points() < 2 {
        return Err(GatiError::Trajectory(
            "Trajectory must have at least 2 points to interpolate".into(),
        ));
    }

    let t_final = traj.duration();
    let mut t_pts = Vec::new();
    let mut poses = Vec::new();

    let mut k = 0u32;
    loop {
        let t = k as f32 * dt;
        if t >= t_final {
            break;
        }
        t_pts.push(t);
        poses.push(sample_at(traj, t));
        k += 1;
    }

    // The last sample is pinned to the original endpoint.
    t_pts.push(t_final);
    poses.push(*traj.poses.last().unwrap());

    Ok(Trajectory { t_pts, poses })
}

/// Sample a trajectory pose at time `t` by interpolating between the
/// two bounding input samples. `t` must be within [0, duration].
fn sample_at(traj: &Trajectory, t: f32) -> Pose {
    let idx = traj
        .t_pts
        .iter()
        .position(|&tp| tp >= t)
        .unwrap_or(traj.num_points() - 1);
    if idx == 0 {
        return traj.poses[0];
    }

    let (t0, t1) = (traj.t_pts[idx - 1], traj.t_pts[idx]);
    // Zero-length segments carry duplicate timestamps; the earlier
    // sample wins.
    if t1 <= t0 {
        return traj.poses[idx - 1];
    }
    let alpha = (t - t0) / (t1 - t0);
    Pose::interpolate(&traj.poses[idx - 1], &traj.poses[idx], alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn straight_path() -> Path {
        Path::new(vec![Pose::new(0.0, 0.0, 0.0), Pose::new(1.0, 0.0, 0.0)])
    }

    #[test]
    fn test_rejects_short_path() {
        let path = Path::new(vec![Pose::identity()]);
        assert!(constant_speed_trajectory(&path, 1.0, None).is_err());
    }

    #[test]
    fn test_rejects_nonpositive_velocity() {
        assert!(constant_speed_trajectory(&straight_path(), 0.0, None).is_err());
        assert!(constant_speed_trajectory(&straight_path(), -1.0, None).is_err());
    }

    #[test]
    fn test_timestamps_start_at_zero_and_increase() {
        let path = Path::new(vec![
            Pose::new(0.0, 0.0, 0.0),
            Pose::new(1.0, 0.0, 0.0),
            Pose::new(1.0, 2.0, 0.0),
        ]);
        let traj = constant_speed_trajectory(&path, 2.0, None).unwrap();
        assert_eq!(traj.num_points(), 3);
        assert_relative_eq!(traj.t_pts[0], 0.0);
        assert_relative_eq!(traj.t_pts[1], 0.5);
        assert_relative_eq!(traj.t_pts[2], 1.5);
    }

    #[test]
    fn test_angular_velocity_stretches_segment() {
        // Pure rotation in place: linear duration is 0, so the yaw
        // limit dictates the segment time.
        let path = Path::new(vec![Pose::new(0.0, 0.0, 0.0), Pose::new(0.0, 0.0, PI)]);
        let traj = constant_speed_trajectory(&path, 1.0, Some(PI / 2.0)).unwrap();
        assert_relative_eq!(traj.duration(), 2.0, epsilon = 1e-5);

        // Without the limit the segment takes no time.
        let traj = constant_speed_trajectory(&path, 1.0, None).unwrap();
        assert_relative_eq!(traj.duration(), 0.0);
    }

    #[test]
    fn test_interpolate_sample_spacing() {
        let traj = constant_speed_trajectory(&straight_path(), 1.0, None).unwrap();
        let interp = interpolate_trajectory(&traj, 0.1).unwrap();

        // 1.0 s at dt = 0.1 -> samples at 0.0, 0.1, ..., 1.0.
        assert_eq!(interp.num_points(), 11);
        for (i, &t) in interp.t_pts.iter().enumerate() {
            assert_relative_eq!(t, i as f32 * 0.1, epsilon = 1e-5);
        }
        let last = interp.poses.last().unwrap();
        assert_relative_eq!(last.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(last.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interpolate_pins_final_sample() {
        // Duration 1.0 s is not a multiple of dt = 0.3; the final
        // sample must still be the exact endpoint.
        let traj = constant_speed_trajectory(&straight_path(), 1.0, None).unwrap();
        let interp = interpolate_trajectory(&traj, 0.3).unwrap();

        assert_eq!(interp.num_points(), 5);
        assert_relative_eq!(*interp.t_pts.last().unwrap(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(interp.poses.last().unwrap().x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interpolate_positions_are_linear() {
        let traj = constant_speed_trajectory(&straight_path(), 1.0, None).unwrap();
        let interp = interpolate_trajectory(&traj, 0.25).unwrap();
        for (t, pose) in interp.t_pts.iter().zip(interp.poses.iter()) {
            assert_relative_eq!(pose.x, *t, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_interpolate_rejects_short_trajectory() {
        let traj = Trajectory {
            t_pts: vec![0.0],
            poses: vec![Pose::identity()],
        };
        assert!(interpolate_trajectory(&traj, 0.1).is_err());
    }

    #[test]
    fn test_interpolate_handles_zero_length_segment() {
        // Two identical poses produce a duplicate timestamp; sampling
        // must not divide by zero.
        let path = Path::new(vec![
            Pose::new(0.0, 0.0, 0.0),
            Pose::new(0.0, 0.0, 0.0),
            Pose::new(1.0, 0.0, 0.0),
        ]);
        let traj = constant_speed_trajectory(&path, 1.0, None).unwrap();
        let interp = interpolate_trajectory(&traj, 0.1).unwrap();
        assert_eq!(interp.num_points(), 11);
        assert_relative_eq!(interp.poses[0].x, 0.0, epsilon = 1e-6);
    }
}
