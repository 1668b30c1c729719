//! Foundation types: poses, paths, trajectories, and angular math.

pub mod math;
pub mod path;
pub mod pose;
pub mod trajectory;

pub use path::Path;
pub use pose::{Point2D, Pose};
pub use trajectory::{constant_speed_trajectory, interpolate_trajectory, Trajectory};
