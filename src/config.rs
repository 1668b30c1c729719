//! Executor configuration.
//!
//! A flat serde record that round-trips losslessly, used to persist
//! and restore path executor settings.

use std::path::Path as FilePath;

use serde::{Deserialize, Serialize};

use crate::error::{GatiError, Result};

/// Path executor variant tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    ConstantVelocity,
}

/// Flat configuration record for a path executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Executor variant this record configures
    #[serde(rename = "type")]
    pub kind: ExecutorKind,

    /// Trajectory time step in seconds
    #[serde(default = "default_dt")]
    pub dt: f32,

    /// Linear velocity in m/s
    #[serde(default = "default_linear_velocity")]
    pub linear_velocity: f32,

    /// Maximum angular velocity in rad/s (unlimited if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_angular_velocity: Option<f32>,

    /// Run the path validation loop during execution
    #[serde(default)]
    pub validate_during_execution: bool,

    /// Validation loop period in seconds
    #[serde(default = "default_validation_dt")]
    pub validation_dt: f32,

    /// Step size in meters for discretizing collision checks
    #[serde(default = "default_validation_step_dist")]
    pub validation_step_dist: f32,

    /// Name of the 2D ranging sensor used for hallway detection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lidar_sensor_name: Option<String>,

    /// Hallway tracker measurement period in seconds
    #[serde(default = "default_lidar_measurement_dt")]
    pub lidar_sensor_measurement_dt: f32,
}

fn default_dt() -> f32 {
    0.1
}
fn default_linear_velocity() -> f32 {
    1.0
}
fn default_validation_dt() -> f32 {
    0.5
}
fn default_validation_step_dist() -> f32 {
    0.025
}
fn default_lidar_measurement_dt() -> f32 {
    0.25
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::ConstantVelocity,
            dt: default_dt(),
            linear_velocity: default_linear_velocity(),
            max_angular_velocity: None,
            validate_during_execution: false,
            validation_dt: default_validation_dt(),
            validation_step_dist: default_validation_step_dist(),
            lidar_sensor_name: None,
            lidar_sensor_measurement_dt: default_lidar_measurement_dt(),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &FilePath) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GatiError::Config(format!("Failed to read config file: {e}")))?;
        let config: ExecutorConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let config = ExecutorConfig {
            kind: ExecutorKind::ConstantVelocity,
            dt: 0.05,
            linear_velocity: 0.5,
            max_angular_velocity: Some(2.0),
            validate_during_execution: true,
            validation_dt: 0.25,
            validation_step_dist: 0.01,
            lidar_sensor_name: Some("lidar".to_string()),
            lidar_sensor_measurement_dt: 0.1,
        };

        let encoded = toml::to_string(&config).unwrap();
        let decoded: ExecutorConfig = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_roundtrip_preserves_absent_options() {
        let config = ExecutorConfig::default();
        assert!(config.max_angular_velocity.is_none());
        assert!(config.lidar_sensor_name.is_none());

        let encoded = toml::to_string(&config).unwrap();
        let decoded: ExecutorConfig = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let decoded: ExecutorConfig = toml::from_str("type = \"constant_velocity\"").unwrap();
        assert_eq!(decoded, ExecutorConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ExecutorConfig {
            max_angular_velocity: Some(4.0),
            lidar_sensor_name: Some("lidar".to_string()),
            ..ExecutorConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["type"], "constant_velocity");
        let decoded: ExecutorConfig = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, config);
    }
}
