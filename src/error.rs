//! Error types for GatiNav.

use thiserror::Error;

/// GatiNav error type
#[derive(Error, Debug)]
pub enum GatiError {
    #[error("Trajectory error: {0}")]
    Trajectory(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sensor error: {0}")]
    Sensor(String),
}

impl From<toml::de::Error> for GatiError {
    fn from(e: toml::de::Error) -> Self {
        GatiError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for GatiError {
    fn from(e: toml::ser::Error) -> Self {
        GatiError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatiError>;
