//! Experiment configuration: defaults, TOML loading, and validation.
//!
//! Every field has a default, so the core runs without any file on disk.
//! When a file is supplied it is parsed with serde + toml and then passed
//! through `validate()` before use.
//!
//! # TOML Example
//!
//! ```toml
//! control_rate_hz = 1000.0
//! viewer_addr = "127.0.0.1"
//! viewer_port = 12345
//! keyboard_port = 12346
//! operator = "autopd"
//! task = "sos"
//!
//! [plant_x]
//! mass = 1.0
//! damping = 5.0
//! stiffness = 0.0
//!
//! [plant_y]
//! mass = 1.0
//! damping = 5.0
//! stiffness = 0.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AxisParams, TaskType};

/// Error type for configuration loading and validation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

/// Which operator produces plant input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    /// Synthetic PD controller with optional Gaussian noise.
    #[default]
    AutoPd,
    /// External human input via the keyboard datagram bridge.
    Keyboard,
}

/// Complete experiment configuration.
///
/// `dt()` and `control_rate_hz` satisfy `dt() * control_rate_hz == 1.0`
/// (ULP-level float equality, checked in tests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Control loop rate [Hz].
    pub control_rate_hz: f64,
    /// Plant parameters, X axis.
    pub plant_x: AxisParams,
    /// Plant parameters, Y axis.
    pub plant_y: AxisParams,
    /// Viewer datagram destination address.
    pub viewer_addr: String,
    /// Viewer datagram destination port.
    pub viewer_port: u16,
    /// Local port the keyboard bridge sends key states to.
    pub keyboard_port: u16,
    /// Operator device variant.
    pub operator: OperatorKind,
    /// Task to run.
    pub task: TaskType,
    /// Seed for every pseudo-random draw (auto-PD noise, sum-of-sines
    /// phases). `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            control_rate_hz: 1000.0,
            plant_x: AxisParams::default(),
            plant_y: AxisParams::default(),
            viewer_addr: "127.0.0.1".to_string(),
            viewer_port: 12345,
            keyboard_port: 12346,
            operator: OperatorKind::AutoPd,
            task: TaskType::Sos,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Control period [s].
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.control_rate_hz
    }

    /// Destination address string for the viewer socket.
    pub fn viewer_dest(&self) -> String {
        format!("{}:{}", self.viewer_addr, self.viewer_port)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `control_rate_hz` is not strictly positive and finite
    /// - any axis mass is not strictly positive
    /// - any axis damping or stiffness is negative
    /// - `viewer_addr` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.control_rate_hz.is_finite() && self.control_rate_hz > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "control_rate_hz must be positive, got {}",
                self.control_rate_hz
            )));
        }
        for (name, p) in [("plant_x", &self.plant_x), ("plant_y", &self.plant_y)] {
            if !(p.mass.is_finite() && p.mass > 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{name}.mass must be > 0, got {}",
                    p.mass
                )));
            }
            if !(p.damping.is_finite() && p.damping >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{name}.damping must be >= 0, got {}",
                    p.damping
                )));
            }
            if !(p.stiffness.is_finite() && p.stiffness >= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "{name}.stiffness must be >= 0, got {}",
                    p.stiffness
                )));
            }
        }
        if self.viewer_addr.is_empty() {
            return Err(ConfigError::ValidationError(
                "viewer_addr cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// Default implementation works for any `DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: Sized + serde::de::DeserializeOwned> ConfigLoader for T {}

// ─── Tests ──────────────────────────────────────────────────────────
