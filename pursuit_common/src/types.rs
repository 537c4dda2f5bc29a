//! Core value types shared across the platform.
//!
//! All types are plain `Copy` data. A plant step produces a new
//! `PlantState` value; nothing here is interior-mutable.

use serde::{Deserialize, Serialize};

/// Full state of the simulated second-order plant ("cursor").
///
/// Positions in metres, velocities in m/s. The two axes are fully
/// decoupled throughout the system; no field mixes axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlantState {
    /// Cursor position, X axis [m].
    pub cx: f64,
    /// Cursor position, Y axis [m].
    pub cy: f64,
    /// Cursor velocity, X axis [m/s].
    pub vx: f64,
    /// Cursor velocity, Y axis [m/s].
    pub vy: f64,
}

impl PlantState {
    /// State at the origin with zero velocity.
    pub const ZERO: Self = Self {
        cx: 0.0,
        cy: 0.0,
        vx: 0.0,
        vy: 0.0,
    };

    /// Euclidean distance of the position from the origin [m].
    #[inline]
    pub fn position_norm(&self) -> f64 {
        (self.cx * self.cx + self.cy * self.cy).sqrt()
    }
}

/// Force input applied to the plant [N], one component per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Force2D {
    /// Force along X [N].
    pub ux: f64,
    /// Force along Y [N].
    pub uy: f64,
}

impl Force2D {
    /// Zero force.
    pub const ZERO: Self = Self { ux: 0.0, uy: 0.0 };
}

/// Second-order plant parameters for one axis: `M·c̈ + B·ċ + K·c = u`.
///
/// Immutable after construction. `mass` must be strictly positive;
/// `damping` and `stiffness` non-negative (enforced at config validation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisParams {
    /// Mass M [kg], > 0.
    pub mass: f64,
    /// Viscous damping B [N·s/m], ≥ 0.
    pub damping: f64,
    /// Spring stiffness K [N/m], ≥ 0.
    pub stiffness: f64,
}

impl Default for AxisParams {
    fn default() -> Self {
        Self {
            mass: 1.0,
            damping: 5.0,
            stiffness: 0.0,
        }
    }
}

/// Which experiment task the core is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Sum-of-Sines tracking.
    #[default]
    Sos,
    /// Critical Instability.
    Cit,
    /// Fitts' Law target acquisition.
    Fitts,
}

impl TaskType {
    /// Parse a task name as given on the CLI. Returns `None` for
    /// unrecognised names; the caller decides the fallback.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sos" => Some(Self::Sos),
            "cit" => Some(Self::Cit),
            "fitts" => Some(Self::Fitts),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sos => write!(f, "sos"),
            Self::Cit => write!(f, "cit"),
            Self::Fitts => write!(f, "fitts"),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
