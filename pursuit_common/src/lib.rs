//! # Pursuit Common Library
//!
//! Shared foundation for the pursuit 2D tracking platform: plant value
//! types, the 64-byte state wire protocol, and the experiment
//! configuration layer.
//!
//! Everything here is consumed by the control core (`pursuit_core`) and by
//! external collaborators (viewer, input bridges) that speak the same wire
//! format.

pub mod config;
pub mod protocol;
pub mod types;

pub use config::{ConfigError, ConfigLoader, ExperimentConfig};
pub use protocol::{StateFrame, TaskState, FRAME_SIZE};
pub use types::{AxisParams, Force2D, PlantState, TaskType};
