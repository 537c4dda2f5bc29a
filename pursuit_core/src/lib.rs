//! # Pursuit Control Core
//!
//! Soft-real-time control core for the pursuit 2D tracking platform.
//! Drives the simulated cursor plant at a 1 kHz cadence, evaluates one of
//! three psychophysics tasks (sum-of-sines tracking, critical
//! instability, Fitts' Law), injects operator force from a synthetic PD
//! controller or an external keyboard bridge, and emits the full per-tick
//! state as 64-byte datagrams to the viewer.
//!
//! ## Zero-allocation tick
//!
//! Every per-tick buffer (the frame bytes, metric accumulators, the
//! bounded timing buffer) is owned by its component and reused. The
//! steady-state tick body performs no heap allocation and has no
//! suspension point; the only blocking-equivalent is the deliberate
//! busy-wait to the next period boundary.

pub mod cycle;
pub mod emitter;
pub mod error;
pub mod operator;
pub mod plant;
pub mod state;
pub mod task;

pub use cycle::CycleRunner;
pub use error::CoreError;
