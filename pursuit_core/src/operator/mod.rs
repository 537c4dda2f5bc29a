//! Operator device abstraction.
//!
//! The operator is the thing that produces force: a synthetic PD
//! controller for testing, or an external human through the keyboard
//! datagram bridge. Variants are a tagged enum rather than a trait object
//! so the per-tick dispatch stays branch-predictable with no virtual call
//! in the hot path.

pub mod auto_pd;
pub mod keyboard;

pub use auto_pd::AutoPdOperator;
pub use keyboard::KeyboardOperator;

use pursuit_common::types::{Force2D, PlantState};

/// An input-producing device, one of the supported variants.
#[derive(Debug)]
pub enum OperatorDevice {
    /// Deterministic PD + Gaussian-noise controller.
    AutoPd(AutoPdOperator),
    /// Non-blocking UDP keyboard bridge.
    Keyboard(KeyboardOperator),
}

impl OperatorDevice {
    /// Drain any pending external input. Called at the start of every
    /// tick, before the force computation. No-op for the auto-PD variant.
    #[inline]
    pub fn poll(&mut self) {
        match self {
            Self::AutoPd(_) => {}
            Self::Keyboard(kb) => kb.drain(),
        }
    }

    /// Update the setpoint the device regulates toward. The keyboard
    /// variant has no setpoint; the human sees the target on the viewer.
    #[inline]
    pub fn set_target(&mut self, tx: f64, ty: f64) {
        match self {
            Self::AutoPd(pd) => pd.set_target(tx, ty),
            Self::Keyboard(_) => {}
        }
    }

    /// Produce the force for this tick given the plant state the operator
    /// observes.
    #[inline]
    pub fn compute_input(&mut self, state: &PlantState) -> Force2D {
        match self {
            Self::AutoPd(pd) => pd.compute_input(state),
            Self::Keyboard(kb) => kb.compute_input(state),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
