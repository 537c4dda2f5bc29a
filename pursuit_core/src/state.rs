//! Mutable per-run experiment state.
//!
//! One instance lives for the life of the cycle runner; `reset` returns it
//! to the zero state without reallocation.

use std::time::Instant;

use pursuit_common::protocol::{StateFrame, TaskState};
use pursuit_common::types::{Force2D, PlantState};

/// Everything the loop mutates tick to tick.
#[derive(Debug)]
pub struct ExperimentState {
    /// Monotonic reference taken at the first step of a run.
    pub start: Option<Instant>,
    /// Elapsed time since `start` [µs].
    pub elapsed_us: u64,
    /// Tick counter, strictly monotonic during a run.
    pub loop_count: u64,
    /// Current plant state.
    pub plant: PlantState,
    /// Current target (tx, ty) [m].
    pub target: (f64, f64),
    /// Task state as of the last update.
    pub task_state: TaskState,
    /// Current trial number.
    pub trial_number: u32,
    /// Force injected this tick.
    pub last_input: Force2D,
    /// Loop-run flag; cleared by `stop()` or signal handlers.
    pub running: bool,
}

impl ExperimentState {
    pub fn new() -> Self {
        Self {
            start: None,
            elapsed_us: 0,
            loop_count: 0,
            plant: PlantState::ZERO,
            target: (0.0, 0.0),
            task_state: TaskState::Idle,
            trial_number: 0,
            last_input: Force2D::ZERO,
            running: false,
        }
    }

    /// Clear all counters and zero the kinematic state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Project the tick state into a wire frame. The emitted timestamp is
    /// the `elapsed_us` of the tick being serialised.
    #[inline]
    pub fn to_frame(&self) -> StateFrame {
        StateFrame {
            timestamp_us: self.elapsed_us as f64,
            cursor_x: self.plant.cx,
            cursor_y: self.plant.cy,
            cursor_vx: self.plant.vx,
            cursor_vy: self.plant.vy,
            target_x: self.target.0,
            target_y: self.target.1,
            task_state: self.task_state,
            trial_number: self.trial_number,
        }
    }
}

impl Default for ExperimentState {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
