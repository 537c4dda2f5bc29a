//! Experiment task state machines.
//!
//! The three tasks share one capability set: a target generator, a
//! per-tick update returning the task state, reset, and a metrics report.
//! Task identity is stable across a run, so the variants live in a tagged
//! enum and dispatch with a plain `match`; no virtual call in the hot
//! path.
//!
//! A task may own its plant (critical-instability does): the loop then
//! delegates both integration and cursor projection to the task through
//! `own_plant` / `drive_own_plant` instead of branching on the task type.

pub mod cit;
pub mod fitts;
pub mod sos;

pub use cit::{CitMetrics, CitTask};
pub use fitts::{FittsMetrics, FittsTask};
pub use sos::{SosMetrics, SosTask};

use pursuit_common::protocol::TaskState;
use pursuit_common::types::{Force2D, PlantState, TaskType};

/// A running experiment task.
#[derive(Debug)]
pub enum Task {
    Sos(SosTask),
    Cit(CitTask),
    Fitts(FittsTask),
}

/// Per-task metric records, reported at run end.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMetrics {
    Sos(SosMetrics),
    Cit(CitMetrics),
    Fitts(FittsMetrics),
}

impl Task {
    /// Construct a fresh task of the given type. `seed` feeds every
    /// random draw the task makes (sum-of-sines phases); `None` uses
    /// entropy.
    pub fn new(task_type: TaskType, seed: Option<u64>) -> Self {
        match task_type {
            TaskType::Sos => Self::Sos(SosTask::new(seed)),
            TaskType::Cit => Self::Cit(CitTask::new()),
            TaskType::Fitts => Self::Fitts(FittsTask::new()),
        }
    }

    /// Which variant this is.
    pub fn task_type(&self) -> TaskType {
        match self {
            Self::Sos(_) => TaskType::Sos,
            Self::Cit(_) => TaskType::Cit,
            Self::Fitts(_) => TaskType::Fitts,
        }
    }

    /// Reference trajectory at task-local time τ [s].
    #[inline]
    pub fn target(&mut self, tau: f64) -> (f64, f64) {
        match self {
            Self::Sos(t) => t.target(tau),
            Self::Cit(t) => t.target(tau),
            Self::Fitts(t) => t.target(tau),
        }
    }

    /// Advance the task one tick against the observed cursor.
    #[inline]
    pub fn update(&mut self, cursor: &PlantState, dt: f64) -> TaskState {
        match self {
            Self::Sos(t) => t.update(cursor, dt),
            Self::Cit(t) => t.update(cursor, dt),
            Self::Fitts(t) => t.update(cursor, dt),
        }
    }

    /// Current task state.
    #[inline]
    pub fn state(&self) -> TaskState {
        match self {
            Self::Sos(t) => t.state(),
            Self::Cit(t) => t.state(),
            Self::Fitts(t) => t.state(),
        }
    }

    /// Whether the task reached a terminal state.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state().is_terminal()
    }

    /// Return to the initial state. Idempotent.
    pub fn reset(&mut self) {
        match self {
            Self::Sos(t) => t.reset(),
            Self::Cit(t) => t.reset(),
            Self::Fitts(t) => t.reset(),
        }
    }

    /// Metrics snapshot.
    pub fn metrics(&self) -> TaskMetrics {
        match self {
            Self::Sos(t) => TaskMetrics::Sos(t.metrics()),
            Self::Cit(t) => TaskMetrics::Cit(t.metrics()),
            Self::Fitts(t) => TaskMetrics::Fitts(t.metrics()),
        }
    }

    /// The task's own plant state, when the task integrates its own
    /// dynamics instead of the default cursor plant.
    #[inline]
    pub fn own_plant(&self) -> Option<PlantState> {
        match self {
            Self::Cit(t) => Some(t.shadow_state()),
            _ => None,
        }
    }

    /// Advance the task-owned plant with the operator's input and return
    /// the state to project as the cursor. Only meaningful when
    /// [`Task::own_plant`] is `Some`.
    #[inline]
    pub fn drive_own_plant(&mut self, input: Force2D, dt: f64) -> PlantState {
        match self {
            Self::Cit(t) => t.drive(input, dt),
            // Tasks without their own plant never get here; the loop
            // checks own_plant() first.
            _ => PlantState::ZERO,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
