//! Critical Instability task.
//!
//! Measures the operator's critical stability gain: a first-order
//! unstable shadow plant `ċ = λ·c + K_u·u` is ramped ever more unstable
//! until the operator loses containment (Failed) or the ramp tops out
//! (Completed). The shadow plant exists because the task needs specific
//! pole dynamics and must not inherit damping from the default cursor
//! plant; the task therefore owns its plant and the loop projects the
//! shadow state as the cursor, with zero velocities.
//!
//! Within one tick the ordering is check-then-advance: the divergence
//! test sees the state the tick starts with, then the dynamics advance.

use pursuit_common::protocol::TaskState;
use pursuit_common::types::{Force2D, PlantState};

/// Initial instability pole λ [rad/s].
pub const LAMBDA_START: f64 = 0.5;
/// Ramp increment Δλ [rad/s].
pub const LAMBDA_STEP: f64 = 0.2;
/// Interval between ramp increments [s].
pub const STEP_INTERVAL_S: f64 = 30.0;
/// Input gain K_u.
pub const INPUT_GAIN: f64 = 1.0;
/// Divergence threshold on ‖(cx, cy)‖ [m].
pub const DIVERGENCE_THRESHOLD_M: f64 = 0.08;
/// Ramp ceiling [rad/s].
pub const LAMBDA_MAX: f64 = 10.0;

/// Outcome metrics for one critical-instability trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitMetrics {
    /// λ at the terminal transition [rad/s] (0 while running).
    pub lambda_critical: f64,
    /// Task-local elapsed time at the terminal transition [s].
    pub divergence_time_s: f64,
    /// ‖shadow position‖ at the last tick [m].
    pub final_distance: f64,
    /// Ramp increments applied.
    pub increments: u32,
    /// Current λ [rad/s].
    pub lambda: f64,
}

/// First-order unstable shadow dynamics with a ramped pole.
#[derive(Debug)]
pub struct CitTask {
    state: TaskState,
    lambda_x: f64,
    lambda_y: f64,
    cx: f64,
    cy: f64,
    ticks: u64,
    ticks_since_increment: u64,
    elapsed_s: f64,
    increments: u32,
    lambda_critical: f64,
    divergence_time_s: f64,
}

impl CitTask {
    pub fn new() -> Self {
        Self {
            state: TaskState::Idle,
            lambda_x: LAMBDA_START,
            lambda_y: LAMBDA_START,
            cx: 0.0,
            cy: 0.0,
            ticks: 0,
            ticks_since_increment: 0,
            elapsed_s: 0.0,
            increments: 0,
            lambda_critical: 0.0,
            divergence_time_s: 0.0,
        }
    }

    /// Current task state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Both poles, ramped together. `lambda_x == lambda_y` always.
    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda_x
    }

    /// Target is pinned to the origin.
    #[inline]
    pub fn target(&mut self, _tau: f64) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// The shadow plant projected as a cursor state. Velocities are not
    /// part of the first-order dynamics and read as zero.
    #[inline]
    pub fn shadow_state(&self) -> PlantState {
        PlantState {
            cx: self.cx,
            cy: self.cy,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// ‖shadow position‖ [m].
    #[inline]
    fn distance(&self) -> f64 {
        (self.cx * self.cx + self.cy * self.cy).sqrt()
    }

    /// Check-then-advance the shadow dynamics with the operator's input.
    ///
    /// While Running, a norm above the divergence threshold at the start
    /// of the tick transitions to Failed and freezes the shadow; the
    /// diverged tick therefore records `λ_critical` at the current λ and
    /// a final distance above the threshold. Otherwise the positions
    /// advance one forward-Euler step, `c ← c + (λ·c + K_u·u)·dt`.
    pub fn drive(&mut self, input: Force2D, dt: f64) -> PlantState {
        if self.state.is_terminal() {
            return self.shadow_state();
        }

        if self.state == TaskState::Running && self.distance() > DIVERGENCE_THRESHOLD_M {
            self.state = TaskState::Failed;
            self.lambda_critical = self.lambda_x;
            self.divergence_time_s = self.elapsed_s;
            return self.shadow_state();
        }

        self.cx += (self.lambda_x * self.cx + INPUT_GAIN * input.ux) * dt;
        self.cy += (self.lambda_y * self.cy + INPUT_GAIN * input.uy) * dt;
        self.shadow_state()
    }

    /// One tick of trial bookkeeping: elapsed time and the λ ramp. The
    /// increment that first reaches `λ ≥ λ_max` completes the task.
    pub fn update(&mut self, _cursor: &PlantState, dt: f64) -> TaskState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.state == TaskState::Idle {
            self.state = TaskState::Running;
        }

        self.ticks += 1;
        self.ticks_since_increment += 1;
        self.elapsed_s = self.ticks as f64 * dt;

        if self.ticks_since_increment as f64 * dt >= STEP_INTERVAL_S {
            self.lambda_x += LAMBDA_STEP;
            self.lambda_y += LAMBDA_STEP;
            self.increments += 1;
            self.ticks_since_increment = 0;

            if self.lambda_x >= LAMBDA_MAX {
                self.state = TaskState::Completed;
                self.lambda_critical = self.lambda_x;
                self.divergence_time_s = self.elapsed_s;
            }
        }
        self.state
    }

    /// Return to Idle with the ramp and shadow zeroed.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Outcome report.
    pub fn metrics(&self) -> CitMetrics {
        CitMetrics {
            lambda_critical: self.lambda_critical,
            divergence_time_s: self.divergence_time_s,
            final_distance: self.distance(),
            increments: self.increments,
            lambda: self.lambda_x,
        }
    }
}

impl Default for CitTask {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
