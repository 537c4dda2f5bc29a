//! Fitts' Law target-acquisition task (ISO 9241-9 ring-of-targets).
//!
//! Thirteen targets on a circle, visited in the standard alternating
//! pattern (skip = ⌊N/2⌋+1). A target is acquired by dwelling inside its
//! disc; throughput is reported in the Shannon formulation.

use pursuit_common::protocol::TaskState;
use pursuit_common::types::PlantState;

/// Number of targets on the ring.
pub const NUM_TARGETS: usize = 13;
/// Ring radius [m].
pub const RING_RADIUS_M: f64 = 0.08;
/// Target disc width (diameter) [m].
pub const TARGET_WIDTH_M: f64 = 0.008;
/// Dwell time required to acquire [s].
pub const DWELL_S: f64 = 0.1;
/// Movements per trial.
pub const NUM_MOVEMENTS: u32 = 26;
/// Index step through the ring: ⌊N/2⌋ + 1.
pub const SKIP: usize = NUM_TARGETS / 2 + 1;

/// Throughput metrics for one Fitts trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittsMetrics {
    /// Movement amplitude between successive targets [m].
    pub amplitude: f64,
    /// Shannon index of difficulty `log2(A/W + 1)` [bits].
    pub index_of_difficulty: f64,
    /// Mean movement time [s] (0 until a movement completes).
    pub mean_movement_time: f64,
    /// `ID / mean_mt` [bits/s] (0 until a movement completes).
    pub throughput: f64,
    /// Fraction of movements flagged as errors.
    pub error_rate: f64,
    /// Movements completed so far.
    pub movements_completed: u32,
    /// Movements in the trial.
    pub movements_total: u32,
}

/// Ring-of-targets sequence with dwell-based acquisition.
#[derive(Debug)]
pub struct FittsTask {
    state: TaskState,
    /// Current target index, 1-based in [1, N].
    current_index: usize,
    ticks: u64,
    movement_start_s: f64,
    dwell_ticks: u64,
    inside: bool,
    movements_done: u32,
    movement_times: Vec<f64>,
    /// Per-movement error flags. The core never sets one; a miss
    /// detector (wrong-target re-entry or a per-movement timeout) is a
    /// documented extension.
    movement_errors: Vec<bool>,
}

impl FittsTask {
    pub fn new() -> Self {
        Self {
            state: TaskState::Idle,
            current_index: 1,
            ticks: 0,
            movement_start_s: 0.0,
            dwell_ticks: 0,
            inside: false,
            movements_done: 0,
            movement_times: Vec::with_capacity(NUM_MOVEMENTS as usize),
            movement_errors: Vec::with_capacity(NUM_MOVEMENTS as usize),
        }
    }

    /// Current task state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Current target index (1-based).
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Centre of target `index` (1-based): angle `2π·k/N − π/2` at the
    /// ring radius, with k = index − 1.
    pub fn target_center(index: usize) -> (f64, f64) {
        let k = (index - 1) as f64;
        let angle = std::f64::consts::TAU * k / NUM_TARGETS as f64 - std::f64::consts::FRAC_PI_2;
        (RING_RADIUS_M * angle.cos(), RING_RADIUS_M * angle.sin())
    }

    /// Successor of a 1-based ring index under the skip pattern.
    #[inline]
    pub fn next_index(index: usize) -> usize {
        (index - 1 + SKIP) % NUM_TARGETS + 1
    }

    /// The reference the operator pursues: the current target centre.
    #[inline]
    pub fn target(&mut self, _tau: f64) -> (f64, f64) {
        Self::target_center(self.current_index)
    }

    /// One tick of dwell tracking.
    pub fn update(&mut self, cursor: &PlantState, dt: f64) -> TaskState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.state == TaskState::Idle {
            self.state = TaskState::Running;
        }

        self.ticks += 1;
        let now = self.ticks as f64 * dt;

        let (tx, ty) = Self::target_center(self.current_index);
        let dx = cursor.cx - tx;
        let dy = cursor.cy - ty;
        let in_target = (dx * dx + dy * dy).sqrt() <= TARGET_WIDTH_M / 2.0;

        if in_target {
            if !self.inside {
                self.inside = true;
                self.dwell_ticks = 0;
            }
            self.dwell_ticks += 1;
            if self.dwell_ticks as f64 * dt >= DWELL_S {
                self.movement_times.push(now - self.movement_start_s);
                self.movement_errors.push(false);
                self.movements_done += 1;
                self.dwell_ticks = 0;
                self.inside = false;
                if self.movements_done >= NUM_MOVEMENTS {
                    self.state = TaskState::Completed;
                } else {
                    self.current_index = Self::next_index(self.current_index);
                    self.movement_start_s = now;
                }
            }
        } else {
            self.inside = false;
            self.dwell_ticks = 0;
        }

        self.state
    }

    /// Return to Idle at target 1 with cleared accumulators.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Throughput report.
    pub fn metrics(&self) -> FittsMetrics {
        // Distance between successively sampled targets on the ring.
        let amplitude = 2.0
            * RING_RADIUS_M
            * (std::f64::consts::PI * SKIP as f64 / NUM_TARGETS as f64).sin();
        let index_of_difficulty = (amplitude / TARGET_WIDTH_M + 1.0).log2();

        let n = self.movement_times.len();
        let mean_movement_time = if n > 0 {
            self.movement_times.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        let throughput = if mean_movement_time > 0.0 {
            index_of_difficulty / mean_movement_time
        } else {
            0.0
        };
        let errors = self.movement_errors.iter().filter(|e| **e).count();
        let error_rate = if n > 0 { errors as f64 / n as f64 } else { 0.0 };

        FittsMetrics {
            amplitude,
            index_of_difficulty,
            mean_movement_time,
            throughput,
            error_rate,
            movements_completed: self.movements_done,
            movements_total: NUM_MOVEMENTS,
        }
    }
}

impl Default for FittsTask {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
