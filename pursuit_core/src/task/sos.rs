//! Sum-of-Sines tracking task.
//!
//! Drives a broadband reference trajectory for frequency-response
//! identification. The X and Y frequency sets are disjoint prime
//! multiples, so the axes stay decorrelated. Per-sinusoid amplitude is
//! `A/f`, weighting power toward the low frequencies.

use pursuit_common::protocol::TaskState;
use pursuit_common::types::PlantState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// X-axis frequency set [Hz].
pub const FREQS_X: [f64; 6] = [0.10, 0.23, 0.37, 0.61, 1.03, 1.61];
/// Y-axis frequency set [Hz].
pub const FREQS_Y: [f64; 6] = [0.13, 0.29, 0.43, 0.71, 1.13, 1.73];
/// Base amplitude A [m].
pub const BASE_AMPLITUDE_M: f64 = 0.05;
/// Trial duration [s].
pub const DURATION_S: f64 = 60.0;

/// Tracking-error metrics for one sum-of-sines trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SosMetrics {
    /// Root-mean-square error, X axis [m].
    pub rmse_x: f64,
    /// Root-mean-square error, Y axis [m].
    pub rmse_y: f64,
    /// Combined RMSE over both axes [m].
    pub rmse_total: f64,
    /// Error samples accumulated.
    pub samples: u64,
}

/// Multi-sine reference generator with an RMSE accumulator.
#[derive(Debug)]
pub struct SosTask {
    state: TaskState,
    phases_x: [f64; 6],
    phases_y: [f64; 6],
    seed: Option<u64>,
    ticks: u64,
    /// Target computed for the current tick, consumed by `update`.
    last_target: (f64, f64),
    sum_sq_x: f64,
    sum_sq_y: f64,
    samples: u64,
}

impl SosTask {
    /// Construct with phases drawn uniformly from [0, 2π). A seed makes
    /// the draw (and every later reset) reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let mut draw = |n: &mut [f64; 6]| {
            for p in n.iter_mut() {
                *p = rng.gen_range(0.0..std::f64::consts::TAU);
            }
        };
        let mut phases_x = [0.0; 6];
        let mut phases_y = [0.0; 6];
        draw(&mut phases_x);
        draw(&mut phases_y);
        Self {
            state: TaskState::Idle,
            phases_x,
            phases_y,
            seed,
            ticks: 0,
            last_target: (0.0, 0.0),
            sum_sq_x: 0.0,
            sum_sq_y: 0.0,
            samples: 0,
        }
    }

    /// Current task state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Drawn phases (X, Y), for inspection.
    pub fn phases(&self) -> (&[f64; 6], &[f64; 6]) {
        (&self.phases_x, &self.phases_y)
    }

    /// `t(τ) = Σᵢ (A/fᵢ)·sin(2π fᵢ τ + φᵢ)` per axis.
    #[inline]
    pub fn target(&mut self, tau: f64) -> (f64, f64) {
        let mut tx = 0.0;
        let mut ty = 0.0;
        for i in 0..FREQS_X.len() {
            let fx = FREQS_X[i];
            tx += (BASE_AMPLITUDE_M / fx)
                * (std::f64::consts::TAU * fx * tau + self.phases_x[i]).sin();
            let fy = FREQS_Y[i];
            ty += (BASE_AMPLITUDE_M / fy)
                * (std::f64::consts::TAU * fy * tau + self.phases_y[i]).sin();
        }
        self.last_target = (tx, ty);
        (tx, ty)
    }

    /// One tick: accumulate squared tracking error against this tick's
    /// target and advance the trial clock. Completes when the task-local
    /// elapsed time reaches the duration, during that tick.
    pub fn update(&mut self, cursor: &PlantState, dt: f64) -> TaskState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.state == TaskState::Idle {
            self.state = TaskState::Running;
        }

        let ex = cursor.cx - self.last_target.0;
        let ey = cursor.cy - self.last_target.1;
        self.sum_sq_x += ex * ex;
        self.sum_sq_y += ey * ey;
        self.samples += 1;

        self.ticks += 1;
        if self.ticks as f64 * dt >= DURATION_S {
            self.state = TaskState::Completed;
        }
        self.state
    }

    /// Return to Idle with fresh phases and cleared accumulators.
    ///
    /// With a stored seed the phases are redrawn identically; without one
    /// they come from a fresh entropy-seeded generator, so callers wanting
    /// reproducibility across resets must construct with a seed.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    /// RMSE report.
    pub fn metrics(&self) -> SosMetrics {
        let n = self.samples.max(1) as f64;
        SosMetrics {
            rmse_x: (self.sum_sq_x / n).sqrt(),
            rmse_y: (self.sum_sq_y / n).sqrt(),
            rmse_total: ((self.sum_sq_x + self.sum_sq_y) / n).sqrt(),
            samples: self.samples,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
