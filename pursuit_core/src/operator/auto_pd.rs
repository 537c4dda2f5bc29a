//! Synthetic PD operator with optional Gaussian actuation noise.
//!
//! Per axis: `u = Kp·(t − c) + Kd·(−v) + σ·ξ` with a fresh standard-normal
//! ξ per call per axis. The `−Kd·v` form treats the target as stationary,
//! so the derivative term is a pure velocity damper even when the target
//! moves.

use pursuit_common::types::{Force2D, PlantState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Default proportional gain.
pub const DEFAULT_KP: f64 = 10.0;
/// Default derivative gain.
pub const DEFAULT_KD: f64 = 5.0;
/// Default actuation noise scale [N].
pub const DEFAULT_SIGMA: f64 = 0.1;

/// Deterministic PD + noise force generator.
#[derive(Debug)]
pub struct AutoPdOperator {
    kp: f64,
    kd: f64,
    sigma: f64,
    target: (f64, f64),
    rng: StdRng,
    normal: Normal<f64>,
}

impl AutoPdOperator {
    /// Construct with explicit gains and noise scale, seeded from entropy.
    pub fn new(kp: f64, kd: f64, sigma: f64) -> Self {
        Self::from_rng(kp, kd, sigma, StdRng::from_entropy())
    }

    /// Construct with an explicit seed for reproducible noise.
    pub fn with_seed(kp: f64, kd: f64, sigma: f64, seed: u64) -> Self {
        Self::from_rng(kp, kd, sigma, StdRng::seed_from_u64(seed))
    }

    fn from_rng(kp: f64, kd: f64, sigma: f64, rng: StdRng) -> Self {
        debug_assert!(sigma >= 0.0, "noise scale must be non-negative");
        Self {
            kp,
            kd,
            sigma,
            target: (0.0, 0.0),
            rng,
            // Unit normal is always constructible; the draw is scaled by
            // sigma at use.
            normal: Normal::new(0.0, 1.0).unwrap(),
        }
    }

    /// Defaults: Kp = 10, Kd = 5, σ = 0.1.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_KP, DEFAULT_KD, DEFAULT_SIGMA)
    }

    /// Update the setpoint.
    #[inline]
    pub fn set_target(&mut self, tx: f64, ty: f64) {
        self.target = (tx, ty);
    }

    /// Current setpoint.
    #[inline]
    pub fn target(&self) -> (f64, f64) {
        self.target
    }

    /// Compute the force for the observed plant state.
    ///
    /// With σ = 0 no random draw is made, so the output is bit-identical
    /// across runs regardless of seed.
    #[inline]
    pub fn compute_input(&mut self, state: &PlantState) -> Force2D {
        let (tx, ty) = self.target;
        let mut ux = self.kp * (tx - state.cx) + self.kd * (-state.vx);
        let mut uy = self.kp * (ty - state.cy) + self.kd * (-state.vy);
        if self.sigma > 0.0 {
            ux += self.sigma * self.normal.sample(&mut self.rng);
            uy += self.sigma * self.normal.sample(&mut self.rng);
        }
        Force2D { ux, uy }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
