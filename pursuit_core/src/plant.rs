//! Continuous-time integrator for the second-order plant.
//!
//! Each axis solves `M·c̈ + B·ċ + K·c = u` independently; the two axes
//! never mix. Force is held constant across sub-steps within a tick
//! (zero-order hold). Both steppers are pure and allocation-free; NaN in
//! produces NaN out and is never trapped.

use pursuit_common::types::{AxisParams, Force2D, PlantState};

/// Per-axis acceleration: `a = (u − B·v − K·c) / M`.
#[inline]
fn accel(p: &AxisParams, c: f64, v: f64, u: f64) -> f64 {
    (u - p.damping * v - p.stiffness * c) / p.mass
}

/// One classical 4-stage Runge-Kutta step of a single axis.
///
/// Samples (v, a) jointly at the four stages and combines with the
/// 1/6·(k1 + 2k2 + 2k3 + k4) weights for both position and velocity.
#[inline]
fn rk4_axis(p: &AxisParams, c: f64, v: f64, u: f64, dt: f64) -> (f64, f64) {
    // k1 at the start of the interval
    let k1_v = v;
    let k1_a = accel(p, c, v, u);

    // k2, k3 at the midpoint
    let k2_v = v + 0.5 * dt * k1_a;
    let k2_a = accel(p, c + 0.5 * dt * k1_v, k2_v, u);

    let k3_v = v + 0.5 * dt * k2_a;
    let k3_a = accel(p, c + 0.5 * dt * k2_v, k3_v, u);

    // k4 at the end
    let k4_v = v + dt * k3_a;
    let k4_a = accel(p, c + dt * k3_v, k4_v, u);

    let c_next = c + (dt / 6.0) * (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v);
    let v_next = v + (dt / 6.0) * (k1_a + 2.0 * k2_a + 2.0 * k3_a + k4_a);
    (c_next, v_next)
}

/// Advance the plant one tick with classical RK4.
///
/// Pure: returns a new state, leaves the input untouched. Callers must
/// supply `mass > 0` (validated at config load).
#[inline]
pub fn step_rk4(state: &PlantState, px: &AxisParams, py: &AxisParams, input: Force2D, dt: f64) -> PlantState {
    let (cx, vx) = rk4_axis(px, state.cx, state.vx, input.ux, dt);
    let (cy, vy) = rk4_axis(py, state.cy, state.vy, input.uy, dt);
    PlantState { cx, cy, vx, vy }
}

/// Advance the plant one tick with forward Euler.
///
/// One-stage update, provided for cheap re-use inside simpler
/// sub-simulations.
#[inline]
pub fn step_euler(state: &PlantState, px: &AxisParams, py: &AxisParams, input: Force2D, dt: f64) -> PlantState {
    let ax = accel(px, state.cx, state.vx, input.ux);
    let ay = accel(py, state.cy, state.vy, input.uy);
    PlantState {
        cx: state.cx + state.vx * dt,
        cy: state.cy + state.vy * dt,
        vx: state.vx + ax * dt,
        vy: state.vy + ay * dt,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1e-3;

    fn free_mass() -> AxisParams {
        AxisParams {
            mass: 1.0,
            damping: 0.0,
            stiffness: 0.0,
        }
    }

    #[test]
    fn rk4_constant_force_matches_half_t_squared() {
        // K=0, B=0, M=1, u=1 N → exact c(t) = t²/2. After 1 s of 1 kHz
        // ticks RK4 must agree to 1e-10 (it is exact up to rounding on
        // this problem).
        let p = free_mass();
        let u = Force2D { ux: 1.0, uy: 0.0 };
        let mut s = PlantState::ZERO;
        for _ in 0..1000 {
            s = step_rk4(&s, &p, &p, u, DT);
        }
        assert!((s.cx - 0.5).abs() <= 1e-10, "cx = {}", s.cx);
        assert!((s.vx - 1.0).abs() <= 1e-10, "vx = {}", s.vx);
        assert_eq!(s.cy, 0.0);
        assert_eq!(s.vy, 0.0);
    }

    #[test]
    fn axes_are_decoupled() {
        let px = AxisParams {
            mass: 1.0,
            damping: 2.0,
            stiffness: 3.0,
        };
        let py = AxisParams {
            mass: 4.0,
            damping: 0.5,
            stiffness: 0.0,
        };
        let u = Force2D { ux: 1.0, uy: -2.0 };
        let s0 = PlantState {
            cx: 0.1,
            cy: -0.3,
            vx: 0.0,
            vy: 0.2,
        };

        let both = step_rk4(&s0, &px, &py, u, DT);

        // Zeroing the other axis must not change this axis.
        let x_only = step_rk4(
            &PlantState {
                cy: 0.0,
                vy: 0.0,
                ..s0
            },
            &px,
            &py,
            Force2D { ux: u.ux, uy: 0.0 },
            DT,
        );
        assert_eq!(both.cx, x_only.cx);
        assert_eq!(both.vx, x_only.vx);
    }

    #[test]
    fn euler_single_stage_update() {
        let p = AxisParams {
            mass: 2.0,
            damping: 1.0,
            stiffness: 4.0,
        };
        let s = PlantState {
            cx: 1.0,
            cy: 0.0,
            vx: -0.5,
            vy: 0.0,
        };
        let u = Force2D { ux: 3.0, uy: 0.0 };
        let next = step_euler(&s, &p, &p, u, DT);

        // a = (3 − 1·(−0.5) − 4·1)/2 = −0.25
        assert!((next.cx - (1.0 + (-0.5) * DT)).abs() < 1e-15);
        assert!((next.vx - (-0.5 + (-0.25) * DT)).abs() < 1e-15);
    }

    #[test]
    fn nan_propagates_without_trapping() {
        let p = free_mass();
        let s = PlantState {
            cx: f64::NAN,
            ..PlantState::ZERO
        };
        let next = step_rk4(&s, &p, &p, Force2D::ZERO, DT);
        assert!(next.cx.is_nan());
    }

    #[test]
    fn rk4_converges_faster_than_euler_on_oscillator() {
        // Undamped oscillator c'' = −4c, c(0)=1: exact c(t) = cos(2t).
        let p = AxisParams {
            mass: 1.0,
            damping: 0.0,
            stiffness: 4.0,
        };
        let init = PlantState {
            cx: 1.0,
            ..PlantState::ZERO
        };
        let exact = (2.0f64).cos();

        let mut rk4 = init;
        let mut euler = init;
        for _ in 0..1000 {
            rk4 = step_rk4(&rk4, &p, &p, Force2D::ZERO, DT);
            euler = step_euler(&euler, &p, &p, Force2D::ZERO, DT);
        }
        assert!((rk4.cx - exact).abs() < (euler.cx - exact).abs());
        assert!((rk4.cx - exact).abs() < 1e-9);
    }
}
