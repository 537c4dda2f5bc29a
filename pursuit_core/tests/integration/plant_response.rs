//! Plant and operator convergence scenarios.

use pursuit_common::types::{AxisParams, Force2D, PlantState};
use pursuit_core::operator::AutoPdOperator;
use pursuit_core::plant::step_rk4;

const DT: f64 = 1e-3;

/// Free response of the damped oscillator M=1, B=1, K=4 from (c=1, v=0).
///
/// Analytically the first zero crossing is at t = π/√(4 − 0.25) s and the
/// envelope has decayed well below 0.2 by t = 2 s.
#[test]
fn rk4_free_response_damped_oscillator() {
    let p = AxisParams {
        mass: 1.0,
        damping: 1.0,
        stiffness: 4.0,
    };
    let mut s = PlantState {
        cx: 1.0,
        cy: 0.0,
        vx: 0.0,
        vy: 0.0,
    };

    let mut first_crossing = None;
    for i in 0..2000 {
        let prev = s.cx;
        s = step_rk4(&s, &p, &p, Force2D::ZERO, DT);
        if first_crossing.is_none() && prev > 0.0 && s.cx <= 0.0 {
            first_crossing = Some((i + 1) as f64 * DT);
        }
    }

    let expected = std::f64::consts::PI / (4.0f64 - 0.25).sqrt();
    let crossing = first_crossing.expect("no zero crossing within 2 s");
    assert!(
        (crossing - expected).abs() <= 2e-3,
        "crossing at {crossing}, expected {expected}"
    );
    assert!(s.cx.abs() <= 0.2, "|c(2)| = {}", s.cx.abs());
}

/// A σ=0 auto-PD operator on the default plant captures a step target to
/// within a millimetre in 3 s.
#[test]
fn auto_pd_captures_step_target() {
    let p = AxisParams {
        mass: 1.0,
        damping: 5.0,
        stiffness: 0.0,
    };
    let mut op = AutoPdOperator::with_seed(10.0, 5.0, 0.0, 1);
    op.set_target(0.05, 0.0);

    let mut s = PlantState::ZERO;
    for _ in 0..3000 {
        let u = op.compute_input(&s);
        s = step_rk4(&s, &p, &p, u, DT);
    }

    assert!((s.cx - 0.05).abs() <= 1e-3, "cx = {}", s.cx);
    assert!(s.cy.abs() <= 1e-3, "cy = {}", s.cy);
}
