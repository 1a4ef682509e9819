//! Tests for the equations of motion and the semi-implicit Euler step

use pendulab_core::engine::{bob_positions, compute_accelerations, DynamicState};
use pendulab_core::integrator::step;
use pendulab_core::params::PhysicalParameters;
use pendulab_core::tests::test_helpers::{approx_eq, reference_initial_conditions, undamped_params};

const FIXED_STEP: f64 = 1.0 / 60.0;

#[test]
fn test_reference_step_matches_frozen_values() {
    let state = DynamicState::from(reference_initial_conditions());
    let next = step(state, &undamped_params(), FIXED_STEP);

    // Frozen from the closed-form accelerations at the reference configuration
    assert!(approx_eq(next.theta1, 2.546414253851078, 1e-12), "theta1 = {}", next.theta1);
    assert!(approx_eq(next.theta2, -1.588448212727533, 1e-12), "theta2 = {}", next.theta2);
    assert!(approx_eq(next.omega1, 1.9884078587546146, 1e-12), "omega1 = {}", next.omega1);
    assert!(approx_eq(next.omega2, -1.059113155958192, 1e-12), "omega2 = {}", next.omega2);
}

#[test]
fn test_reference_accelerations() {
    let state = DynamicState::from(reference_initial_conditions());
    let (a1, a2) = compute_accelerations(&state, &undamped_params());

    assert!(approx_eq(a1, -0.695528474723124, 1e-12), "a1 = {}", a1);
    assert!(approx_eq(a2, -3.54678935749152, 1e-12), "a2 = {}", a2);
}

#[test]
fn test_hanging_at_rest_has_no_acceleration() {
    let state = DynamicState {
        theta1: 0.0,
        theta2: 0.0,
        omega1: 0.0,
        omega2: 0.0,
    };
    let (a1, a2) = compute_accelerations(&state, &PhysicalParameters::default());

    assert!(a1.abs() < 1e-12);
    assert!(a2.abs() < 1e-12);

    let next = step(state, &PhysicalParameters::default(), FIXED_STEP);
    assert_eq!(next, state, "equilibrium must stay put");
}

#[test]
fn test_velocity_update_precedes_position_update() {
    // Starting from rest, the angle only moves because the freshly updated
    // velocity is used for the position update.
    let params = undamped_params();
    let state = DynamicState {
        theta1: 0.5,
        theta2: 0.0,
        omega1: 0.0,
        omega2: 0.0,
    };
    let (a1, a2) = compute_accelerations(&state, &params);
    let next = step(state, &params, FIXED_STEP);

    assert!(approx_eq(next.omega1, a1 * FIXED_STEP, 1e-15));
    assert!(approx_eq(next.omega2, a2 * FIXED_STEP, 1e-15));
    assert!(approx_eq(next.theta1, 0.5 + a1 * FIXED_STEP * FIXED_STEP, 1e-15));
    assert!(approx_eq(next.theta2, a2 * FIXED_STEP * FIXED_STEP, 1e-15));
}

#[test]
fn test_damping_scales_velocities_after_position_update() {
    let undamped = undamped_params();
    let damped = PhysicalParameters {
        damping: 0.999,
        ..undamped
    };
    let state = DynamicState::from(reference_initial_conditions());

    let a = step(state, &undamped, FIXED_STEP);
    let b = step(state, &damped, FIXED_STEP);

    // Positions use the undamped velocity of this step
    assert_eq!(a.theta1, b.theta1);
    assert_eq!(a.theta2, b.theta2);
    assert!(approx_eq(b.omega1, a.omega1 * 0.999, 1e-15));
    assert!(approx_eq(b.omega2, a.omega2 * 0.999, 1e-15));
}

#[test]
fn test_step_is_pure() {
    let params = undamped_params();
    let state = DynamicState::from(reference_initial_conditions());
    let copy = state;

    let first = step(state, &params, FIXED_STEP);
    let second = step(state, &params, FIXED_STEP);

    assert_eq!(state, copy);
    assert_eq!(first, second);
}

#[test]
fn test_overflowing_velocity_yields_non_finite_state() {
    let state = DynamicState {
        theta1: 0.3,
        theta2: -0.2,
        omega1: 1e155,
        omega2: 0.0,
    };
    assert!(state.is_finite());

    let next = step(state, &undamped_params(), FIXED_STEP);
    assert!(!next.is_finite(), "omega^2 overflow should propagate");
}

#[test]
fn test_bob_positions_use_screen_convention() {
    let params = PhysicalParameters {
        l1: 100.0,
        l2: 50.0,
        ..PhysicalParameters::default()
    };
    let hanging = DynamicState {
        theta1: 0.0,
        theta2: 0.0,
        omega1: 0.0,
        omega2: 0.0,
    };
    let (first, second) = bob_positions(&hanging, &params);
    assert!(approx_eq(first.x, 0.0, 1e-12));
    assert!(approx_eq(first.y, 100.0, 1e-12));
    assert!(approx_eq(second.y, 150.0, 1e-12));

    let sideways = DynamicState {
        theta1: std::f64::consts::FRAC_PI_2,
        theta2: std::f64::consts::FRAC_PI_2,
        ..hanging
    };
    let (_, second) = bob_positions(&sideways, &params);
    assert!(approx_eq(second.x, 150.0, 1e-12));
    assert!(approx_eq(second.y, 0.0, 1e-9));
}
