use crate::engine::{compute_accelerations, DynamicState};
use crate::params::PhysicalParameters;

/// Step the pendulum forward by dt using semi-implicit Euler integration
///
/// Velocities are updated from the accelerations at the current state, then
/// angles advance with the new velocities, then damping scales the velocities.
/// The result may be non-finite; callers decide what to do with it.
pub fn step(state: DynamicState, params: &PhysicalParameters, dt: f64) -> DynamicState {
    let (theta1_acc, theta2_acc) = compute_accelerations(&state, params);

    let mut next = state;
    next.omega1 += theta1_acc * dt;
    next.omega2 += theta2_acc * dt;
    next.theta1 += next.omega1 * dt;
    next.theta2 += next.omega2 * dt;

    next.omega1 *= params.damping;
    next.omega2 *= params.damping;

    next
}
