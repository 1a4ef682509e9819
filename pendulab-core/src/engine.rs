use crate::params::{InitialConditions, PhysicalParameters};
use glam::DVec2;

/// Generalized coordinates of the two-link pendulum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicState {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl DynamicState {
    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.theta2.is_finite()
            && self.omega1.is_finite()
            && self.omega2.is_finite()
    }
}

impl From<InitialConditions> for DynamicState {
    fn from(ic: InitialConditions) -> Self {
        Self {
            theta1: ic.theta1,
            theta2: ic.theta2,
            omega1: ic.omega1,
            omega2: ic.omega2,
        }
    }
}

impl PartialEq<InitialConditions> for DynamicState {
    fn eq(&self, other: &InitialConditions) -> bool {
        *self == DynamicState::from(*other)
    }
}

/// Angular accelerations from the Lagrangian equations of motion
///
/// Both equations share the denominator `2m1 + m2 - m2·cos(2θ1 - 2θ2)`,
/// scaled by the length of the respective arm.
pub fn compute_accelerations(state: &DynamicState, params: &PhysicalParameters) -> (f64, f64) {
    let PhysicalParameters { m1, m2, l1, l2, g, .. } = *params;
    let DynamicState {
        theta1,
        theta2,
        omega1,
        omega2,
    } = *state;

    let delta = theta1 - theta2;
    let shared = 2.0 * m1 + m2 - m2 * (2.0 * theta1 - 2.0 * theta2).cos();

    let num1 = -g * (2.0 * m1 + m2) * theta1.sin();
    let num2 = -m2 * g * (theta1 - 2.0 * theta2).sin();
    let num3 = -2.0 * delta.sin() * m2;
    let num4 = omega2 * omega2 * l2 + omega1 * omega1 * l1 * delta.cos();
    let theta1_acc = (num1 + num2 + num3 * num4) / (l1 * shared);

    let num5 = 2.0 * delta.sin();
    let num6 = omega1 * omega1 * l1 * (m1 + m2);
    let num7 = g * (m1 + m2) * theta1.cos();
    let num8 = omega2 * omega2 * l2 * m2 * delta.cos();
    let theta2_acc = (num5 * (num6 + num7 + num8)) / (l2 * shared);

    (theta1_acc, theta2_acc)
}

/// Cartesian positions of both bobs relative to the pivot
///
/// Screen convention: y grows downward, so a hanging pendulum has positive y.
pub fn bob_positions(state: &DynamicState, params: &PhysicalParameters) -> (DVec2, DVec2) {
    let first = DVec2::new(
        params.l1 * state.theta1.sin(),
        params.l1 * state.theta1.cos(),
    );
    let second = first
        + DVec2::new(
            params.l2 * state.theta2.sin(),
            params.l2 * state.theta2.cos(),
        );
    (first, second)
}

/// Full vector velocities of both bobs
pub fn bob_velocities(state: &DynamicState, params: &PhysicalParameters) -> (DVec2, DVec2) {
    let v1 = DVec2::new(
        params.l1 * state.omega1 * state.theta1.cos(),
        params.l1 * state.omega1 * state.theta1.sin(),
    );
    let v2 = v1
        + DVec2::new(
            params.l2 * state.omega2 * state.theta2.cos(),
            params.l2 * state.omega2 * state.theta2.sin(),
        );
    (v1, v2)
}
