//! Energy bookkeeping for a double pendulum.
//!
//! Heights are measured from the pivot, so the potential energy of a hanging
//! pendulum is negative. The history is only fed while the energy display is
//! enabled.

use crate::engine::{bob_velocities, DynamicState};
use crate::history::BoundedHistory;
use crate::params::PhysicalParameters;

/// Kinetic and potential energy at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySample {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergySample {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

pub fn compute_energy(state: &DynamicState, params: &PhysicalParameters) -> EnergySample {
    let PhysicalParameters { m1, m2, l1, l2, g, .. } = *params;
    let (v1, v2) = bob_velocities(state, params);

    let kinetic = 0.5 * m1 * v1.length_squared() + 0.5 * m2 * v2.length_squared();

    let h1 = -l1 * state.theta1.cos();
    let h2 = -l1 * state.theta1.cos() - l2 * state.theta2.cos();
    let potential = m1 * g * h1 + m2 * g * h2;

    EnergySample { kinetic, potential }
}

#[derive(Debug, Clone)]
pub struct EnergyTracker {
    history: BoundedHistory<EnergySample>,
}

impl EnergyTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: BoundedHistory::new(capacity),
        }
    }

    /// Computes a sample for the given state and appends it
    pub fn record(&mut self, state: &DynamicState, params: &PhysicalParameters) -> EnergySample {
        let sample = compute_energy(state, params);
        self.history.push(sample);
        sample
    }

    /// Records a sample only when the history has none yet
    pub fn seed_if_empty(&mut self, state: &DynamicState, params: &PhysicalParameters) {
        if self.history.is_empty() {
            self.record(state, params);
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest(&self) -> Option<&EnergySample> {
        self.history.latest()
    }

    pub fn samples(&self) -> impl DoubleEndedIterator<Item = &EnergySample> + ExactSizeIterator {
        self.history.iter()
    }
}
