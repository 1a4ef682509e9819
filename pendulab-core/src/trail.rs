use crate::engine::{bob_positions, DynamicState};
use crate::history::BoundedHistory;
use crate::params::PhysicalParameters;
use glam::DVec2;

/// Position of the terminal bob relative to the pivot (y grows downward)
pub type TrailPoint = DVec2;

/// Recent path of the terminal bob. Rendering only, never read by physics.
#[derive(Debug, Clone)]
pub struct TrailBuffer {
    points: BoundedHistory<TrailPoint>,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: BoundedHistory::new(capacity),
        }
    }

    pub fn record(&mut self, state: &DynamicState, params: &PhysicalParameters) {
        let (_, second) = bob_positions(state, params);
        self.points.push(second);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.points.set_capacity(capacity);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&TrailPoint> {
        self.points.latest()
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = &TrailPoint> + ExactSizeIterator {
        self.points.iter()
    }
}
