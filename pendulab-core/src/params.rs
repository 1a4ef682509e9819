//! Typed configuration records for a double pendulum
//!
//! Every record validates itself; setters on `PendulumInstance` go through
//! the same checks so a bad value is rejected before anything is mutated.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const DEFAULT_TRAIL_LENGTH: usize = 1000;

/// Upper bound on simulated seconds per wall-clock second. Together with the
/// frame clamp this bounds the sub-steps a single frame can request.
pub const MAX_TIME_SCALE: f64 = 10.0;

pub fn validate_time_scale(value: f64) -> Result<(), SimError> {
    if value.is_finite() && (0.0..=MAX_TIME_SCALE).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidTimeScale(value))
    }
}

/// Masses, arm lengths, gravity and numerical damping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalParameters {
    pub m1: f64,
    pub m2: f64,
    pub l1: f64,
    pub l2: f64,
    pub g: f64,
    /// Per-step multiplicative velocity decay, in (0, 1]
    pub damping: f64,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            m1: 1.0,
            m2: 1.0,
            l1: 100.0,
            l2: 100.0,
            g: 9.81,
            damping: 1.0,
        }
    }
}

impl PhysicalParameters {
    pub fn get(&self, field: PhysicalField) -> f64 {
        match field {
            PhysicalField::M1 => self.m1,
            PhysicalField::M2 => self.m2,
            PhysicalField::L1 => self.l1,
            PhysicalField::L2 => self.l2,
            PhysicalField::G => self.g,
            PhysicalField::Damping => self.damping,
        }
    }

    /// Set a single field after validating it. Leaves `self` untouched on error.
    pub fn set(&mut self, field: PhysicalField, value: f64) -> Result<(), SimError> {
        field.validate(value)?;
        match field {
            PhysicalField::M1 => self.m1 = value,
            PhysicalField::M2 => self.m2 = value,
            PhysicalField::L1 => self.l1 = value,
            PhysicalField::L2 => self.l2 = value,
            PhysicalField::G => self.g = value,
            PhysicalField::Damping => self.damping = value,
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimError> {
        PhysicalField::ALL
            .iter()
            .try_for_each(|field| field.validate(self.get(*field)))
    }

    /// Reach of the terminal bob from the pivot
    pub fn reach(&self) -> f64 {
        self.l1 + self.l2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalField {
    M1,
    M2,
    L1,
    L2,
    G,
    Damping,
}

impl PhysicalField {
    pub const ALL: [PhysicalField; 6] = [
        PhysicalField::M1,
        PhysicalField::M2,
        PhysicalField::L1,
        PhysicalField::L2,
        PhysicalField::G,
        PhysicalField::Damping,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::M1 => "m1",
            Self::M2 => "m2",
            Self::L1 => "l1",
            Self::L2 => "l2",
            Self::G => "g",
            Self::Damping => "damping",
        }
    }

    /// Mass and length changes invalidate the trail and the energy baseline
    pub fn requires_reset(self) -> bool {
        matches!(self, Self::M1 | Self::M2 | Self::L1 | Self::L2)
    }

    pub fn validate(self, value: f64) -> Result<(), SimError> {
        match self {
            Self::M1 | Self::M2 | Self::L1 | Self::L2 => {
                if value.is_finite() && value > 0.0 {
                    Ok(())
                } else {
                    Err(SimError::invalid(self.name(), value, "a finite value > 0"))
                }
            }
            Self::G => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(SimError::invalid(self.name(), value, "a finite value"))
                }
            }
            Self::Damping => {
                if value > 0.0 && value <= 1.0 {
                    Ok(())
                } else {
                    Err(SimError::invalid(self.name(), value, "a value in (0, 1]"))
                }
            }
        }
    }
}

/// Reset target for the generalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub theta1: f64,
    pub theta2: f64,
    pub omega1: f64,
    pub omega2: f64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            theta1: PI * 0.8,
            theta2: -PI * 0.5,
            omega1: 2.0,
            omega2: -1.0,
        }
    }
}

impl InitialConditions {
    pub fn get(&self, field: InitialField) -> f64 {
        match field {
            InitialField::Theta1 => self.theta1,
            InitialField::Theta2 => self.theta2,
            InitialField::Omega1 => self.omega1,
            InitialField::Omega2 => self.omega2,
        }
    }

    pub fn set(&mut self, field: InitialField, value: f64) -> Result<(), SimError> {
        field.validate(value)?;
        match field {
            InitialField::Theta1 => self.theta1 = value,
            InitialField::Theta2 => self.theta2 = value,
            InitialField::Omega1 => self.omega1 = value,
            InitialField::Omega2 => self.omega2 = value,
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimError> {
        InitialField::ALL
            .iter()
            .try_for_each(|field| field.validate(self.get(*field)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitialField {
    Theta1,
    Theta2,
    Omega1,
    Omega2,
}

impl InitialField {
    pub const ALL: [InitialField; 4] = [
        InitialField::Theta1,
        InitialField::Theta2,
        InitialField::Omega1,
        InitialField::Omega2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Theta1 => "theta1",
            Self::Theta2 => "theta2",
            Self::Omega1 => "omega1",
            Self::Omega2 => "omega2",
        }
    }

    pub fn validate(self, value: f64) -> Result<(), SimError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(SimError::invalid(self.name(), value, "a finite value"))
        }
    }
}

/// Display settings shared across all instances of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationSettings {
    pub show_trail: bool,
    pub show_minimal: bool,
    pub show_energy: bool,
    pub show_phase_space: bool,
    pub trail_length: usize,
}

impl Default for VisualizationSettings {
    fn default() -> Self {
        Self {
            show_trail: true,
            show_minimal: false,
            show_energy: false,
            show_phase_space: false,
            trail_length: DEFAULT_TRAIL_LENGTH,
        }
    }
}
