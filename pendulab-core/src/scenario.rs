//! Scenario files
//!
//! A scenario is a RON document describing the pendulums a simulation starts
//! with. Every field is optional:
//!
//! ```text
//! (
//!     seed: Some(7),
//!     start_running: true,
//!     pendulums: [
//!         (
//!             physical: (m1: 1.0, m2: 2.0, l1: 120.0, l2: 80.0),
//!             initial: (theta1: 1.2, theta2: -0.4, omega1: 0.0, omega2: 0.0),
//!             visualization: (show_energy: true, trail_length: 500),
//!         ),
//!         (time_scale: 2.0),
//!     ],
//! )
//! ```
//!
//! Pendulums without `initial` get randomized initial conditions. Pendulums
//! after the first without `visualization` inherit the first one's settings.

use crate::error::ScenarioError;
use crate::manager::{ManagerConfig, SimulationManager, DEFAULT_FIXED_STEP, DEFAULT_MAX_FRAME_DELTA};
use crate::params::{InitialConditions, PhysicalParameters, VisualizationSettings};
use crate::pendulum::PendulumInstance;
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub seed: Option<u64>,
    pub fixed_step: f64,
    pub max_frame_delta: f64,
    pub start_running: bool,
    pub pendulums: Vec<PendulumSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            seed: None,
            fixed_step: DEFAULT_FIXED_STEP,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            start_running: false,
            pendulums: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumSpec {
    pub physical: PhysicalParameters,
    pub initial: Option<InitialConditions>,
    pub time_scale: f64,
    pub visualization: Option<VisualizationSettings>,
}

impl Default for PendulumSpec {
    fn default() -> Self {
        Self {
            physical: PhysicalParameters::default(),
            initial: None,
            time_scale: 1.0,
            visualization: None,
        }
    }
}

/// Parse a scenario from RON source. Option fields may omit `Some(..)`.
pub fn parse_scenario(source: &str) -> Result<Scenario, ScenarioError> {
    let scenario = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(source)?;
    Ok(scenario)
}

impl Scenario {
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            fixed_step: self.fixed_step,
            max_frame_delta: self.max_frame_delta,
            seed: self.seed,
        }
    }

    /// Build a manager holding the declared pendulums
    ///
    /// Run `analyze_scenario` first to get every problem at once; this only
    /// reports the first one it hits.
    pub fn build_manager(&self) -> Result<SimulationManager, ScenarioError> {
        let mut manager = SimulationManager::new(self.manager_config())?;

        for (index, spec) in self.pendulums.iter().enumerate() {
            let slot = if index == 0 { 0 } else { manager.add_instance()? };
            if let Some(pendulum) = manager.instance_mut(slot) {
                configure(pendulum, spec)?;
            }
        }

        if self.start_running {
            manager.start_all();
        }
        tracing::debug!(
            pendulums = manager.len(),
            running = self.start_running,
            "built simulation from scenario"
        );
        Ok(manager)
    }
}

fn configure(pendulum: &mut PendulumInstance, spec: &PendulumSpec) -> Result<(), ScenarioError> {
    pendulum.set_physical_parameters(spec.physical)?;
    if let Some(initial) = spec.initial {
        pendulum.set_initial_conditions(initial)?;
    }
    pendulum.set_time_scale(spec.time_scale)?;
    if let Some(settings) = spec.visualization {
        pendulum.apply_visualization(settings)?;
    }
    Ok(())
}
