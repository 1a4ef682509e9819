//! Orchestration of several concurrently simulated pendulums
//!
//! The host calls `step_all` once per display frame with the wall-clock delta.
//! Each running instance then performs `ceil(wall_dt · time_scale / fixed_step)`
//! integration steps of exactly `fixed_step` seconds, so the integrator sees the
//! same step size regardless of frame jitter.

use crate::error::SimError;
use crate::params::{validate_time_scale, InitialConditions, VisualizationSettings};
use crate::pendulum::{PendulumInstance, StepOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

pub const MAX_INSTANCES: usize = 9;
pub const DEFAULT_FIXED_STEP: f64 = 1.0 / 60.0;
pub const DEFAULT_MAX_FRAME_DELTA: f64 = 0.25;

// Absorbs rounding in wall_dt·time_scale/fixed_step so an exact multiple of the
// fixed step does not round up to an extra sub-step.
const SUBSTEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerConfig {
    pub fixed_step: f64,
    /// Upper bound on the wall-clock delta consumed by one frame
    pub max_frame_delta: f64,
    /// Seed for randomized initial conditions; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            seed: None,
        }
    }
}

impl ManagerConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(SimError::invalid(
                "fixed_step",
                self.fixed_step,
                "a finite value > 0",
            ));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(SimError::invalid(
                "max_frame_delta",
                self.max_frame_delta,
                "a finite value > 0",
            ));
        }
        Ok(())
    }
}

/// Summary of one `step_all` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Integration steps performed across all instances
    pub substeps: usize,
    /// Indices of instances that became degenerate during this frame
    pub degenerate: Vec<usize>,
}

/// Number of fixed steps needed to cover `wall_dt` at the given time scale
pub fn substeps_for(wall_dt: f64, time_scale: f64, fixed_step: f64) -> usize {
    let steps = wall_dt * time_scale / fixed_step;
    if !steps.is_finite() || steps <= 0.0 {
        return 0;
    }
    (steps - SUBSTEP_EPSILON).ceil().max(0.0) as usize
}

#[derive(Debug)]
pub struct SimulationManager {
    config: ManagerConfig,
    instances: Vec<PendulumInstance>,
    rng: StdRng,
}

impl Default for SimulationManager {
    fn default() -> Self {
        let mut manager = Self::empty(ManagerConfig::default());
        let pendulum = manager.spawn_randomized();
        manager.instances.push(pendulum);
        manager
    }
}

impl SimulationManager {
    /// Creates a manager holding one pendulum with randomized initial conditions
    pub fn new(config: ManagerConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut manager = Self::empty(config);
        let pendulum = manager.spawn_randomized();
        manager.instances.push(pendulum);
        Ok(manager)
    }

    /// Creates a manager around an explicit set of instances
    pub fn with_instances(
        config: ManagerConfig,
        instances: Vec<PendulumInstance>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        if instances.is_empty() || instances.len() > MAX_INSTANCES {
            return Err(SimError::InstanceCount {
                max: MAX_INSTANCES,
                actual: instances.len(),
            });
        }
        let mut manager = Self::empty(config);
        manager.instances = instances;
        Ok(manager)
    }

    fn empty(config: ManagerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            instances: Vec::with_capacity(MAX_INSTANCES),
            rng,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn instances(&self) -> &[PendulumInstance] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> Option<&PendulumInstance> {
        self.instances.get(index)
    }

    pub fn instance_mut(&mut self, index: usize) -> Option<&mut PendulumInstance> {
        self.instances.get_mut(index)
    }

    /// The first instance; it always exists and is the source of shared settings
    pub fn primary(&self) -> &PendulumInstance {
        &self.instances[0]
    }

    pub fn primary_mut(&mut self) -> &mut PendulumInstance {
        &mut self.instances[0]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn can_add(&self) -> bool {
        self.instances.len() < MAX_INSTANCES
    }

    pub fn can_remove(&self) -> bool {
        self.instances.len() > 1
    }

    pub fn any_running(&self) -> bool {
        self.instances.iter().any(PendulumInstance::is_running)
    }

    fn random_initial_conditions(&mut self) -> InitialConditions {
        InitialConditions {
            theta1: (self.rng.gen::<f64>() - 0.5) * PI,
            theta2: (self.rng.gen::<f64>() - 0.5) * PI,
            omega1: (self.rng.gen::<f64>() - 0.5) * 2.0,
            omega2: (self.rng.gen::<f64>() - 0.5) * 2.0,
        }
    }

    fn spawn_randomized(&mut self) -> PendulumInstance {
        let mut pendulum = PendulumInstance::new();
        pendulum.replace_initial_conditions(self.random_initial_conditions());
        pendulum
    }

    /// Adds a pendulum with randomized initial conditions and returns its index
    ///
    /// The new pendulum copies the display settings and time scale of the first
    /// one and is started right away if any existing pendulum is running.
    pub fn add_instance(&mut self) -> Result<usize, SimError> {
        if !self.can_add() {
            return Err(SimError::InstanceLimit { max: MAX_INSTANCES });
        }

        let template = self
            .instances
            .first()
            .map(|first| (first.visualization(), first.time_scale()));
        let mut pendulum = self.spawn_randomized();
        if let Some((settings, time_scale)) = template {
            pendulum.apply_visualization(settings)?;
            pendulum.set_time_scale(time_scale)?;
        }
        if self.any_running() {
            pendulum.start();
        }

        self.instances.push(pendulum);
        let index = self.instances.len() - 1;
        tracing::debug!(index, count = self.instances.len(), "added pendulum");
        Ok(index)
    }

    /// Pushes a fully configured pendulum, subject to the instance limit
    pub fn push_instance(&mut self, pendulum: PendulumInstance) -> Result<usize, SimError> {
        if !self.can_add() {
            return Err(SimError::InstanceLimit { max: MAX_INSTANCES });
        }
        self.instances.push(pendulum);
        Ok(self.instances.len() - 1)
    }

    /// Removes the most recently added pendulum; never drops below one
    pub fn remove_instance(&mut self) -> Option<PendulumInstance> {
        if !self.can_remove() {
            return None;
        }
        let removed = self.instances.pop();
        tracing::debug!(count = self.instances.len(), "removed pendulum");
        removed
    }

    /// Copies the display settings of instance `source` to every instance
    pub fn broadcast_visualization(&mut self, source: usize) -> Result<(), SimError> {
        let settings = self
            .instances
            .get(source)
            .map(PendulumInstance::visualization)
            .ok_or(SimError::NoSuchInstance(source))?;
        self.apply_visualization(settings)
    }

    pub fn apply_visualization(&mut self, settings: VisualizationSettings) -> Result<(), SimError> {
        if settings.trail_length == 0 {
            return Err(SimError::InvalidTrailLength(0));
        }
        for pendulum in &mut self.instances {
            pendulum.apply_visualization(settings)?;
        }
        Ok(())
    }

    pub fn set_time_scale_all(&mut self, value: f64) -> Result<(), SimError> {
        validate_time_scale(value)?;
        for pendulum in &mut self.instances {
            pendulum.set_time_scale(value)?;
        }
        Ok(())
    }

    pub fn start_all(&mut self) {
        self.instances.iter_mut().for_each(PendulumInstance::start);
    }

    pub fn stop_all(&mut self) {
        self.instances.iter_mut().for_each(PendulumInstance::stop);
    }

    pub fn reset_all(&mut self) {
        self.instances.iter_mut().for_each(PendulumInstance::reset);
    }

    /// Advance every running pendulum by one host frame of `wall_dt` seconds
    pub fn step_all(&mut self, wall_dt: f64) -> FrameReport {
        let wall_dt = if wall_dt.is_finite() {
            wall_dt.clamp(0.0, self.config.max_frame_delta)
        } else {
            0.0
        };
        let fixed_step = self.config.fixed_step;
        let mut report = FrameReport::default();

        for (index, pendulum) in self.instances.iter_mut().enumerate() {
            if !pendulum.is_running() {
                continue;
            }
            let steps = substeps_for(wall_dt, pendulum.time_scale(), fixed_step);
            for _ in 0..steps {
                match pendulum.update(fixed_step) {
                    StepOutcome::Advanced => report.substeps += 1,
                    StepOutcome::Degenerate => {
                        report.degenerate.push(index);
                        break;
                    }
                    StepOutcome::Skipped => break,
                }
            }
        }

        tracing::trace!(
            wall_dt,
            substeps = report.substeps,
            degenerate = report.degenerate.len(),
            "frame stepped"
        );
        report
    }
}
