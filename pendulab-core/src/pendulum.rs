//! A single simulated double pendulum
//!
//! `PendulumInstance` owns its parameters, its dynamic state, the display
//! settings and both bounded histories. The lifecycle is a small state
//! machine:
//!
//! - `Idle` → `start()` → `Running` (state reseeded from the initial conditions)
//! - `Running` → `stop()` → `Idle`
//! - any → `reset()` → `Idle`
//! - `Running` → non-finite step → `Degenerate` (last finite state kept)
//!
//! `start()` on a running instance leaves the state untouched.

use crate::energy::{compute_energy, EnergySample, EnergyTracker};
use crate::engine::DynamicState;
use crate::error::SimError;
use crate::integrator;
use crate::params::{
    validate_time_scale, InitialConditions, InitialField, PhysicalField, PhysicalParameters,
    VisualizationSettings,
};
use crate::trail::TrailBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    /// A step produced non-finite coordinates; stepping is halted until reset or restart
    Degenerate,
}

/// What a call to `update` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Skipped,
    Advanced,
    Degenerate,
}

/// Read-only view of an instance for UI display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub state: DynamicState,
    pub energy: EnergySample,
}

#[derive(Debug, Clone)]
pub struct PendulumInstance {
    params: PhysicalParameters,
    initial: InitialConditions,
    state: DynamicState,
    lifecycle: Lifecycle,
    visualization: VisualizationSettings,
    time_scale: f64,
    energy: EnergyTracker,
    trail: TrailBuffer,
}

impl Default for PendulumInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl PendulumInstance {
    /// Creates an instance with default parameters, already reset
    pub fn new() -> Self {
        let initial = InitialConditions::default();
        let visualization = VisualizationSettings::default();
        let mut pendulum = Self {
            params: PhysicalParameters::default(),
            initial,
            state: initial.into(),
            lifecycle: Lifecycle::Idle,
            visualization,
            time_scale: 1.0,
            energy: EnergyTracker::new(visualization.trail_length),
            trail: TrailBuffer::new(visualization.trail_length),
        };
        pendulum.init();
        pendulum
    }

    pub fn with_config(
        params: PhysicalParameters,
        initial: InitialConditions,
    ) -> Result<Self, SimError> {
        params.validate()?;
        initial.validate()?;
        let mut pendulum = Self::new();
        pendulum.params = params;
        pendulum.initial = initial;
        pendulum.init();
        Ok(pendulum)
    }

    pub fn init(&mut self) {
        self.reset();
    }

    pub fn physical_parameters(&self) -> &PhysicalParameters {
        &self.params
    }

    pub fn initial_conditions(&self) -> &InitialConditions {
        &self.initial
    }

    pub fn state(&self) -> &DynamicState {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn is_degenerate(&self) -> bool {
        self.lifecycle == Lifecycle::Degenerate
    }

    pub fn visualization(&self) -> VisualizationSettings {
        self.visualization
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn energy_history(&self) -> &EnergyTracker {
        &self.energy
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            self.state = self.initial.into();
            self.lifecycle = Lifecycle::Running;
            tracing::debug!("pendulum started");
        }
        self.energy.seed_if_empty(&self.state, &self.params);
    }

    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::Idle;
            tracing::debug!("pendulum stopped");
        }
        self.energy.seed_if_empty(&self.state, &self.params);
    }

    pub fn reset(&mut self) {
        self.state = self.initial.into();
        self.trail.clear();
        self.energy.clear();
        self.lifecycle = Lifecycle::Idle;

        self.energy.record(&self.state, &self.params);
        if self.visualization.show_trail {
            self.trail.record(&self.state, &self.params);
        }
    }

    /// Advance one integration step of `dt` seconds
    pub fn update(&mut self, dt: f64) -> StepOutcome {
        if self.lifecycle != Lifecycle::Running {
            return StepOutcome::Skipped;
        }
        if !(dt.is_finite() && dt > 0.0) {
            tracing::warn!(dt, "ignoring update with invalid timestep");
            return StepOutcome::Skipped;
        }

        let next = integrator::step(self.state, &self.params, dt);
        if !next.is_finite() {
            tracing::warn!(
                theta1 = self.state.theta1,
                theta2 = self.state.theta2,
                omega1 = self.state.omega1,
                omega2 = self.state.omega2,
                "integration produced non-finite state, halting pendulum"
            );
            self.lifecycle = Lifecycle::Degenerate;
            return StepOutcome::Degenerate;
        }
        self.state = next;

        if self.visualization.show_trail {
            self.trail.record(&self.state, &self.params);
        }
        if self.visualization.show_energy {
            self.energy.record(&self.state, &self.params);
        }

        StepOutcome::Advanced
    }

    pub fn current_state(&self) -> StateSnapshot {
        StateSnapshot {
            state: self.state,
            energy: compute_energy(&self.state, &self.params),
        }
    }

    // ------------------------------------------------------------------
    // Mutation API
    // ------------------------------------------------------------------

    pub fn set_time_scale(&mut self, value: f64) -> Result<(), SimError> {
        validate_time_scale(value)?;
        self.time_scale = value;
        Ok(())
    }

    /// Changing an initial condition always snaps the instance back to it
    pub fn set_initial_condition(&mut self, field: InitialField, value: f64) -> Result<(), SimError> {
        self.initial.set(field, value)?;
        self.reset();
        Ok(())
    }

    pub fn set_initial_conditions(&mut self, initial: InitialConditions) -> Result<(), SimError> {
        initial.validate()?;
        self.initial = initial;
        self.reset();
        Ok(())
    }

    /// Caller guarantees all four values are finite
    pub(crate) fn replace_initial_conditions(&mut self, initial: InitialConditions) {
        self.initial = initial;
        self.reset();
    }

    /// Masses and lengths reset the instance; gravity and damping apply live
    pub fn set_physical_parameter(
        &mut self,
        field: PhysicalField,
        value: f64,
    ) -> Result<(), SimError> {
        self.params.set(field, value)?;
        if field.requires_reset() {
            self.reset();
        }
        Ok(())
    }

    /// Replace every physical parameter at once; always resets
    pub fn set_physical_parameters(&mut self, params: PhysicalParameters) -> Result<(), SimError> {
        params.validate()?;
        self.params = params;
        self.reset();
        Ok(())
    }

    pub fn set_trail_length(&mut self, value: usize) -> Result<(), SimError> {
        if value == 0 {
            return Err(SimError::InvalidTrailLength(value));
        }
        self.visualization.trail_length = value;
        self.trail.set_capacity(value);
        self.energy.set_capacity(value);
        Ok(())
    }

    pub fn set_show_trail(&mut self, show: bool) {
        if self.visualization.show_trail == show {
            return;
        }
        self.visualization.show_trail = show;
        if show {
            self.trail.record(&self.state, &self.params);
        } else {
            // no stale geometry once hidden
            self.trail.clear();
        }
    }

    pub fn set_show_energy(&mut self, show: bool) {
        self.visualization.show_energy = show;
        if show {
            self.energy.seed_if_empty(&self.state, &self.params);
        }
    }

    pub fn set_show_minimal(&mut self, show: bool) {
        self.visualization.show_minimal = show;
    }

    pub fn set_show_phase_space(&mut self, show: bool) {
        self.visualization.show_phase_space = show;
    }

    pub fn toggle_trail(&mut self) -> bool {
        self.set_show_trail(!self.visualization.show_trail);
        self.visualization.show_trail
    }

    pub fn toggle_energy(&mut self) -> bool {
        self.set_show_energy(!self.visualization.show_energy);
        self.visualization.show_energy
    }

    pub fn toggle_minimal(&mut self) -> bool {
        self.set_show_minimal(!self.visualization.show_minimal);
        self.visualization.show_minimal
    }

    pub fn toggle_phase_space(&mut self) -> bool {
        self.set_show_phase_space(!self.visualization.show_phase_space);
        self.visualization.show_phase_space
    }

    /// Apply all display settings at once, with the same semantics as the
    /// individual setters
    pub fn apply_visualization(&mut self, settings: VisualizationSettings) -> Result<(), SimError> {
        self.set_trail_length(settings.trail_length)?;
        self.set_show_trail(settings.show_trail);
        self.set_show_energy(settings.show_energy);
        self.set_show_minimal(settings.show_minimal);
        self.set_show_phase_space(settings.show_phase_space);
        Ok(())
    }
}
