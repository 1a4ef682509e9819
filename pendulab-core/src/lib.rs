pub mod analyzer;
pub mod diagnostics;
pub mod energy;
pub mod engine;
pub mod error;
pub mod history;
pub mod integrator;
pub mod manager;
pub mod params;
pub mod pendulum;
pub mod render;
pub mod runtime;
pub mod scenario;
pub mod trail;

pub use analyzer::analyze_scenario;
pub use diagnostics::{format_scenario_error, Diagnostic, DiagnosticSeverity, Diagnostics};
pub use energy::{compute_energy, EnergySample, EnergyTracker};
pub use engine::DynamicState;
pub use error::{ScenarioError, SimError};
pub use manager::{FrameReport, ManagerConfig, SimulationManager, MAX_INSTANCES};
pub use params::{
    InitialConditions, InitialField, PhysicalField, PhysicalParameters, VisualizationSettings,
    MAX_TIME_SCALE,
};
pub use pendulum::{Lifecycle, PendulumInstance, StateSnapshot, StepOutcome};
pub use render::{Canvas, Drawable, PaintRole};
pub use runtime::{
    build_manager_from_source, load_scenario, run_frames, run_scenario, PendulumReport, RunResult,
};
pub use scenario::{parse_scenario, PendulumSpec, Scenario};
pub use trail::{TrailBuffer, TrailPoint};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
