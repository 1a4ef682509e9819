use crate::analyzer::analyze_scenario;
use crate::diagnostics::Diagnostics;
use crate::error::ScenarioError;
use crate::manager::SimulationManager;
use crate::pendulum::{Lifecycle, StateSnapshot};
use crate::scenario::{parse_scenario, Scenario};

/// Final state of one pendulum after a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumReport {
    pub index: usize,
    pub lifecycle: Lifecycle,
    pub snapshot: StateSnapshot,
    pub trail_points: usize,
    pub energy_samples: usize,
}

/// Result of running a scenario without a window
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub frames: usize,
    pub substeps: usize,
    pub pendulums: Vec<PendulumReport>,
    /// Indices of pendulums that went degenerate, in the order it happened
    pub degenerate: Vec<usize>,
}

/// Parse and analyze a scenario; fails if the analyzer reports any error
pub fn load_scenario(source: &str) -> Result<(Scenario, Diagnostics), ScenarioError> {
    let scenario = parse_scenario(source)?;
    let diagnostics = analyze_scenario(&scenario);
    if diagnostics.has_errors() {
        return Err(ScenarioError::Invalid(diagnostics));
    }
    Ok((scenario, diagnostics))
}

/// Build a manager straight from scenario source
pub fn build_manager_from_source(
    source: &str,
) -> Result<(SimulationManager, Diagnostics), ScenarioError> {
    let (scenario, diagnostics) = load_scenario(source)?;
    let manager = scenario.build_manager()?;
    Ok((manager, diagnostics))
}

/// Main entry point: build the scenario, start every pendulum and run
/// `frames` host frames of `frame_dt` seconds each
pub fn run_scenario(source: &str, frames: usize, frame_dt: f64) -> Result<RunResult, ScenarioError> {
    let (mut manager, diagnostics) = build_manager_from_source(source)?;
    for diagnostic in diagnostics.iter() {
        tracing::warn!(%diagnostic, "scenario diagnostic");
    }
    manager.start_all();
    Ok(run_frames(&mut manager, frames, frame_dt))
}

/// Drive an existing manager for a number of frames
pub fn run_frames(manager: &mut SimulationManager, frames: usize, frame_dt: f64) -> RunResult {
    let mut substeps = 0;
    let mut degenerate = Vec::new();

    for _ in 0..frames {
        let report = manager.step_all(frame_dt);
        substeps += report.substeps;
        degenerate.extend(report.degenerate);
    }

    let pendulums = manager
        .instances()
        .iter()
        .enumerate()
        .map(|(index, pendulum)| PendulumReport {
            index,
            lifecycle: pendulum.lifecycle(),
            snapshot: pendulum.current_state(),
            trail_points: pendulum.trail().len(),
            energy_samples: pendulum.energy_history().len(),
        })
        .collect();

    RunResult {
        frames,
        substeps,
        pendulums,
        degenerate,
    }
}
