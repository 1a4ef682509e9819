//! Test helper utilities for pendulab tests

use crate::params::{InitialConditions, PhysicalParameters};
use crate::pendulum::PendulumInstance;
use crate::render::{Canvas, PaintRole};
use glam::DVec2;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Relative deviation of `value` from `baseline`, falling back to the
/// absolute deviation when the baseline is (near) zero
pub fn relative_drift(baseline: f64, value: f64) -> f64 {
    if baseline.abs() > 1e-12 {
        (value - baseline).abs() / baseline.abs()
    } else {
        (value - baseline).abs()
    }
}

/// Build a reset pendulum from explicit parameters
pub fn pendulum_with(params: PhysicalParameters, initial: InitialConditions) -> PendulumInstance {
    PendulumInstance::with_config(params, initial).expect("test parameters should be valid")
}

/// Undamped unit-mass pendulum with 100-unit arms
pub fn undamped_params() -> PhysicalParameters {
    PhysicalParameters {
        damping: 1.0,
        ..PhysicalParameters::default()
    }
}

/// The reference configuration used by golden tests
pub fn reference_initial_conditions() -> InitialConditions {
    InitialConditions {
        theta1: 0.8 * std::f64::consts::PI,
        theta2: -0.5 * std::f64::consts::PI,
        omega1: 2.0,
        omega2: -1.0,
    }
}

/// A drawing command captured by `RecordingCanvas`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline {
        points: Vec<DVec2>,
        color: PaintRole,
    },
    Line {
        from: DVec2,
        to: DVec2,
        color: PaintRole,
    },
    Circle {
        center: DVec2,
        diameter: f64,
        color: PaintRole,
    },
}

/// Canvas that records what would have been drawn. Colours are the paint
/// roles themselves so tests can tell defaults from hints.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn polylines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    type Color = PaintRole;

    fn palette(&self, role: PaintRole) -> PaintRole {
        role
    }

    fn polyline(&mut self, points: &[DVec2], color: PaintRole, _width: f32) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
    }

    fn line(&mut self, from: DVec2, to: DVec2, color: PaintRole, _width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn circle(&mut self, center: DVec2, diameter: f64, color: PaintRole) {
        self.commands.push(DrawCommand::Circle {
            center,
            diameter,
            color,
        });
    }
}

/// A small scenario used across scenario and runtime tests
pub const TWO_PENDULUM_SCENARIO: &str = r#"
(
    seed: Some(42),
    start_running: true,
    pendulums: [
        (
            physical: (m1: 1.0, m2: 1.0, l1: 100.0, l2: 100.0, g: 9.81, damping: 1.0),
            initial: (theta1: 1.2, theta2: 0.8, omega1: 0.0, omega2: 0.0),
            visualization: (show_trail: true, show_energy: true, trail_length: 200),
        ),
        (
            physical: (m1: 2.0, l2: 60.0),
            time_scale: 2.0,
        ),
    ],
)
"#;
