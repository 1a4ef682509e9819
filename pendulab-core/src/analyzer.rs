//! Static checks for scenarios
//!
//! This module validates a parsed scenario before any pendulum is built and
//! reports every problem found instead of stopping at the first.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::manager::MAX_INSTANCES;
use crate::params::{validate_time_scale, InitialField, PhysicalField};
use crate::scenario::{PendulumSpec, Scenario};

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    if !(scenario.fixed_step.is_finite() && scenario.fixed_step > 0.0) {
        diagnostics.push(Diagnostic::error(
            format!("fixed_step must be finite and positive, got {}", scenario.fixed_step),
            Some("fixed_step".to_string()),
        ));
    }
    if !(scenario.max_frame_delta.is_finite() && scenario.max_frame_delta > 0.0) {
        diagnostics.push(Diagnostic::error(
            format!(
                "max_frame_delta must be finite and positive, got {}",
                scenario.max_frame_delta
            ),
            Some("max_frame_delta".to_string()),
        ));
    }

    if scenario.pendulums.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "no pendulums declared; one randomized pendulum will be created",
            Some("pendulums".to_string()),
        ));
    } else if scenario.pendulums.len() > MAX_INSTANCES {
        diagnostics.push(Diagnostic::error(
            format!(
                "{} pendulums declared but at most {} are supported",
                scenario.pendulums.len(),
                MAX_INSTANCES
            ),
            Some("pendulums".to_string()),
        ));
    }

    for (idx, spec) in scenario.pendulums.iter().enumerate() {
        diagnostics.extend(check_pendulum(idx, spec));
    }

    diagnostics
}

fn check_pendulum(idx: usize, spec: &PendulumSpec) -> Diagnostics {
    let mut diagnostics = Vec::new();
    let base = format!("pendulums[{}]", idx);

    for field in PhysicalField::ALL {
        if let Err(err) = field.validate(spec.physical.get(field)) {
            diagnostics.push(Diagnostic::error(
                err.to_string(),
                Some(format!("{}.physical.{}", base, field.name())),
            ));
        }
    }

    if let Some(initial) = &spec.initial {
        for field in InitialField::ALL {
            if let Err(err) = field.validate(initial.get(field)) {
                diagnostics.push(Diagnostic::error(
                    err.to_string(),
                    Some(format!("{}.initial.{}", base, field.name())),
                ));
            }
        }
    }

    if let Err(err) = validate_time_scale(spec.time_scale) {
        diagnostics.push(Diagnostic::error(
            err.to_string(),
            Some(format!("{}.time_scale", base)),
        ));
    } else if spec.time_scale == 0.0 {
        diagnostics.push(Diagnostic::warning(
            "time_scale is 0; this pendulum will never advance",
            Some(format!("{}.time_scale", base)),
        ));
    }

    if let Some(settings) = &spec.visualization {
        if settings.trail_length == 0 {
            diagnostics.push(Diagnostic::error(
                "trail_length must be positive",
                Some(format!("{}.visualization.trail_length", base)),
            ));
        }
        if idx > 0 {
            diagnostics.push(Diagnostic::warning(
                "visualization settings are shared; the first pendulum's settings are broadcast when changed in the viewer",
                Some(format!("{}.visualization", base)),
            ));
        }
    }

    diagnostics.into()
}
