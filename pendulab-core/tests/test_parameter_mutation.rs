//! Mutation API: validation, selective reset, toggles

use pendulab_core::error::SimError;
use pendulab_core::params::{InitialField, PhysicalField, PhysicalParameters, VisualizationSettings};
use pendulab_core::pendulum::PendulumInstance;

const FIXED_STEP: f64 = 1.0 / 60.0;

fn running_pendulum(steps: usize) -> PendulumInstance {
    let mut pendulum = PendulumInstance::new();
    pendulum.start();
    for _ in 0..steps {
        pendulum.update(FIXED_STEP);
    }
    pendulum
}

#[test]
fn test_damping_and_gravity_apply_live() {
    for (field, value) in [(PhysicalField::Damping, 0.9995), (PhysicalField::G, 3.7)] {
        let mut pendulum = running_pendulum(40);
        let state = *pendulum.state();
        let trail = pendulum.trail().len();

        pendulum.set_physical_parameter(field, value).unwrap();

        assert_eq!(*pendulum.state(), state, "{:?} must not reset", field);
        assert_eq!(pendulum.trail().len(), trail);
        assert!(pendulum.is_running());
        assert_eq!(pendulum.physical_parameters().get(field), value);
    }
}

#[test]
fn test_mass_and_length_changes_reset() {
    for (field, value) in [
        (PhysicalField::M1, 2.0),
        (PhysicalField::M2, 0.5),
        (PhysicalField::L1, 80.0),
        (PhysicalField::L2, 120.0),
    ] {
        let mut pendulum = running_pendulum(40);
        assert_ne!(*pendulum.state(), *pendulum.initial_conditions());

        pendulum.set_physical_parameter(field, value).unwrap();

        assert_eq!(*pendulum.state(), *pendulum.initial_conditions(), "{:?} must reset", field);
        assert!(!pendulum.is_running());
        assert_eq!(pendulum.energy_history().len(), 1);
        assert_eq!(pendulum.trail().len(), 1);
    }
}

#[test]
fn test_invalid_physical_parameters_are_rejected_without_mutation() {
    let cases = [
        (PhysicalField::M1, 0.0),
        (PhysicalField::M2, -1.0),
        (PhysicalField::L1, f64::NAN),
        (PhysicalField::L2, f64::INFINITY),
        (PhysicalField::Damping, 0.0),
        (PhysicalField::Damping, 1.01),
        (PhysicalField::Damping, f64::NAN),
        (PhysicalField::G, f64::NEG_INFINITY),
    ];

    for (field, value) in cases {
        let mut pendulum = running_pendulum(10);
        let params = *pendulum.physical_parameters();
        let state = *pendulum.state();

        let result = pendulum.set_physical_parameter(field, value);

        assert!(
            matches!(result, Err(SimError::InvalidParameter { .. })),
            "{:?} = {} should be rejected",
            field,
            value
        );
        assert_eq!(*pendulum.physical_parameters(), params);
        assert_eq!(*pendulum.state(), state);
        assert!(pendulum.is_running());
    }
}

#[test]
fn test_negative_gravity_is_allowed() {
    let mut pendulum = PendulumInstance::new();
    assert!(pendulum.set_physical_parameter(PhysicalField::G, -9.81).is_ok());
}

#[test]
fn test_set_physical_parameters_validates_whole_record() {
    let mut pendulum = PendulumInstance::new();
    let bad = PhysicalParameters {
        l2: 0.0,
        ..PhysicalParameters::default()
    };
    assert!(pendulum.set_physical_parameters(bad).is_err());
    assert_eq!(*pendulum.physical_parameters(), PhysicalParameters::default());
}

#[test]
fn test_initial_condition_change_always_resets() {
    let mut pendulum = running_pendulum(25);

    pendulum.set_initial_condition(InitialField::Theta2, 0.25).unwrap();

    assert_eq!(pendulum.initial_conditions().theta2, 0.25);
    assert_eq!(*pendulum.state(), *pendulum.initial_conditions());
    assert!(!pendulum.is_running());
}

#[test]
fn test_non_finite_initial_condition_rejected() {
    let mut pendulum = running_pendulum(5);
    let initial = *pendulum.initial_conditions();

    assert!(pendulum.set_initial_condition(InitialField::Omega2, f64::NAN).is_err());
    assert_eq!(*pendulum.initial_conditions(), initial);
    assert!(pendulum.is_running());
}

#[test]
fn test_time_scale_applies_without_reset() {
    let mut pendulum = running_pendulum(10);
    let state = *pendulum.state();

    pendulum.set_time_scale(3.5).unwrap();
    assert_eq!(pendulum.time_scale(), 3.5);
    assert_eq!(*pendulum.state(), state);

    assert_eq!(pendulum.set_time_scale(-1.0), Err(SimError::InvalidTimeScale(-1.0)));
    assert!(pendulum.set_time_scale(f64::INFINITY).is_err());
    assert_eq!(pendulum.time_scale(), 3.5);
}

#[test]
fn test_toggle_trail_off_clears_and_on_seeds() {
    let mut pendulum = running_pendulum(30);
    assert!(pendulum.trail().len() > 1);

    assert!(!pendulum.toggle_trail());
    assert!(pendulum.trail().is_empty());

    pendulum.update(FIXED_STEP);
    assert!(pendulum.trail().is_empty(), "no recording while hidden");

    assert!(pendulum.toggle_trail());
    assert_eq!(pendulum.trail().len(), 1);
}

#[test]
fn test_toggle_energy_seeds_only_when_empty() {
    let mut pendulum = running_pendulum(5);
    let samples = pendulum.energy_history().len();

    assert!(pendulum.toggle_energy());
    assert_eq!(pendulum.energy_history().len(), samples);

    pendulum.update(FIXED_STEP);
    assert_eq!(pendulum.energy_history().len(), samples + 1);
}

#[test]
fn test_minimal_and_phase_space_toggles_are_plain_flags() {
    let mut pendulum = running_pendulum(5);
    let state = *pendulum.state();

    assert!(pendulum.toggle_minimal());
    assert!(pendulum.toggle_phase_space());
    assert!(!pendulum.toggle_minimal());

    let settings = pendulum.visualization();
    assert!(!settings.show_minimal);
    assert!(settings.show_phase_space);
    assert_eq!(*pendulum.state(), state);
}

#[test]
fn test_apply_visualization_rejects_zero_trail_length() {
    let mut pendulum = PendulumInstance::new();
    let settings = VisualizationSettings {
        trail_length: 0,
        ..VisualizationSettings::default()
    };
    assert_eq!(
        pendulum.apply_visualization(settings),
        Err(SimError::InvalidTrailLength(0))
    );
    assert_eq!(pendulum.visualization(), VisualizationSettings::default());
}
