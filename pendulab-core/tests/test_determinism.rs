//! Determinism tests - the same scenario produces identical outputs

use pendulab_core::pendulum::Lifecycle;
use pendulab_core::tests::test_helpers::TWO_PENDULUM_SCENARIO;
use pendulab_core::{run_scenario, RunResult};

const FRAME_DT: f64 = 1.0 / 60.0;

fn run(frames: usize) -> RunResult {
    run_scenario(TWO_PENDULUM_SCENARIO, frames, FRAME_DT).expect("Run failed")
}

#[test]
fn test_scenario_runs_are_bit_identical() {
    let results: Vec<_> = (0..3).map(|_| run(600)).collect();

    for i in 1..results.len() {
        assert_eq!(results[0], results[i], "Run {} should match run 0", i);
    }
}

#[test]
fn test_run_result_shape() {
    let result = run(300);

    assert_eq!(result.frames, 300);
    // one step per frame for the first pendulum, two for the second
    assert_eq!(result.substeps, 300 + 600);
    assert!(result.degenerate.is_empty());
    assert_eq!(result.pendulums.len(), 2);

    for report in &result.pendulums {
        assert_eq!(report.lifecycle, Lifecycle::Running);
        assert!(report.snapshot.state.is_finite());
        assert_eq!(report.trail_points, 200, "capped by the scenario trail length");
        assert_eq!(report.energy_samples, 200);
    }
}

#[test]
fn test_frame_rate_independent_step_size() {
    // 60 frames at 60 Hz and 30 frames at 30 Hz cover the same simulated time
    // with the same fixed step, so they land on the same state.
    let fast = run_scenario(TWO_PENDULUM_SCENARIO, 60, 1.0 / 60.0).unwrap();
    let slow = run_scenario(TWO_PENDULUM_SCENARIO, 30, 1.0 / 30.0).unwrap();

    assert_eq!(fast.substeps, slow.substeps);
    assert_eq!(fast.pendulums[0].snapshot, slow.pendulums[0].snapshot);
    assert_eq!(fast.pendulums[1].snapshot, slow.pendulums[1].snapshot);
}

#[test]
fn test_invalid_scenario_does_not_run() {
    let result = run_scenario("(pendulums: [(physical: (m1: 0.0))])", 10, FRAME_DT);
    assert!(result.is_err());
}
