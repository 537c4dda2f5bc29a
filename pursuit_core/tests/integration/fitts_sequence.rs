//! End-to-end Fitts trial: the auto-PD operator acquires all 26 targets
//! through the full loop, and the visited sequence follows the
//! alternating ring pattern.

use pursuit_common::protocol::TaskState;
use pursuit_common::types::TaskType;
use pursuit_core::operator::{AutoPdOperator, OperatorDevice};
use pursuit_core::task::fitts::{FittsTask, NUM_TARGETS};
use pursuit_core::task::TaskMetrics;
use pursuit_core::CycleRunner;

use super::test_config;

/// Map an emitted target position back to its 1-based ring index.
fn index_of_target(t: (f64, f64)) -> usize {
    for index in 1..=NUM_TARGETS {
        let (cx, cy) = FittsTask::target_center(index);
        if (t.0 - cx).abs() < 1e-9 && (t.1 - cy).abs() < 1e-9 {
            return index;
        }
    }
    panic!("target {t:?} is not on the ring");
}

#[test]
fn full_trial_visits_alternating_sequence() {
    let mut runner = CycleRunner::new(test_config(), TaskType::Fitts).unwrap();
    // A quiet, stiffer PD so each acquisition settles well inside the
    // 4 mm target disc.
    runner.set_operator(OperatorDevice::AutoPd(AutoPdOperator::with_seed(
        10.0, 5.0, 0.0, 1,
    )));
    runner.close();

    let mut visited: Vec<usize> = Vec::new();
    let mut steps = 0u64;
    while runner.task_state() != TaskState::Completed {
        runner.step();
        steps += 1;
        assert!(steps <= 600_000, "fitts trial failed to complete");

        let index = index_of_target(runner.state().target);
        if visited.last() != Some(&index) {
            visited.push(index);
        }
    }

    // The standard alternating pattern, 1-based modulo 13.
    let expected_prefix = [1, 8, 2, 9, 3, 10, 4, 11, 5, 12, 6, 13, 7, 1];
    assert!(visited.len() >= expected_prefix.len());
    assert_eq!(&visited[..expected_prefix.len()], &expected_prefix);

    match runner.task_metrics() {
        TaskMetrics::Fitts(m) => {
            assert_eq!(m.movements_completed, m.movements_total);
            assert!(m.mean_movement_time > 0.0);
            assert!(m.throughput > 0.0);
            assert_eq!(m.error_rate, 0.0);
        }
        other => panic!("wrong metrics variant: {other:?}"),
    }
}
