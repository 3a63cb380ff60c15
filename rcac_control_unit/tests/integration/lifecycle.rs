//! Integration test: per-axis session lifecycle.
//!
//! Validates: ticks before a session start fail without side effects →
//! warm restart rebuilds the buffers → sizing changes mid-session are
//! rejected → history lengths never change between resets.

use rcac_common::prelude::*;
use rcac_control_unit::axis::AxisController;
use rcac_control_unit::driver::RcacController;
use rcac_control_unit::telemetry::{DebugSlots, NullTelemetry};

#[test]
fn tick_before_first_iteration_is_not_initialized() {
    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    let mut sink = DebugSlots::new();

    let err = ctrl.tick(0, &Sample::new(7, 1.0, 2.0, 3.0, 4.0), &mut sink);
    assert_eq!(err, Err(RcacError::NotInitialized));
    assert!(!ctrl.axis(0).unwrap().history().is_initialized());
    assert_eq!(ctrl.faults(0), AxisFault::NOT_INITIALIZED);
    // Unallocated sources publish as 0.
    assert_eq!(sink.frame(0).unwrap().slots, [1, 2, 3, 4, 0, 0, 0, 0]);
}

#[test]
fn warm_restart_discards_previous_session() {
    let mut axis = AxisController::new();
    let hp = AxisHyperparameters::default();

    for (k, v) in (1..=5).zip([1.0f32, 2.0, 3.0, 4.0, 5.0]) {
        axis.tick(&Sample::new(k, v, v, v, v), &hp).unwrap();
    }
    assert_eq!(axis.history().integrator(), Some(15.0));

    axis.tick(&Sample::new(1, 9.0, 9.0, 9.0, 9.0), &hp).unwrap();
    let store = axis.history();
    assert_eq!(store.integrator(), Some(9.0));
    let performance: Vec<f32> = store.performance_history().unwrap().iter().collect();
    assert_eq!(performance, vec![9.0, 0.0, 0.0]);
    assert_eq!(store.regressor().unwrap(), &[9.0, 9.0, 9.0]);
}

#[test]
fn sizing_change_waits_for_next_session() {
    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    let inputs = [AxisSignals::new(1.0, 1.0, 1.0, 1.0); AXIS_COUNT];
    let results = ctrl.run_cycle(&inputs, &mut NullTelemetry);
    assert!(results.iter().all(Result::is_ok));

    let longer = AxisHyperparameters {
        history_length: 5,
        ..Default::default()
    };
    ctrl.set_hyperparameters(0, longer).unwrap();
    let results = ctrl.run_cycle(&inputs, &mut NullTelemetry);
    assert!(matches!(
        results[0],
        Err(RcacError::Configuration(ConfigurationError::SizingChanged { .. }))
    ));
    assert!(ctrl.faults(0).contains(AxisFault::CONFIGURATION));
    // History untouched by the rejected tick.
    assert_eq!(ctrl.axis(0).unwrap().history().integrator(), Some(1.0));

    ctrl.restart_axis(0).unwrap();
    let results = ctrl.run_cycle(&inputs, &mut NullTelemetry);
    assert!(results[0].is_ok());
    assert!(ctrl.faults(0).is_empty());
    assert_eq!(
        ctrl.axis(0).unwrap().history().performance_history().unwrap().len(),
        5
    );
}

#[test]
fn failed_restart_leaves_axis_uninitialized_until_next_restart() {
    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    let mut sink = DebugSlots::new();
    let inputs = [AxisSignals::new(1.0, 2.0, 3.0, 4.0); AXIS_COUNT];
    let results = ctrl.run_cycle(&inputs, &mut sink);
    assert!(results.iter().all(Result::is_ok));

    let bad = AxisHyperparameters {
        history_length: 2,
        ..Default::default()
    };
    ctrl.set_hyperparameters(0, bad).unwrap();
    ctrl.restart_axis(0).unwrap();
    let results = ctrl.run_cycle(&inputs, &mut sink);
    assert!(matches!(
        results[0],
        Err(RcacError::Configuration(ConfigurationError::HistoryTooShort { .. }))
    ));
    assert!(!ctrl.axis(0).unwrap().history().is_initialized());
    // Only the raw sample is published; no stale history.
    assert_eq!(sink.frame(0).unwrap().slots, [1, 2, 3, 4, 0, 0, 0, 0]);

    ctrl.set_hyperparameters(0, AxisHyperparameters::default()).unwrap();
    let results = ctrl.run_cycle(&inputs, &mut sink);
    assert_eq!(results[0], Err(RcacError::NotInitialized));
    assert!(ctrl.axis(0).unwrap().history().integrator().is_none());
    assert!(results[1].is_ok());

    ctrl.restart_axis(0).unwrap();
    let results = ctrl.run_cycle(&inputs, &mut sink);
    assert!(results[0].is_ok());
    assert_eq!(ctrl.axis(0).unwrap().history().integrator(), Some(2.0));
    assert!(ctrl.faults(0).is_empty());
}

#[test]
fn lengths_are_stable_across_a_session() {
    let hp = AxisHyperparameters {
        history_length: 4,
        regressor_size: 6,
        window: true,
        ..Default::default()
    };
    let mut axis = AxisController::new();
    for k in 1..=200u32 {
        let v = k as f32 * 0.5;
        axis.tick(&Sample::new(k, v, -v, v * 2.0, v + 1.0), &hp).unwrap();

        let store = axis.history();
        assert_eq!(store.control_history().unwrap().len(), 3);
        assert_eq!(store.performance_history().unwrap().len(), 4);
        assert_eq!(store.reference_history().unwrap().len(), 4);
        assert_eq!(store.regression_target_history().unwrap().len(), 4);
        assert_eq!(store.regressor().unwrap().len(), 6);
        // Reserved terms stay zero.
        assert_eq!(&store.regressor().unwrap()[3..], &[0.0, 0.0, 0.0]);
    }
}

#[test]
fn invalid_hyperparameters_fault_only_their_axis() {
    let mut hps = [AxisHyperparameters::default(); AXIS_COUNT];
    hps[2].regressor_size = 2;
    let mut ctrl = RcacController::new(hps);
    let inputs = [AxisSignals::new(1.0, 2.0, 3.0, 4.0); AXIS_COUNT];
    let results = ctrl.run_cycle(&inputs, &mut NullTelemetry);

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert_eq!(
        results[2],
        Err(RcacError::Configuration(ConfigurationError::RegressorTooSmall {
            regressor_size: 2
        }))
    );
    assert_eq!(ctrl.faults(2), AxisFault::CONFIGURATION);
}
