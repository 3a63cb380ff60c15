//! Integration test: two-tick reference scenario through the driver.
//!
//! Validates: default hyperparameters → tick 1 resets and shifts → tick 2
//! shifts again → histories, integrator, regressor and telemetry slots all
//! match hand-computed values.

use rcac_common::prelude::*;
use rcac_control_unit::driver::RcacController;
use rcac_control_unit::history::HistoryStore;
use rcac_control_unit::history::shift_register::ShiftRegister;
use rcac_control_unit::telemetry::{DebugSlots, TelemetryFrame, TelemetrySink};

fn history(reg: Option<&ShiftRegister>) -> Vec<f32> {
    reg.unwrap().iter().collect()
}

#[test]
fn two_tick_scenario_on_every_axis() {
    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    ctrl.init();
    let mut sink = DebugSlots::new();

    for axis in 0..AXIS_COUNT {
        ctrl.tick(axis, &Sample::new(1, 10.0, 20.0, 30.0, 40.0), &mut sink)
            .unwrap();

        let store = ctrl.axis(axis).unwrap().history();
        assert_eq!(history(store.control_history()), vec![10.0, 0.0]);
        assert_eq!(history(store.performance_history()), vec![20.0, 0.0, 0.0]);
        assert_eq!(history(store.reference_history()), vec![40.0, 0.0, 0.0]);
        assert_eq!(store.integrator(), Some(20.0));
        assert_eq!(store.regressor().unwrap(), &[30.0, 20.0, 30.0]);
    }

    for axis in 0..AXIS_COUNT {
        ctrl.tick(axis, &Sample::new(2, 11.0, 21.0, 31.0, 41.0), &mut sink)
            .unwrap();

        let store = ctrl.axis(axis).unwrap().history();
        assert_eq!(history(store.control_history()), vec![11.0, 10.0]);
        assert_eq!(history(store.performance_history()), vec![21.0, 20.0, 0.0]);
        assert_eq!(store.integrator(), Some(41.0));
        assert_eq!(store.regressor().unwrap(), &[31.0, 41.0, 1.0]);
        assert_eq!(
            sink.frame(axis).unwrap().slots,
            [11, 21, 31, 41, 31, 11, 21, 41]
        );
    }
}

#[test]
fn run_cycle_matches_explicit_ticks() {
    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    let mut sink = DebugSlots::new();

    let first = [AxisSignals::new(10.0, 20.0, 30.0, 40.0); AXIS_COUNT];
    let second = [AxisSignals::new(11.0, 21.0, 31.0, 41.0); AXIS_COUNT];
    let results = ctrl.run_cycle(&first, &mut sink);
    assert!(results.iter().all(Result::is_ok));
    let results = ctrl.run_cycle(&second, &mut sink);
    assert!(results.iter().all(Result::is_ok));
    for axis in 0..AXIS_COUNT {
        assert_eq!(ctrl.iteration(axis), Some(2));
        assert_eq!(
            ctrl.axis(axis).unwrap().history().regressor().unwrap(),
            &[31.0, 41.0, 1.0]
        );
    }
}

#[test]
fn performance_target_scenario() {
    let mut hps = [AxisHyperparameters::default(); AXIS_COUNT];
    hps[2].use_measurement_as_regression_target = true;
    let mut ctrl = RcacController::new(hps);
    let mut sink = DebugSlots::new();

    let first = [AxisSignals::new(10.0, 20.0, 30.0, 40.0); AXIS_COUNT];
    let second = [AxisSignals::new(11.0, 21.0, 31.0, 41.0); AXIS_COUNT];
    assert!(ctrl.run_cycle(&first, &mut sink).iter().all(Result::is_ok));
    assert!(ctrl.run_cycle(&second, &mut sink).iter().all(Result::is_ok));

    // Yaw regresses on the performance signal, roll on the measurement.
    let yaw = ctrl.axis(2).unwrap().history();
    assert_eq!(yaw.regressor().unwrap(), &[21.0, 41.0, 1.0]);
    let roll = ctrl.axis(0).unwrap().history();
    assert_eq!(roll.regressor().unwrap(), &[31.0, 41.0, 1.0]);
}

#[test]
fn telemetry_rounds_to_nearest_integer() {
    let mut store = HistoryStore::new();
    store.reset(&AxisHyperparameters::default()).unwrap();
    let sample = Sample::new(1, 1.4, 2.6, -3.7, 0.2);
    store.advance(&sample).unwrap();

    let frame = TelemetryFrame::capture(&sample, &store);
    assert_eq!(frame.slots[..4], [1, 3, -4, 0]);

    struct Last(Option<(usize, TelemetryFrame)>);
    impl TelemetrySink for Last {
        fn publish(&mut self, axis: usize, frame: &TelemetryFrame) {
            self.0 = Some((axis, *frame));
        }
    }

    let mut ctrl = RcacController::new([AxisHyperparameters::default(); AXIS_COUNT]);
    let mut last = Last(None);
    ctrl.tick(1, &sample, &mut last).unwrap();
    let (axis, published) = last.0.unwrap();
    assert_eq!(axis, 1);
    assert_eq!(published.slots[..4], [1, 3, -4, 0]);
}
