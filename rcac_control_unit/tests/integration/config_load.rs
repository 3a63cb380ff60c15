//! Integration test: configuration file → running controller.

use std::io::Write;

use rcac_common::prelude::*;
use rcac_control_unit::config::{load_config, load_config_from_str};
use rcac_control_unit::driver::RcacController;
use rcac_control_unit::telemetry::NullTelemetry;

const RCAC_TOML: &str = r#"
[shared]
service_name = "rcac-fc"
log_level = "warn"

[cycle]
cycle_time_us = 2500
max_ticks = 400

[[axes]]
history_length = 3

[[axes]]
history_length = 6
regressor_size = 4
use_measurement_as_regression_target = true

[[axes]]
history_length = 4
window = true
"#;

#[test]
fn loaded_hyperparameters_drive_buffer_sizes() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RCAC_TOML.as_bytes()).unwrap();
    file.flush().unwrap();

    let cfg = load_config(file.path()).unwrap();
    assert_eq!(cfg.shared.log_level, LogLevel::Warn);
    assert_eq!(cfg.cycle.cycle_time_us, 2500);
    assert_eq!(cfg.cycle.max_ticks, 400);

    let mut ctrl = RcacController::new(cfg.axes);
    ctrl.init();
    let inputs = [AxisSignals::new(1.0, 2.0, 3.0, 4.0); AXIS_COUNT];
    let results = ctrl.run_cycle(&inputs, &mut NullTelemetry);
    assert!(results.iter().all(Result::is_ok));

    let pitch = ctrl.axis(1).unwrap().history();
    assert_eq!(pitch.performance_history().unwrap().len(), 6);
    assert_eq!(pitch.regressor().unwrap(), &[2.0, 2.0, 2.0, 0.0]);

    let yaw = ctrl.axis(2).unwrap().history();
    assert_eq!(yaw.window().unwrap().u_window()[0], 1.0);
}

#[test]
fn missing_file_is_reported() {
    let err = load_config(std::path::Path::new("/nonexistent/rcac.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)));
}

#[test]
fn invalid_axis_rejected_at_load() {
    let toml = RCAC_TOML.replace("history_length = 6", "history_length = 1");
    let err = load_config_from_str(&toml).unwrap_err();
    assert!(err.to_string().contains("pitch"));
}
