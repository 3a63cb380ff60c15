//! TOML configuration loader with validation.
//!
//! One file carries the `[shared]` table, the `[cycle]` loop settings and
//! exactly one `[[axes]]` table per axis (roll, pitch, yaw). Missing axis
//! tables fall back to default hyperparameters only when `axes` is absent
//! altogether.

use std::path::Path;

use rcac_common::adaptive::hyperparams::AxisHyperparameters;
use rcac_common::config::{ConfigError, ConfigLoader, SharedConfig};
use rcac_common::consts::{
    AXIS_COUNT, AXIS_NAMES, CYCLE_TIME_US, CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN,
};
use serde::Deserialize;

// ─── File Layout ────────────────────────────────────────────────────

/// Raw file contents, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RcacConfigFile {
    pub shared: SharedConfig,

    #[serde(default)]
    pub cycle: CycleConfig,

    #[serde(default = "default_axes")]
    pub axes: Vec<AxisHyperparameters>,
}

fn default_axes() -> Vec<AxisHyperparameters> {
    vec![AxisHyperparameters::default(); AXIS_COUNT]
}

/// Loop pacing settings for the cycle runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CycleConfig {
    /// Loop period in microseconds (default: 1000 = 1 kHz).
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,

    /// Stop after this many cycles (0 = run until interrupted).
    #[serde(default)]
    pub max_ticks: u64,

    /// Emit a status report every N cycles (0 = never).
    #[serde(default = "default_report_interval")]
    pub report_interval: u32,
}

fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US
}
fn default_report_interval() -> u32 {
    1000
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: default_cycle_time_us(),
            max_ticks: 0,
            report_interval: default_report_interval(),
        }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_time_us < CYCLE_TIME_US_MIN || self.cycle_time_us > CYCLE_TIME_US_MAX {
            return Err(ConfigError::ValidationError(format!(
                "cycle_time_us {} out of range [{}, {}]",
                self.cycle_time_us, CYCLE_TIME_US_MIN, CYCLE_TIME_US_MAX
            )));
        }
        Ok(())
    }
}

// ─── Loaded Config Bundle ───────────────────────────────────────────

/// Validated configuration, ready for runtime use.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub shared: SharedConfig,
    pub cycle: CycleConfig,
    pub axes: [AxisHyperparameters; AXIS_COUNT],
}

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    validate(RcacConfigFile::load(path)?)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<LoadedConfig, ConfigError> {
    validate(RcacConfigFile::from_toml(content)?)
}

fn validate(file: RcacConfigFile) -> Result<LoadedConfig, ConfigError> {
    file.shared.validate()?;
    file.cycle.validate()?;

    let axes: [AxisHyperparameters; AXIS_COUNT] =
        file.axes.try_into().map_err(|axes: Vec<_>| {
            ConfigError::ValidationError(format!(
                "expected {AXIS_COUNT} [[axes]] tables, found {}",
                axes.len()
            ))
        })?;

    for (axis, hp) in axes.iter().enumerate() {
        hp.validate().map_err(|e| {
            ConfigError::ValidationError(format!("axis {} ({}): {e}", axis, AXIS_NAMES[axis]))
        })?;
    }

    Ok(LoadedConfig {
        shared: file.shared,
        cycle: file.cycle,
        axes,
    })
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rcac_common::config::LogLevel;

    const MINIMAL: &str = r#"
[shared]
service_name = "rcac-test"
"#;

    #[test]
    fn minimal_file_uses_defaults() {
        let cfg = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(cfg.shared.log_level, LogLevel::Info);
        assert_eq!(cfg.cycle, CycleConfig::default());
        assert_eq!(cfg.axes, [AxisHyperparameters::default(); AXIS_COUNT]);
    }

    #[test]
    fn full_file_parses() {
        let toml = r#"
[shared]
service_name = "rcac-fc"
log_level = "debug"

[cycle]
cycle_time_us = 500
max_ticks = 2000
report_interval = 250

[[axes]]
history_length = 4
regressor_size = 5
use_measurement_as_regression_target = true

[[axes]]
history_length = 3

[[axes]]
history_length = 8
filter_order = 2
filter_gain = 0.5
window = true
lambda = 0.995
"#;
        let cfg = load_config_from_str(toml).unwrap();
        assert_eq!(cfg.cycle.cycle_time_us, 500);
        assert_eq!(cfg.cycle.max_ticks, 2000);
        assert_eq!(cfg.axes[0].regressor_size, 5);
        assert!(cfg.axes[0].use_measurement_as_regression_target);
        assert_eq!(cfg.axes[1], AxisHyperparameters::default());
        assert!(cfg.axes[2].window);
        assert_eq!(cfg.axes[2].filter_order, 2);
        assert_eq!(cfg.axes[2].lambda, 0.995);
    }

    #[test]
    fn wrong_axis_count_rejected() {
        let toml = format!("{MINIMAL}\n[[axes]]\nhistory_length = 3\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("found 1")));
    }

    #[test]
    fn invalid_axis_names_axis() {
        let toml = format!("{MINIMAL}\n[[axes]]\n[[axes]]\nhistory_length = 2\n[[axes]]\n");
        let err = load_config_from_str(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("pitch")));
    }

    #[test]
    fn cycle_time_bounds_checked() {
        let toml = format!("{MINIMAL}\n[cycle]\ncycle_time_us = 1\n");
        assert!(matches!(
            load_config_from_str(&toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_service_name_rejected() {
        let toml = "[shared]\nservice_name = \"\"\n";
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{MINIMAL}").unwrap();
        file.flush().unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.shared.service_name, "rcac-test");
    }
}
