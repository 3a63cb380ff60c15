//! Per-axis RCAC hyperparameters.
//!
//! Set once before the first tick of a session and read-only afterwards.
//! Numeric fields use `#[serde(default)]` so a TOML axis table only needs
//! the values that differ from the defaults.

use core::fmt;

use serde::Deserialize;

use super::error::ConfigurationError;
use crate::consts::{HISTORY_LENGTH_MIN, REGRESSOR_SIZE_MIN, WINDOW_TAIL};

/// Hyperparameters for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisHyperparameters {
    /// Length of the performance, reference and regression-target histories.
    #[serde(default = "default_history_length")]
    pub history_length: u8,

    /// Length of the regressor vector.
    #[serde(default = "default_regressor_size")]
    pub regressor_size: u8,

    /// Filter order for the windowed extension (unused by the core path).
    #[serde(default)]
    pub filter_order: u8,

    /// Filter gain for the windowed extension (unused by the core path).
    #[serde(default)]
    pub filter_gain: f32,

    /// When `true` the regression target records the performance signal,
    /// otherwise the measurement.
    #[serde(default)]
    pub use_measurement_as_regression_target: bool,

    /// Record raw control/performance/regressor columns into the window buffers.
    #[serde(default)]
    pub window: bool,

    /// Initial covariance scale, consumed by the external gain update.
    #[serde(default)]
    pub r0: f32,

    /// Performance weighting, consumed by the external gain update.
    #[serde(default)]
    pub rz: f32,

    /// Forgetting factor, consumed by the external gain update.
    #[serde(default)]
    pub lambda: f32,
}

fn default_history_length() -> u8 {
    HISTORY_LENGTH_MIN
}
fn default_regressor_size() -> u8 {
    REGRESSOR_SIZE_MIN
}

impl Default for AxisHyperparameters {
    fn default() -> Self {
        Self {
            history_length: default_history_length(),
            regressor_size: default_regressor_size(),
            filter_order: 0,
            filter_gain: 0.0,
            use_measurement_as_regression_target: false,
            window: false,
            r0: 0.0,
            rz: 0.0,
            lambda: 0.0,
        }
    }
}

impl AxisHyperparameters {
    /// Control history is one shorter: the output of the current tick is not
    /// history until the next shift.
    #[inline]
    pub const fn control_history_length(&self) -> usize {
        self.history_length.saturating_sub(1) as usize
    }

    /// Column count of the raw window buffers.
    #[inline]
    pub const fn window_length(&self) -> usize {
        WINDOW_TAIL + self.filter_order as usize + self.history_length as usize
    }

    /// Column count of the filtered window buffers.
    #[inline]
    pub const fn filtered_window_length(&self) -> usize {
        2 * self.regressor_size as usize
    }

    /// Dimensions that fix buffer allocation for a session.
    #[inline]
    pub const fn sizing(&self) -> BufferSizing {
        BufferSizing {
            history_length: self.history_length,
            regressor_size: self.regressor_size,
            filter_order: self.filter_order,
        }
    }

    /// Check the bounds the history store relies on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.history_length < HISTORY_LENGTH_MIN {
            return Err(ConfigurationError::HistoryTooShort {
                history_length: self.history_length,
            });
        }
        if self.regressor_size < REGRESSOR_SIZE_MIN {
            return Err(ConfigurationError::RegressorTooSmall {
                regressor_size: self.regressor_size,
            });
        }
        Ok(())
    }
}

/// The subset of hyperparameters that determines buffer dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferSizing {
    pub history_length: u8,
    pub regressor_size: u8,
    pub filter_order: u8,
}

impl fmt::Display for BufferSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(history_length={}, regressor_size={}, filter_order={})",
            self.history_length, self.regressor_size, self.filter_order
        )
    }
}
