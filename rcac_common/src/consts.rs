//! System-wide constants for the RCAC workspace.
//!
//! Single source of truth for axis count, buffer bounds and loop timing.

use static_assertions::const_assert;

/// Number of controlled axes (roll, pitch, yaw).
pub const AXIS_COUNT: usize = 3;

/// Axis display names, indexed by axis number.
pub const AXIS_NAMES: [&str; AXIS_COUNT] = ["roll", "pitch", "yaw"];

/// Minimum accepted history length (target[0] and target[1] must exist).
pub const HISTORY_LENGTH_MIN: u8 = 3;

/// Minimum accepted regressor size (three populated terms).
pub const REGRESSOR_SIZE_MIN: u8 = 3;

/// Number of regressor entries written by the builder. Higher indices are reserved.
pub const REGRESSOR_TERMS: usize = 3;

/// Fixed tail added to the window length on top of `filter_order + history_length`.
pub const WINDOW_TAIL: usize = 5;

/// Number of telemetry slots published per axis per tick.
pub const TELEMETRY_SLOTS: usize = 8;

/// Default control-loop period in microseconds (1 kHz).
pub const CYCLE_TIME_US: u32 = 1000;

/// Lower bound for the configured loop period [µs].
pub const CYCLE_TIME_US_MIN: u32 = 50;

/// Upper bound for the configured loop period [µs].
pub const CYCLE_TIME_US_MAX: u32 = 100_000;

const_assert!(AXIS_COUNT == 3);
const_assert!(HISTORY_LENGTH_MIN >= 2);
const_assert!(REGRESSOR_SIZE_MIN as usize >= REGRESSOR_TERMS);
const_assert!(CYCLE_TIME_US >= CYCLE_TIME_US_MIN && CYCLE_TIME_US <= CYCLE_TIME_US_MAX);
