//! Prelude module for common re-exports.
//!
//! ```rust
//! use rcac_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, AXIS_NAMES, CYCLE_TIME_US, TELEMETRY_SLOTS};

// ─── Data Model ─────────────────────────────────────────────────────
pub use crate::adaptive::error::{AxisFault, ConfigurationError, RcacError, RcacResult};
pub use crate::adaptive::hyperparams::{AxisHyperparameters, BufferSizing};
pub use crate::adaptive::sample::{AxisSignals, Sample};
