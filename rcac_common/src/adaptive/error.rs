//! Error types for the per-axis regressor pipeline.
//!
//! Every error is local to one axis: it blocks that axis's history update
//! but never takes down the other axes or the controller.

use bitflags::bitflags;
use thiserror::Error;

use super::hyperparams::BufferSizing;
use crate::consts::{AXIS_COUNT, HISTORY_LENGTH_MIN, REGRESSOR_SIZE_MIN};

/// Invalid hyperparameters detected at reset time (or a sizing change
/// mid-session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("history_length {history_length} below minimum {HISTORY_LENGTH_MIN}")]
    HistoryTooShort { history_length: u8 },

    #[error("regressor_size {regressor_size} below minimum {REGRESSOR_SIZE_MIN}")]
    RegressorTooSmall { regressor_size: u8 },

    /// Sizing hyperparameters changed without re-entering iteration 1.
    #[error("buffer sizing changed mid-session: allocated {allocated}, requested {requested}")]
    SizingChanged {
        allocated: BufferSizing,
        requested: BufferSizing,
    },
}

/// Errors raised by the history store, axis controller and driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RcacError {
    /// Hyperparameters rejected; the axis is left uninitialized.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// `advance`/`build` called before a successful reset.
    #[error("axis history not initialized (no successful reset at iteration 1)")]
    NotInitialized,

    /// Buffer reservation failed during reset.
    #[error("allocation failure: {requested} elements for {buffer}")]
    AllocationFailure {
        /// Buffer being allocated.
        buffer: &'static str,
        /// Requested element count.
        requested: usize,
    },

    /// Axis index outside `0..AXIS_COUNT`.
    #[error("axis index {axis} out of range [0, {AXIS_COUNT})")]
    InvalidAxis { axis: usize },
}

/// Result type for regressor pipeline operations.
pub type RcacResult<T> = Result<T, RcacError>;

bitflags! {
    /// Per-axis fault flags kept by the driver.
    ///
    /// Cleared on the next successful reset of the axis.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisFault: u8 {
        /// Hyperparameters rejected.
        const CONFIGURATION   = 0x01;
        /// Tick received before a successful reset.
        const NOT_INITIALIZED = 0x02;
        /// Buffer reservation failed.
        const ALLOCATION      = 0x04;
    }
}

impl Default for AxisFault {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&RcacError> for AxisFault {
    fn from(err: &RcacError) -> Self {
        match err {
            RcacError::Configuration(_) | RcacError::InvalidAxis { .. } => Self::CONFIGURATION,
            RcacError::NotInitialized => Self::NOT_INITIALIZED,
            RcacError::AllocationFailure { .. } => Self::ALLOCATION,
        }
    }
}
