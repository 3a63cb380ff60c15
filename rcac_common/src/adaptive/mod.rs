//! Adaptive-control data model shared between the control unit and its hosts.
//!
//! - [`hyperparams`] — per-axis buffer dimensions and options
//! - [`sample`] — per-tick input record
//! - [`error`] — error kinds and per-axis fault flags

pub mod error;
pub mod hyperparams;
pub mod sample;
