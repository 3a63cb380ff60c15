//! # RCAC Control Unit Library
//!
//! Per-axis regressor pipeline for retrospective cost adaptive control
//! (RCAC) on a three-axis vehicle. Each cycle, every axis (roll, pitch, yaw)
//! receives its latest control output, performance signal, measurement and
//! reference command; the pipeline shifts these into fixed-length histories,
//! updates a running integrator and rebuilds the axis regressor.
//!
//! ## Layers
//!
//! 1. **HistoryStore** — per-axis shift registers and integrator
//! 2. **regressor** — builds Φ from the regression-target history
//! 3. **AxisController** — session lifecycle per axis
//! 4. **RcacController** — ticks all axes in order, publishes telemetry
//! 5. **CycleRunner** — paced loop around the controller
//!
//! ## Zero-Allocation Steady State
//!
//! Buffers are allocated on the first iteration of each axis session.
//! Every later tick works in place.

pub mod axis;
pub mod config;
pub mod cycle;
pub mod debug_log;
pub mod driver;
pub mod history;
pub mod regressor;
pub mod source;
pub mod telemetry;
