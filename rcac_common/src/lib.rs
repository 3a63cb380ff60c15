//! RCAC Common Library
//!
//! Shared constants, data model and configuration loading for the RCAC
//! regressor pipeline crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Axis count, buffer bounds, loop timing
//! - [`adaptive`] - Hyperparameters, samples, errors
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience

pub mod adaptive;
pub mod config;
pub mod consts;
pub mod prelude;
