//! Per-axis history store.
//!
//! Owns the four shift registers (control, performance, reference,
//! regression target), the running integrator, the regressor buffer and the
//! window buffers. Memory is reserved once in [`HistoryStore::reset`]; every
//! later call mutates in place.
//!
//! ## Lifecycle
//! - `new()` → uninitialized, no buffers.
//! - `reset(hp)` → validates, drops the previous buffers, allocates new
//!   zero-filled ones. On failure the store stays uninitialized.
//! - `advance(sample)` → shifts one sample in. O(1), allocation-free.

pub mod shift_register;
pub mod window;

use rcac_common::adaptive::error::{RcacError, RcacResult};
use rcac_common::adaptive::hyperparams::{AxisHyperparameters, BufferSizing};
use rcac_common::adaptive::sample::Sample;
use tracing::debug;

use shift_register::ShiftRegister;
use window::WindowBuffers;

/// Buffers of one initialized session.
#[derive(Debug, Clone)]
struct HistoryBuffers {
    sizing: BufferSizing,
    /// Session copy of `use_measurement_as_regression_target`.
    target_is_performance: bool,
    /// Session copy of the `window` option.
    record_window: bool,
    control: ShiftRegister,
    performance: ShiftRegister,
    reference: ShiftRegister,
    target: ShiftRegister,
    integrator: f32,
    regressor: Vec<f32>,
    window: WindowBuffers,
}

impl HistoryBuffers {
    fn allocate(hp: &AxisHyperparameters) -> RcacResult<Self> {
        let n = hp.history_length as usize;
        let regressor_size = hp.regressor_size as usize;

        let mut regressor = Vec::new();
        regressor
            .try_reserve_exact(regressor_size)
            .map_err(|_| RcacError::AllocationFailure {
                buffer: "regressor",
                requested: regressor_size,
            })?;
        regressor.resize(regressor_size, 0.0);

        Ok(Self {
            sizing: hp.sizing(),
            target_is_performance: hp.use_measurement_as_regression_target,
            record_window: hp.window,
            control: ShiftRegister::try_zeroed("control_history", hp.control_history_length())?,
            performance: ShiftRegister::try_zeroed("performance_history", n)?,
            reference: ShiftRegister::try_zeroed("reference_history", n)?,
            target: ShiftRegister::try_zeroed("regression_target_history", n)?,
            integrator: 0.0,
            regressor,
            window: WindowBuffers::try_new(hp)?,
        })
    }
}

/// History buffers and integrator for one axis.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    buffers: Option<HistoryBuffers>,
}

impl HistoryStore {
    /// Create an uninitialized store. Does not allocate.
    pub const fn new() -> Self {
        Self { buffers: None }
    }

    /// (Re)allocate and zero all buffers from `hp`.
    ///
    /// The previous session is released on every attempt, so a failed reset
    /// always leaves the store uninitialized.
    ///
    /// # Errors
    /// - `RcacError::Configuration` if `hp` fails validation. Checked before
    ///   anything new is reserved.
    /// - `RcacError::AllocationFailure` if a reservation fails.
    pub fn reset(&mut self, hp: &AxisHyperparameters) -> RcacResult<()> {
        self.buffers = None;
        hp.validate()?;

        let buffers = HistoryBuffers::allocate(hp)?;

        debug!(
            history_length = hp.history_length,
            regressor_size = hp.regressor_size,
            filter_order = hp.filter_order,
            window = hp.window,
            "history buffers allocated"
        );
        self.buffers = Some(buffers);
        Ok(())
    }

    /// Shift one sample into every history and update the integrator.
    ///
    /// # Errors
    /// `RcacError::NotInitialized` if no reset has succeeded. Nothing is
    /// mutated in that case.
    pub fn advance(&mut self, sample: &Sample) -> RcacResult<()> {
        let b = self.buffers.as_mut().ok_or(RcacError::NotInitialized)?;

        b.control.push(sample.control_output);
        b.performance.push(sample.performance_signal);
        b.reference.push(sample.reference_command);
        b.target.push(if b.target_is_performance {
            sample.performance_signal
        } else {
            sample.measurement
        });
        b.integrator += b.performance.latest();
        Ok(())
    }

    /// Shift the current control output, performance signal and regressor
    /// into the raw window buffers when the session enabled windowing.
    pub fn record_window(&mut self, sample: &Sample) -> RcacResult<()> {
        let b = self.buffers.as_mut().ok_or(RcacError::NotInitialized)?;
        if b.record_window {
            b.window
                .record(sample.control_output, sample.performance_signal, &b.regressor);
        }
        Ok(())
    }

    /// Disjoint borrows for the regressor builder: read-only target history
    /// and integrator, writable regressor.
    pub(crate) fn regressor_parts(&mut self) -> RcacResult<(&ShiftRegister, f32, &mut [f32])> {
        let b = self.buffers.as_mut().ok_or(RcacError::NotInitialized)?;
        Ok((&b.target, b.integrator, b.regressor.as_mut_slice()))
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.buffers.is_some()
    }

    /// Sizing captured at the last successful reset.
    pub fn sizing(&self) -> Option<BufferSizing> {
        self.buffers.as_ref().map(|b| b.sizing)
    }

    pub fn control_history(&self) -> Option<&ShiftRegister> {
        self.buffers.as_ref().map(|b| &b.control)
    }

    pub fn performance_history(&self) -> Option<&ShiftRegister> {
        self.buffers.as_ref().map(|b| &b.performance)
    }

    pub fn reference_history(&self) -> Option<&ShiftRegister> {
        self.buffers.as_ref().map(|b| &b.reference)
    }

    pub fn regression_target_history(&self) -> Option<&ShiftRegister> {
        self.buffers.as_ref().map(|b| &b.target)
    }

    pub fn integrator(&self) -> Option<f32> {
        self.buffers.as_ref().map(|b| b.integrator)
    }

    pub fn regressor(&self) -> Option<&[f32]> {
        self.buffers.as_ref().map(|b| b.regressor.as_slice())
    }

    pub fn window(&self) -> Option<&WindowBuffers> {
        self.buffers.as_ref().map(|b| &b.window)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
