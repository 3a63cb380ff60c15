//! Window buffers reserved for the filtered-regressor extension.
//!
//! Dimensions (per axis):
//! ```text
//! pn               = 5 + filter_order + history_length
//! phi_window       = regressor_size × pn
//! u_window/z_window = pn
//! phi_filt_window  = regressor_size × 2·regressor_size
//! u_filt_window    = 2·regressor_size
//! ```
//!
//! The raw windows can record one column per tick (see [`WindowBuffers::record`]).
//! The filtered windows are only allocated and zeroed; no filter is applied.

use rcac_common::adaptive::error::{RcacError, RcacResult};
use rcac_common::adaptive::hyperparams::AxisHyperparameters;

use super::shift_register::ShiftRegister;

#[derive(Debug, Clone)]
pub struct WindowBuffers {
    u_window: ShiftRegister,
    z_window: ShiftRegister,
    phi_window: Vec<ShiftRegister>,
    u_filt_window: ShiftRegister,
    phi_filt_window: Vec<ShiftRegister>,
}

impl WindowBuffers {
    /// Allocate zero-filled windows sized from `hp`.
    pub fn try_new(hp: &AxisHyperparameters) -> RcacResult<Self> {
        let pn = hp.window_length();
        let filt = hp.filtered_window_length();
        let rows = hp.regressor_size as usize;

        Ok(Self {
            u_window: ShiftRegister::try_zeroed("u_window", pn)?,
            z_window: ShiftRegister::try_zeroed("z_window", pn)?,
            phi_window: try_rows("phi_window", rows, pn)?,
            u_filt_window: ShiftRegister::try_zeroed("u_filt_window", filt)?,
            phi_filt_window: try_rows("phi_filt_window", rows, filt)?,
        })
    }

    /// Shift one column into the raw windows.
    ///
    /// Row `i` of `phi_window` receives `regressor[i]`; rows beyond the
    /// regressor length are left untouched.
    pub fn record(&mut self, control_output: f32, performance_signal: f32, regressor: &[f32]) {
        self.u_window.push(control_output);
        self.z_window.push(performance_signal);
        for (row, &value) in self.phi_window.iter_mut().zip(regressor) {
            row.push(value);
        }
    }

    pub fn u_window(&self) -> &ShiftRegister {
        &self.u_window
    }

    pub fn z_window(&self) -> &ShiftRegister {
        &self.z_window
    }

    pub fn phi_window(&self) -> &[ShiftRegister] {
        &self.phi_window
    }

    pub fn u_filt_window(&self) -> &ShiftRegister {
        &self.u_filt_window
    }

    pub fn phi_filt_window(&self) -> &[ShiftRegister] {
        &self.phi_filt_window
    }
}

fn try_rows(buffer: &'static str, rows: usize, cols: usize) -> RcacResult<Vec<ShiftRegister>> {
    let mut out = Vec::new();
    out.try_reserve_exact(rows)
        .map_err(|_| RcacError::AllocationFailure {
            buffer,
            requested: rows,
        })?;
    for _ in 0..rows {
        out.push(ShiftRegister::try_zeroed(buffer, cols)?);
    }
    Ok(out)
}
