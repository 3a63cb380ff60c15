//! Regressor construction from the axis history.
//!
//! ```text
//! phi[0] = target[0]
//! phi[1] = integrator
//! phi[2] = target[0] - target[1]
//! ```
//!
//! Entries from index 3 up to `regressor_size - 1` are reserved for further
//! regression terms and keep whatever was last written to them (zero after
//! a reset).

use rcac_common::adaptive::error::{ConfigurationError, RcacError, RcacResult};
use rcac_common::adaptive::hyperparams::BufferSizing;
use rcac_common::consts::REGRESSOR_TERMS;

use crate::history::HistoryStore;
use crate::history::shift_register::ShiftRegister;

/// Write the populated regressor terms into `out`.
///
/// Reads only `target` and `integrator`. Calling it twice with the same
/// inputs leaves `out` unchanged the second time.
#[inline]
pub fn build_into(target: &ShiftRegister, integrator: f32, out: &mut [f32]) {
    debug_assert!(out.len() >= REGRESSOR_TERMS);
    debug_assert!(target.len() >= 2);

    let current = target.latest();
    let previous = target.get(1).unwrap_or(0.0);

    out[0] = current;
    out[1] = integrator;
    out[2] = current - previous;
}

/// Rebuild the regressor held by `store`.
///
/// # Errors
/// - `RcacError::NotInitialized` if the store has no buffers.
/// - `RcacError::Configuration` if `regressor_size` disagrees with the
///   allocated regressor.
pub fn build(store: &mut HistoryStore, regressor_size: u8) -> RcacResult<()> {
    let allocated = store.sizing().ok_or(RcacError::NotInitialized)?;
    if allocated.regressor_size != regressor_size {
        return Err(ConfigurationError::SizingChanged {
            allocated,
            requested: BufferSizing {
                regressor_size,
                ..allocated
            },
        }
        .into());
    }

    let (target, integrator, out) = store.regressor_parts()?;
    build_into(target, integrator, out);
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
