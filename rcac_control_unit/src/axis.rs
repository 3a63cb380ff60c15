//! Per-axis controller: reset on the first iteration, then shift and build.

use rcac_common::adaptive::error::{ConfigurationError, RcacResult};
use rcac_common::adaptive::hyperparams::AxisHyperparameters;
use rcac_common::adaptive::sample::Sample;

use crate::history::HistoryStore;
use crate::regressor;

/// Owns one axis's [`HistoryStore`] and runs its per-tick lifecycle.
#[derive(Debug, Clone, Default)]
pub struct AxisController {
    store: HistoryStore,
}

impl AxisController {
    pub const fn new() -> Self {
        Self {
            store: HistoryStore::new(),
        }
    }

    /// Run one tick.
    ///
    /// 1. `iteration == 1` → reset the history from `hp`.
    /// 2. Shift the sample into the histories.
    /// 3. Rebuild the regressor.
    /// 4. Record the window column (if enabled for the session).
    ///
    /// Sizing hyperparameters must not change until the next `iteration == 1`;
    /// a change is rejected with `ConfigurationError::SizingChanged` and the
    /// history is left as it was.
    ///
    /// # Errors
    /// Propagates reset errors (axis left uninitialized) and
    /// `RcacError::NotInitialized` when no reset has succeeded yet.
    pub fn tick(&mut self, sample: &Sample, hp: &AxisHyperparameters) -> RcacResult<()> {
        if sample.is_first() {
            self.store.reset(hp)?;
        } else if let Some(allocated) = self.store.sizing() {
            let requested = hp.sizing();
            if allocated != requested {
                return Err(ConfigurationError::SizingChanged {
                    allocated,
                    requested,
                }
                .into());
            }
        }

        self.store.advance(sample)?;
        regressor::build(&mut self.store, hp.regressor_size)?;
        self.store.record_window(sample)
    }

    /// Read access to the history, regressor and windows.
    #[inline]
    pub fn history(&self) -> &HistoryStore {
        &self.store
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
