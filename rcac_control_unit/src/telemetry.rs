//! Telemetry frames and sinks.
//!
//! Each axis publishes eight integer slots per tick. Values are rounded to
//! the nearest integer (ties to even). A slot whose source buffer is not
//! allocated publishes 0.

use static_assertions::const_assert_eq;

use rcac_common::adaptive::sample::Sample;
use rcac_common::consts::{AXIS_COUNT, TELEMETRY_SLOTS};

use crate::history::HistoryStore;

/// Slot indices within a [`TelemetryFrame`].
pub mod slot {
    pub const CONTROL_OUTPUT: usize = 0;
    pub const PERFORMANCE_SIGNAL: usize = 1;
    pub const MEASUREMENT: usize = 2;
    pub const REFERENCE_COMMAND: usize = 3;
    pub const REGRESSOR_0: usize = 4;
    pub const CONTROL_HISTORY_0: usize = 5;
    pub const PERFORMANCE_HISTORY_0: usize = 6;
    pub const REFERENCE_HISTORY_0: usize = 7;
}

const_assert_eq!(slot::REFERENCE_HISTORY_0 + 1, TELEMETRY_SLOTS);

/// One axis's telemetry for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetryFrame {
    pub slots: [i32; TELEMETRY_SLOTS],
}

impl TelemetryFrame {
    /// Capture the sample and the current head of each history.
    pub fn capture(sample: &Sample, store: &HistoryStore) -> Self {
        let mut slots = [0; TELEMETRY_SLOTS];
        slots[slot::CONTROL_OUTPUT] = round(sample.control_output);
        slots[slot::PERFORMANCE_SIGNAL] = round(sample.performance_signal);
        slots[slot::MEASUREMENT] = round(sample.measurement);
        slots[slot::REFERENCE_COMMAND] = round(sample.reference_command);
        slots[slot::REGRESSOR_0] = store
            .regressor()
            .and_then(|phi| phi.first().copied())
            .map_or(0, round);
        slots[slot::CONTROL_HISTORY_0] = store.control_history().map_or(0, |h| round(h.latest()));
        slots[slot::PERFORMANCE_HISTORY_0] =
            store.performance_history().map_or(0, |h| round(h.latest()));
        slots[slot::REFERENCE_HISTORY_0] =
            store.reference_history().map_or(0, |h| round(h.latest()));
        Self { slots }
    }
}

/// Round half to even, saturating; NaN publishes as 0.
#[inline]
fn round(value: f32) -> i32 {
    value.round_ties_even() as i32
}

/// Receiver of per-axis telemetry frames.
///
/// Called from inside the control tick: implementations must not block.
pub trait TelemetrySink {
    fn publish(&mut self, axis: usize, frame: &TelemetryFrame);
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    #[inline]
    fn publish(&mut self, _axis: usize, _frame: &TelemetryFrame) {}
}

/// Latest frame per axis, overwritten every tick.
#[derive(Debug, Clone, Default)]
pub struct DebugSlots {
    frames: [TelemetryFrame; AXIS_COUNT],
}

impl DebugSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest frame for `axis`, if the index is in range.
    pub fn frame(&self, axis: usize) -> Option<&TelemetryFrame> {
        self.frames.get(axis)
    }
}

impl TelemetrySink for DebugSlots {
    #[inline]
    fn publish(&mut self, axis: usize, frame: &TelemetryFrame) {
        if let Some(slot) = self.frames.get_mut(axis) {
            *slot = *frame;
        }
    }
}
