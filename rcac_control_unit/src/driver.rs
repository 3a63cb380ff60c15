//! Top-level driver: one [`AxisController`] per axis, ticked in axis order.
//!
//! Two entry points:
//! - [`RcacController::tick`] — caller supplies the sample (and iteration).
//! - [`RcacController::run_cycle`] — driver keeps the per-axis iteration
//!   counter, increments it, then ticks every axis in order.
//!
//! Telemetry is published for every tick, including failed ones.
//! Faults are recorded per axis as [`AxisFault`] flags and cleared on the
//! next successful session start.

use rcac_common::adaptive::error::{AxisFault, RcacError, RcacResult};
use rcac_common::adaptive::hyperparams::AxisHyperparameters;
use rcac_common::adaptive::sample::{AxisSignals, Sample};
use rcac_common::consts::{AXIS_COUNT, AXIS_NAMES};
use tracing::{debug, info, warn};

use crate::axis::AxisController;
use crate::telemetry::{TelemetryFrame, TelemetrySink};

#[derive(Debug, Clone, Default)]
struct AxisSlot {
    controller: AxisController,
    hyperparameters: AxisHyperparameters,
    /// Last iteration handed out by `run_cycle` (0 = next cycle starts a session).
    iteration: u32,
    faults: AxisFault,
}

/// Regressor pipeline for all axes.
#[derive(Debug, Clone)]
pub struct RcacController {
    axes: [AxisSlot; AXIS_COUNT],
}

impl RcacController {
    /// Create the controller. No history is allocated until each axis sees
    /// its first iteration.
    pub fn new(hyperparameters: [AxisHyperparameters; AXIS_COUNT]) -> Self {
        Self {
            axes: hyperparameters.map(|hp| AxisSlot {
                hyperparameters: hp,
                ..Default::default()
            }),
        }
    }

    /// Startup hook, called once before the first cycle.
    ///
    /// Session-wide setup is reserved here; nothing is allocated.
    pub fn init(&mut self) {
        for (axis, slot) in self.axes.iter().enumerate() {
            debug!(
                axis = AXIS_NAMES[axis],
                history_length = slot.hyperparameters.history_length,
                regressor_size = slot.hyperparameters.regressor_size,
                "axis configured"
            );
        }
        info!("RCAC controller initialized ({AXIS_COUNT} axes)");
    }

    /// Tick one axis with a caller-supplied sample and publish its telemetry.
    ///
    /// # Errors
    /// `RcacError::InvalidAxis` for an out-of-range index; otherwise the
    /// axis controller's error. The error is also recorded in
    /// [`RcacController::faults`].
    pub fn tick<S: TelemetrySink + ?Sized>(
        &mut self,
        axis: usize,
        sample: &Sample,
        sink: &mut S,
    ) -> RcacResult<()> {
        let slot = self
            .axes
            .get_mut(axis)
            .ok_or(RcacError::InvalidAxis { axis })?;

        let result = slot.controller.tick(sample, &slot.hyperparameters);
        match &result {
            Ok(()) if sample.is_first() => slot.faults = AxisFault::empty(),
            Ok(()) => {}
            Err(err) => {
                let fault = AxisFault::from(err);
                if !slot.faults.contains(fault) {
                    warn!(
                        axis = AXIS_NAMES[axis],
                        iteration = sample.iteration,
                        "axis fault: {err}"
                    );
                }
                slot.faults |= fault;
            }
        }

        sink.publish(
            axis,
            &TelemetryFrame::capture(sample, slot.controller.history()),
        );
        result
    }

    /// Advance every axis's iteration counter and tick all axes in order.
    ///
    /// Returns one result per axis; a faulted axis does not stop the others.
    pub fn run_cycle<S: TelemetrySink + ?Sized>(
        &mut self,
        inputs: &[AxisSignals; AXIS_COUNT],
        sink: &mut S,
    ) -> [RcacResult<()>; AXIS_COUNT] {
        let mut results = [Ok(()); AXIS_COUNT];
        for (axis, signals) in inputs.iter().enumerate() {
            let slot = &mut self.axes[axis];
            slot.iteration = slot.iteration.wrapping_add(1);
            let sample = Sample::from_signals(slot.iteration, *signals);
            results[axis] = self.tick(axis, &sample, sink);
        }
        results
    }

    /// Restart `axis` on the next `run_cycle` (iteration goes back to 1).
    ///
    /// The current buffers stay in place until that tick replaces them.
    pub fn restart_axis(&mut self, axis: usize) -> RcacResult<()> {
        let slot = self
            .axes
            .get_mut(axis)
            .ok_or(RcacError::InvalidAxis { axis })?;
        slot.iteration = 0;
        Ok(())
    }

    /// Replace the hyperparameters of `axis`. Takes effect at its next
    /// session start; sizing changes before then are rejected by the tick.
    pub fn set_hyperparameters(&mut self, axis: usize, hp: AxisHyperparameters) -> RcacResult<()> {
        let slot = self
            .axes
            .get_mut(axis)
            .ok_or(RcacError::InvalidAxis { axis })?;
        slot.hyperparameters = hp;
        Ok(())
    }

    pub fn axis(&self, axis: usize) -> Option<&AxisController> {
        self.axes.get(axis).map(|s| &s.controller)
    }

    pub fn hyperparameters(&self, axis: usize) -> Option<&AxisHyperparameters> {
        self.axes.get(axis).map(|s| &s.hyperparameters)
    }

    /// Iteration most recently issued by `run_cycle` for `axis`.
    pub fn iteration(&self, axis: usize) -> Option<u32> {
        self.axes.get(axis).map(|s| s.iteration)
    }

    /// Accumulated fault flags for `axis` (empty for an unknown index).
    pub fn faults(&self, axis: usize) -> AxisFault {
        self.axes.get(axis).map_or(AxisFault::empty(), |s| s.faults)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
