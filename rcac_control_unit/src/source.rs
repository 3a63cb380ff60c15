//! Sample sources for the cycle runner.
//!
//! Sensor acquisition belongs to the host. The runner only needs something
//! that hands over one [`AxisSignals`] per axis per cycle.

use core::f32::consts::TAU;

use rcac_common::adaptive::sample::AxisSignals;
use rcac_common::consts::AXIS_COUNT;

/// Provides one set of axis signals per cycle. Must not block.
pub trait SampleSource {
    fn next_signals(&mut self, out: &mut [AxisSignals; AXIS_COUNT]);
}

/// Deterministic closed-loop stand-in for sensor data.
///
/// Each axis tracks a sinusoidal reference with a proportional controller
/// around a first-order plant:
/// ```text
/// r[k]  = A·sin(2π·f·k·dt)
/// y[k]  = y[k-1] + α·(u[k-1] - y[k-1])
/// z[k]  = y[k] - r[k]
/// u[k]  = r[k] - kp·z[k]
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    dt: f32,
    step: u64,
    axes: [SyntheticAxis; AXIS_COUNT],
}

#[derive(Debug, Clone, Copy)]
struct SyntheticAxis {
    amplitude: f32,
    frequency_hz: f32,
    alpha: f32,
    kp: f32,
    measurement: f32,
    control: f32,
}

impl SyntheticSource {
    /// Source sampled every `cycle_time_us` microseconds.
    pub fn new(cycle_time_us: u32) -> Self {
        let axis = |amplitude, frequency_hz| SyntheticAxis {
            amplitude,
            frequency_hz,
            alpha: 0.2,
            kp: 0.8,
            measurement: 0.0,
            control: 0.0,
        };
        Self {
            dt: cycle_time_us as f32 * 1e-6,
            step: 0,
            axes: [axis(100.0, 0.5), axis(80.0, 0.7), axis(40.0, 0.3)],
        }
    }
}

impl SampleSource for SyntheticSource {
    fn next_signals(&mut self, out: &mut [AxisSignals; AXIS_COUNT]) {
        let t = self.step as f32 * self.dt;
        self.step += 1;

        for (ax, signals) in self.axes.iter_mut().zip(out.iter_mut()) {
            let reference = ax.amplitude * (TAU * ax.frequency_hz * t).sin();
            ax.measurement += ax.alpha * (ax.control - ax.measurement);
            let performance = ax.measurement - reference;
            ax.control = reference - ax.kp * performance;

            *signals = AxisSignals::new(ax.control, performance, ax.measurement, reference);
        }
    }
}
