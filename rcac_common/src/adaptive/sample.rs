//! Per-tick input record for one axis.

/// The four scalar signals of one axis for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSignals {
    /// Controller output applied this tick (u).
    pub control_output: f32,
    /// Performance / error signal (z).
    pub performance_signal: f32,
    /// Measured or predicted plant output (yp).
    pub measurement: f32,
    /// Reference command (r).
    pub reference_command: f32,
}

impl AxisSignals {
    pub const fn new(
        control_output: f32,
        performance_signal: f32,
        measurement: f32,
        reference_command: f32,
    ) -> Self {
        Self {
            control_output,
            performance_signal,
            measurement,
            reference_command,
        }
    }
}

/// One tick of input for one axis.
///
/// `iteration` starts at 1 and increases by one per tick. The tick with
/// `iteration == 1` (re)initializes the axis history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    pub iteration: u32,
    pub control_output: f32,
    pub performance_signal: f32,
    pub measurement: f32,
    pub reference_command: f32,
}

impl Sample {
    /// Iteration value that triggers buffer (re)allocation.
    pub const FIRST_ITERATION: u32 = 1;

    pub const fn new(
        iteration: u32,
        control_output: f32,
        performance_signal: f32,
        measurement: f32,
        reference_command: f32,
    ) -> Self {
        Self {
            iteration,
            control_output,
            performance_signal,
            measurement,
            reference_command,
        }
    }

    #[inline]
    pub const fn from_signals(iteration: u32, signals: AxisSignals) -> Self {
        Self::new(
            iteration,
            signals.control_output,
            signals.performance_signal,
            signals.measurement,
            signals.reference_command,
        )
    }

    /// True on the tick that starts a session.
    #[inline]
    pub const fn is_first(&self) -> bool {
        self.iteration == Self::FIRST_ITERATION
    }
}
