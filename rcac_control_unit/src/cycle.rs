//! Paced control loop driving the regressor pipeline.
//!
//! ## RT Setup Sequence
//! 1. `mlockall(MCL_CURRENT | MCL_FUTURE)` — lock all pages.
//! 2. Prefault stack pages.
//! 3. `sched_setaffinity` — pin to an isolated CPU core.
//! 4. `sched_setscheduler(SCHED_FIFO, prio)` — RT priority.
//!
//! All four are no-ops without the `rt` feature.
//!
//! ## Cycle Loop
//! Absolute-time sleep on `CLOCK_MONOTONIC` (`rt`) or `thread::sleep`
//! (simulation). Each cycle: pull signals from the [`SampleSource`] →
//! [`RcacController::run_cycle`] → record timing. Stops after `max_ticks`
//! cycles or when the shared `running` flag is cleared.
//!
//! History buffers are allocated on the first cycle of each axis; every
//! later cycle runs without heap allocation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rcac_common::adaptive::sample::AxisSignals;
use rcac_common::consts::{AXIS_COUNT, AXIS_NAMES};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LoadedConfig;
use crate::debug_log::DebugLogger;
use crate::driver::RcacController;
use crate::source::SampleSource;
use crate::telemetry::{DebugSlots, slot};

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
    /// Cycles in which at least one axis reported an error.
    pub faulted_cycles: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            faulted_cycles: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns;
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors during RT setup or cycle execution.
#[derive(Debug, Error)]
pub enum CycleError {
    /// RT system call failed.
    #[error("RT setup error: {0}")]
    RtSetup(String),

    /// Cycle overrun detected (`rt` builds only).
    #[error("cycle overrun: {actual_ns}ns > {budget_ns}ns budget")]
    CycleOverrun { actual_ns: i64, budget_ns: i64 },
}

// ─── RT Setup ───────────────────────────────────────────────────────

#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), CycleError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| CycleError::RtSetup(format!("mlockall failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), CycleError> {
    Ok(())
}

/// Touch 256 KiB of stack so the RT loop does not fault pages in.
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        // SAFETY: `byte` is a valid, exclusive reference into `buf`.
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

#[cfg(feature = "rt")]
fn rt_set_affinity(cpu: usize) -> Result<(), CycleError> {
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::unistd::Pid;

    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|e| CycleError::RtSetup(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &cpuset)
        .map_err(|e| CycleError::RtSetup(format!("sched_setaffinity failed: {e}")))
}

#[cfg(not(feature = "rt"))]
fn rt_set_affinity(_cpu: usize) -> Result<(), CycleError> {
    Ok(())
}

#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), CycleError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` is a valid sched_param; pid 0 targets the calling thread.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(CycleError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), CycleError> {
    Ok(())
}

/// Perform the full RT setup sequence before entering the loop.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), CycleError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_affinity(cpu_core)?;
    rt_set_scheduler(rt_priority)?;
    Ok(())
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the controller, the sample source and the telemetry slots.
pub struct CycleRunner<S: SampleSource> {
    pub controller: RcacController,
    pub telemetry: DebugSlots,
    pub stats: CycleStats,
    source: S,
    debug_log: DebugLogger<std::fs::File>,
    inputs: [AxisSignals; AXIS_COUNT],
    cycle_time_ns: i64,
    max_ticks: u64,
    report_interval: u64,
    running: Arc<AtomicBool>,
}

impl<S: SampleSource> CycleRunner<S> {
    /// Build a runner from a validated configuration and run the startup hook.
    pub fn new(
        config: &LoadedConfig,
        source: S,
        debug_log: DebugLogger<std::fs::File>,
        running: Arc<AtomicBool>,
    ) -> Self {
        let mut controller = RcacController::new(config.axes);
        controller.init();

        Self {
            controller,
            telemetry: DebugSlots::new(),
            stats: CycleStats::new(),
            source,
            debug_log,
            inputs: [AxisSignals::default(); AXIS_COUNT],
            cycle_time_ns: config.cycle.cycle_time_us as i64 * 1000,
            max_ticks: config.cycle.max_ticks,
            report_interval: config.cycle.report_interval as u64,
            running,
        }
    }

    /// Override the configured cycle limit (0 = unlimited).
    pub fn set_max_ticks(&mut self, max_ticks: u64) {
        self.max_ticks = max_ticks;
    }

    /// Enter the paced loop until `max_ticks` or shutdown.
    ///
    /// # Errors
    /// `CycleError::CycleOverrun` on the first overrun in `rt` builds.
    pub fn run(&mut self) -> Result<(), CycleError> {
        #[cfg(feature = "rt")]
        let result = self.run_rt_loop();

        #[cfg(not(feature = "rt"))]
        let result = self.run_sim_loop();

        info!(
            cycles = self.stats.cycle_count,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            overruns = self.stats.overruns,
            faulted_cycles = self.stats.faulted_cycles,
            "cycle loop stopped"
        );
        result
    }

    /// Execute one cycle: sample → tick all axes → report.
    pub fn step(&mut self) {
        self.source.next_signals(&mut self.inputs);
        let results = self.controller.run_cycle(&self.inputs, &mut self.telemetry);

        if results.iter().any(Result::is_err) {
            self.stats.faulted_cycles += 1;
            for (axis, result) in results.iter().enumerate() {
                if let Err(e) = result {
                    crate::debug_log!(self.debug_log, "{} fault: {}", AXIS_NAMES[axis], e);
                }
            }
        }

        if self.report_interval > 0 && (self.stats.cycle_count + 1) % self.report_interval == 0 {
            self.report();
        }
    }

    fn should_continue(&self) -> bool {
        self.running.load(Ordering::Relaxed)
            && (self.max_ticks == 0 || self.stats.cycle_count < self.max_ticks)
    }

    fn report(&mut self) {
        for axis in 0..AXIS_COUNT {
            let Some(frame) = self.telemetry.frame(axis) else {
                continue;
            };
            debug!(
                axis = AXIS_NAMES[axis],
                u = frame.slots[slot::CONTROL_OUTPUT],
                z = frame.slots[slot::PERFORMANCE_SIGNAL],
                yp = frame.slots[slot::MEASUREMENT],
                r = frame.slots[slot::REFERENCE_COMMAND],
                phi0 = frame.slots[slot::REGRESSOR_0],
                "telemetry"
            );
            if let Some(integrator) = self
                .controller
                .axis(axis)
                .and_then(|a| a.history().integrator())
            {
                self.debug_log.log_float(AXIS_NAMES[axis], integrator);
            }
        }
    }

    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self) -> Result<(), CycleError> {
        use std::time::{Duration, Instant};

        let cycle_duration = Duration::from_nanos(self.cycle_time_ns as u64);

        while self.should_continue() {
            let cycle_start = Instant::now();
            self.step();
            let elapsed = cycle_start.elapsed();
            let duration_ns = elapsed.as_nanos() as i64;
            self.stats.record(duration_ns);

            if duration_ns > self.cycle_time_ns {
                // Simulation: count and continue.
                self.stats.overruns += 1;
                warn!(
                    duration_ns,
                    budget_ns = self.cycle_time_ns,
                    "cycle overrun (simulation)"
                );
            }

            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }

    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self) -> Result<(), CycleError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};

        let clock = ClockId::CLOCK_MONOTONIC;
        let mut next_wake = clock_gettime(clock)
            .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;

        while self.should_continue() {
            next_wake = timespec_add_ns(next_wake, self.cycle_time_ns);

            let cycle_start = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;
            self.step();
            let cycle_end = clock_gettime(clock)
                .map_err(|e| CycleError::RtSetup(format!("clock_gettime: {e}")))?;

            let duration_ns = timespec_diff_ns(&cycle_end, &cycle_start);
            self.stats.record(duration_ns);

            if duration_ns > self.cycle_time_ns {
                self.stats.overruns += 1;
                return Err(CycleError::CycleOverrun {
                    actual_ns: duration_ns,
                    budget_ns: self.cycle_time_ns,
                });
            }

            let _ = clock_nanosleep(clock, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }
}

// ─── Time Helpers ───────────────────────────────────────────────────

#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    nix::sys::time::TimeSpec::new(secs, nanos)
}

#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Tests ──────────────────────────────────────────────────────────
