//! Simulation observer trait for progress reporting and data collection.

use ix_core::{LightState, Tick};

use crate::{MetricsSnapshot, TickReport};

/// Callbacks invoked by [`IntersectionSim::run_observed`][crate::IntersectionSim::run_observed]
/// at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: collision printer
///
/// ```rust,ignore
/// struct CrashPrinter;
///
/// impl SimObserver for CrashPrinter {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport, _lights: [LightState; 2]) {
///         if report.lateral {
///             println!("{tick}: lateral collision");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the lights update.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after commit, before the clock advances.
    ///
    /// `lights` are the `[R1, R2]` states that were in force during the tick.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport, _lights: [LightState; 2]) {}

    /// Called once after the last tick of a bulk run.
    fn on_run_end(&mut self, _final_tick: Tick, _metrics: &MetricsSnapshot) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
