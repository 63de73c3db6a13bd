//! `ix-sim`: the intersection update engine.
//!
//! # Tick phases
//!
//! ```text
//! for tick in 0..steps:
//!   1. Lights   flip both lights when tick % t_green == 0.
//!   2. Inject   one draw against injection_rate; random road and lane;
//!               spawn at cell 0 if it is free.
//!   3. Lanes    (if enabled) blocked vehicles switch to a safe, roomier
//!               lane with probability p_chg; applied immediately.
//!   4. Intents  NaSch acceleration, gap braking or skid, random braking;
//!               tentative (position, velocity) per vehicle, buffered.
//!   5. Lateral  entrants on both roads in the same tick crash at the
//!               intersection's entry edge.
//!   6. Commit   remove collided and finished vehicles, write positions,
//!               rebuild the grid; advance the clock.
//! ```
//!
//! Phases 4 and 5 read the grid as committed at the end of the previous
//! tick; only commit writes it.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ix_core::{IntersectionConfig, ModelParams};
//! use ix_sim::SimBuilder;
//!
//! let mut sim = SimBuilder::new(IntersectionConfig::default(), ModelParams::normal())
//!     .build()?;
//! sim.run(10_000);
//! println!("{:?}", sim.metrics());
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod report;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metrics::{Census, Metrics, MetricsSnapshot};
pub use observer::{NoopObserver, SimObserver};
pub use report::{RunParams, TickReport, VehicleView};
pub use sim::IntersectionSim;
