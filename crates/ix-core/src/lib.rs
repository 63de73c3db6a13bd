//! `ix-core`: foundational types for the `nasch_ix` intersection simulator.
//!
//! This crate is a dependency of every other `ix-*` crate.  It has no `ix-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `RunId`                                  |
//! | [`time`]        | `Tick`                                                |
//! | [`road`]        | `Road`, `Lane`, `LightState`, `Weather`               |
//! | [`params`]      | `ModelParams`, `IntersectionConfig`, `Geometry`       |
//! | [`rng`]         | `RandomSource` trait, `SimRng`, `ScriptedRng`         |
//! | [`error`]       | `ConfigError`, `ConfigResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to configuration and enums. |

pub mod error;
pub mod ids;
pub mod params;
pub mod rng;
pub mod road;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{ConfigError, ConfigResult};
pub use ids::{RunId, VehicleId};
pub use params::{Geometry, INTERSECTION_SIZE, IntersectionConfig, ModelParams};
pub use rng::{RandomSource, ScriptedRng, SimRng, derive_seed};
pub use road::{Lane, LightState, Road, Weather};
pub use time::Tick;
