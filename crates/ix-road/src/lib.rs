//! `ix-road`: spatial state of the intersection and the read-only queries
//! the update engine asks of it.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`vehicle`]     | `Vehicle`: one traffic participant                           |
//! | [`fleet`]       | `Fleet`: active-vehicle arena addressed by `Slot`            |
//! | [`grid`]        | `OccupancyGrid`: flat `2 × 2 × L_total` array of slots       |
//! | [`signal`]      | `TrafficLights`: the two-road light controller               |
//! | [`roadway`]     | `Roadway`: grid + fleet + lights; gap-finding queries        |
//! | [`lane_change`] | Lane-change safety/advantage evaluation on `Roadway`          |
//!
//! # Handles, not references
//!
//! A grid cell stores a [`Slot`]: the index of the vehicle in the [`Fleet`].
//! The vehicle's authoritative state lives once, in the fleet.  Slots are
//! stable for the whole tick; the engine rebuilds the grid at commit time,
//! which is the only point where slots are renumbered.

pub mod fleet;
pub mod grid;
pub mod lane_change;
pub mod roadway;
pub mod signal;
pub mod vehicle;


pub use fleet::{Fleet, Slot};
pub use grid::OccupancyGrid;
pub use lane_change::LaneChange;
pub use roadway::{FrontGap, GapReason, Roadway};
pub use signal::TrafficLights;
pub use vehicle::Vehicle;
