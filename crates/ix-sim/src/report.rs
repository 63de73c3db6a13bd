//! Read-only views handed to callers: the configuration echo, per-vehicle
//! renderer views, and the per-tick event report.

use ix_core::{Lane, Road, Tick, VehicleId, Weather};
use ix_road::Vehicle;

/// The parameters a run was built with, for result-row construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParams {
    pub length:             u32,
    pub v_max:              u32,
    pub t_green:            u64,
    pub injection_rate:     f64,
    pub p_b:                f64,
    pub p_chg:              f64,
    pub p_red:              f64,
    pub p_skid:             f64,
    pub lane_changing:      bool,
    pub weather:            Weather,
    pub metrics_start_step: u64,
    pub seed:               u64,
    /// Ticks executed so far.
    pub steps:              u64,
}

/// Snapshot of one active vehicle, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleView {
    pub id:       VehicleId,
    pub road:     Road,
    pub lane:     Lane,
    pub position: u32,
    pub velocity: u32,
    pub collided: bool,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self {
            id:       v.id,
            road:     v.road,
            lane:     v.lane,
            position: v.position,
            velocity: v.velocity,
            collided: v.collided,
        }
    }
}

/// What happened during one tick.  Counts here are never warm-up gated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick:          Tick,
    pub light_toggled: bool,
    /// Vehicle created by this tick's injection, if any.
    pub injected:      Option<VehicleId>,
    pub lane_changes:  u32,
    /// Intersection entrants per road, `[R1, R2]`.
    pub entrants:      [u32; 2],
    pub lateral:       bool,
    pub rear_ends:     u32,
    /// Vehicles that left the road at its far end.
    pub completed:     u32,
    /// Collided vehicles removed at commit.
    pub removed:       u32,
    /// Vehicles still on the road after commit.
    pub active:        u32,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }
}
