//! Per-vehicle state.

use ix_core::{Lane, Road, Tick, VehicleId};

/// One traffic participant.
///
/// Every vehicle occupies exactly one cell.  `road` never changes; `lane`
/// changes only through the lane-change phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Sequential identity, never reused within a run.
    pub id: VehicleId,

    pub road: Road,
    pub lane: Lane,

    /// Cell index, `0 <= position < L_total` while active.
    pub position: u32,

    /// Cells per tick, `0 <= velocity <= v_max`.
    pub velocity: u32,

    /// Maximum velocity, fixed at injection.
    pub v_max: u32,

    /// Individual red-light violation probability.
    pub p_red: f64,

    /// Individual braking-failure probability.
    pub p_skid: f64,

    /// Set once the vehicle is involved in any collision; never reset.
    pub collided: bool,

    /// Tick of injection, used for travel-time accounting.
    pub entry_tick: Tick,
}

impl Vehicle {
    /// A stationary vehicle at cell 0.
    pub fn new(
        id:         VehicleId,
        road:       Road,
        lane:       Lane,
        v_max:      u32,
        p_red:      f64,
        p_skid:     f64,
        entry_tick: Tick,
    ) -> Self {
        Self {
            id,
            road,
            lane,
            position: 0,
            velocity: 0,
            v_max,
            p_red,
            p_skid,
            collided: false,
            entry_tick,
        }
    }

    /// Mark the vehicle as crashed.  Idempotent.
    #[inline]
    pub fn mark_collided(&mut self) {
        self.collided = true;
    }

    /// `true` while the vehicle still takes part in the update.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.collided
    }
}
