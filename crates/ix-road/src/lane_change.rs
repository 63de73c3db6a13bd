//! Lane-change evaluation and execution.
//!
//! A switch to the neighbouring lane of the same road is considered only for
//! a vehicle blocked by another vehicle.  It must be
//!
//! 1. **free**: the cell beside the vehicle is empty,
//! 2. **safe**: the nearest follower in the target lane cannot reach the
//!    vehicle's cell next tick (`follower.velocity <= back gap`),
//! 3. **advantageous**: the front gap in the target lane is strictly larger
//!    than the current one.
//!
//! The probabilistic `p_chg` decision is left to the engine.

use ix_core::RandomSource;

use crate::{FrontGap, Roadway, Slot};

/// Outcome of [`Roadway::evaluate_lane_change`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum LaneChange {
    /// The neighbouring cell is occupied.
    Blocked,
    /// A follower in the target lane would run into the vehicle.
    Unsafe,
    /// The target lane offers no more room than the current one.
    NoAdvantage,
    /// Safe and advantageous.
    Advised,
}

impl LaneChange {
    #[inline]
    pub fn is_advised(self) -> bool {
        matches!(self, LaneChange::Advised)
    }
}

impl Roadway {
    /// Evaluate switching `slot` to its other lane, given its `current` front
    /// gap.
    ///
    /// May draw from `rng` once, through the target-lane gap query.
    pub fn evaluate_lane_change<R: RandomSource>(
        &self,
        slot:    Slot,
        current: FrontGap,
        rng:     &mut R,
    ) -> LaneChange {
        let v = self.fleet.get(slot);
        let target = v.lane.other();

        if !self.grid.is_free(v.road, target, v.position) {
            return LaneChange::Blocked;
        }

        if let Some(follower) = self.find_back_vehicle(slot, target) {
            let back_gap = self.find_back_gap(slot, target);
            if self.fleet.get(follower).velocity > back_gap {
                return LaneChange::Unsafe;
            }
        }

        let other = self.find_front_gap_in(slot, v.road, target, rng);
        if other.gap > current.gap {
            LaneChange::Advised
        } else {
            LaneChange::NoAdvantage
        }
    }

    /// Convenience form of [`evaluate_lane_change`](Self::evaluate_lane_change)
    /// that first queries the current front gap.
    pub fn can_change_lane<R: RandomSource>(&self, slot: Slot, rng: &mut R) -> bool {
        let current = self.find_front_gap(slot, rng);
        self.evaluate_lane_change(slot, current, rng).is_advised()
    }

    /// Move `slot` to the same position in its other lane, immediately.
    ///
    /// The target cell must be free.
    pub fn switch_lane(&mut self, slot: Slot) {
        let (road, lane, position) = {
            let v = self.fleet.get(slot);
            (v.road, v.lane, v.position)
        };
        let target = lane.other();
        self.grid.remove(road, lane, position);
        self.grid.place(road, target, position, slot);
        self.fleet.get_mut(slot).lane = target;
    }
}
