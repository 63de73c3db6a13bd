//! `Roadway`: the spatial aggregate the engine mutates, plus the gap-finding
//! queries the NaSch rules are built on.
//!
//! # Gap semantics
//!
//! A gap is the number of empty cells between a vehicle and the next
//! obstacle.  [`Roadway::find_front_gap`] also reports *why* the vehicle is
//! limited:
//!
//! | Reason                | Obstacle                                          |
//! |-----------------------|---------------------------------------------------|
//! | [`GapReason::Vehicle`]  | Another vehicle in the queried lane             |
//! | [`GapReason::RedLight`] | The stop line of a red light                    |
//! | [`GapReason::Empty`]    | Nothing; the gap is the `2 * L_total` sentinel  |
//!
//! A red light only binds vehicles still approaching the stop line.  When it
//! binds and no vehicle sits before the stop line, the driver draws once
//! against its `p_red`; a successful draw means it intends to run the light,
//! and the query then looks past the stop line as if the light were green.
//! A vehicle directly at the stop line never draws.

use ix_core::{Geometry, Lane, RandomSource, Road};

use crate::{Fleet, OccupancyGrid, Slot, TrafficLights};

/// What limits a vehicle's forward motion.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GapReason {
    Vehicle,
    RedLight,
    Empty,
}

/// Result of a front-gap query.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FrontGap {
    pub gap:    u32,
    pub reason: GapReason,
}

impl FrontGap {
    #[inline]
    pub fn vehicle(gap: u32) -> Self {
        Self { gap, reason: GapReason::Vehicle }
    }

    #[inline]
    pub fn red_light(gap: u32) -> Self {
        Self { gap, reason: GapReason::RedLight }
    }

    #[inline]
    pub fn empty(geometry: &Geometry) -> Self {
        Self { gap: geometry.open_gap(), reason: GapReason::Empty }
    }
}

/// Grid, vehicles and lights of one intersection.
///
/// All fields are `pub` for direct access by the engine.  Invariant between
/// ticks: every non-collided vehicle in `fleet` occupies exactly the grid cell
/// `(road, lane, position)`, and that cell holds its slot.
#[derive(Debug)]
pub struct Roadway {
    pub geometry: Geometry,
    pub grid:     OccupancyGrid,
    pub fleet:    Fleet,
    pub lights:   TrafficLights,
}

impl Roadway {
    /// An empty roadway with the lights in their initial state.
    pub fn new(geometry: Geometry, t_green: u64) -> Self {
        Self {
            grid: OccupancyGrid::new(geometry.l_total),
            fleet: Fleet::new(),
            lights: TrafficLights::new(t_green),
            geometry,
        }
    }

    // ── Front queries ─────────────────────────────────────────────────────

    /// Front gap of the vehicle in `slot`, in its own road and lane.
    pub fn find_front_gap<R: RandomSource>(&self, slot: Slot, rng: &mut R) -> FrontGap {
        let v = self.fleet.get(slot);
        self.find_front_gap_in(slot, v.road, v.lane, rng)
    }

    /// Front gap the vehicle in `slot` would have in `(road, lane)` at its
    /// current position.
    pub fn find_front_gap_in<R: RandomSource>(
        &self,
        slot: Slot,
        road: Road,
        lane: Lane,
        rng:  &mut R,
    ) -> FrontGap {
        let v = self.fleet.get(slot);
        let position = v.position;
        let cells = self.grid.lane(road, lane);
        let start = self.geometry.intersection_start;

        if self.lights.is_red(road) && self.geometry.is_approaching(position) {
            if let Some(i) = first_occupied(cells, position + 1, start) {
                return FrontGap::vehicle(i - position - 1);
            }
            let to_stop_line = start - position - 1;
            if to_stop_line == 0 {
                return FrontGap::red_light(0);
            }
            if !rng.chance(v.p_red) {
                return FrontGap::red_light(to_stop_line);
            }
            // Running the light: the approach is known to be clear.
            return match first_occupied(cells, start, self.geometry.l_total) {
                Some(i) => FrontGap::vehicle(i - position - 1),
                None => FrontGap::empty(&self.geometry),
            };
        }

        match first_occupied(cells, position + 1, self.geometry.l_total) {
            Some(i) => FrontGap::vehicle(i - position - 1),
            None => FrontGap::empty(&self.geometry),
        }
    }

    /// Nearest vehicle ahead of `slot` in its own lane.
    pub fn find_front_vehicle(&self, slot: Slot) -> Option<Slot> {
        let v = self.fleet.get(slot);
        let cells = self.grid.lane(v.road, v.lane);
        first_occupied(cells, v.position + 1, self.geometry.l_total)
            .and_then(|i| cells[i as usize])
    }

    // ── Back queries ──────────────────────────────────────────────────────

    /// Empty cells between `slot` and the nearest vehicle behind it in `lane`
    /// of its own road, or the open-road sentinel if there is none.
    pub fn find_back_gap(&self, slot: Slot, lane: Lane) -> u32 {
        let v = self.fleet.get(slot);
        let cells = self.grid.lane(v.road, lane);
        match last_occupied(cells, v.position) {
            Some(i) => v.position - i - 1,
            None => self.geometry.open_gap(),
        }
    }

    /// Nearest vehicle behind `slot` in `lane` of its own road.
    pub fn find_back_vehicle(&self, slot: Slot, lane: Lane) -> Option<Slot> {
        let v = self.fleet.get(slot);
        let cells = self.grid.lane(v.road, lane);
        last_occupied(cells, v.position).and_then(|i| cells[i as usize])
    }
}

// ── Lane scans ────────────────────────────────────────────────────────────────

/// First occupied index in `from..to`.
fn first_occupied(cells: &[Option<Slot>], from: u32, to: u32) -> Option<u32> {
    let to = (to as usize).min(cells.len());
    let from = from as usize;
    if from >= to {
        return None;
    }
    cells[from..to]
        .iter()
        .position(Option::is_some)
        .map(|offset| (from + offset) as u32)
}

/// Last occupied index in `0..before`.
fn last_occupied(cells: &[Option<Slot>], before: u32) -> Option<u32> {
    let before = (before as usize).min(cells.len());
    cells[..before]
        .iter()
        .rposition(Option::is_some)
        .map(|i| i as u32)
}
