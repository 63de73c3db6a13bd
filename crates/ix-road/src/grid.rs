//! Occupancy grid over all four `(road, lane)` cell arrays.
//!
//! # Data layout
//!
//! One flat `Vec<Option<Slot>>` of length `4 * l_total`.  The cells of
//! `(road, lane)` occupy the contiguous range
//!
//! ```text
//! cells[ (road.index() * 2 + lane.index()) * l_total .. + l_total ]
//! ```
//!
//! so scanning ahead or behind a vehicle is a contiguous memory walk.
//!
//! The grid is derived state: the engine clears and rebuilds it from the
//! fleet's committed positions once per tick.

use ix_core::{Lane, Road};

use crate::{Fleet, Slot};

const LANE_ARRAYS: usize = 4;

/// Maps every cell of every lane to the vehicle occupying it, if any.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    l_total: u32,
    cells:   Vec<Option<Slot>>,
}

impl OccupancyGrid {
    /// An empty grid with `l_total` cells per lane.
    pub fn new(l_total: u32) -> Self {
        Self {
            l_total,
            cells: vec![None; LANE_ARRAYS * l_total as usize],
        }
    }

    pub fn l_total(&self) -> u32 {
        self.l_total
    }

    #[inline(always)]
    fn base(&self, road: Road, lane: Lane) -> usize {
        (road.index() * 2 + lane.index()) * self.l_total as usize
    }

    /// All cells of one lane, indexed by position.
    #[inline]
    pub fn lane(&self, road: Road, lane: Lane) -> &[Option<Slot>] {
        let base = self.base(road, lane);
        &self.cells[base..base + self.l_total as usize]
    }

    /// Occupant of `(road, lane, cell)`.  Out-of-range cells are empty.
    #[inline]
    pub fn get(&self, road: Road, lane: Lane, cell: u32) -> Option<Slot> {
        if cell >= self.l_total {
            return None;
        }
        self.cells[self.base(road, lane) + cell as usize]
    }

    #[inline]
    pub fn is_free(&self, road: Road, lane: Lane, cell: u32) -> bool {
        self.get(road, lane, cell).is_none()
    }

    /// Put `slot` into `(road, lane, cell)`.
    ///
    /// The cell must be in range and empty.
    pub fn place(&mut self, road: Road, lane: Lane, cell: u32, slot: Slot) {
        debug_assert!(cell < self.l_total, "cell {cell} out of range");
        let i = self.base(road, lane) + cell as usize;
        debug_assert!(self.cells[i].is_none(), "cell {cell} of {road}/{lane} already occupied");
        self.cells[i] = Some(slot);
    }

    /// Empty `(road, lane, cell)`, returning its previous occupant.
    pub fn remove(&mut self, road: Road, lane: Lane, cell: u32) -> Option<Slot> {
        if cell >= self.l_total {
            return None;
        }
        let i = self.base(road, lane) + cell as usize;
        self.cells[i].take()
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Clear and repopulate from the fleet's current positions.
    ///
    /// Collided vehicles are not placed.
    pub fn rebuild(&mut self, fleet: &Fleet) {
        self.clear();
        for slot in fleet.slots() {
            let v = fleet.get(slot);
            if v.is_active() {
                self.place(v.road, v.lane, v.position, slot);
            }
        }
    }

    /// Number of occupied cells across all lanes.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate `(road, lane, cell, slot)` over every occupied cell.
    pub fn occupants(&self) -> impl Iterator<Item = (Road, Lane, u32, Slot)> + '_ {
        Road::ALL.into_iter().flat_map(move |road| {
            Lane::ALL.into_iter().flat_map(move |lane| {
                self.lane(road, lane)
                    .iter()
                    .enumerate()
                    .filter_map(move |(cell, s)| s.map(|slot| (road, lane, cell as u32, slot)))
            })
        })
    }
}
