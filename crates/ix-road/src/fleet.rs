//! The `Fleet`: arena of active vehicles in injection order.

use std::fmt;

use ix_core::{Lane, Road, Tick, VehicleId};

use crate::Vehicle;

/// Index of a vehicle in the [`Fleet`].  This is what grid cells store.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Slot(pub u32);

impl Slot {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// Active vehicles, kept in injection order.
///
/// Iteration order is part of the update contract: the lane-change and move
/// phases visit vehicles in slot order, and removal with
/// [`retain_slots`](Self::retain_slots) preserves the relative order of
/// survivors.
#[derive(Debug, Default)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    next_id:  VehicleId,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new vehicle and return its slot and id.
    ///
    /// The caller is responsible for placing it on the grid.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        &mut self,
        road:       Road,
        lane:       Lane,
        position:   u32,
        velocity:   u32,
        v_max:      u32,
        p_red:      f64,
        p_skid:     f64,
        entry_tick: Tick,
    ) -> (Slot, VehicleId) {
        let id = self.next_id;
        self.next_id = id.next();

        let mut vehicle = Vehicle::new(id, road, lane, v_max, p_red, p_skid, entry_tick);
        vehicle.position = position;
        vehicle.velocity = velocity.min(v_max);

        let slot = Slot(self.vehicles.len() as u32);
        self.vehicles.push(vehicle);
        (slot, id)
    }

    #[inline]
    pub fn get(&self, slot: Slot) -> &Vehicle {
        &self.vehicles[slot.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, slot: Slot) -> &mut Vehicle {
        &mut self.vehicles[slot.index()]
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Slots of all active vehicles, in iteration order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + use<> {
        (0..self.vehicles.len() as u32).map(Slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> + '_ {
        self.vehicles.iter()
    }

    /// Drop every vehicle whose `keep` flag is `false`.
    ///
    /// `keep` is indexed by slot and must have one entry per vehicle.  Slots
    /// of survivors are renumbered; any grid built on the old slots is stale.
    pub fn retain_slots(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.vehicles.len());
        let mut flags = keep.iter();
        self.vehicles.retain(|_| flags.next().copied().unwrap_or(false));
    }

    /// Find the slot of the vehicle with `id`.  Linear scan.
    pub fn slot_of(&self, id: VehicleId) -> Option<Slot> {
        self.vehicles
            .iter()
            .position(|v| v.id == id)
            .map(|i| Slot(i as u32))
    }
}
