//! Metric counters gated by a warm-up threshold, and the ungated lifecycle
//! census.

use std::time::Duration;

use ix_core::Tick;

// ── Metrics ───────────────────────────────────────────────────────────────────

/// Running counters of one run.
///
/// Every `record_*` method is a no-op before `start`: state transitions always
/// happen, but the startup transient is not counted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    /// First tick that is counted.
    pub start: Tick,

    pub n_lateral:          u64,
    pub n_rear_end:         u64,
    pub n_vehicles:         u64,
    pub throughput:         u64,
    pub completed_vehicles: u64,
    /// Sum of `exit tick - entry tick` over completed vehicles.
    pub total_travel_time:  u64,
    /// Sum of cells travelled by completed vehicles.
    pub total_distance:     u64,
}

impl Metrics {
    pub fn new(start: Tick) -> Self {
        Self { start, ..Self::default() }
    }

    #[inline]
    pub fn is_counting(&self, now: Tick) -> bool {
        now >= self.start
    }

    pub fn record_injection(&mut self, now: Tick) {
        if self.is_counting(now) {
            self.n_vehicles += 1;
        }
    }

    pub fn record_entry(&mut self, now: Tick) {
        if self.is_counting(now) {
            self.throughput += 1;
        }
    }

    pub fn record_rear_end(&mut self, now: Tick) {
        if self.is_counting(now) {
            self.n_rear_end += 1;
        }
    }

    pub fn record_lateral(&mut self, now: Tick) {
        if self.is_counting(now) {
            self.n_lateral += 1;
        }
    }

    pub fn record_completion(&mut self, now: Tick, travel_time: u64, distance: u64) {
        if self.is_counting(now) {
            self.completed_vehicles += 1;
            self.total_travel_time += travel_time;
            self.total_distance += distance;
        }
    }

    /// Lateral collisions per rear-end collision; 0 when there are none.
    pub fn lateral_to_rear_end_ratio(&self) -> f64 {
        ratio(self.n_lateral, self.n_rear_end)
    }

    /// Mean travel time in ticks of completed vehicles.
    pub fn avg_travel_time(&self) -> f64 {
        ratio(self.total_travel_time, self.completed_vehicles)
    }

    /// Mean speed of completed vehicles in cells per tick.
    pub fn avg_speed(&self) -> f64 {
        ratio(self.total_distance, self.total_travel_time)
    }

    pub fn snapshot(&self, run_time: Duration) -> MetricsSnapshot {
        MetricsSnapshot {
            n_lateral:                 self.n_lateral,
            n_rear_end:                self.n_rear_end,
            n_vehicles:                self.n_vehicles,
            throughput:                self.throughput,
            completed_vehicles:        self.completed_vehicles,
            avg_travel_time:           self.avg_travel_time(),
            avg_speed:                 self.avg_speed(),
            lateral_to_rear_end_ratio: self.lateral_to_rear_end_ratio(),
            run_time_secs:             run_time.as_secs_f64(),
        }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

// ── MetricsSnapshot ───────────────────────────────────────────────────────────

/// Point-in-time copy of the metrics, including derived values and the
/// accumulated wall-clock run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub n_lateral:                 u64,
    pub n_rear_end:                u64,
    pub n_vehicles:                u64,
    pub throughput:                u64,
    pub completed_vehicles:        u64,
    pub avg_travel_time:           f64,
    pub avg_speed:                 f64,
    pub lateral_to_rear_end_ratio: f64,
    pub run_time_secs:             f64,
}

// ── Census ────────────────────────────────────────────────────────────────────

/// Lifecycle totals, never gated by warm-up.
///
/// Between ticks `spawned == completed + collided + active vehicles`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    /// Vehicles created by injection or direct placement.
    pub spawned:   u64,
    /// Vehicles that ran off the end of their road.
    pub completed: u64,
    /// Vehicles removed after a collision.
    pub collided:  u64,
}

impl Census {
    /// Vehicles that should still be on the road.
    pub fn outstanding(&self) -> u64 {
        self.spawned - self.completed - self.collided
    }
}
