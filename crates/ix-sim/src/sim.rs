//! The `IntersectionSim` struct and its tick loop.

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use ix_core::{
    Geometry, IntersectionConfig, Lane, LightState, ModelParams, RandomSource, Road, SimRng,
    Tick, VehicleId,
};
use ix_road::{GapReason, Roadway, Slot};

use crate::{
    Census, Metrics, MetricsSnapshot, NoopObserver, RunParams, SimBuilder, SimObserver,
    SimResult, TickReport, VehicleView,
};

/// Tentative end-of-tick state of one vehicle, indexed by slot.
#[derive(Copy, Clone, Debug)]
struct MoveIntent {
    position: u32,
    velocity: u32,
}

/// One intersection simulation.
///
/// Owns its roadway, counters and random stream; nothing is shared between
/// instances, so any number of them can run side by side.
///
/// Create via [`SimBuilder`] (or [`IntersectionSim::new`]), then drive with
/// [`step`](Self::step), [`run`](Self::run) or
/// [`run_observed`](Self::run_observed).
pub struct IntersectionSim<R: RandomSource = SimRng> {
    config:   IntersectionConfig,
    params:   ModelParams,
    roadway:  Roadway,
    metrics:  Metrics,
    census:   Census,
    rng:      R,
    time:     Tick,
    run_time: Duration,
    last:     TickReport,
}

impl IntersectionSim<SimRng> {
    /// Validate and build a simulation seeded from `config.seed`.
    pub fn new(config: IntersectionConfig, params: ModelParams) -> SimResult<Self> {
        SimBuilder::new(config, params).build()
    }
}

impl<R: RandomSource> IntersectionSim<R> {
    /// Assemble from already-validated parts.
    pub(crate) fn from_parts(config: IntersectionConfig, params: ModelParams, rng: R) -> Self {
        let geometry = config.geometry();
        Self {
            roadway:  Roadway::new(geometry, config.t_green),
            metrics:  Metrics::new(Tick(config.metrics_start_step)),
            census:   Census::default(),
            rng,
            time:     Tick::ZERO,
            run_time: Duration::ZERO,
            last:     TickReport::default(),
            config,
            params,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Advance exactly one tick.
    pub fn step(&mut self) {
        self.process_tick(&mut NoopObserver);
    }

    /// Advance one tick with the observer's tick hooks.  `on_run_end` is not
    /// called.
    pub fn step_observed<O: SimObserver>(&mut self, observer: &mut O) {
        self.process_tick(observer);
    }

    /// Run `steps` ticks, adding the wall-clock duration to the run time.
    pub fn run(&mut self, steps: u64) {
        self.run_observed(steps, &mut NoopObserver);
    }

    /// Run `steps` ticks, calling observer hooks at every tick boundary.
    pub fn run_observed<O: SimObserver>(&mut self, steps: u64, observer: &mut O) {
        info!(
            "run: {steps} ticks from {} (L={}, vmax={}, t_green={}, rate={})",
            self.time,
            self.config.length,
            self.config.v_max,
            self.config.t_green,
            self.config.injection_rate,
        );
        let started = Instant::now();
        for _ in 0..steps {
            self.process_tick(observer);
        }
        self.run_time += started.elapsed();

        let snapshot = self.metrics();
        info!(
            "run finished at {} in {:.3}s: {} injected, {} completed, {} lateral, {} rear-end",
            self.time,
            self.run_time.as_secs_f64(),
            snapshot.n_vehicles,
            snapshot.completed_vehicles,
            snapshot.n_lateral,
            snapshot.n_rear_end,
        );
        observer.on_run_end(self.time, &snapshot);
    }

    /// Place a vehicle directly, bypassing injection.
    ///
    /// Returns `None` if the cell is out of range or occupied.  The vehicle is
    /// counted in the census but not as injected.
    pub fn place_vehicle(
        &mut self,
        road:     Road,
        lane:     Lane,
        position: u32,
        velocity: u32,
    ) -> Option<VehicleId> {
        if position >= self.roadway.geometry.l_total
            || !self.roadway.grid.is_free(road, lane, position)
        {
            return None;
        }
        Some(self.spawn(road, lane, position, velocity))
    }

    // ── Read-only accessors ───────────────────────────────────────────────

    /// Ticks executed so far.
    pub fn time_step(&self) -> Tick {
        self.time
    }

    pub fn light(&self, road: Road) -> LightState {
        self.roadway.lights.state(road)
    }

    /// `[R1, R2]` light states.
    pub fn lights(&self) -> [LightState; 2] {
        self.roadway.lights.pair()
    }

    pub fn geometry(&self) -> Geometry {
        self.roadway.geometry
    }

    pub fn vehicles(&self) -> impl Iterator<Item = VehicleView> + '_ {
        self.roadway.fleet.iter().map(VehicleView::from)
    }

    pub fn active_count(&self) -> usize {
        self.roadway.fleet.len()
    }

    /// The vehicle occupying `(road, lane, cell)`, if any.
    pub fn occupant(&self, road: Road, lane: Lane, cell: u32) -> Option<VehicleView> {
        self.roadway
            .grid
            .get(road, lane, cell)
            .map(|slot| VehicleView::from(self.roadway.fleet.get(slot)))
    }

    pub fn roadway(&self) -> &Roadway {
        &self.roadway
    }

    pub fn census(&self) -> Census {
        self.census
    }

    pub fn counters(&self) -> &Metrics {
        &self.metrics
    }

    /// Report of the most recently completed tick.
    pub fn last_report(&self) -> &TickReport {
        &self.last
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot(self.run_time)
    }

    /// Parameters of this run, with the number of ticks executed so far.
    pub fn run_params(&self) -> RunParams {
        RunParams {
            length:             self.config.length,
            v_max:              self.config.v_max,
            t_green:            self.config.t_green,
            injection_rate:     self.config.injection_rate,
            p_b:                self.params.p_b,
            p_chg:              self.params.p_chg,
            p_red:              self.params.p_red,
            p_skid:             self.params.p_skid,
            lane_changing:      self.params.lane_changing,
            weather:            self.params.weather,
            metrics_start_step: self.config.metrics_start_step,
            seed:               self.config.seed,
            steps:              self.time.0,
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.time;
        observer.on_tick_start(now);
        let mut report = TickReport::new(now);

        // ── Phase 0: lights ───────────────────────────────────────────────
        if self.roadway.lights.update(now) {
            report.light_toggled = true;
            debug!(
                "{now}: lights R1={} R2={}",
                self.roadway.lights.state(Road::R1),
                self.roadway.lights.state(Road::R2),
            );
        }

        // ── Phase 1: injection ────────────────────────────────────────────
        report.injected = self.inject(now);

        // ── Phase 2: lane changes ─────────────────────────────────────────
        if self.params.lane_changing {
            report.lane_changes = self.change_lanes(now);
        }

        // ── Phase 3: tentative moves ──────────────────────────────────────
        let (mut intents, entrants) = self.compute_moves(now, &mut report);

        // ── Phase 4: lateral collisions ───────────────────────────────────
        self.resolve_lateral(now, &mut intents, &entrants, &mut report);

        // ── Phase 5: commit ───────────────────────────────────────────────
        self.commit(now, &intents, &mut report);

        let lights = self.roadway.lights.pair();
        observer.on_tick_end(now, &report, lights);
        self.last = report;
        self.time = now + 1;
    }

    fn spawn(&mut self, road: Road, lane: Lane, position: u32, velocity: u32) -> VehicleId {
        let (slot, id) = self.roadway.fleet.spawn(
            road,
            lane,
            position,
            velocity,
            self.config.v_max,
            self.params.p_red,
            self.params.p_skid,
            self.time,
        );
        self.roadway.grid.place(road, lane, position, slot);
        self.census.spawned += 1;
        id
    }

    fn inject(&mut self, now: Tick) -> Option<VehicleId> {
        if !self.rng.chance(self.config.injection_rate) {
            return None;
        }
        let road = Road::ALL[self.rng.next_index(Road::ALL.len())];
        let lane = Lane::ALL[self.rng.next_index(Lane::ALL.len())];
        if !self.roadway.grid.is_free(road, lane, 0) {
            return None;
        }
        let id = self.spawn(road, lane, 0, 0);
        self.metrics.record_injection(now);
        trace!("{now}: injected {id} on {road}/{lane}");
        Some(id)
    }

    /// Blocked vehicles consider the other lane; accepted switches apply
    /// immediately so later vehicles see them.
    fn change_lanes(&mut self, now: Tick) -> u32 {
        let mut changes = 0;
        for slot in self.roadway.fleet.slots() {
            if self.roadway.fleet.get(slot).collided {
                continue;
            }
            let current = self.roadway.find_front_gap(slot, &mut self.rng);
            if current.reason != GapReason::Vehicle {
                continue;
            }
            let verdict = self.roadway.evaluate_lane_change(slot, current, &mut self.rng);
            if !verdict.is_advised() || !self.rng.chance(self.params.p_chg) {
                continue;
            }
            self.roadway.switch_lane(slot);
            changes += 1;
            let v = self.roadway.fleet.get(slot);
            trace!("{now}: {} switched to {}/{} at {}", v.id, v.road, v.lane, v.position);
        }
        changes
    }

    /// NaSch rules against the pre-move grid.  Returns one intent per slot and
    /// the slots entering the intersection this tick, per road.
    fn compute_moves(&mut self, now: Tick, report: &mut TickReport) -> (Vec<MoveIntent>, [Vec<Slot>; 2]) {
        let geometry = self.roadway.geometry;
        let mut intents = Vec::with_capacity(self.roadway.fleet.len());
        let mut entrants: [Vec<Slot>; 2] = [Vec::new(), Vec::new()];

        for slot in self.roadway.fleet.slots() {
            let v = self.roadway.fleet.get(slot);
            if v.collided {
                intents.push(MoveIntent { position: v.position, velocity: 0 });
                continue;
            }
            let (position, road, p_skid) = (v.position, v.road, v.p_skid);
            let mut speed = (v.velocity + 1).min(v.v_max);

            let front = self.roadway.find_front_gap(slot, &mut self.rng);
            let mut skidded = false;
            if speed > front.gap {
                match front.reason {
                    GapReason::Vehicle if self.rng.chance(p_skid) => skidded = true,
                    GapReason::Vehicle | GapReason::RedLight => speed = front.gap,
                    GapReason::Empty => {}
                }
            }

            let intent = if skidded {
                self.rear_end(now, slot, report);
                MoveIntent { position: position + front.gap, velocity: 0 }
            } else {
                if speed > 0 && self.rng.chance(self.params.p_b) {
                    speed -= 1;
                }
                MoveIntent { position: position + speed, velocity: speed }
            };

            if !skidded && geometry.crosses_stop_line(position, intent.position) {
                entrants[road.index()].push(slot);
                report.entrants[road.index()] += 1;
                self.metrics.record_entry(now);
            }
            intents.push(intent);
        }
        (intents, entrants)
    }

    /// `slot` failed to brake: it and the vehicle directly ahead collide.
    fn rear_end(&mut self, now: Tick, slot: Slot, report: &mut TickReport) {
        let ahead = self.roadway.find_front_vehicle(slot);
        if let Some(front) = ahead {
            self.roadway.fleet.get_mut(front).mark_collided();
        }
        self.roadway.fleet.get_mut(slot).mark_collided();
        self.metrics.record_rear_end(now);
        report.rear_ends += 1;

        let v = self.roadway.fleet.get(slot);
        debug!(
            "{now}: rear-end on {}/{} at {}: {} into {}",
            v.road,
            v.lane,
            v.position,
            v.id,
            ahead.map_or_else(|| "?".to_string(), |s| self.roadway.fleet.get(s).id.to_string()),
        );
    }

    /// Entrants from both roads in the same tick collide at the entry edge.
    fn resolve_lateral(
        &mut self,
        now:      Tick,
        intents:  &mut [MoveIntent],
        entrants: &[Vec<Slot>; 2],
        report:   &mut TickReport,
    ) {
        if entrants.iter().any(Vec::is_empty) {
            return;
        }
        self.metrics.record_lateral(now);
        report.lateral = true;
        debug!(
            "{now}: lateral collision, {} from R1 and {} from R2",
            entrants[0].len(),
            entrants[1].len(),
        );

        let stop_line = self.roadway.geometry.intersection_start;
        for &slot in entrants.iter().flatten() {
            let v = self.roadway.fleet.get_mut(slot);
            if v.collided {
                continue;
            }
            v.mark_collided();
            intents[slot.index()] = MoveIntent { position: stop_line, velocity: 0 };
        }
    }

    /// Apply intents: drop collided and finished vehicles, write positions
    /// back and rebuild the grid.
    fn commit(&mut self, now: Tick, intents: &[MoveIntent], report: &mut TickReport) {
        let l_total = self.roadway.geometry.l_total;
        let mut keep = Vec::with_capacity(intents.len());

        for slot in self.roadway.fleet.slots() {
            let intent = intents[slot.index()];
            let v = self.roadway.fleet.get_mut(slot);
            if v.collided {
                self.census.collided += 1;
                report.removed += 1;
                keep.push(false);
            } else if intent.position >= l_total {
                let travel_time = now.since(v.entry_tick);
                self.metrics.record_completion(now, travel_time, u64::from(l_total));
                self.census.completed += 1;
                report.completed += 1;
                keep.push(false);
            } else {
                v.position = intent.position;
                v.velocity = intent.velocity;
                keep.push(true);
            }
        }

        self.roadway.fleet.retain_slots(&keep);
        self.roadway.grid.rebuild(&self.roadway.fleet);
        report.active = self.roadway.fleet.len() as u32;
    }
}
