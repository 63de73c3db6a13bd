//! Scenario and property tests for ix-sim.

use ix_core::{
    ConfigError, IntersectionConfig, Lane, LightState, ModelParams, RandomSource, Road,
    ScriptedRng, Tick, VehicleId,
};

use crate::{IntersectionSim, MetricsSnapshot, SimBuilder, SimError, SimObserver, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// L = 10 → l_total = 12, intersection cells 5 and 6.
///
/// With `t_green = 5` the tick-0 toggle makes R1 red and R2 green for ticks
/// 0–4, then R1 green and R2 red for ticks 5–9.
fn small_config() -> IntersectionConfig {
    IntersectionConfig {
        length:             10,
        v_max:              3,
        t_green:            5,
        injection_rate:     0.0,
        metrics_start_step: 0,
        seed:               1,
    }
}

/// No injection, no stochastic rule ever fires.
fn scripted(params: ModelParams) -> IntersectionSim<ScriptedRng> {
    SimBuilder::new(small_config(), params)
        .build_with_rng(ScriptedRng::constant(0.5))
        .unwrap()
}

fn quiet() -> IntersectionSim<ScriptedRng> {
    scripted(ModelParams::deterministic())
}

fn position_of<R: RandomSource>(sim: &IntersectionSim<R>, id: VehicleId) -> Option<(u32, u32)> {
    sim.vehicles()
        .find(|v| v.id == id)
        .map(|v| (v.position, v.velocity))
}

/// Every committed vehicle sits in exactly the cell the grid maps to it.
fn assert_consistent<R: RandomSource>(sim: &IntersectionSim<R>) {
    let geometry = sim.geometry();
    let mut seen = 0;
    for v in sim.vehicles() {
        assert!(v.position < geometry.l_total, "{:?} off the road", v.id);
        assert!(v.velocity <= 5, "{:?} too fast", v.id);
        assert!(!v.collided, "{:?} survived commit while collided", v.id);
        assert_eq!(sim.occupant(v.road, v.lane, v.position), Some(v));
        seen += 1;
    }
    assert_eq!(sim.roadway().grid.occupied(), seen);
    assert_eq!(sim.census().outstanding(), seen as u64);
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn default_config_builds() {
        let sim = SimBuilder::new(IntersectionConfig::default(), ModelParams::normal())
            .build()
            .unwrap();
        assert_eq!(sim.time_step(), Tick::ZERO);
        assert_eq!(sim.active_count(), 0);
        assert_eq!(sim.geometry().l_total, 202);
    }

    #[test]
    fn zero_length_rejected() {
        let config = IntersectionConfig { length: 0, ..small_config() };
        let err = SimBuilder::new(config, ModelParams::normal()).build().err();
        assert_eq!(err, Some(SimError::Config(ConfigError::NonPositiveLength)));
    }

    #[test]
    fn zero_green_period_rejected() {
        let config = IntersectionConfig { t_green: 0, ..small_config() };
        let err = IntersectionSim::new(config, ModelParams::normal()).err();
        assert_eq!(err, Some(SimError::Config(ConfigError::NonPositiveGreenPeriod)));
    }

    #[test]
    fn bad_probability_names_parameter() {
        let params = ModelParams { p_skid: 1.5, ..ModelParams::normal() };
        let err = SimBuilder::new(small_config(), params).build().err();
        assert_eq!(
            err,
            Some(SimError::Config(ConfigError::ProbabilityOutOfRange { name: "p_skid", value: 1.5 }))
        );
    }

    #[test]
    fn overrides_reach_run_params() {
        let sim = SimBuilder::new(small_config(), ModelParams::rainy())
            .seed(99)
            .metrics_start_step(7)
            .lane_changing(false)
            .build()
            .unwrap();
        let echo = sim.run_params();
        assert_eq!(echo.seed, 99);
        assert_eq!(echo.metrics_start_step, 7);
        assert!(!echo.lane_changing);
        assert_eq!(echo.p_red, 0.05);
        assert_eq!(echo.steps, 0);
    }
}

// ── Lights ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lights {
    use super::*;

    #[test]
    fn initial_state_before_first_tick() {
        let sim = quiet();
        assert_eq!(sim.lights(), [LightState::Green, LightState::Red]);
    }

    #[test]
    fn toggles_exactly_on_multiples_of_t_green() {
        let mut sim = quiet();
        for tick in 0..23u64 {
            sim.step();
            let report = sim.last_report();
            assert_eq!(report.tick, Tick(tick));
            assert_eq!(report.light_toggled, tick % 5 == 0, "tick {tick}");
            let [r1, r2] = sim.lights();
            assert_ne!(r1, r2);
            assert_eq!(r1.is_red(), (tick / 5) % 2 == 0, "tick {tick}");
        }
    }
}

// ── Injection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod injection {
    use super::*;

    fn always_inject(script: Vec<f64>) -> IntersectionSim<ScriptedRng> {
        let config = IntersectionConfig { injection_rate: 1.0, ..small_config() };
        SimBuilder::new(config, ModelParams::deterministic())
            .build_with_rng(ScriptedRng::new(script))
            .unwrap()
    }

    #[test]
    fn injects_on_drawn_road_and_lane() {
        // rate 0.0 < 1 fires; road floor(0.75*2)=1 → R2; lane floor(0.25*2)=0 → Left.
        let mut sim = always_inject(vec![0.0, 0.75, 0.25]);
        sim.step();
        let id = sim.last_report().injected.unwrap();
        assert_eq!(id, VehicleId(0));
        let v = sim.vehicles().next().unwrap();
        assert_eq!((v.road, v.lane), (Road::R2, Lane::Left));
        assert_eq!(v.position, 1);
        assert_eq!(sim.metrics().n_vehicles, 1);
    }

    #[test]
    fn occupied_entry_cell_blocks_silently() {
        let mut sim = always_inject(vec![0.0, 0.75, 0.25]);
        sim.place_vehicle(Road::R2, Lane::Left, 0, 0).unwrap();
        sim.step();
        assert_eq!(sim.last_report().injected, None);
        assert_eq!(sim.active_count(), 1);
        assert_eq!(sim.metrics().n_vehicles, 0);
        assert_eq!(sim.census().spawned, 1);
    }

    #[test]
    fn zero_rate_never_injects() {
        let mut sim = quiet();
        sim.run(50);
        assert_eq!(sim.census().spawned, 0);
    }

    #[test]
    fn ids_are_sequential() {
        let mut sim = quiet();
        let a = sim.place_vehicle(Road::R1, Lane::Left, 0, 0).unwrap();
        let b = sim.place_vehicle(Road::R1, Lane::Right, 0, 0).unwrap();
        assert_eq!(a, VehicleId(0));
        assert_eq!(b, VehicleId(1));
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod placement {
    use super::*;

    #[test]
    fn rejects_occupied_and_out_of_range() {
        let mut sim = quiet();
        assert!(sim.place_vehicle(Road::R1, Lane::Left, 3, 0).is_some());
        assert!(sim.place_vehicle(Road::R1, Lane::Left, 3, 0).is_none());
        assert!(sim.place_vehicle(Road::R1, Lane::Left, 12, 0).is_none());
    }

    #[test]
    fn velocity_clamped_to_v_max() {
        let mut sim = quiet();
        let id = sim.place_vehicle(Road::R2, Lane::Right, 2, 9).unwrap();
        assert_eq!(position_of(&sim, id), Some((2, 3)));
        assert_eq!(sim.occupant(Road::R2, Lane::Right, 2).map(|v| v.id), Some(id));
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;

    #[test]
    fn lone_vehicle_accelerates_and_completes() {
        let mut sim = quiet();
        let id = sim.place_vehicle(Road::R2, Lane::Left, 0, 0).unwrap();

        let mut trail = Vec::new();
        for _ in 0..4 {
            sim.step();
            trail.push(position_of(&sim, id).unwrap().0);
        }
        assert_eq!(trail, vec![1, 3, 6, 9]);

        sim.step();
        assert_eq!(position_of(&sim, id), None);
        let m = sim.metrics();
        assert_eq!(m.completed_vehicles, 1);
        assert_eq!(m.throughput, 1);
        assert_eq!(m.avg_travel_time, 4.0);
        assert_eq!(m.avg_speed, 3.0);
        assert_eq!(sim.census().completed, 1);
    }

    #[test]
    fn red_light_holds_vehicle_at_stop_line() {
        let mut sim = quiet();
        let id = sim.place_vehicle(Road::R1, Lane::Left, 0, 0).unwrap();

        sim.run(5);
        assert_eq!(position_of(&sim, id), Some((4, 0)));
        assert_eq!(sim.metrics().throughput, 0);

        // Tick 5 turns R1 green.
        sim.step();
        assert_eq!(position_of(&sim, id), Some((5, 1)));
        assert_eq!(sim.last_report().entrants, [1, 0]);
        assert_eq!(sim.metrics().throughput, 1);
    }

    #[test]
    fn follower_brakes_to_gap() {
        let mut sim = quiet();
        let front = sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        let back = sim.place_vehicle(Road::R2, Lane::Left, 1, 2).unwrap();
        sim.step();
        assert_eq!(position_of(&sim, front), Some((4, 1)));
        // Gap to the pre-move front position is 1.
        assert_eq!(position_of(&sim, back), Some((2, 1)));
        assert_eq!(sim.metrics().n_rear_end, 0);
    }

    #[test]
    fn random_braking_slows_by_one() {
        let params = ModelParams { p_b: 1.0, ..ModelParams::deterministic() };
        let mut sim = scripted(params);
        let id = sim.place_vehicle(Road::R2, Lane::Left, 0, 2).unwrap();
        sim.step();
        assert_eq!(position_of(&sim, id), Some((2, 2)));
    }

    #[test]
    fn draw_count_for_red_light_approach() {
        let mut rng = ScriptedRng::constant(0.5);
        {
            let mut sim = SimBuilder::new(small_config(), ModelParams::deterministic())
                .build_with_rng(&mut rng)
                .unwrap();
            sim.place_vehicle(Road::R1, Lane::Left, 0, 0).unwrap();
            sim.step();
        }
        // Injection rate, red-light decision, random braking.
        assert_eq!(rng.draws(), 3);
    }
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod collisions {
    use super::*;

    #[test]
    fn skid_causes_rear_end_and_removes_both() {
        let params = ModelParams { p_skid: 1.0, ..ModelParams::deterministic() };
        let mut sim = scripted(params);
        sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        sim.place_vehicle(Road::R2, Lane::Left, 1, 2).unwrap();

        sim.step();
        let report = sim.last_report();
        assert_eq!(report.rear_ends, 1);
        assert_eq!(report.removed, 2);
        assert_eq!(sim.active_count(), 0);
        assert_eq!(sim.metrics().n_rear_end, 1);
        assert_eq!(sim.census().collided, 2);
        assert_consistent(&sim);
    }

    #[test]
    fn simultaneous_entry_is_lateral() {
        // R1 is red during tick 0; p_red = 1 makes its driver run the light.
        let params = ModelParams { p_red: 1.0, ..ModelParams::deterministic() };
        let mut sim = scripted(params);
        sim.place_vehicle(Road::R1, Lane::Left, 3, 1).unwrap();
        sim.place_vehicle(Road::R2, Lane::Right, 4, 0).unwrap();

        sim.step();
        let report = sim.last_report();
        assert_eq!(report.entrants, [1, 1]);
        assert!(report.lateral);
        assert_eq!(report.removed, 2);
        let m = sim.metrics();
        assert_eq!(m.n_lateral, 1);
        assert_eq!(m.throughput, 2);
        assert_eq!(m.lateral_to_rear_end_ratio, 0.0);
        assert_eq!(sim.census().collided, 2);
    }

    #[test]
    fn compliant_driver_avoids_lateral() {
        let mut sim = quiet();
        let r1 = sim.place_vehicle(Road::R1, Lane::Left, 3, 1).unwrap();
        sim.place_vehicle(Road::R2, Lane::Right, 4, 0).unwrap();

        sim.step();
        assert!(!sim.last_report().lateral);
        assert_eq!(sim.last_report().entrants, [0, 1]);
        assert_eq!(position_of(&sim, r1), Some((4, 1)));
        assert_eq!(sim.census().collided, 0);
    }

    #[test]
    fn violation_into_occupied_intersection_queues_behind() {
        let params = ModelParams { p_red: 1.0, ..ModelParams::deterministic() };
        let mut sim = scripted(params);
        let runner = sim.place_vehicle(Road::R1, Lane::Left, 3, 1).unwrap();
        sim.place_vehicle(Road::R1, Lane::Left, 5, 0).unwrap();

        sim.step();
        // The occupied intersection cell caps the violator at cell 4.
        assert_eq!(position_of(&sim, runner), Some((4, 1)));
        assert_consistent(&sim);
    }

    #[test]
    fn rear_ended_entrant_is_not_counted_twice() {
        let params = ModelParams { p_red: 1.0, p_skid: 1.0, ..ModelParams::deterministic() };
        let mut sim = scripted(params);
        // The leader crosses the stop line and is hit by its follower's skid.
        sim.place_vehicle(Road::R2, Lane::Left, 4, 1).unwrap();
        sim.place_vehicle(Road::R2, Lane::Left, 2, 2).unwrap();
        // Runs the red light into the intersection in the same tick.
        sim.place_vehicle(Road::R1, Lane::Left, 3, 1).unwrap();

        sim.step();
        let report = sim.last_report();
        assert_eq!(report.entrants, [1, 1]);
        assert!(report.lateral);
        assert_eq!(report.rear_ends, 1);
        assert_eq!(report.removed, 3);

        let m = sim.metrics();
        assert_eq!(m.n_lateral, 1);
        assert_eq!(m.n_rear_end, 1);
        assert_eq!(m.lateral_to_rear_end_ratio, 1.0);
        assert_eq!(sim.census().spawned, 3);
        assert_eq!(sim.census().collided, 3);
        assert_consistent(&sim);
    }
}

// ── Lane changing ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod lane_changing {
    use super::*;

    fn eager() -> ModelParams {
        ModelParams { p_chg: 1.0, lane_changing: true, ..ModelParams::deterministic() }
    }

    #[test]
    fn blocked_vehicle_overtakes() {
        let mut sim = scripted(eager());
        sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        let id = sim.place_vehicle(Road::R2, Lane::Left, 2, 0).unwrap();

        sim.step();
        assert_eq!(sim.last_report().lane_changes, 1);
        let v = sim.occupant(Road::R2, Lane::Right, 3).unwrap();
        assert_eq!(v.id, id);
    }

    #[test]
    fn disabled_switch_keeps_lane() {
        let params = ModelParams { lane_changing: false, ..eager() };
        let mut sim = scripted(params);
        sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        let id = sim.place_vehicle(Road::R2, Lane::Left, 2, 0).unwrap();

        sim.step();
        assert_eq!(sim.last_report().lane_changes, 0);
        assert_eq!(position_of(&sim, id), Some((2, 0)));
        assert_eq!(sim.occupant(Road::R2, Lane::Left, 2).map(|v| v.id), Some(id));
    }

    #[test]
    fn unsafe_follower_prevents_switch() {
        let mut sim = scripted(eager());
        sim.place_vehicle(Road::R2, Lane::Left, 4, 0).unwrap();
        let id = sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        // Back gap 1, follower speed 3.
        sim.place_vehicle(Road::R2, Lane::Right, 1, 3).unwrap();

        sim.step();
        assert_eq!(sim.last_report().lane_changes, 0);
        assert_eq!(sim.vehicles().find(|v| v.id == id).map(|v| v.lane), Some(Lane::Left));
    }

    #[test]
    fn earlier_switch_blocks_later_vehicle() {
        let mut sim = scripted(eager());
        sim.place_vehicle(Road::R2, Lane::Left, 3, 0).unwrap();
        let first = sim.place_vehicle(Road::R2, Lane::Left, 2, 0).unwrap();
        // Open road ahead until `first` moves in front of it.
        let second = sim.place_vehicle(Road::R2, Lane::Right, 1, 0).unwrap();

        sim.step();
        assert_eq!(sim.last_report().lane_changes, 2);
        let lane_of = |id| sim.vehicles().find(|v| v.id == id).map(|v| v.lane);
        assert_eq!(lane_of(first), Some(Lane::Right));
        assert_eq!(lane_of(second), Some(Lane::Left));
        assert_consistent(&sim);
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use super::*;

    fn seeded(seed: u64, warm_up: u64) -> IntersectionSim {
        let config = IntersectionConfig { length: 40, injection_rate: 0.4, ..IntersectionConfig::default() };
        SimBuilder::new(config, ModelParams::rainy())
            .seed(seed)
            .metrics_start_step(warm_up)
            .build()
            .unwrap()
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut sim = seeded(3, 0);
        sim.run(300);
        assert_eq!(sim.metrics(), sim.metrics());
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = seeded(11, 0);
        let mut b = seeded(11, 0);
        a.run(800);
        b.run(800);
        assert_eq!(a.counters(), b.counters());
        assert_eq!(a.census(), b.census());
        assert!(a.vehicles().eq(b.vehicles()));
    }

    #[test]
    fn warm_up_changes_counters_not_trajectory() {
        let mut early = seeded(5, 0);
        let mut late = seeded(5, 400);
        for _ in 0..1200 {
            early.step();
            late.step();
            assert!(early.vehicles().eq(late.vehicles()));
        }
        assert_eq!(early.census(), late.census());

        let (e, l) = (early.counters(), late.counters());
        assert!(l.n_vehicles <= e.n_vehicles);
        assert!(l.n_vehicles < e.n_vehicles);
        assert!(l.throughput <= e.throughput);
        assert!(l.completed_vehicles <= e.completed_vehicles);
        assert!(l.n_lateral <= e.n_lateral);
        assert!(l.n_rear_end <= e.n_rear_end);
    }

    #[test]
    fn nothing_counted_before_start() {
        let mut sim = seeded(8, 1_000);
        sim.run(500);
        let m = sim.metrics();
        assert_eq!(m.n_vehicles, 0);
        assert_eq!(m.throughput, 0);
        assert!(sim.census().spawned > 0);
    }

    #[test]
    fn empty_run_has_zero_derived_metrics() {
        let mut sim = quiet();
        sim.run(10);
        let m = sim.metrics();
        assert_eq!(m.avg_travel_time, 0.0);
        assert_eq!(m.avg_speed, 0.0);
        assert_eq!(m.lateral_to_rear_end_ratio, 0.0);
        assert!(m.run_time_secs >= 0.0);
        assert_eq!(sim.run_params().steps, 10);
    }
}

// ── Invariants under random load ──────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use super::*;

    #[test]
    fn grid_and_census_stay_consistent() {
        let config = IntersectionConfig { length: 30, injection_rate: 0.6, seed: 17, ..IntersectionConfig::default() };
        let params = ModelParams { p_red: 0.3, p_skid: 0.3, ..ModelParams::rainy() };
        let mut sim = SimBuilder::new(config, params).build().unwrap();

        let mut collisions = 0;
        for _ in 0..2_000 {
            sim.step();
            assert_consistent(&sim);
            let [r1, r2] = sim.lights();
            assert_ne!(r1, r2);
            let report = sim.last_report();
            collisions += report.removed;
        }
        let census = sim.census();
        assert_eq!(census.collided, u64::from(collisions));
        assert_eq!(census.spawned, census.completed + census.collided + sim.active_count() as u64);
    }
}

// ── Observer hooks ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts: Vec<Tick>,
        ends:   Vec<(Tick, TickReport, [LightState; 2])>,
        finals: Vec<(Tick, MetricsSnapshot)>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }

        fn on_tick_end(&mut self, tick: Tick, report: &TickReport, lights: [LightState; 2]) {
            self.ends.push((tick, report.clone(), lights));
        }

        fn on_run_end(&mut self, final_tick: Tick, metrics: &MetricsSnapshot) {
            self.finals.push((final_tick, *metrics));
        }
    }

    #[test]
    fn hooks_fire_once_per_tick() {
        let mut sim = quiet();
        sim.place_vehicle(Road::R2, Lane::Left, 0, 0).unwrap();
        let mut rec = Recorder::default();
        sim.run_observed(7, &mut rec);

        assert_eq!(rec.starts, (0..7).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.ends.len(), 7);
        assert_eq!(rec.ends[0].2, [LightState::Red, LightState::Green]);
        assert_eq!(rec.ends[5].2, [LightState::Green, LightState::Red]);
        assert_eq!(rec.ends[4].1.completed, 1);
        assert_eq!(rec.finals.len(), 1);
        assert_eq!(rec.finals[0].0, Tick(7));
        assert_eq!(rec.finals[0].1.completed_vehicles, 1);
    }

    #[test]
    fn single_step_skips_run_end() {
        let mut sim = quiet();
        let mut rec = Recorder::default();
        sim.step_observed(&mut rec);
        sim.step_observed(&mut rec);

        assert_eq!(rec.starts, [Tick(0), Tick(1)]);
        assert_eq!(rec.ends[1].1, *sim.last_report());
        assert!(rec.finals.is_empty());
        assert_eq!(sim.time_step(), Tick(2));
    }
}
