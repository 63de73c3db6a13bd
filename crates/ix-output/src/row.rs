//! Plain data row types written by output backends.

use std::time::{SystemTime, UNIX_EPOCH};

use ix_core::{LightState, RunId, Tick, Weather};
use ix_sim::{MetricsSnapshot, RunParams, TickReport};

/// Seconds since the Unix epoch; 0 if the system clock is before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// One completed simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub run_id:                    RunId,
    /// Unix seconds at which the row was produced.
    pub timestamp:                 u64,
    pub length:                    u32,
    pub vmax:                      u32,
    pub t_green:                   u64,
    pub injection_rate:            f64,
    pub p_b:                       f64,
    pub p_chg:                     f64,
    pub p_red:                     f64,
    pub p_skid:                    f64,
    pub lane_changing:             bool,
    pub weather:                   Weather,
    pub metrics_start_step:        u64,
    pub seed:                      u64,
    pub steps:                     u64,
    pub n_lateral:                 u64,
    pub n_rear_end:                u64,
    pub n_vehicles:                u64,
    pub throughput:                u64,
    pub completed_vehicles:        u64,
    pub avg_travel_time:           f64,
    pub avg_speed:                 f64,
    pub lateral_to_rear_end_ratio: f64,
    /// Wall-clock seconds spent stepping.
    pub time:                      f64,
}

impl ResultRow {
    /// Merge a configuration echo and a metrics snapshot, stamped now.
    pub fn from_run(run_id: RunId, params: &RunParams, metrics: &MetricsSnapshot) -> Self {
        Self {
            run_id,
            timestamp:                 unix_now(),
            length:                    params.length,
            vmax:                      params.v_max,
            t_green:                   params.t_green,
            injection_rate:            params.injection_rate,
            p_b:                       params.p_b,
            p_chg:                     params.p_chg,
            p_red:                     params.p_red,
            p_skid:                    params.p_skid,
            lane_changing:             params.lane_changing,
            weather:                   params.weather,
            metrics_start_step:        params.metrics_start_step,
            seed:                      params.seed,
            steps:                     params.steps,
            n_lateral:                 metrics.n_lateral,
            n_rear_end:                metrics.n_rear_end,
            n_vehicles:                metrics.n_vehicles,
            throughput:                metrics.throughput,
            completed_vehicles:        metrics.completed_vehicles,
            avg_travel_time:           metrics.avg_travel_time,
            avg_speed:                 metrics.avg_speed,
            lateral_to_rear_end_ratio: metrics.lateral_to_rear_end_ratio,
            time:                      metrics.run_time_secs,
        }
    }
}

/// What happened during one tick, flattened for tabular output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRow {
    pub tick:         u64,
    pub r1_light:     LightState,
    pub r2_light:     LightState,
    pub active:       u32,
    /// Id of the vehicle injected this tick.
    pub injected:     Option<u32>,
    pub lane_changes: u32,
    pub entrants_r1:  u32,
    pub entrants_r2:  u32,
    pub lateral:      bool,
    pub rear_end:     u32,
    pub completed:    u32,
}

impl TraceRow {
    pub fn new(tick: Tick, report: &TickReport, lights: [LightState; 2]) -> Self {
        Self {
            tick:         tick.0,
            r1_light:     lights[0],
            r2_light:     lights[1],
            active:       report.active,
            injected:     report.injected.map(|id| id.0),
            lane_changes: report.lane_changes,
            entrants_r1:  report.entrants[0],
            entrants_r2:  report.entrants[1],
            lateral:      report.lateral,
            rear_end:     report.rear_ends,
            completed:    report.completed,
        }
    }
}
