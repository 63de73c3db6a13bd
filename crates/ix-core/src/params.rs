//! Run configuration: stochastic model parameters, system parameters, and
//! the derived lattice geometry.

use crate::{ConfigError, ConfigResult, Weather};

/// Number of cells each lane spends inside the shared intersection.
pub const INTERSECTION_SIZE: u32 = 2;

// ── ModelParams ───────────────────────────────────────────────────────────────

/// Probabilities that drive the stochastic rules, plus the lane-changing
/// switch.
///
/// `p_red` and `p_skid` are copied onto every vehicle at injection; the engine
/// reads the per-vehicle copies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelParams {
    /// Random braking probability (NaSch rule 3).
    pub p_b: f64,
    /// Probability of acting on a safe, advantageous lane change.
    pub p_chg: f64,
    /// Probability of running a red light when the stop line binds.
    pub p_red: f64,
    /// Probability that braking behind a vehicle fails (rear-end collision).
    pub p_skid: f64,
    /// Whether the lane-change phase runs at all.
    pub lane_changing: bool,
    /// Weather the bundle was chosen for.  Informational only.
    pub weather: Weather,
}

impl ModelParams {
    /// Dry-road preset.
    pub fn normal() -> Self {
        Self {
            p_b:           0.1,
            p_chg:         0.8,
            p_red:         0.001,
            p_skid:        0.05,
            lane_changing: true,
            weather:       Weather::Normal,
        }
    }

    /// Wet-road preset: more cautious braking, fewer lane changes, more skids.
    pub fn rainy() -> Self {
        Self {
            p_b:           0.15,
            p_chg:         0.4,
            p_red:         0.05,
            p_skid:        0.1,
            lane_changing: true,
            weather:       Weather::Rainy,
        }
    }

    pub fn for_weather(weather: Weather) -> Self {
        match weather {
            Weather::Normal => Self::normal(),
            Weather::Rainy => Self::rainy(),
        }
    }

    /// All stochastic rules disabled.  Useful for deterministic scenarios.
    pub fn deterministic() -> Self {
        Self {
            p_b:           0.0,
            p_chg:         0.0,
            p_red:         0.0,
            p_skid:        0.0,
            lane_changing: false,
            weather:       Weather::Normal,
        }
    }

    /// Reject any probability outside `[0, 1]` (NaN included).
    pub fn validate(&self) -> ConfigResult<()> {
        check_probability("p_b", self.p_b)?;
        check_probability("p_chg", self.p_chg)?;
        check_probability("p_red", self.p_red)?;
        check_probability("p_skid", self.p_skid)?;
        Ok(())
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self::normal()
    }
}

fn check_probability(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

// ── IntersectionConfig ────────────────────────────────────────────────────────

/// System parameters of one run.  Immutable once the simulation is built.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntersectionConfig {
    /// Road length `L` in cells, excluding the intersection.
    pub length: u32,
    /// Base maximum velocity given to every injected vehicle.
    pub v_max: u32,
    /// Green period in ticks.  A full light cycle is `2 * t_green`.
    pub t_green: u64,
    /// Per-tick probability of attempting an injection.
    pub injection_rate: f64,
    /// Metrics are only counted once `time_step >= metrics_start_step`.
    pub metrics_start_step: u64,
    /// Seed of the simulation's random stream.
    pub seed: u64,
}

impl Default for IntersectionConfig {
    fn default() -> Self {
        Self {
            length:             200,
            v_max:              5,
            t_green:            40,
            injection_rate:     0.1,
            metrics_start_step: 0,
            seed:               42,
        }
    }
}

impl IntersectionConfig {
    /// Validate these system parameters together with `params`.
    pub fn validate(&self, params: &ModelParams) -> ConfigResult<()> {
        if self.length == 0 {
            return Err(ConfigError::NonPositiveLength);
        }
        if self.length < 2 {
            return Err(ConfigError::RoadTooShort { length: self.length });
        }
        if self.t_green == 0 {
            return Err(ConfigError::NonPositiveGreenPeriod);
        }
        if self.v_max == 0 {
            return Err(ConfigError::ZeroMaxVelocity);
        }
        check_probability("injection_rate", self.injection_rate)?;
        params.validate()
    }

    /// Lattice geometry derived from `length`.
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.length)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Cell layout of every lane.
///
/// ```text
///   0 ............ start-1 | start .. end-1 | end ............ l_total-1
///   approach               | intersection   | exit
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Road length `L` excluding the intersection.
    pub length: u32,
    /// Cells per lane: `L + INTERSECTION_SIZE`.
    pub l_total: u32,
    /// First intersection cell (`L / 2`); the stop line sits just before it.
    pub intersection_start: u32,
    /// One past the last intersection cell.
    pub intersection_end: u32,
}

impl Geometry {
    pub fn new(length: u32) -> Self {
        let intersection_start = length / 2;
        Self {
            length,
            l_total: length + INTERSECTION_SIZE,
            intersection_start,
            intersection_end: intersection_start + INTERSECTION_SIZE,
        }
    }

    /// Gap reported when nothing limits a vehicle: larger than any speed.
    #[inline]
    pub fn open_gap(&self) -> u32 {
        2 * self.l_total
    }

    /// `position` lies before the stop line.
    #[inline]
    pub fn is_approaching(&self, position: u32) -> bool {
        !self.has_entered(position)
    }

    /// `position` is at or past the stop line.
    #[inline]
    pub fn has_entered(&self, position: u32) -> bool {
        position >= self.intersection_start
    }

    /// Motion from `from` to `to` crosses the stop line.
    #[inline]
    pub fn crosses_stop_line(&self, from: u32, to: u32) -> bool {
        self.is_approaching(from) && self.has_entered(to)
    }
}
