//! Parameter grids and the run configurations they expand to.

use serde::{Deserialize, Serialize};

use ix_core::{IntersectionConfig, ModelParams, RunId, Weather, derive_seed};

/// Everything needed to execute one run of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub run_id: RunId,
    pub config: IntersectionConfig,
    pub params: ModelParams,
    pub steps:  u64,
}

/// Value lists for every swept parameter, plus the settings shared by all
/// runs.
///
/// Loaded from JSON; absent fields keep their defaults, so `{}` is a one-run
/// grid with the default parameters:
///
/// ```json
/// { "length": [100, 200], "p_red": [0.001, 0.01, 0.05], "steps": 20000 }
/// ```
///
/// Absent probability lists come from the preset of the file's `weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridFile")]
pub struct ParameterGrid {
    pub length:             Vec<u32>,
    pub v_max:              Vec<u32>,
    pub t_green:            Vec<u64>,
    pub injection_rate:     Vec<f64>,
    pub p_b:                Vec<f64>,
    pub p_chg:              Vec<f64>,
    pub p_red:              Vec<f64>,
    pub p_skid:             Vec<f64>,
    pub lane_changing:      bool,
    pub weather:            Weather,
    pub metrics_start_step: u64,
    pub steps:              u64,
    /// Per-run seeds are derived from this and the run id.
    pub base_seed:          u64,
}

impl Default for ParameterGrid {
    fn default() -> Self {
        Self::for_weather(Weather::Normal)
    }
}

/// On-disk form of a [`ParameterGrid`]: every field may be omitted.
#[derive(Deserialize)]
struct GridFile {
    length:             Option<Vec<u32>>,
    v_max:              Option<Vec<u32>>,
    t_green:            Option<Vec<u64>>,
    injection_rate:     Option<Vec<f64>>,
    p_b:                Option<Vec<f64>>,
    p_chg:              Option<Vec<f64>>,
    p_red:              Option<Vec<f64>>,
    p_skid:             Option<Vec<f64>>,
    lane_changing:      Option<bool>,
    weather:            Option<Weather>,
    metrics_start_step: Option<u64>,
    steps:              Option<u64>,
    base_seed:          Option<u64>,
}

impl From<GridFile> for ParameterGrid {
    fn from(file: GridFile) -> Self {
        let preset = ParameterGrid::for_weather(file.weather.unwrap_or(Weather::Normal));
        Self {
            length:             file.length.unwrap_or(preset.length),
            v_max:              file.v_max.unwrap_or(preset.v_max),
            t_green:            file.t_green.unwrap_or(preset.t_green),
            injection_rate:     file.injection_rate.unwrap_or(preset.injection_rate),
            p_b:                file.p_b.unwrap_or(preset.p_b),
            p_chg:              file.p_chg.unwrap_or(preset.p_chg),
            p_red:              file.p_red.unwrap_or(preset.p_red),
            p_skid:             file.p_skid.unwrap_or(preset.p_skid),
            lane_changing:      file.lane_changing.unwrap_or(preset.lane_changing),
            weather:            preset.weather,
            metrics_start_step: file.metrics_start_step.unwrap_or(preset.metrics_start_step),
            steps:              file.steps.unwrap_or(preset.steps),
            base_seed:          file.base_seed.unwrap_or(preset.base_seed),
        }
    }
}

/// Number of swept dimensions.
const AXES: usize = 8;

impl ParameterGrid {
    /// A single-point grid built from the default system parameters and the
    /// probability preset for `weather`.
    pub fn for_weather(weather: Weather) -> Self {
        let config = IntersectionConfig::default();
        let params = ModelParams::for_weather(weather);
        Self {
            length:             vec![config.length],
            v_max:              vec![config.v_max],
            t_green:            vec![config.t_green],
            injection_rate:     vec![config.injection_rate],
            p_b:                vec![params.p_b],
            p_chg:              vec![params.p_chg],
            p_red:              vec![params.p_red],
            p_skid:             vec![params.p_skid],
            lane_changing:      params.lane_changing,
            weather,
            metrics_start_step: config.metrics_start_step,
            steps:              100_000,
            base_seed:          config.seed,
        }
    }

    fn radices(&self) -> [usize; AXES] {
        [
            self.length.len(),
            self.v_max.len(),
            self.t_green.len(),
            self.injection_rate.len(),
            self.p_b.len(),
            self.p_chg.len(),
            self.p_red.len(),
            self.p_skid.len(),
        ]
    }

    /// Number of parameter combinations.
    pub fn len(&self) -> usize {
        self.radices().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination, in nesting order `length, v_max, t_green,
    /// injection_rate, p_b, p_chg, p_red, p_skid` (last varies fastest), with
    /// run ids counting up from 0.
    pub fn configs(&self) -> Vec<RunConfig> {
        let radices = self.radices();
        (0..self.len()).map(|i| self.config_at(i, &radices)).collect()
    }

    fn config_at(&self, index: usize, radices: &[usize; AXES]) -> RunConfig {
        let mut digits = [0usize; AXES];
        let mut rest = index;
        for (digit, &radix) in digits.iter_mut().zip(radices).rev() {
            *digit = rest % radix;
            rest /= radix;
        }
        let [length, v_max, t_green, rate, p_b, p_chg, p_red, p_skid] = digits;

        let run_id = RunId(index as u32);
        RunConfig {
            run_id,
            config: IntersectionConfig {
                length:             self.length[length],
                v_max:              self.v_max[v_max],
                t_green:            self.t_green[t_green],
                injection_rate:     self.injection_rate[rate],
                metrics_start_step: self.metrics_start_step,
                seed:               derive_seed(self.base_seed, u64::from(run_id)),
            },
            params: ModelParams {
                p_b:           self.p_b[p_b],
                p_chg:         self.p_chg[p_chg],
                p_red:         self.p_red[p_red],
                p_skid:        self.p_skid[p_skid],
                lane_changing: self.lane_changing,
                weather:       self.weather,
            },
            steps: self.steps,
        }
    }
}
