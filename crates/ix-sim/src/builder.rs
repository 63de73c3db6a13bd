//! Fluent builder for constructing an [`IntersectionSim`].

use ix_core::{IntersectionConfig, ModelParams, RandomSource, SimRng};

use crate::{IntersectionSim, SimResult};

/// Fluent builder for [`IntersectionSim<R>`].
///
/// # Required inputs
///
/// - [`IntersectionConfig`]: road length, `v_max`, `t_green`, injection rate, …
/// - [`ModelParams`]: behavioural probabilities and the lane-changing switch
///
/// # Optional overrides
///
/// | Method                     | Default                              |
/// |----------------------------|--------------------------------------|
/// | `.seed(s)`                 | `config.seed`                        |
/// | `.metrics_start_step(k)`   | `config.metrics_start_step`          |
/// | `.lane_changing(on)`       | `params.lane_changing`               |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(IntersectionConfig::default(), ModelParams::rainy())
///     .seed(7)
///     .metrics_start_step(500)
///     .build()?;
/// sim.run(5_000);
/// ```
pub struct SimBuilder {
    config: IntersectionConfig,
    params: ModelParams,
}

impl SimBuilder {
    pub fn new(config: IntersectionConfig, params: ModelParams) -> Self {
        Self { config, params }
    }

    /// Seed of the run's random stream.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// First tick whose events are counted in the metrics.
    pub fn metrics_start_step(mut self, step: u64) -> Self {
        self.config.metrics_start_step = step;
        self
    }

    pub fn lane_changing(mut self, enabled: bool) -> Self {
        self.params.lane_changing = enabled;
        self
    }

    /// Validate and return a simulation driven by a [`SimRng`] seeded from
    /// `config.seed`.
    pub fn build(self) -> SimResult<IntersectionSim<SimRng>> {
        let rng = SimRng::new(self.config.seed);
        self.build_with_rng(rng)
    }

    /// Validate and return a simulation driven by `rng`.
    ///
    /// Scenario tests pass a [`ScriptedRng`](ix_core::ScriptedRng) here.
    pub fn build_with_rng<R: RandomSource>(self, rng: R) -> SimResult<IntersectionSim<R>> {
        self.config.validate(&self.params)?;
        Ok(IntersectionSim::from_parts(self.config, self.params, rng))
    }
}
