//! Injectable random source and its deterministic implementations.
//!
//! # Determinism strategy
//!
//! Every simulation instance owns exactly one random stream.  All stochastic
//! decisions in a tick (injection, red-light violation, skid, lane change,
//! random braking) are drawn from it in a fixed order, so two runs built with
//! the same seed produce identical trajectories.
//!
//! The engine is generic over [`RandomSource`] so tests can substitute a
//! [`ScriptedRng`] and force specific outcomes.
//!
//! Per-run seeds inside a sweep are derived as
//!
//!   seed = base_seed XOR (run_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive run IDs uniformly across the seed space.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive the seed of run `run` from a sweep's `base` seed.
#[inline]
pub fn derive_seed(base: u64, run: u64) -> u64 {
    base ^ run.wrapping_mul(MIXING_CONSTANT)
}

// ── RandomSource ──────────────────────────────────────────────────────────────

/// The stream of uniform draws consumed by the simulation.
///
/// Every call consumes exactly one draw; callers rely on this to keep the
/// draw order stable.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..n`.  `n` must be non-zero.
    fn next_index(&mut self, n: usize) -> usize;

    /// `true` with probability `p`.
    ///
    /// Consumes one draw even when `p` is 0 or 1.
    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    #[inline]
    fn next_index(&mut self, n: usize) -> usize {
        (**self).next_index(n)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seedable simulation-level RNG.
///
/// Used only in single-threaded contexts: one instance per simulation.  Seeds
/// for independent runs come from [`derive_seed`].
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    fn next_index(&mut self, n: usize) -> usize {
        self.0.gen_range(0..n)
    }
}

// ── ScriptedRng ───────────────────────────────────────────────────────────────

/// Replays a fixed, cyclic sequence of draws.
///
/// `next_index(n)` maps the scripted value `u` to `floor(u * n)`, so a script
/// of `[0.0]` always picks index 0 and never fires `chance(p)` for `p = 0`,
/// while always firing it for any `p > 0`.
///
/// ```
/// use ix_core::{RandomSource, ScriptedRng};
///
/// let mut rng = ScriptedRng::new(vec![0.9, 0.1]);
/// assert!(!rng.chance(0.5));
/// assert!(rng.chance(0.5));
/// assert_eq!(rng.draws(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    script: Vec<f64>,
    cursor: usize,
    draws:  u64,
}

impl ScriptedRng {
    /// Create a source cycling through `script`.
    ///
    /// # Panics
    /// Panics if `script` is empty.
    pub fn new(script: Vec<f64>) -> Self {
        assert!(!script.is_empty(), "ScriptedRng needs at least one value");
        Self { script, cursor: 0, draws: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Total draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let value = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        self.draws += 1;
        value
    }

    fn next_index(&mut self, n: usize) -> usize {
        let u = self.next_f64().clamp(0.0, 1.0);
        ((u * n as f64) as usize).min(n.saturating_sub(1))
    }
}
