// ============================================================
// Layer 4 — Synthetic Data Generators
// ============================================================
// Two generators produce toy plots with a known linear
// relationship between remote-sensing features and carbon
// sequestration, plus Gaussian noise:
//
//   UniformGenerator      — every feature uniform over its range,
//                           driven by a tiny LCG so the output is
//                           reproducible without any RNG crate
//                           semantics involved:
//       y = 25·NDVI + 0.15·canopy + 6·soil + N(0, 3)
//
//   DistributedGenerator  — skewed, more realistic marginals drawn
//                           from a seeded StdRng via rand_distr:
//       NDVI   ~ Beta(2, 2)·0.8 + 0.1
//       canopy ~ Beta(1.5, 1.5)·100
//       soil   ~ Gamma(k=2, θ=1.5) + 0.5
//       y = 30·NDVI + 0.2·canopy + 8·soil + N(0, 5)
//
// Targets are clipped to [0, 100] tCO2e/ha in both cases.
//
// Reference: rand / rand_distr crate documentation

use anyhow::{anyhow, Result};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Beta, Distribution, Gamma, Normal};

use crate::domain::sample::{default_feature_names, CarbonSample, FeatureTable};
use crate::domain::traits::SampleSource;

pub const DEFAULT_SAMPLES: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

const MAX_TARGET: f64 = 100.0;

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MODULUS: u64 = 1 << 31;

// ─── LcgRandom ────────────────────────────────────────────────────────────────
/// Linear congruential generator over 2^31 with a Box–Muller
/// normal that hands out its cached second sample on the next call.
#[derive(Debug, Clone)]
pub struct LcgRandom {
    state: u64,
    spare: Option<f64>,
}

impl LcgRandom {
    pub fn new(seed: u64) -> Self {
        Self { state: seed % LCG_MODULUS, spare: None }
    }

    /// Uniform in [0, 1).
    pub fn next_uniform(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(LCG_MULTIPLIER) + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    pub fn next_normal(&mut self, mean: f64, std: f64) -> f64 {
        if let Some(spare) = self.spare.take() {
            return mean + std * spare;
        }
        // ln(0) would blow up the radius
        let u1 = self.next_uniform().max(f64::MIN_POSITIVE);
        let u2 = self.next_uniform();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = 2.0 * std::f64::consts::PI * u2;
        self.spare = Some(radius * angle.sin());
        mean + std * radius * angle.cos()
    }
}

// ─── UniformGenerator ─────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct UniformGenerator {
    pub n_samples: usize,
    pub seed: u64,
}

impl UniformGenerator {
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self { n_samples, seed }
    }
}

impl SampleSource for UniformGenerator {
    fn load(&self) -> Result<FeatureTable> {
        tracing::info!("Generating {} uniform synthetic samples (seed {})", self.n_samples, self.seed);
        let mut rng = LcgRandom::new(self.seed);
        let mut samples = Vec::with_capacity(self.n_samples);

        for _ in 0..self.n_samples {
            let ndvi = 0.1 + rng.next_uniform() * 0.8;
            let canopy = rng.next_uniform() * 100.0;
            let soil = 0.5 + rng.next_uniform() * 7.5;

            let target = ndvi * 25.0 + canopy * 0.15 + soil * 6.0 + rng.next_normal(0.0, 3.0);
            samples.push(CarbonSample::new(
                vec![ndvi, canopy, soil],
                target.clamp(0.0, MAX_TARGET),
            ));
        }

        FeatureTable::new(default_feature_names(), samples)
    }
}

// ─── DistributedGenerator ─────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct DistributedGenerator {
    pub n_samples: usize,
    pub seed: u64,
}

impl DistributedGenerator {
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self { n_samples, seed }
    }
}

impl SampleSource for DistributedGenerator {
    fn load(&self) -> Result<FeatureTable> {
        tracing::info!(
            "Generating {} distribution-based synthetic samples (seed {})",
            self.n_samples,
            self.seed
        );
        let n = self.n_samples;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let ndvi_dist = Beta::new(2.0, 2.0).map_err(|e| anyhow!("NDVI distribution: {e}"))?;
        let canopy_dist = Beta::new(1.5, 1.5).map_err(|e| anyhow!("canopy distribution: {e}"))?;
        let soil_dist = Gamma::new(2.0, 1.5).map_err(|e| anyhow!("soil carbon distribution: {e}"))?;
        let noise = Normal::new(0.0, 5.0).map_err(|e| anyhow!("noise distribution: {e}"))?;

        // Whole columns are drawn one after another, so changing one
        // column's formula does not reshuffle the others.
        let ndvi: Vec<f64> = (0..n).map(|_| ndvi_dist.sample(&mut rng) * 0.8 + 0.1).collect();
        let canopy: Vec<f64> = (0..n).map(|_| canopy_dist.sample(&mut rng) * 100.0).collect();
        let soil: Vec<f64> = (0..n).map(|_| soil_dist.sample(&mut rng) + 0.5).collect();

        let samples = (0..n)
            .map(|i| {
                let target = ndvi[i] * 30.0 + canopy[i] * 0.2 + soil[i] * 8.0 + noise.sample(&mut rng);
                CarbonSample::new(vec![ndvi[i], canopy[i], soil[i]], target.clamp(0.0, MAX_TARGET))
            })
            .collect();

        FeatureTable::new(default_feature_names(), samples)
    }
}
