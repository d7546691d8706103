// SPDX-License-Identifier: AGPL-3.0-only

//! Counter-based Brownian noise.
//!
//! Sample `k` of a solve depends only on `(seed, offset, k)`: ChaCha20 keyed
//! by the seed, with the offset selecting the stream and `k` the block
//! position. Any execution context produces the same vector bit for bit.
//!
//! Each component is uniform with zero mean and variance `2 s²`
//! (`s = √(kT/Δt)`), so that `L·ψ` with `L Lᵀ = R_FU` has the covariance
//! `2 kT R_FU / Δt` required by fluctuation–dissipation.

use nalgebra::DVector;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::Thermalization;
use crate::exec::ExecutionContext;

const TWO_POW_NEG_53: f64 = 1.0 / 9_007_199_254_740_992.0;

/// Stateless sampler for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalSampler {
    sqrt_kt_dt: f64,
    offset: u64,
    seed: u64,
}

impl ThermalSampler {
    /// Sampler for the given thermalization parameters.
    #[must_use]
    pub const fn new(params: &Thermalization) -> Self {
        Self {
            sqrt_kt_dt: params.sqrt_kt_dt,
            offset: params.offset,
            seed: params.seed,
        }
    }

    /// Uniform draw in (0, 1) for `index`.
    #[must_use]
    pub fn uniform(&self, index: u64) -> f64 {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        rng.set_stream(self.offset);
        rng.set_word_pos(u128::from(index) * 2);
        ((rng.next_u64() >> 11) as f64 + 0.5) * TWO_POW_NEG_53
    }

    /// Scaled zero-mean sample for `index`.
    #[must_use]
    pub fn sample(&self, index: u64) -> f64 {
        2.0_f64.sqrt() * self.sqrt_kt_dt * 12.0_f64.sqrt() * (self.uniform(index) - 0.5)
    }

    /// Noise vector of length `len`, tabulated on the context.
    #[must_use]
    pub fn noise<E: ExecutionContext>(&self, context: &E, len: usize) -> DVector<f64> {
        DVector::from_vec(context.tabulate(len, |k| self.sample(k as u64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{Serial, Threaded};
    use crate::tolerances::{THERMAL_MEAN_ABS, THERMAL_VARIANCE_REL};

    fn sampler(s: f64, offset: u64, seed: u64) -> ThermalSampler {
        ThermalSampler::new(&Thermalization::new(s, offset, seed))
    }

    #[test]
    fn same_triple_same_value() {
        let a = sampler(1.0, 3, 42);
        let b = sampler(1.0, 3, 42);
        for k in 0..32 {
            assert_eq!(a.sample(k).to_bits(), b.sample(k).to_bits());
        }
    }

    #[test]
    fn offset_and_seed_change_stream() {
        let base = sampler(1.0, 0, 42);
        let shifted = sampler(1.0, 1, 42);
        let reseeded = sampler(1.0, 0, 43);
        let differs = |o: &ThermalSampler| (0..16).any(|k| o.sample(k) != base.sample(k));
        assert!(differs(&shifted));
        assert!(differs(&reseeded));
    }

    #[test]
    fn uniform_stays_open_interval() {
        let s = sampler(1.0, 7, 9);
        for k in 0..1000 {
            let u = s.uniform(k);
            assert!(u > 0.0 && u < 1.0);
        }
    }

    #[test]
    fn contexts_tabulate_identically() {
        let s = sampler(0.3, 11, 2024);
        let a = s.noise(&Serial, 600);
        let b = s.noise(&Threaded::default(), 600);
        assert_eq!(a, b);
    }

    #[test]
    fn moments_match_unit_variance_scaling() {
        let n = 20_000;
        let s = sampler(1.0, 0, 5);
        let v = s.noise(&Serial, n);
        let mean = v.sum() / n as f64;
        let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < THERMAL_MEAN_ABS, "mean {mean}");
        assert!((var - 2.0).abs() / 2.0 < THERMAL_VARIANCE_REL, "var {var}");
    }
}
