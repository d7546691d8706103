// SPDX-License-Identifier: AGPL-3.0-only

//! Pair enumeration and pair geometry.
//!
//! Pairs are enumerated once per solve in canonical order (outer index
//! ascending, inner index ascending). Later stages address per-pair data by
//! pair id, so the order is part of the contract.

use crate::algebra::Vec3;
use crate::error::StokesianError;
use crate::exec::ExecutionContext;
use crate::particles::ParticleSystem;

/// All unordered pairs (i, j), i < j, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairList {
    pairs: Vec<(usize, usize)>,
}

impl PairList {
    /// Enumerate every pair of `n` particles: N(N−1)/2 entries.
    #[must_use]
    pub fn all_pairs(n: usize) -> Self {
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }
        Self { pairs }
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when there are fewer than two particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Particle indices of pair `pair_id`.
    #[must_use]
    pub fn get(&self, pair_id: usize) -> (usize, usize) {
        self.pairs[pair_id]
    }

    /// Iterate pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }
}

/// Cached geometry of one pair, shared by far-field and lubrication stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Unit vector from the first particle toward the second.
    pub unit: Vec3,
    /// Center-to-center distance; NaN when the surfaces overlap.
    pub distance: f64,
}

impl PairGeometry {
    /// Geometry of the pair (`from`, `to`).
    ///
    /// The unit vector always uses the raw inverse distance (infinite for
    /// coincident centers). The distance is replaced by NaN when
    /// `distance <= contact`.
    #[must_use]
    pub fn between(from: &Vec3, to: &Vec3, contact: f64) -> Self {
        let dx = to[0] - from[0];
        let dy = to[1] - from[1];
        let dz = to[2] - from[2];
        let dr = (dx * dx + dy * dy + dz * dz).sqrt();
        let dr_inv = 1.0 / dr;
        let distance = if dr <= contact { f64::NAN } else { dr };
        Self {
            unit: [dx * dr_inv, dy * dr_inv, dz * dr_inv],
            distance,
        }
    }

    /// True when the distance carries the overlap sentinel.
    #[must_use]
    pub fn is_overlapping(&self) -> bool {
        !self.distance.is_finite()
    }
}

/// Compute geometry for every pair on the given context.
#[must_use]
pub fn check_distances<E: ExecutionContext>(
    context: &E,
    particles: &ParticleSystem<'_>,
    pairs: &PairList,
) -> Vec<PairGeometry> {
    context.map(pairs.len(), |pair_id| {
        let (i, j) = pairs.get(pair_id);
        PairGeometry::between(
            &particles.position(i),
            &particles.position(j),
            particles.radius(i) + particles.radius(j),
        )
    })
}

/// Fail on the first pair (canonical order) flagged as overlapping.
///
/// # Errors
///
/// [`StokesianError::Overlap`] naming the pair and its raw distance.
pub fn reject_overlaps(
    particles: &ParticleSystem<'_>,
    pairs: &PairList,
    geometry: &[PairGeometry],
) -> Result<(), StokesianError> {
    let Some(pair_id) = geometry.iter().position(PairGeometry::is_overlapping) else {
        return Ok(());
    };
    let (i, j) = pairs.get(pair_id);
    let (pi, pj) = (particles.position(i), particles.position(j));
    let distance = ((pj[0] - pi[0]).powi(2) + (pj[1] - pi[1]).powi(2) + (pj[2] - pi[2]).powi(2))
        .sqrt();
    log::debug!("pair ({i}, {j}) overlaps at distance {distance}");
    Err(StokesianError::Overlap {
        i,
        j,
        distance,
        contact: particles.radius(i) + particles.radius(j),
    })
}
