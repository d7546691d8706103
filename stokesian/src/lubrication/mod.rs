// SPDX-License-Identifier: AGPL-3.0-only

//! Near-field lubrication corrections to the resistance tensor.
//!
//! Far-field mobility misses the divergent squeeze flow between close
//! surfaces. For pairs with dimensionless separation `r = |x₂ − x₁|/a₁₂`
//! below [`LUBRICATION_CUTOFF`] the two-sphere resistance functions are
//! added onto the (already inverted) resistance tensor:
//!
//! ```text
//!   2 < r ≤ 2.1    logarithmic near-contact asymptotics
//!   2.1 < r < 4    linear interpolation in a LubricationTable
//!   r ≥ 4          nothing
//! ```
//!
//! Per-pair blocks are computed on the execution context. They are then
//! added serially in canonical pair order, so pairs sharing a particle never
//! race and the sum is reproducible bit for bit.

pub mod blocks;
pub mod functions;
pub mod table;

pub use blocks::LubricationBlocks;
pub use functions::LubricationFunctions;
pub use table::LubricationTable;

use crate::exec::ExecutionContext;
use crate::pairs::{PairGeometry, PairList};
use crate::particles::ParticleSystem;
use crate::tensor::ResistanceTensor;

/// Dimensionless separation at and above which lubrication vanishes.
pub const LUBRICATION_CUTOFF: f64 = 4.0;
/// Boundary between the asymptotic and tabulated branches.
pub const NEAR_CONTACT_SEAM: f64 = 2.1;

/// Lubrication functions at dimensionless separation `r`, or `None` when
/// the pair is out of range (or its distance is the overlap sentinel).
#[must_use]
pub fn lubrication_functions(table: &LubricationTable, r: f64) -> Option<LubricationFunctions> {
    if !(r < LUBRICATION_CUTOFF) {
        None
    } else if r <= NEAR_CONTACT_SEAM {
        Some(LubricationFunctions::near_contact(r))
    } else {
        Some(table.interpolate(r))
    }
}

/// Add all pair lubrication corrections to `resistance` and symmetrize it.
pub fn apply<E: ExecutionContext>(
    context: &E,
    resistance: &mut ResistanceTensor,
    particles: &ParticleSystem<'_>,
    pairs: &PairList,
    geometry: &[PairGeometry],
    table: &LubricationTable,
    viscosity: f64,
) {
    let fts = resistance.blocks().has_stresslet();
    let per_pair: Vec<Option<Box<LubricationBlocks>>> = context.map(pairs.len(), |pair_id| {
        let (i, j) = pairs.get(pair_id);
        let (a1, a2) = (particles.radius(i), particles.radius(j));
        let g = &geometry[pair_id];
        let r = g.distance / (0.5 * (a1 + a2));
        lubrication_functions(table, r)
            .map(|f| Box::new(LubricationBlocks::new(&f, &g.unit, a1, a2, viscosity, fts)))
    });

    let mut close = 0_usize;
    for ((i, j), blocks) in pairs.iter().zip(&per_pair) {
        if let Some(b) = blocks {
            b.scatter(resistance.blocks_mut(), i, j);
            close += 1;
        }
    }
    log::debug!("lubrication: {close} of {} pairs within cutoff", pairs.len());
    resistance.symmetrize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_at_or_beyond_cutoff() {
        let t = LubricationTable::default();
        assert!(lubrication_functions(&t, 4.0).is_none());
        assert!(lubrication_functions(&t, 12.0).is_none());
        assert!(lubrication_functions(&t, f64::NAN).is_none());
        assert!(lubrication_functions(&t, 3.999).is_some());
    }

    #[test]
    fn seam_uses_asymptotic_branch() {
        let t = LubricationTable::default();
        let at = lubrication_functions(&t, NEAR_CONTACT_SEAM).unwrap();
        assert_eq!(at, LubricationFunctions::near_contact(NEAR_CONTACT_SEAM));
    }

    #[test]
    fn continuous_across_seam() {
        let t = LubricationTable::default();
        let below = lubrication_functions(&t, NEAR_CONTACT_SEAM - 1e-9).unwrap();
        let above = lubrication_functions(&t, NEAR_CONTACT_SEAM + 1e-9).unwrap();
        let pairs = [
            (below.x11a, above.x11a),
            (below.y12b, above.y12b),
            (below.x11g, above.x11g),
            (below.y12h, above.y12h),
            (below.xm, above.xm),
        ];
        for (b, a) in pairs {
            assert!((b - a).abs() < 1e-6, "{b} vs {a}");
        }
    }
}
