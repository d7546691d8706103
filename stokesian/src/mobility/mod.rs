// SPDX-License-Identifier: AGPL-3.0-only

//! Far-field grand mobility assembly.
//!
//! | Term | Unit of work | Writes |
//! |------|--------------|--------|
//! | [`self_mobility`] | particle | UF and SS diagonal blocks |
//! | [`pair`] | pair | UF, US, SS off-diagonal blocks |
//!
//! Both terms compute their blocks on an [`ExecutionContext`] and write
//! them back serially in index order, so the assembled tensor does not
//! depend on the context.

pub mod pair;
pub mod self_mobility;

pub use pair::{assemble_pairs, pair_mobility, FarFieldScalars, PairMobility};
pub use self_mobility::{assemble_self, self_mobility, viscous_scales, SelfMobility};

use crate::config::Flags;
use crate::exec::ExecutionContext;
use crate::pairs::{PairGeometry, PairList};
use crate::particles::ParticleSystem;
use crate::tensor::MobilityTensor;

/// Assemble the mobility terms selected by `flags`.
pub fn assemble<E: ExecutionContext>(
    context: &E,
    particles: &ParticleSystem<'_>,
    pairs: &PairList,
    geometry: &[PairGeometry],
    viscosity: f64,
    flags: Flags,
) -> MobilityTensor {
    let mut tensor = MobilityTensor::zeros(particles.len(), flags.contains(Flags::FTS));
    if flags.contains(Flags::SELF_MOBILITY) {
        assemble_self(context, tensor.blocks_mut(), particles.radii(), viscosity);
    }
    if flags.contains(Flags::PAIR_MOBILITY) {
        assemble_pairs(
            context,
            tensor.blocks_mut(),
            pairs,
            geometry,
            particles.radii(),
            viscosity,
        );
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Serial;
    use crate::pairs::check_distances;

    #[test]
    fn flags_select_terms() {
        let x = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let f = [0.0; 12];
        let a = [1.0, 1.0];
        let p = ParticleSystem::new(&x, &f, &a, 2).unwrap();
        let pairs = PairList::all_pairs(2);
        let g = check_distances(&Serial, &p, &pairs);

        let only_self = assemble(&Serial, &p, &pairs, &g, 1.0, Flags::SELF_MOBILITY);
        assert!(only_self.blocks().uf[(0, 0)] > 0.0);
        assert_eq!(only_self.blocks().uf[(0, 6)], 0.0);
        assert_eq!(only_self.blocks().ss.nrows(), 0);

        let only_pair = assemble(&Serial, &p, &pairs, &g, 1.0, Flags::PAIR_MOBILITY | Flags::FTS);
        assert_eq!(only_pair.blocks().uf[(0, 0)], 0.0);
        assert!(only_pair.blocks().uf[(0, 6)] > 0.0);
        assert_eq!(only_pair.blocks().ss.nrows(), 10);
    }
}
