// SPDX-License-Identifier: AGPL-3.0-only

//! Isolated-sphere mobility on the tensor diagonal.
//!
//! Each particle contributes fixed isotropic templates scaled by
//! `1/(6πηa^k)`, k = 1 (translation), 3 (rotation and strain).

use std::f64::consts::FRAC_1_PI;

use crate::algebra::Strain5x5;
use crate::exec::ExecutionContext;
use crate::tensor::{force_offset, strain_offset, torque_offset, GrandTensor};

/// Rotation template diagonal (isotropic 3/4).
pub const ROTATION_TEMPLATE: f64 = 3.0 / 4.0;

/// Strain template: 9/5 on the diagonal, 9/10 coupling the two normal
/// components.
pub const STRAIN_TEMPLATE: Strain5x5 = [
    [9.0 / 5.0, 0.0, 0.0, 0.0, 9.0 / 10.0],
    [0.0, 9.0 / 5.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 9.0 / 5.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 9.0 / 5.0, 0.0],
    [9.0 / 10.0, 0.0, 0.0, 0.0, 9.0 / 5.0],
];

/// Viscous scales `1/(6πηa)`, `1/(6πηa²)`, `1/(6πηa³)`.
#[must_use]
pub fn viscous_scales(radius: f64, viscosity: f64) -> [f64; 3] {
    let visc1 = FRAC_1_PI / 6.0 / viscosity / radius;
    let visc2 = visc1 / radius;
    let visc3 = visc2 / radius;
    [visc1, visc2, visc3]
}

/// Scaled diagonal blocks of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfMobility {
    /// Translational drag inverse (isotropic).
    pub translation: f64,
    /// Rotational drag inverse (isotropic).
    pub rotation: f64,
    /// Strain–strain block.
    pub strain: Strain5x5,
}

/// Self mobility of a sphere of `radius` in a fluid of `viscosity`.
#[must_use]
pub fn self_mobility(radius: f64, viscosity: f64) -> SelfMobility {
    let [visc1, _, visc3] = viscous_scales(radius, viscosity);
    let mut strain = STRAIN_TEMPLATE;
    for v in strain.iter_mut().flatten() {
        *v *= visc3;
    }
    SelfMobility {
        translation: visc1,
        rotation: visc3 * ROTATION_TEMPLATE,
        strain,
    }
}

/// Write every particle's diagonal blocks into `tensor`.
///
/// Blocks are computed on the context and written back in particle order.
pub fn assemble_self<E: ExecutionContext>(
    context: &E,
    tensor: &mut GrandTensor,
    radii: &[f64],
    viscosity: f64,
) {
    let blocks = context.map(radii.len(), |p| self_mobility(radii[p], viscosity));
    let fts = tensor.has_stresslet();
    for (p, block) in blocks.iter().enumerate() {
        let (f, t) = (force_offset(p), torque_offset(p));
        for i in 0..3 {
            tensor.uf[(f + i, f + i)] = block.translation;
            tensor.uf[(t + i, t + i)] = block.rotation;
        }
        if fts {
            let s = strain_offset(p);
            for (i, row) in block.strain.iter().enumerate() {
                for (j, &v) in row.iter().enumerate() {
                    tensor.ss[(s + i, s + j)] = v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Serial;
    use crate::tolerances::STOKES_DRAG_REL;
    use std::f64::consts::PI;

    #[test]
    fn translation_is_stokes_drag() {
        let m = self_mobility(2.0, 0.5);
        let expected = 1.0 / (6.0 * PI * 0.5 * 2.0);
        assert!((m.translation - expected).abs() / expected < STOKES_DRAG_REL);
    }

    #[test]
    fn rotation_is_stokes_torque_drag() {
        let m = self_mobility(1.5, 2.0);
        let expected = 1.0 / (8.0 * PI * 2.0 * 1.5_f64.powi(3));
        assert!((m.rotation - expected).abs() / expected < STOKES_DRAG_REL);
    }

    #[test]
    fn strain_block_is_symmetric() {
        let m = self_mobility(1.0, 1.0);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(m.strain[i][j], m.strain[j][i]);
            }
        }
        assert!((m.strain[0][4] * 2.0 - m.strain[0][0]).abs() < 1e-16);
    }

    #[test]
    fn assembly_fills_only_diagonal_blocks() {
        let mut t = GrandTensor::zeros(2, true);
        assemble_self(&Serial, &mut t, &[1.0, 2.0], 1.0);
        let m1 = self_mobility(2.0, 1.0);
        assert_eq!(t.uf[(6, 6)], m1.translation);
        assert_eq!(t.uf[(11, 11)], m1.rotation);
        assert_eq!(t.ss[(5, 9)], m1.strain[0][4]);
        assert_eq!(t.uf[(0, 6)], 0.0);
        assert_eq!(t.ss[(0, 5)], 0.0);
        assert!(t.us.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn assembly_skips_strain_without_fts() {
        let mut t = GrandTensor::zeros(1, false);
        assemble_self(&Serial, &mut t, &[1.0], 1.0);
        assert_eq!(t.ss.len(), 0);
        assert!(t.uf[(0, 0)] > 0.0);
    }
}
