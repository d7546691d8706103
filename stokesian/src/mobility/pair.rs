// SPDX-License-Identifier: AGPL-3.0-only

//! Far-field pair mobility.
//!
//! Two-sphere mobility functions expanded in the dimensionless inverse
//! distance `a₁₂/r`, with `a₁₂` the mean of the two radii. The scalar
//! functions are combined with `e⊗e`, δ and ε into the coupling tensors
//!
//! ```text
//! A_ij  = X^A e_i e_j + Y^A (δ_ij − e_i e_j)          translation ↔ force
//! B_ij  = Y^B ε_ijk e_k                               rotation ↔ force
//! C_ij  = X^C e_i e_j + Y^C (δ_ij − e_i e_j)          rotation ↔ torque
//! g_kij, h_kij                                        force/torque ↔ strain
//! m_ijkl                                              stresslet ↔ strain
//! ```
//!
//! and written into the off-diagonal blocks for both orientations.

use std::f64::consts::FRAC_1_PI;

use crate::algebra::{
    contract_strain_strain, contract_vector_strain, outer, strain_tensor, third_index, Mat3,
    Rank3, Strain3x5, Strain5x5, DELTA, LEVI_CIVITA,
};
use crate::exec::ExecutionContext;
use crate::pairs::{PairGeometry, PairList};
use crate::tensor::{force_offset, strain_offset, torque_offset, GrandTensor};

/// Scalar mobility functions at one inverse distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarFieldScalars {
    pub x_a: f64,
    pub y_a: f64,
    pub y_b: f64,
    pub x_c: f64,
    pub y_c: f64,
    pub x_g: f64,
    pub y_g: f64,
    pub y_h: f64,
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
}

impl FarFieldScalars {
    /// Evaluate at dimensionless inverse distance `s = a₁₂/r`.
    #[must_use]
    pub fn at(s: f64) -> Self {
        let s2 = s * s;
        let s3 = s2 * s;
        let s4 = s3 * s;
        let s5 = s4 * s;
        Self {
            x_a: 3.0 / 2.0 * s - s3,
            y_a: 3.0 / 4.0 * s + 1.0 / 2.0 * s3,
            y_b: -3.0 / 4.0 * s2,
            x_c: 3.0 / 4.0 * s3,
            y_c: -3.0 / 8.0 * s3,
            x_g: 9.0 / 4.0 * s2 - 18.0 / 5.0 * s4,
            y_g: 6.0 / 5.0 * s4,
            y_h: -9.0 / 8.0 * s3,
            x_m: -9.0 / 2.0 * s3 + 54.0 / 5.0 * s5,
            y_m: 9.0 / 4.0 * s3 - 36.0 / 5.0 * s5,
            z_m: 9.0 / 5.0 * s5,
        }
    }
}

/// Unscaled coupling tensors of one pair, plus its viscous scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMobility {
    pub a: Mat3,
    pub b: Mat3,
    pub c: Mat3,
    pub g: Strain3x5,
    pub h: Strain3x5,
    pub m: Strain5x5,
    /// `1/(6πη a₁₂^k)` for k = 1, 2, 3.
    pub visc: [f64; 3],
}

/// Far-field coupling of spheres with radii `a1`, `a2` at `geometry`.
///
/// A non-finite distance propagates into non-finite entries.
#[must_use]
pub fn pair_mobility(geometry: &PairGeometry, a1: f64, a2: f64, viscosity: f64) -> PairMobility {
    let a12 = 0.5 * (a1 + a2);
    let visc1 = FRAC_1_PI / 6.0 / viscosity / a12;
    let visc2 = visc1 / a12;
    let visc3 = visc2 / a12;

    let e = geometry.unit;
    let ee = outer(&e);
    let f = FarFieldScalars::at(a12 / geometry.distance);
    let d = &DELTA;
    let eps = &LEVI_CIVITA;

    let mut a = [[0.0; 3]; 3];
    let mut b = [[0.0; 3]; 3];
    let mut c = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            a[i][j] = f.x_a * ee[i][j] + f.y_a * (d[i][j] - ee[i][j]);
            c[i][j] = f.x_c * ee[i][j] + f.y_c * (d[i][j] - ee[i][j]);
            if i != j {
                let k = third_index(i, j);
                b[i][j] = f.y_b * eps[i][j][k] * e[k];
            }
        }
    }

    let mut g: Rank3 = [[[0.0; 3]; 3]; 3];
    let mut h: Rank3 = [[[0.0; 3]; 3]; 3];
    for k in 0..3 {
        for i in 0..3 {
            for j in 0..3 {
                g[k][i][j] = -(f.x_g * (ee[i][j] - d[i][j] / 3.0) * e[k]
                    + f.y_g * (e[i] * d[j][k] + e[j] * d[i][k] - 2.0 * ee[i][j] * e[k]));
                // ε vanishes whenever the remaining index is undefined.
                let lhs = if j == k {
                    0.0
                } else {
                    let l = third_index(j, k);
                    ee[i][l] * eps[j][k][l]
                };
                let rhs = if i == k {
                    0.0
                } else {
                    let m = third_index(i, k);
                    ee[j][m] * eps[i][k][m]
                };
                h[k][i][j] = f.y_h * (lhs + rhs);
            }
        }
    }

    let m = strain_tensor(f.x_m, f.y_m, f.z_m, &ee);

    PairMobility {
        a,
        b,
        c,
        g: contract_vector_strain(&g),
        h: contract_vector_strain(&h),
        m: contract_strain_strain(&m),
        visc: [visc1, visc2, visc3],
    }
}

impl PairMobility {
    /// Write this pair's blocks for particles `p1 < p2` into `tensor`.
    pub fn scatter(&self, tensor: &mut GrandTensor, p1: usize, p2: usize) {
        let [visc1, visc2, visc3] = self.visc;
        let (f1, f2) = (force_offset(p1), force_offset(p2));
        let (t1, t2) = (torque_offset(p1), torque_offset(p2));
        let uf = &mut tensor.uf;
        for i in 0..3 {
            for j in 0..3 {
                uf[(f1 + i, f2 + j)] = visc1 * self.a[i][j];
                uf[(t1 + i, f2 + j)] = visc2 * self.b[i][j];
                uf[(f1 + i, t2 + j)] = -visc2 * self.b[j][i];
                uf[(t1 + i, t2 + j)] = visc3 * self.c[i][j];

                uf[(f2 + i, f1 + j)] = visc1 * self.a[j][i];
                uf[(t2 + i, f1 + j)] = visc2 * self.b[j][i];
                uf[(f2 + i, t1 + j)] = -visc2 * self.b[i][j];
                uf[(t2 + i, t1 + j)] = visc3 * self.c[j][i];
            }
        }

        if !tensor.has_stresslet() {
            return;
        }
        let (s1, s2) = (strain_offset(p1), strain_offset(p2));
        let us = &mut tensor.us;
        for i in 0..3 {
            for j in 0..5 {
                // Exponents as published; review pending.
                us[(f1 + i, s2 + j)] = visc2 * self.g[i][j];
                us[(f2 + i, s1 + j)] = -visc2 * self.g[i][j];
                us[(t1 + i, s2 + j)] = visc3 * self.h[i][j];
                us[(t2 + i, s1 + j)] = visc3 * self.h[i][j];
            }
        }
        let ss = &mut tensor.ss;
        for i in 0..5 {
            for j in 0..5 {
                ss[(s1 + i, s2 + j)] = visc3 * self.m[i][j];
                ss[(s2 + i, s1 + j)] = visc3 * self.m[j][i];
            }
        }
    }
}

/// Compute every pair's blocks on the context, then write them in pair order.
pub fn assemble_pairs<E: ExecutionContext>(
    context: &E,
    tensor: &mut GrandTensor,
    pairs: &PairList,
    geometry: &[PairGeometry],
    radii: &[f64],
    viscosity: f64,
) {
    let blocks = context.map(pairs.len(), |pair_id| {
        let (i, j) = pairs.get(pair_id);
        pair_mobility(&geometry[pair_id], radii[i], radii[j], viscosity)
    });
    for ((i, j), block) in pairs.iter().zip(&blocks) {
        block.scatter(tensor, i, j);
    }
}
