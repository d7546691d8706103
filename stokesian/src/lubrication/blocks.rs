// SPDX-License-Identifier: AGPL-3.0-only

//! Dimensional resistance blocks of one close pair.
//!
//! Local layout, particle 1 first:
//!
//! | Block | Shape | Rows | Columns |
//! |-------|-------|------|---------|
//! | `abc` | 12 × 12 | F₁ T₁ F₂ T₂ | U₁ Ω₁ U₂ Ω₂ |
//! | `gh` | 12 × 10 | F₁ T₁ F₂ T₂ | E₁ E₂ |
//! | `m` | 10 × 10 | S₁ S₂ | E₁ E₂ |
//!
//! Only the upper triangle of the self blocks of `abc` and `m` is
//! meaningful; the full pair block is. Scaling follows the published
//! resistance formulation including its uncertain exponents: the A₁₂ and
//! C₁₂ diagonals add their Y function unscaled, and the lower half of M₁₂
//! is scaled twice. Both are marked for review and kept as published.

use std::f64::consts::PI;

use nalgebra::SMatrix;

use super::functions::LubricationFunctions;
use crate::algebra::{contract_strain_strain, outer, strain_tensor, Mat3, Vec3};
use crate::tensor::{force_offset, strain_offset, GrandTensor};

/// Local 12 × 12 force/torque ↔ velocity block.
pub type AbcBlock = SMatrix<f64, 12, 12>;
/// Local 12 × 10 force/torque ↔ strain block.
pub type GhBlock = SMatrix<f64, 12, 10>;
/// Local 10 × 10 stresslet ↔ strain block.
pub type MBlock = SMatrix<f64, 10, 10>;

/// `6πη a^k` for k = 1, 2, 3.
fn resistance_scales(radius: f64, viscosity: f64) -> [f64; 3] {
    let v1 = PI * 6.0 * viscosity * radius;
    let v2 = v1 * radius;
    [v1, v2, v2 * radius]
}

/// Resistance corrections of one pair in local layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LubricationBlocks {
    pub abc: AbcBlock,
    pub gh: GhBlock,
    pub m: MBlock,
}

impl LubricationBlocks {
    /// Build the blocks for spheres `a1`, `a2` along unit vector `d`.
    ///
    /// `gh` and `m` stay zero unless `fts`.
    #[must_use]
    pub fn new(
        f: &LubricationFunctions,
        d: &Vec3,
        a1: f64,
        a2: f64,
        viscosity: f64,
        fts: bool,
    ) -> Self {
        let s11 = resistance_scales(a1, viscosity);
        let s22 = resistance_scales(a2, viscosity);
        let s12 = resistance_scales(0.5 * (a1 + a2), viscosity);
        let ee = outer(d);

        let mut blocks = Self {
            abc: force_velocity(f, d, &ee, &s11, &s22, &s12),
            gh: GhBlock::zeros(),
            m: MBlock::zeros(),
        };
        if fts {
            blocks.gh = force_strain(f, d, &ee, &s11, &s12);
            blocks.m = strain_strain(f, &ee, &s11, &s22, &s12);
        }
        blocks
    }

    /// Add into the resistance blocks for particles `p1 < p2`.
    ///
    /// UF and SS receive their self upper triangles and the full pair block;
    /// US receives all four combinations.
    pub fn scatter(&self, tensor: &mut GrandTensor, p1: usize, p2: usize) {
        let (i6, j6) = (force_offset(p1), force_offset(p2));
        let uf = &mut tensor.uf;
        for jc in 0..6 {
            for ir in 0..=jc {
                uf[(i6 + ir, i6 + jc)] += self.abc[(ir, jc)];
                uf[(j6 + ir, j6 + jc)] += self.abc[(ir + 6, jc + 6)];
            }
        }
        for jc in 6..12 {
            for ir in 0..6 {
                uf[(i6 + ir, j6 + jc - 6)] += self.abc[(ir, jc)];
            }
        }

        if !tensor.has_stresslet() {
            return;
        }
        let (i5, j5) = (strain_offset(p1), strain_offset(p2));
        let us = &mut tensor.us;
        for jc in 0..5 {
            for ir in 0..6 {
                us[(i6 + ir, i5 + jc)] += self.gh[(ir, jc)];
                us[(j6 + ir, j5 + jc)] += self.gh[(ir + 6, jc + 5)];
                us[(i6 + ir, j5 + jc)] += self.gh[(ir, jc + 5)];
                us[(j6 + ir, i5 + jc)] += self.gh[(ir + 6, jc)];
            }
        }
        let ss = &mut tensor.ss;
        for jc in 0..5 {
            for ir in 0..=jc {
                ss[(i5 + ir, i5 + jc)] += self.m[(ir, jc)];
                ss[(j5 + ir, j5 + jc)] += self.m[(ir + 5, jc + 5)];
            }
        }
        for jc in 5..10 {
            for ir in 0..5 {
                ss[(i5 + ir, j5 + jc - 5)] += self.m[(ir, jc)];
            }
        }
    }
}

fn force_velocity(
    f: &LubricationFunctions,
    d: &Vec3,
    ee: &Mat3,
    s11: &[f64; 3],
    s22: &[f64; 3],
    s12: &[f64; 3],
) -> AbcBlock {
    let mut t = AbcBlock::zeros();
    let xmy11a = f.x11a - f.y11a;
    let xmy12a = f.x12a - f.y12a;
    let xmy11c = f.x11c - f.y11c;
    let xmy12c = f.x12c - f.y12c;

    // A11, upper half
    let a11 = [
        [xmy11a * ee[0][0] + f.y11a, xmy11a * ee[0][1], xmy11a * ee[0][2]],
        [0.0, xmy11a * ee[1][1] + f.y11a, xmy11a * ee[1][2]],
        [0.0, 0.0, xmy11a * ee[2][2] + f.y11a],
    ];
    // C11, upper half
    let c11 = [
        [xmy11c * ee[0][0] + f.y11c, xmy11c * ee[0][1], xmy11c * ee[0][2]],
        [0.0, xmy11c * ee[1][1] + f.y11c, xmy11c * ee[1][2]],
        [0.0, 0.0, xmy11c * ee[2][2] + f.y11c],
    ];
    for i in 0..3 {
        for j in i..3 {
            t[(i, j)] = s11[0] * a11[i][j];
            t[(i + 3, j + 3)] = s11[2] * c11[i][j];
            t[(i + 6, j + 6)] = s22[0] * a11[i][j];
            t[(i + 9, j + 9)] = s22[2] * c11[i][j];
        }
    }

    // A12 and C12: review pending on the unscaled diagonal term.
    for i in 0..3 {
        t[(i, i + 6)] = s12[0] * xmy12a * ee[i][i] + f.y12a;
        t[(i + 3, i + 9)] = s12[2] * xmy12c * ee[i][i] + f.y12c;
    }
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        t[(i, j + 6)] = s12[0] * xmy12a * ee[i][j];
        t[(j, i + 6)] = t[(i, j + 6)];
        t[(i + 3, j + 9)] = s12[2] * xmy12c * ee[i][j];
        t[(j + 3, i + 9)] = t[(i + 3, j + 9)];
    }

    // B̃11
    t[(0, 4)] = -s11[1] * f.y11b * d[2];
    t[(0, 5)] = s11[1] * f.y11b * d[1];
    t[(1, 5)] = -s11[1] * f.y11b * d[0];
    t[(1, 3)] = -t[(0, 4)];
    t[(2, 3)] = -t[(0, 5)];
    t[(2, 4)] = -t[(1, 5)];

    // B̃12
    t[(0, 10)] = s12[1] * f.y12b * d[2];
    t[(0, 11)] = -s12[1] * f.y12b * d[1];
    t[(1, 11)] = s12[1] * f.y12b * d[0];
    t[(1, 9)] = -t[(0, 10)];
    t[(2, 9)] = -t[(0, 11)];
    t[(2, 10)] = -t[(1, 11)];

    // B12 = B̃12, B̃22 = −B̃11
    for j in 3..6 {
        for i in 0..3 {
            t[(i + 3, j + 3)] = t[(i, j + 6)];
            t[(i + 6, j + 6)] = -t[(i, j)];
        }
    }
    t
}

/// One G̃ row group: 3 × 5 coupling built from X and Y at scale `visc`.
fn g_rows(x: f64, y: f64, d: &Vec3, ee: &Mat3, visc: f64) -> [[f64; 5]; 3] {
    let c13x = x / 3.0;
    let c2y = 2.0 * y;
    let xm2y = x - c2y;
    let comd11 = ee[0][0] * xm2y;
    let comd22 = ee[1][1] * xm2y;
    let comd33 = ee[2][2] * xm2y;
    let c2ymx = c2y - c13x;
    let con34 = comd11 - c13x;
    let con56 = comd11 + y;
    let con712 = comd22 + y;
    let con89 = comd33 + y;
    let con1011 = comd22 - c13x;
    let shared = visc * d[0] * ee[1][2] * xm2y;
    [
        [
            visc * d[0] * (comd11 + c2ymx),
            visc * d[1] * con56,
            visc * d[2] * con56,
            shared,
            visc * d[0] * con1011,
        ],
        [
            visc * d[1] * con34,
            visc * d[0] * con712,
            shared,
            visc * d[2] * con712,
            visc * d[1] * (comd22 + c2ymx),
        ],
        [
            visc * d[2] * con34,
            shared,
            visc * d[0] * con89,
            visc * d[1] * con89,
            visc * d[2] * con1011,
        ],
    ]
}

/// One H̃ row group: 3 × 5 coupling built from Y at scale `visc`.
fn h_rows(y: f64, ee: &Mat3, visc: f64) -> [[f64; 5]; 3] {
    let d11md22 = ee[0][0] - ee[1][1];
    let d22md33 = ee[1][1] - ee[2][2];
    let d33md11 = ee[2][2] - ee[0][0];
    let yd12 = y * ee[0][1];
    let yd13 = y * ee[0][2];
    let yd23 = y * ee[1][2];
    let cyd12 = 2.0 * yd12;
    [
        [0.0, -visc * yd13, visc * yd12, visc * y * d22md33, -visc * 2.0 * yd23],
        [visc * 2.0 * yd13, visc * yd23, visc * y * d33md11, -visc * yd12, 0.0],
        [-visc * cyd12, visc * y * d11md22, -visc * yd23, visc * yd13, visc * cyd12],
    ]
}

fn force_strain(
    f: &LubricationFunctions,
    d: &Vec3,
    ee: &Mat3,
    s11: &[f64; 3],
    s12: &[f64; 3],
) -> GhBlock {
    let mut t = GhBlock::zeros();
    let g11 = g_rows(f.x11g, f.y11g, d, ee, s11[2]);
    let g21 = g_rows(f.x12g, f.y12g, d, ee, s12[2]);
    let h11 = h_rows(f.y11h, ee, s11[2]);
    let h12 = h_rows(f.y12h, ee, s12[2]);
    for i in 0..3 {
        for j in 0..5 {
            t[(i, j)] = g11[i][j];
            t[(i + 6, j)] = g21[i][j];
            t[(i + 3, j)] = h11[i][j];
            t[(i + 3, j + 5)] = h12[i][j];
        }
    }
    // The published G̃11 entry for (row 1, column 0) is overwritten by the
    // z-component and (row 2, column 0) is never set.
    t[(1, 0)] = g11[2][0];
    t[(2, 0)] = 0.0;

    // G̃12 = −G̃21, G̃22 = −G̃11, H̃21 = H̃12, H̃22 = H̃11
    for i in 0..3 {
        for j in 0..5 {
            t[(i, j + 5)] = -t[(i + 6, j)];
            t[(i + 6, j + 5)] = -t[(i, j)];
            t[(i + 9, j)] = t[(i + 3, j + 5)];
            t[(i + 9, j + 5)] = t[(i + 3, j)];
        }
    }
    t
}

fn strain_strain(
    f: &LubricationFunctions,
    ee: &Mat3,
    s11: &[f64; 3],
    s22: &[f64; 3],
    s12: &[f64; 3],
) -> MBlock {
    let base = contract_strain_strain(&strain_tensor(f.xm, f.ym, f.zm, ee));
    let mut t = MBlock::zeros();
    for j in 0..5 {
        for i in 0..=j {
            t[(i, j + 5)] = s12[2] * base[i][j];
            t[(i + 5, j + 5)] = s22[2] * base[i][j];
        }
    }
    // Lower half of M12, scaled a second time.
    for i in 0..5 {
        for j in (i + 1)..5 {
            t[(j, i + 5)] = s12[2] * t[(i, j + 5)];
        }
    }
    for i in 0..5 {
        for j in 0..5 {
            t[(i, j)] = s11[2] * base[i][j];
        }
    }
    t
}
