// SPDX-License-Identifier: AGPL-3.0-only

//! Small-tensor algebra shared by the far-field and near-field assemblers.
//!
//! Cartesian tensors of rank 1–4 over three dimensions, stored as nested
//! fixed-size arrays, plus the contraction of symmetric-traceless rank-2
//! quantities (strain rate E, stresslet S) to five-component vectors:
//!
//! ```text
//! EV = (E11 − E33, 2 E12, 2 E13, 2 E23, E22 − E33)
//! SV = (S11, S12, S13, S23, S22)
//! ```

/// Rank-1 tensor.
pub type Vec3 = [f64; 3];
/// Rank-2 tensor.
pub type Mat3 = [[f64; 3]; 3];
/// Rank-3 tensor, indexed `[k][i][j]`.
pub type Rank3 = [[[f64; 3]; 3]; 3];
/// Rank-4 tensor, indexed `[i][j][k][l]`.
pub type Rank4 = [[[[f64; 3]; 3]; 3]; 3];
/// Vector–strain coupling in five-component form (3 rows × 5 columns).
pub type Strain3x5 = [[f64; 5]; 3];
/// Strain–strain coupling in five-component form.
pub type Strain5x5 = [[f64; 5]; 5];

/// Kronecker delta.
pub const DELTA: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Levi-Civita alternating tensor ε_ijk.
pub const LEVI_CIVITA: Rank3 = [
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]],
    [[0.0, 0.0, -1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
    [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
];

/// Cartesian index pairs behind each stresslet component.
///
/// Row 0 holds the first index, row 1 the second: component 0 pairs (0,2),
/// component 1 pairs (0,1), component 2 pairs (0,2), component 3 pairs
/// (1,2), component 4 pairs (1,2). Diagonal components (0 and 4) are read as
/// differences of the two diagonal entries.
pub const STRAIN_INDEX: [[usize; 5]; 2] = [[0, 0, 0, 1, 1], [2, 1, 2, 2, 2]];

/// For `i != j`, the remaining index of {0, 1, 2}.
#[must_use]
pub const fn third_index(i: usize, j: usize) -> usize {
    (6 - i - j) % 3
}

/// Outer product e ⊗ e.
#[must_use]
pub fn outer(e: &Vec3) -> Mat3 {
    let mut ee = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            ee[i][j] = e[i] * e[j];
        }
    }
    ee
}

/// Isotropic strain–strain tensor built from the X, Y, Z scalar functions.
///
/// This is the common form of the far-field `M` mobility and the near-field
/// `M` resistance; only the scalar prefactors differ.
#[must_use]
pub fn strain_tensor(xm: f64, ym: f64, zm: f64, ee: &Mat3) -> Rank4 {
    let d = &DELTA;
    let mut m = [[[[0.0; 3]; 3]; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                for l in 0..3 {
                    m[i][j][k][l] = 1.5
                        * xm
                        * (ee[i][j] - d[i][j] / 3.0)
                        * (ee[k][l] - d[k][l] / 3.0)
                        + 0.5
                            * ym
                            * (ee[i][k] * d[j][l]
                                + ee[j][k] * d[i][l]
                                + ee[i][l] * d[j][k]
                                + ee[j][l] * d[i][k]
                                - 4.0 * ee[i][j] * ee[k][l])
                        + 0.5
                            * zm
                            * (d[i][k] * d[j][l] + d[j][k] * d[i][l] - d[i][j] * d[k][l]
                                + ee[i][j] * d[k][l]
                                + ee[k][l] * d[i][j]
                                - ee[i][k] * d[j][l]
                                - ee[j][k] * d[i][l]
                                - ee[i][l] * d[j][k]
                                - ee[j][l] * d[i][k]
                                + ee[i][j] * ee[k][l]);
                }
            }
        }
    }
    m
}

/// Contract the trailing symmetric pair of a rank-3 tensor to EV form.
#[must_use]
pub fn contract_vector_strain(g: &Rank3) -> Strain3x5 {
    let mut out = [[0.0; 5]; 3];
    for (row, gk) in out.iter_mut().zip(g) {
        *row = [
            gk[0][0] - gk[2][2],
            2.0 * gk[0][1],
            2.0 * gk[0][2],
            2.0 * gk[1][2],
            gk[1][1] - gk[2][2],
        ];
    }
    out
}

/// Contract both symmetric pairs of a rank-4 tensor to the 5×5 SV/EV form.
#[must_use]
pub fn contract_strain_strain(m: &Rank4) -> Strain5x5 {
    let s = &STRAIN_INDEX;
    let mut out = [[0.0; 5]; 5];
    for (i, row) in out.iter_mut().enumerate() {
        let (p, q) = (s[0][i], s[1][i]);
        *row = if i == 0 || i == 4 {
            [
                m[p][p][0][0] - m[p][p][2][2] - (m[q][q][0][0] - m[q][q][2][2]),
                2.0 * (m[p][p][0][1] - m[q][q][0][1]),
                2.0 * (m[p][p][0][2] - m[q][q][0][2]),
                2.0 * (m[p][p][1][2] - m[q][q][1][2]),
                m[p][p][1][1] - m[p][p][2][2] - (m[q][q][1][1] - m[q][q][2][2]),
            ]
        } else {
            [
                2.0 * (m[p][q][0][0] - m[p][q][2][2]),
                4.0 * m[p][q][0][1],
                4.0 * m[p][q][0][2],
                4.0 * m[p][q][1][2],
                2.0 * (m[p][q][1][1] - m[p][q][2][2]),
            ]
        };
    }
    out
}
