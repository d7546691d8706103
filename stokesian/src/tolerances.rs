// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with physical justification.
//!
//! Every threshold used by the unit tests, integration tests and the
//! `validate_stokesian` binary is defined here. No ad-hoc magic numbers.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-12 for Stokes drag |
//! | Dense linear algebra | LU / Cholesky round-off | 1e-8 for double inversion |
//! | Tabulated data | Grid interpolation | 1e-6 at the lubrication seam |
//! | Statistics | Sample size | 5% for thermal noise moments |

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754 f64)
// ═══════════════════════════════════════════════════════════════════

/// Operations that should be exact in f64 arithmetic.
///
/// f64 has ~15.9 significant digits; 1e-10 allows 5 digits of accumulated
/// rounding in short compositions of exact operations.
pub const EXACT_F64: f64 = 1e-10;

/// Relative error of the isolated-sphere Stokes drag.
///
/// For N=1 the pipeline inverts a diagonal matrix twice; each entry is
/// touched by O(1) divisions, so the result is accurate to a few ulps.
pub const STOKES_DRAG_REL: f64 = 1e-12;

/// Absolute asymmetry allowed in an assembled mobility UF block.
///
/// Pair blocks are written as exact transposes of each other, so the block
/// is symmetric to machine precision; entries are O(1/(6πηa)) ≈ 0.05.
pub const MOBILITY_SYMMETRY_ABS: f64 = 1e-14;

/// Smallest eigenvalue accepted as "non-negative" for the assembled mobility.
///
/// Symmetric eigen-decomposition of an O(100)-sized matrix with O(0.05)
/// entries carries ~1e-15 absolute round-off per eigenvalue.
pub const PSD_EIGEN_FLOOR: f64 = -1e-12;

// ═══════════════════════════════════════════════════════════════════
// Dense linear algebra tolerances
// ═══════════════════════════════════════════════════════════════════

/// Relative error after inverting the mobility UF block twice.
///
/// LU inversion followed by Cholesky inversion; the far-field mobility of
/// well-separated spheres has a condition number below ~10, so 1e-8
/// relative to the largest entry is conservative.
pub const DOUBLE_INVERSION_REL: f64 = 1e-8;

/// Serial vs threaded execution: results must be bit-identical.
pub const CONTEXT_PARITY_ABS: f64 = 0.0;

// ═══════════════════════════════════════════════════════════════════
// Lubrication tolerances
// ═══════════════════════════════════════════════════════════════════

/// Offset from the 2.1 seam used when checking continuity.
pub const SEAM_OFFSET: f64 = 1e-9;

/// Jump allowed across the 2.1 seam between asymptotic and tabulated forms.
///
/// Both sides agree exactly at the seam; sampling at ±1e-9 picks up the local
/// slope, which is O(25) for the 1/(4ξ) term at ξ = 0.1, i.e. O(2.5e-8).
pub const LUBRICATION_SEAM_ABS: f64 = 1e-6;

// ═══════════════════════════════════════════════════════════════════
// Thermal noise tolerances
// ═══════════════════════════════════════════════════════════════════

/// Sample-mean tolerance (in units of the target standard deviation).
///
/// For n = 6000 samples the standard error of the mean is 1/√n ≈ 0.013;
/// 0.05 is ~4σ.
pub const THERMAL_MEAN_ABS: f64 = 0.05;

/// Sample-variance relative tolerance.
///
/// Uniform noise has excess kurtosis −1.2, so Var(s²)/σ⁴ = 0.8/n·2 ≈ 2.7e-4
/// for n = 6000, i.e. a relative standard error of ~1.6%. 5% is ~3σ.
pub const THERMAL_VARIANCE_REL: f64 = 0.05;

/// Thermal velocity against an independently factored M·L·ψ.
///
/// Both sides factor the same resistance; LU versus Cholesky inversion of
/// an O(10)-conditioned 12×12 to 24×24 matrix differs by ~1e-14 relative.
pub const THERMAL_OPERATOR_REL: f64 = 1e-9;

/// Sample covariance of thermal velocities against 2s²·M, entrywise, in
/// units of 2s²·√(Mᵢᵢ Mⱼⱼ).
///
/// With n = 6000 draws the correlation-normalized standard error is below
/// √(2/n) ≈ 0.018; the worst of 78 entries sits near 0.04. 0.1 is >5σ.
pub const THERMAL_COVARIANCE_REL: f64 = 0.1;

// ═══════════════════════════════════════════════════════════════════
// Two-sphere far-field scenario
// ═══════════════════════════════════════════════════════════════════

/// Velocity difference between two identical spheres under identical forces.
///
/// The configuration is mirror-symmetric; only summation order differs.
pub const TWIN_VELOCITY_ABS: f64 = 1e-12;

/// Cross-axis and angular velocity allowed in the two-sphere scenario.
///
/// The coupling tensors vanish exactly for a force along the line of
/// centers; residuals are pure round-off.
pub const TWIN_CROSS_AXIS_ABS: f64 = 1e-12;

/// Upper bound on the relative far-field enhancement at separation 10a.
///
/// The leading pair term is x12a ≈ 3/(2r) = 0.15; stresslet coupling is
/// O(r⁻⁴). 0.2 bounds it from above.
pub const TWIN_ENHANCEMENT_MAX: f64 = 0.2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_ordering() {
        assert!(STOKES_DRAG_REL < EXACT_F64);
        assert!(EXACT_F64 < DOUBLE_INVERSION_REL);
        assert!(DOUBLE_INVERSION_REL < LUBRICATION_SEAM_ABS);
        assert!(PSD_EIGEN_FLOOR < 0.0);
    }

    #[test]
    fn seam_offset_below_seam_tolerance() {
        assert!(SEAM_OFFSET < LUBRICATION_SEAM_ABS);
    }
}
