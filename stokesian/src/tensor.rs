// SPDX-License-Identifier: AGPL-3.0-only

//! Grand mobility / resistance tensor and its stage transitions.
//!
//! The tensor is three dense blocks over all particles:
//!
//! | Block | Shape | Couples |
//! |-------|-------|---------|
//! | UF | 6N × 6N | force/torque ↔ velocity/angular velocity |
//! | US | 6N × 5N | force/torque ↔ strain rate (FTS only) |
//! | SS | 5N × 5N | stresslet ↔ strain rate (FTS only) |
//!
//! Without FTS the US and SS blocks are zero-sized (6N × 0 and 0 × 0).
//!
//! The same blocks mean different things as the solve advances, so each
//! stage has its own type and the transitions consume their input:
//!
//! ```text
//!   MobilityTensor ──into_resistance()──▶ ResistanceTensor
//!        (far field)      R1…R6              (+ lubrication, symmetrize)
//!                                                  │ finalize()
//!                                                  ▼
//!                                          MobilityOperator
//!                                  (M = R⁻¹, L = chol(R), R_FE)
//! ```

use nalgebra::{Cholesky, DMatrix, DVector};

use crate::error::{Stage, StokesianError};
use crate::particles::{FT_DOF, STRAIN_DOF};

/// Row/column of particle `p`'s translational block in UF/US.
#[must_use]
pub const fn force_offset(p: usize) -> usize {
    FT_DOF * p
}

/// Row/column of particle `p`'s rotational block in UF/US.
#[must_use]
pub const fn torque_offset(p: usize) -> usize {
    FT_DOF * p + 3
}

/// Row/column of particle `p`'s stresslet block in US/SS.
#[must_use]
pub const fn strain_offset(p: usize) -> usize {
    STRAIN_DOF * p
}

/// Raw storage of the three coupled blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct GrandTensor {
    /// Force/torque ↔ velocity block.
    pub uf: DMatrix<f64>,
    /// Force/torque ↔ strain block.
    pub us: DMatrix<f64>,
    /// Stresslet ↔ strain block.
    pub ss: DMatrix<f64>,
}

impl GrandTensor {
    /// Zero blocks for `n` particles; stresslet blocks zero-sized unless `fts`.
    #[must_use]
    pub fn zeros(n: usize, fts: bool) -> Self {
        let ns = if fts { STRAIN_DOF * n } else { 0 };
        Self {
            uf: DMatrix::zeros(FT_DOF * n, FT_DOF * n),
            us: DMatrix::zeros(FT_DOF * n, ns),
            ss: DMatrix::zeros(ns, ns),
        }
    }

    /// Number of particles covered.
    #[must_use]
    pub fn n_particles(&self) -> usize {
        self.uf.nrows() / FT_DOF
    }

    /// Whether the stresslet blocks are populated.
    #[must_use]
    pub fn has_stresslet(&self) -> bool {
        self.ss.nrows() > 0
    }
}

/// Far-field grand mobility, as assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityTensor(GrandTensor);

impl MobilityTensor {
    /// Empty mobility for `n` particles.
    #[must_use]
    pub fn zeros(n: usize, fts: bool) -> Self {
        Self(GrandTensor::zeros(n, fts))
    }

    /// Read access to the blocks.
    #[must_use]
    pub const fn blocks(&self) -> &GrandTensor {
        &self.0
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut GrandTensor {
        &mut self.0
    }

    /// Invert to the stress-decoupled resistance (steps R1–R6).
    ///
    /// ```text
    /// R1  UF⁻¹
    /// R2  rsu = USᵀ · UF⁻¹
    /// R3  SS − rsu · US
    /// R4  (SS − rsu · US)⁻¹                  → SS
    /// R5  −rsuᵀ · SS                          → US
    /// R6  UF⁻¹ − US · rsu                     → UF
    /// ```
    ///
    /// Without stresslet blocks only R1 runs.
    ///
    /// # Errors
    ///
    /// [`StokesianError::SingularMatrix`] if UF or the Schur complement
    /// cannot be inverted.
    pub fn into_resistance(self) -> Result<ResistanceTensor, StokesianError> {
        let GrandTensor { uf, us, ss } = self.0;
        let uf_inv = invert(uf, Stage::MobilityInverse)?;
        if ss.nrows() == 0 {
            return Ok(ResistanceTensor(GrandTensor { uf: uf_inv, us, ss }));
        }

        let rsu = us.transpose() * &uf_inv;
        let schur = ss - &rsu * &us;
        let ss = invert(schur, Stage::SchurInverse)?;
        let us = -(rsu.transpose() * &ss);
        let uf = uf_inv - &us * &rsu;
        Ok(ResistanceTensor(GrandTensor { uf, us, ss }))
    }
}

/// Resistance tensor: the only stage that accepts lubrication.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceTensor(GrandTensor);

impl ResistanceTensor {
    /// Read access to the blocks.
    #[must_use]
    pub const fn blocks(&self) -> &GrandTensor {
        &self.0
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut GrandTensor {
        &mut self.0
    }

    /// Copy the upper triangle of UF and SS onto their lower triangles.
    pub fn symmetrize(&mut self) {
        self.0.uf.fill_lower_triangle_with_upper_triangle();
        self.0.ss.fill_lower_triangle_with_upper_triangle();
    }

    /// Factor UF once, yielding both its inverse and its Cholesky factor.
    ///
    /// # Errors
    ///
    /// [`StokesianError::NotPositiveDefinite`] if UF has no Cholesky factor.
    pub fn finalize(self) -> Result<MobilityOperator, StokesianError> {
        let GrandTensor { uf, us, .. } = self.0;
        let stage = Stage::ResistanceFactorization;
        let chol = Cholesky::new(uf).ok_or(StokesianError::NotPositiveDefinite { stage })?;
        let mobility = chol.inverse();
        if mobility.iter().any(|v| !v.is_finite()) {
            return Err(StokesianError::SingularMatrix { stage });
        }
        Ok(MobilityOperator {
            mobility,
            sqrt_resistance: chol.l(),
            coupling: us,
        })
    }
}

/// Ambient flow at the particle centers (placeholder: always quiescent).
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientFlow {
    /// u∞ at each particle (6N).
    pub velocity: DVector<f64>,
    /// E∞ at each particle in EV form (5N, or empty without FTS).
    pub strain: DVector<f64>,
}

impl AmbientFlow {
    /// Fluid at rest.
    #[must_use]
    pub fn quiescent(n: usize, fts: bool) -> Self {
        let ns = if fts { STRAIN_DOF * n } else { 0 };
        Self {
            velocity: DVector::zeros(FT_DOF * n),
            strain: DVector::zeros(ns),
        }
    }
}

/// Usable operator after lubrication: mobility and resistance square root.
#[derive(Debug, Clone, PartialEq)]
pub struct MobilityOperator {
    /// R_FU⁻¹ (6N × 6N).
    pub mobility: DMatrix<f64>,
    /// Lower Cholesky factor L with L·Lᵀ = R_FU.
    pub sqrt_resistance: DMatrix<f64>,
    /// R_FE coupling to the ambient strain (6N × 5N or 6N × 0).
    pub coupling: DMatrix<f64>,
}

impl MobilityOperator {
    /// u = M · (F + R_FE · E∞ + L · ψ) + u∞.
    #[must_use]
    pub fn velocities(
        &self,
        forces: &[f64],
        noise: Option<&DVector<f64>>,
        ambient: &AmbientFlow,
    ) -> DVector<f64> {
        let mut rhs = DVector::from_column_slice(forces);
        if self.coupling.ncols() > 0 {
            rhs += &self.coupling * &ambient.strain;
        }
        if let Some(psi) = noise {
            rhs += &self.sqrt_resistance * psi;
        }
        &self.mobility * rhs + &ambient.velocity
    }
}

/// LU inverse that also rejects non-finite results.
fn invert(m: DMatrix<f64>, stage: Stage) -> Result<DMatrix<f64>, StokesianError> {
    match m.try_inverse() {
        Some(inv) if inv.iter().all(|v| v.is_finite()) => Ok(inv),
        _ => Err(StokesianError::SingularMatrix { stage }),
    }
}
