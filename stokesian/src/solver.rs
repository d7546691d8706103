// SPDX-License-Identifier: AGPL-3.0-only

//! Per-timestep velocity solve.
//!
//! ```text
//!  positions, radii ──▶ pairs + geometry ──▶ reject overlaps
//!                                                │
//!        self mobility ─┐                        ▼
//!        pair mobility ─┴──▶ MobilityTensor ──R1…R6──▶ ResistanceTensor
//!                                                │ + lubrication, symmetrize
//!                                                ▼
//!                           MobilityOperator (M, L, R_FE)
//!                                                │
//!   u = M · (F + R_FE · E∞ + L · ψ) + u∞  ◀──────┘   ψ from ThermalSampler
//! ```
//!
//! Every tensor is allocated inside [`Solver::solve`] and dropped on return,
//! so one solver may serve concurrent solves.

use crate::config::{Flags, SolverConfig, Thermalization};
use crate::error::StokesianError;
use crate::exec::{ExecutionContext, Threaded};
use crate::lubrication::{self, LubricationTable};
use crate::mobility;
use crate::pairs::{check_distances, reject_overlaps, PairList};
use crate::particles::{ParticleSystem, FT_DOF};
use crate::tensor::{AmbientFlow, MobilityTensor};
use crate::thermal::ThermalSampler;

/// Stokesian Dynamics solver for a fixed particle count and viscosity.
#[derive(Debug)]
pub struct Solver<E: ExecutionContext> {
    context: E,
    viscosity: f64,
    n_particles: usize,
    table: LubricationTable,
}

impl<E: ExecutionContext> Solver<E> {
    /// Solver with the built-in lubrication table.
    ///
    /// The built-in table is synthetic. For `2.1 < r < 4` it holds the
    /// near-contact asymptotics tapered by `((4 − r)/1.9)²`, not published
    /// resistance coefficients. Use [`Solver::with_table`] with a published
    /// table when lubrication in that range must match the literature.
    ///
    /// # Errors
    ///
    /// [`StokesianError::InvalidViscosity`] unless `viscosity` is finite and
    /// positive.
    pub fn new(context: E, viscosity: f64, n_particles: usize) -> Result<Self, StokesianError> {
        Self::with_table(context, viscosity, n_particles, LubricationTable::default())
    }

    /// Solver with a caller-supplied lubrication table.
    ///
    /// # Errors
    ///
    /// As [`Solver::new`], plus [`StokesianError::TableLoad`] for a table
    /// that fails validation.
    pub fn with_table(
        context: E,
        viscosity: f64,
        n_particles: usize,
        table: LubricationTable,
    ) -> Result<Self, StokesianError> {
        if !(viscosity.is_finite() && viscosity > 0.0) {
            return Err(StokesianError::InvalidViscosity(viscosity));
        }
        table.validate()?;
        Ok(Self {
            context,
            viscosity,
            n_particles,
            table,
        })
    }

    /// Solver for the viscosity in `config`.
    ///
    /// # Errors
    ///
    /// As [`Solver::new`].
    pub fn from_config(
        context: E,
        config: &SolverConfig,
        n_particles: usize,
    ) -> Result<Self, StokesianError> {
        config.validate()?;
        Self::new(context, config.viscosity, n_particles)
    }

    /// Fluid viscosity.
    #[must_use]
    pub const fn viscosity(&self) -> f64 {
        self.viscosity
    }

    /// Particle count every solve expects.
    #[must_use]
    pub const fn n_particles(&self) -> usize {
        self.n_particles
    }

    /// Lubrication table used for `2.1 < r < 4`.
    #[must_use]
    pub const fn table(&self) -> &LubricationTable {
        &self.table
    }

    /// The execution context.
    #[must_use]
    pub const fn context(&self) -> &E {
        &self.context
    }

    /// Velocities and angular velocities (6N) for the given configuration.
    ///
    /// # Errors
    ///
    /// - [`StokesianError::LengthMismatch`] / [`StokesianError::InvalidRadius`]
    ///   before any computation.
    /// - [`StokesianError::Overlap`] for touching or overlapping spheres.
    /// - [`StokesianError::SingularMatrix`] /
    ///   [`StokesianError::NotPositiveDefinite`] from the inversion stages.
    pub fn solve(
        &self,
        positions: &[f64],
        forces: &[f64],
        radii: &[f64],
        thermal: &Thermalization,
        flags: Flags,
    ) -> Result<Vec<f64>, StokesianError> {
        let positions = self.context.upload(positions);
        let forces = self.context.upload(forces);
        let radii = self.context.upload(radii);
        let particles = ParticleSystem::new(&positions, &forces, &radii, self.n_particles)?;
        let n = particles.len();
        let fts = flags.contains(Flags::FTS);
        let ambient = AmbientFlow::quiescent(n, fts);

        log::debug!(
            "solve: {n} particles on {} context, flags {flags}",
            self.context.name()
        );
        if n == 0 {
            return Ok(Vec::new());
        }

        let pairs = PairList::all_pairs(n);
        let geometry = check_distances(&self.context, &particles, &pairs);
        reject_overlaps(&particles, &pairs, &geometry)?;
        log::trace!("geometry: {} pairs", pairs.len());

        if !flags.has_mobility() {
            log::debug!("no mobility term enabled; returning ambient flow");
            return Ok(self.context.download(ambient.velocity.as_slice()));
        }

        let mobility =
            mobility::assemble(&self.context, &particles, &pairs, &geometry, self.viscosity, flags);
        log::trace!("mobility assembled");

        let mut resistance = mobility.into_resistance()?;
        log::trace!("resistance formed (FTS: {fts})");

        if flags.contains(Flags::LUBRICATION) {
            lubrication::apply(
                &self.context,
                &mut resistance,
                &particles,
                &pairs,
                &geometry,
                &self.table,
                self.viscosity,
            );
        }

        let operator = resistance.finalize()?;
        let noise = thermal
            .is_active()
            .then(|| ThermalSampler::new(thermal).noise(&self.context, FT_DOF * n));
        if noise.is_some() {
            log::trace!("thermal force drawn (offset {}, seed {})", thermal.offset, thermal.seed);
        }

        let u = operator.velocities(particles.forces(), noise.as_ref(), &ambient);
        Ok(self.context.download(u.as_slice()))
    }

    /// Far-field mobility as assembled, before any inversion.
    ///
    /// # Errors
    ///
    /// As the validation and overlap stages of [`Solver::solve`].
    pub fn mobility_tensor(
        &self,
        positions: &[f64],
        radii: &[f64],
        flags: Flags,
    ) -> Result<MobilityTensor, StokesianError> {
        let forces = vec![0.0; FT_DOF * self.n_particles];
        let particles = ParticleSystem::new(positions, &forces, radii, self.n_particles)?;
        let pairs = PairList::all_pairs(particles.len());
        let geometry = check_distances(&self.context, &particles, &pairs);
        reject_overlaps(&particles, &pairs, &geometry)?;
        Ok(mobility::assemble(
            &self.context,
            &particles,
            &pairs,
            &geometry,
            self.viscosity,
            flags,
        ))
    }
}

/// Deterministic far-field velocities with the default flags.
///
/// # Errors
///
/// As [`Solver::solve`].
pub fn compute_velocities(
    positions: &[f64],
    forces: &[f64],
    radii: &[f64],
    viscosity: f64,
    n_particles: usize,
) -> Result<Vec<f64>, StokesianError> {
    Solver::new(Threaded::default(), viscosity, n_particles)?.solve(
        positions,
        forces,
        radii,
        &Thermalization::athermal(),
        Flags::default(),
    )
}

/// Velocities with thermal forcing and explicit flags.
///
/// # Errors
///
/// As [`Solver::solve`].
#[allow(clippy::too_many_arguments)]
pub fn compute_velocities_thermal(
    positions: &[f64],
    forces: &[f64],
    radii: &[f64],
    viscosity: f64,
    n_particles: usize,
    sqrt_kt_dt: f64,
    offset: u64,
    seed: u64,
    flags: Flags,
) -> Result<Vec<f64>, StokesianError> {
    Solver::new(Threaded::default(), viscosity, n_particles)?.solve(
        positions,
        forces,
        radii,
        &Thermalization::new(sqrt_kt_dt, offset, seed),
        flags,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Serial;
    use crate::tolerances::STOKES_DRAG_REL;
    use std::f64::consts::PI;

    #[test]
    fn new_uses_synthetic_default_table() {
        let solver = Solver::new(Serial, 1.0, 2).unwrap();
        assert_eq!(solver.table(), &LubricationTable::default());
    }

    #[test]
    fn rejects_bad_viscosity() {
        assert_eq!(
            Solver::new(Serial, 0.0, 1).unwrap_err(),
            StokesianError::InvalidViscosity(0.0)
        );
        assert!(Solver::new(Serial, f64::NAN, 1).is_err());
    }

    #[test]
    fn empty_system_gives_empty_output() {
        let s = Solver::new(Serial, 1.0, 0).unwrap();
        let u = s
            .solve(&[], &[], &[], &Thermalization::athermal(), Flags::default())
            .unwrap();
        assert!(u.is_empty());
    }

    #[test]
    fn isolated_sphere_obeys_stokes_law() {
        let s = Solver::new(Serial, 2.0, 1).unwrap();
        let x = [3.0, -1.0, 7.0, 0.0, 0.0, 0.0];
        let f = [1.0, -2.0, 0.5, 0.3, 0.0, -0.6];
        let a = 0.5;
        let u = s
            .solve(&x, &f, &[a], &Thermalization::athermal(), Flags::default())
            .unwrap();
        let trans = 1.0 / (6.0 * PI * 2.0 * a);
        let rot = 1.0 / (8.0 * PI * 2.0 * a * a * a);
        for k in 0..3 {
            assert!((u[k] - f[k] * trans).abs() <= STOKES_DRAG_REL * trans.abs().max(1.0));
            assert!((u[k + 3] - f[k + 3] * rot).abs() <= STOKES_DRAG_REL * rot);
        }
    }

    #[test]
    fn length_checked_before_compute() {
        let s = Solver::new(Serial, 1.0, 2).unwrap();
        let err = s
            .solve(
                &[0.0; 6],
                &[0.0; 12],
                &[1.0, 1.0],
                &Thermalization::athermal(),
                Flags::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StokesianError::LengthMismatch {
                field: "positions",
                ..
            }
        ));
    }

    #[test]
    fn no_mobility_returns_ambient_flow() {
        let s = Solver::new(Serial, 1.0, 2).unwrap();
        let x = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let u = s
            .solve(
                &x,
                &[0.0; 12],
                &[1.0, 1.0],
                &Thermalization::athermal(),
                Flags::LUBRICATION | Flags::FTS,
            )
            .unwrap();
        assert_eq!(u, vec![0.0; 12]);
    }
}
