// SPDX-License-Identifier: AGPL-3.0-only

//! Validated view over the flat particle arrays handed in by a host
//! simulation.
//!
//! Layout per particle:
//!
//! | Array | Stride | Contents |
//! |-------|--------|----------|
//! | positions | 6 | x, y, z, then 3 orientation slots (unused here) |
//! | forces | 6 | Fx, Fy, Fz, Tx, Ty, Tz |
//! | radii | 1 | a |

use crate::algebra::Vec3;
use crate::error::StokesianError;

/// Slots per particle in the position array (position + orientation).
pub const POSITION_STRIDE: usize = 6;
/// Force/torque (and velocity/angular velocity) components per particle.
pub const FT_DOF: usize = 6;
/// Independent stresslet / strain-rate components per particle.
pub const STRAIN_DOF: usize = 5;

/// Borrowed, validated particle set for one solve.
#[derive(Debug, Clone, Copy)]
pub struct ParticleSystem<'a> {
    positions: &'a [f64],
    forces: &'a [f64],
    radii: &'a [f64],
}

impl<'a> ParticleSystem<'a> {
    /// Validate array lengths against `n_particles` and radii against zero.
    ///
    /// All checks run before any computation; nothing is truncated.
    ///
    /// # Errors
    ///
    /// [`StokesianError::LengthMismatch`] for a wrongly sized array,
    /// [`StokesianError::InvalidRadius`] for a non-positive or non-finite
    /// radius.
    pub fn new(
        positions: &'a [f64],
        forces: &'a [f64],
        radii: &'a [f64],
        n_particles: usize,
    ) -> Result<Self, StokesianError> {
        check_len("positions", positions.len(), POSITION_STRIDE * n_particles)?;
        check_len("forces", forces.len(), FT_DOF * n_particles)?;
        check_len("radii", radii.len(), n_particles)?;
        if let Some((index, &radius)) = radii
            .iter()
            .enumerate()
            .find(|(_, a)| !(a.is_finite() && **a > 0.0))
        {
            return Err(StokesianError::InvalidRadius { index, radius });
        }
        Ok(Self {
            positions,
            forces,
            radii,
        })
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.radii.len()
    }

    /// True when the set holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    /// Center of particle `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> Vec3 {
        let p = POSITION_STRIDE * i;
        [self.positions[p], self.positions[p + 1], self.positions[p + 2]]
    }

    /// Radius of particle `i`.
    #[must_use]
    pub fn radius(&self, i: usize) -> f64 {
        self.radii[i]
    }

    /// All radii.
    #[must_use]
    pub const fn radii(&self) -> &'a [f64] {
        self.radii
    }

    /// Flat force/torque vector (6N).
    #[must_use]
    pub const fn forces(&self) -> &'a [f64] {
        self.forces
    }
}

fn check_len(field: &'static str, actual: usize, expected: usize) -> Result<(), StokesianError> {
    if actual == expected {
        Ok(())
    } else {
        Err(StokesianError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_consistent_arrays() {
        let x = [0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 5.0, 6.0, 7.0, 0.0, 0.0, 0.0];
        let f = [0.0; 12];
        let a = [1.0, 2.0];
        let p = ParticleSystem::new(&x, &f, &a, 2).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.position(1), [5.0, 6.0, 7.0]);
        assert_eq!(p.radius(1), 2.0);
    }

    #[test]
    fn rejects_three_slot_positions() {
        let x = [0.0; 6];
        let f = [0.0; 12];
        let a = [1.0, 1.0];
        let err = ParticleSystem::new(&x, &f, &a, 2).unwrap_err();
        assert_eq!(
            err,
            StokesianError::LengthMismatch {
                field: "positions",
                expected: 12,
                actual: 6
            }
        );
    }

    #[test]
    fn rejects_short_forces() {
        let err = ParticleSystem::new(&[0.0; 6], &[0.0; 3], &[1.0], 1).unwrap_err();
        assert!(matches!(
            err,
            StokesianError::LengthMismatch { field: "forces", .. }
        ));
    }

    #[test]
    fn rejects_zero_radius() {
        let err = ParticleSystem::new(&[0.0; 12], &[0.0; 12], &[1.0, 0.0], 2).unwrap_err();
        assert_eq!(
            err,
            StokesianError::InvalidRadius {
                index: 1,
                radius: 0.0
            }
        );
    }

    #[test]
    fn rejects_nan_radius() {
        let err = ParticleSystem::new(&[0.0; 6], &[0.0; 6], &[f64::NAN], 1).unwrap_err();
        assert!(matches!(err, StokesianError::InvalidRadius { index: 0, .. }));
    }

    #[test]
    fn empty_system_is_valid() {
        let p = ParticleSystem::new(&[], &[], &[], 0).unwrap();
        assert!(p.is_empty());
    }
}
