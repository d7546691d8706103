// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for the Stokesian Dynamics solve pipeline.
//!
//! Every failure is fatal for the solve that raised it: the solver is a pure
//! function of its inputs, so nothing here is retryable. Callers can
//! pattern-match on the failure mode (bad input shape, overlapping spheres,
//! singular tensor) instead of parsing strings.

use std::fmt;

/// Pipeline stage at which a dense linear-algebra call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// R1: inversion of the far-field mobility UF block.
    MobilityInverse,
    /// R4: inversion of the stresslet Schur complement.
    SchurInverse,
    /// Final Cholesky factorization + inversion of the corrected resistance.
    ResistanceFactorization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MobilityInverse => write!(f, "mobility UF inversion"),
            Self::SchurInverse => write!(f, "stresslet Schur-complement inversion"),
            Self::ResistanceFactorization => write!(f, "resistance Cholesky factorization"),
        }
    }
}

/// Errors arising from input validation, geometry checks or tensor algebra.
#[derive(Debug, Clone, PartialEq)]
pub enum StokesianError {
    /// An input array does not have the length implied by the particle count.
    LengthMismatch {
        /// Which input (`"positions"`, `"forces"`, `"radii"`).
        field: &'static str,
        /// Length required by the particle count.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Viscosity must be finite and strictly positive.
    InvalidViscosity(f64),

    /// Radii must be finite and strictly positive.
    InvalidRadius {
        /// Particle index.
        index: usize,
        /// Offending radius.
        radius: f64,
    },

    /// Two particle surfaces touch or interpenetrate.
    Overlap {
        /// Lower particle index of the pair.
        i: usize,
        /// Upper particle index of the pair.
        j: usize,
        /// Center-to-center distance.
        distance: f64,
        /// Sum of the two radii.
        contact: f64,
    },

    /// A tensor block could not be inverted.
    SingularMatrix {
        /// Stage that attempted the inversion.
        stage: Stage,
    },

    /// The resistance tensor has no Cholesky factor.
    NotPositiveDefinite {
        /// Stage that attempted the factorization.
        stage: Stage,
    },

    /// Lubrication table loading or validation failed.
    TableLoad(String),

    /// Solver configuration could not be parsed, read or written.
    ConfigLoad(String),

    /// A dedicated worker pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for StokesianError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(f, "{field} has length {actual}, expected {expected}"),
            Self::InvalidViscosity(eta) => {
                write!(f, "viscosity must be finite and positive, got {eta}")
            }
            Self::InvalidRadius { index, radius } => {
                write!(
                    f,
                    "radius of particle {index} must be finite and positive, got {radius}"
                )
            }
            Self::Overlap {
                i,
                j,
                distance,
                contact,
            } => write!(
                f,
                "particles {i} and {j} overlap (distance {distance} <= {contact})"
            ),
            Self::SingularMatrix { stage } => write!(f, "singular matrix in {stage}"),
            Self::NotPositiveDefinite { stage } => {
                write!(f, "matrix is not positive definite in {stage}")
            }
            Self::TableLoad(msg) => write!(f, "lubrication table: {msg}"),
            Self::ConfigLoad(msg) => write!(f, "solver config: {msg}"),
            Self::ThreadPool(msg) => write!(f, "failed to build worker pool: {msg}"),
        }
    }
}

impl std::error::Error for StokesianError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_length_mismatch() {
        let err = StokesianError::LengthMismatch {
            field: "radii",
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "radii has length 2, expected 3");
    }

    #[test]
    fn display_overlap_names_both_particles() {
        let err = StokesianError::Overlap {
            i: 1,
            j: 4,
            distance: 1.5,
            contact: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("particles 1 and 4"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn display_singular_names_stage() {
        let err = StokesianError::SingularMatrix {
            stage: Stage::SchurInverse,
        };
        assert!(err.to_string().contains("Schur"));
    }

    #[test]
    fn display_separates_table_and_config_failures() {
        let table = StokesianError::TableLoad("xm: expected 47 values, found 3".into());
        let config = StokesianError::ConfigLoad("expected value at line 1".into());
        assert!(table.to_string().starts_with("lubrication table:"));
        assert!(config.to_string().starts_with("solver config:"));
    }

    #[test]
    fn error_trait_works() {
        let err = StokesianError::InvalidViscosity(-1.0);
        let dyn_err: &dyn std::error::Error = &err;
        assert!(dyn_err.to_string().contains("-1"));
    }
}
