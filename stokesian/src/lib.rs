// SPDX-License-Identifier: AGPL-3.0-only

#![deny(clippy::expect_used, clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

//! Stokesian Dynamics: velocities of spheres in a viscous fluid.
//!
//! Given positions, radii and external forces/torques, the solver builds the
//! far-field grand mobility of the whole suspension, inverts it to a
//! resistance, adds near-field lubrication, and inverts again. Optionally a
//! Brownian force consistent with fluctuation–dissipation is added through
//! the Cholesky factor of the resistance.
//!
//! # Pipeline
//!
//! ```text
//!    ┌─────────────────────────────┐
//!    │   pairs + geometry          │  canonical (i<j) order, overlap check
//!    └──────────┬──────────────────┘
//!               │ Vec<PairGeometry>
//!    ┌──────────▼──────────────────┐
//!    │   mobility                  │  self + pair far field  → MobilityTensor
//!    └──────────┬──────────────────┘
//!               │ R1…R6 (Schur)
//!    ┌──────────▼──────────────────┐
//!    │   lubrication               │  near field             → ResistanceTensor
//!    └──────────┬──────────────────┘
//!               │ Cholesky + inverse
//!    ┌──────────▼──────────────────┐
//!    │   thermal + velocities      │  u = M (F + L ψ)        → MobilityOperator
//!    └─────────────────────────────┘
//! ```
//!
//! Every data-parallel stage runs through an [`ExecutionContext`]; the
//! [`Serial`] and [`Threaded`] contexts give bit-identical results.
//!
//! ```no_run
//! use stokesian::{compute_velocities, StokesianError};
//!
//! fn main() -> Result<(), StokesianError> {
//!     let positions = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0];
//!     let forces = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
//!     let u = compute_velocities(&positions, &forces, &[1.0, 1.0], 1.0, 2)?;
//!     println!("u_x = {}", u[0]);
//!     Ok(())
//! }
//! ```

pub mod algebra;
pub mod config;
pub mod error;
pub mod exec;
pub mod lubrication;
pub mod mobility;
pub mod pairs;
pub mod particles;
pub mod solver;
pub mod tensor;
pub mod thermal;
pub mod tolerances;
pub mod validation;

pub use config::{Flags, SolverConfig, Thermalization};
pub use error::{Stage, StokesianError};
pub use exec::{ExecutionContext, Serial, Threaded};
pub use lubrication::LubricationTable;
pub use solver::{compute_velocities, compute_velocities_thermal, Solver};
pub use tensor::{MobilityOperator, MobilityTensor, ResistanceTensor};
