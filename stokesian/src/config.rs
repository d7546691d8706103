// SPDX-License-Identifier: AGPL-3.0-only

//! Solver configuration: physics toggles, thermalization, viscosity.
//!
//! Configurations serialize to JSON so that a host simulation can keep them
//! next to its own run parameters. The feature toggles serialize as their
//! bit pattern (`SELF_MOBILITY = 1`, `PAIR_MOBILITY = 2`, `LUBRICATION = 4`,
//! `FTS = 8`).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StokesianError;

/// Bitmask selecting which physics the solver includes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flags(u32);

impl Flags {
    /// Nothing enabled.
    pub const NONE: Self = Self(0);
    /// Isolated-sphere (Stokes drag) mobility on the diagonal.
    pub const SELF_MOBILITY: Self = Self(1 << 0);
    /// Far-field pair mobility.
    pub const PAIR_MOBILITY: Self = Self(1 << 1);
    /// Near-field lubrication resistance.
    pub const LUBRICATION: Self = Self(1 << 2);
    /// Force–torque–stresslet coupling.
    pub const FTS: Self = Self(1 << 3);
    /// Every toggle.
    pub const ALL: Self = Self(0b1111);

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from a bit pattern, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// True when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any far-field mobility term is enabled.
    #[must_use]
    pub const fn has_mobility(self) -> bool {
        self.0 & (Self::SELF_MOBILITY.0 | Self::PAIR_MOBILITY.0) != 0
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::SELF_MOBILITY | Self::PAIR_MOBILITY | Self::FTS
    }
}

impl BitOr for Flags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Flags {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flags({self})")
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 4] = [
            (Flags::SELF_MOBILITY, "SELF_MOBILITY"),
            (Flags::PAIR_MOBILITY, "PAIR_MOBILITY"),
            (Flags::LUBRICATION, "LUBRICATION"),
            (Flags::FTS, "FTS"),
        ];
        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", set.join(" | "))
        }
    }
}

/// Brownian forcing parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Thermalization {
    /// √(kT/Δt); zero (or negative) disables thermal forcing.
    pub sqrt_kt_dt: f64,
    /// Stream offset, typically the timestep counter.
    pub offset: u64,
    /// Generator seed.
    pub seed: u64,
}

impl Thermalization {
    /// No thermal forcing.
    #[must_use]
    pub const fn athermal() -> Self {
        Self {
            sqrt_kt_dt: 0.0,
            offset: 0,
            seed: 0,
        }
    }

    /// Thermal forcing at scale `sqrt_kt_dt` on stream `offset`.
    #[must_use]
    pub const fn new(sqrt_kt_dt: f64, offset: u64, seed: u64) -> Self {
        Self {
            sqrt_kt_dt,
            offset,
            seed,
        }
    }

    /// Whether a thermal force is drawn.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sqrt_kt_dt > 0.0
    }
}

/// Everything a solve needs apart from the particle arrays.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct SolverConfig {
    /// Dynamic viscosity η of the solvent.
    pub viscosity: f64,
    /// Physics toggles.
    #[serde(default)]
    pub flags: Flags,
    /// Brownian forcing.
    #[serde(default)]
    pub thermal: Thermalization,
}

impl SolverConfig {
    /// Deterministic far-field solve (self + pair mobility with stresslets).
    pub fn far_field(viscosity: f64) -> Self {
        Self {
            viscosity,
            flags: Flags::default(),
            thermal: Thermalization::athermal(),
        }
    }

    /// Full physics with lubrication and Brownian forcing.
    pub fn brownian(viscosity: f64, sqrt_kt_dt: f64, seed: u64) -> Self {
        Self {
            viscosity,
            flags: Flags::ALL,
            thermal: Thermalization::new(sqrt_kt_dt, 0, seed),
        }
    }

    /// Parse from a JSON document.
    ///
    /// # Errors
    ///
    /// [`StokesianError::ConfigLoad`] on malformed JSON, or
    /// [`StokesianError::InvalidViscosity`] when the viscosity is unusable.
    pub fn from_json_str(json: &str) -> Result<Self, StokesianError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StokesianError::ConfigLoad(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    ///
    /// # Errors
    ///
    /// As [`SolverConfig::from_json_str`], plus I/O failures.
    pub fn from_path(path: &Path) -> Result<Self, StokesianError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StokesianError::ConfigLoad(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// [`StokesianError::ConfigLoad`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StokesianError> {
        serde_json::to_string_pretty(self).map_err(|e| StokesianError::ConfigLoad(e.to_string()))
    }

    /// Check the viscosity.
    ///
    /// # Errors
    ///
    /// [`StokesianError::InvalidViscosity`] unless finite and positive.
    pub fn validate(&self) -> Result<(), StokesianError> {
        if self.viscosity.is_finite() && self.viscosity > 0.0 {
            Ok(())
        } else {
            Err(StokesianError::InvalidViscosity(self.viscosity))
        }
    }
}
