// SPDX-License-Identifier: AGPL-3.0-only

//! Tabulated lubrication functions for the range `2.1 < r < 4`.
//!
//! Two grids, both starting at the near-contact seam:
//!
//! | Grid | Nodes | Spacing | Functions |
//! |------|-------|---------|-----------|
//! | `abc_grid` | 39 | 0.05 | X/Y A, Y B, X/Y C |
//! | `gh_grid`, `m_grid` | 47 | 0.01 to 2.2, then 0.05 | X/Y G, Y H, X/Y/Z M |
//!
//! Lookups index the grid arithmetically from `r` and interpolate
//! linearly between neighbouring nodes.
//!
//! The built-in table is the near-contact asymptotics sampled at the grid
//! nodes, tapered quadratically to zero at the cutoff. It matches the
//! asymptotic branch exactly at the seam and vanishes at the cutoff. A
//! published table can be loaded from JSON with the same field names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::functions::LubricationFunctions;
use super::{LUBRICATION_CUTOFF, NEAR_CONTACT_SEAM};
use crate::error::StokesianError;

/// Nodes on the A/B/C grid.
pub const ABC_NODES: usize = 39;
/// Nodes on the G/H and M grids.
pub const GH_NODES: usize = 47;
/// Coarse grid spacing.
pub const COARSE_STEP: f64 = 0.05;
/// Fine grid spacing below [`FINE_LIMIT`].
pub const FINE_STEP: f64 = 0.01;
/// Upper end of the fine section of the G/H and M grids.
pub const FINE_LIMIT: f64 = 2.2;
/// Nodes in the fine section, the seam node included.
const FINE_NODES: usize = 11;
/// Largest deviation of a loaded grid node from its nominal position.
const GRID_NODE_ABS: f64 = 1e-9;

/// Nominal position of node `k` on the A/B/C grid.
#[must_use]
pub fn abc_node(k: usize) -> f64 {
    NEAR_CONTACT_SEAM + COARSE_STEP * k as f64
}

/// Nominal position of node `k` on the G/H and M grids.
#[must_use]
pub fn gh_node(k: usize) -> f64 {
    if k < FINE_NODES {
        NEAR_CONTACT_SEAM + FINE_STEP * k as f64
    } else {
        FINE_LIMIT + COARSE_STEP * (k - (FINE_NODES - 1)) as f64
    }
}

/// Lubrication functions sampled on their grids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LubricationTable {
    pub abc_grid: Vec<f64>,
    pub x11a: Vec<f64>,
    pub x12a: Vec<f64>,
    pub y11a: Vec<f64>,
    pub y12a: Vec<f64>,
    pub y11b: Vec<f64>,
    pub y12b: Vec<f64>,
    pub x11c: Vec<f64>,
    pub x12c: Vec<f64>,
    pub y11c: Vec<f64>,
    pub y12c: Vec<f64>,

    pub gh_grid: Vec<f64>,
    pub x11g: Vec<f64>,
    pub x12g: Vec<f64>,
    pub y11g: Vec<f64>,
    pub y12g: Vec<f64>,
    pub y11h: Vec<f64>,
    pub y12h: Vec<f64>,

    pub m_grid: Vec<f64>,
    pub xm: Vec<f64>,
    pub ym: Vec<f64>,
    pub zm: Vec<f64>,
}

/// Synthetic table: near-contact asymptotics at each node, tapered by
/// `((4 − r)/1.9)²`. Not published coefficient data.
impl Default for LubricationTable {
    fn default() -> Self {
        let taper = |r: f64| {
            let w = (LUBRICATION_CUTOFF - r) / (LUBRICATION_CUTOFF - NEAR_CONTACT_SEAM);
            w * w
        };
        let sample = |r: f64| LubricationFunctions::near_contact(r).scaled(taper(r));

        let abc_grid: Vec<f64> = (0..ABC_NODES).map(abc_node).collect();
        let gh_grid: Vec<f64> = (0..GH_NODES).map(gh_node).collect();
        let abc: Vec<_> = abc_grid.iter().map(|&r| sample(r)).collect();
        let gh: Vec<_> = gh_grid.iter().map(|&r| sample(r)).collect();
        let col = |rows: &[LubricationFunctions], pick: fn(&LubricationFunctions) -> f64| {
            rows.iter().map(pick).collect::<Vec<f64>>()
        };

        Self {
            x11a: col(&abc, |f| f.x11a),
            x12a: col(&abc, |f| f.x12a),
            y11a: col(&abc, |f| f.y11a),
            y12a: col(&abc, |f| f.y12a),
            y11b: col(&abc, |f| f.y11b),
            y12b: col(&abc, |f| f.y12b),
            x11c: col(&abc, |f| f.x11c),
            x12c: col(&abc, |f| f.x12c),
            y11c: col(&abc, |f| f.y11c),
            y12c: col(&abc, |f| f.y12c),
            abc_grid,
            x11g: col(&gh, |f| f.x11g),
            x12g: col(&gh, |f| f.x12g),
            y11g: col(&gh, |f| f.y11g),
            y12g: col(&gh, |f| f.y12g),
            y11h: col(&gh, |f| f.y11h),
            y12h: col(&gh, |f| f.y12h),
            xm: col(&gh, |f| f.xm),
            ym: col(&gh, |f| f.ym),
            zm: col(&gh, |f| f.zm),
            m_grid: gh_grid.clone(),
            gh_grid,
        }
    }
}

/// Bracketing interval of `r` on `grid`, starting from a computed guess.
fn bracket(grid: &[f64], guess: i64, r: f64) -> (usize, f64) {
    let last = grid.len().saturating_sub(2) as i64;
    let ib = guess.clamp(0, last) as usize;
    let c = (r - grid[ib]) / (grid[ib + 1] - grid[ib]);
    (ib, c)
}

fn lerp(col: &[f64], ib: usize, c: f64) -> f64 {
    (col[ib + 1] - col[ib]) * c + col[ib]
}

impl LubricationTable {
    /// Interpolated functions at `r` (`2.1 < r < 4`).
    #[must_use]
    pub fn interpolate(&self, r: f64) -> LubricationFunctions {
        let coarse = (20.0 * (r - 2.0)) as i64;
        let (ia, ca) = bracket(&self.abc_grid, coarse - 2, r);

        let gh_guess = if r < FINE_LIMIT {
            (100.0 * (r - 2.0)) as i64 - 10
        } else {
            6 + coarse
        };
        let (ig, cg) = bracket(&self.gh_grid, gh_guess, r);
        let (im, cm) = bracket(&self.m_grid, gh_guess, r);

        LubricationFunctions {
            x11a: lerp(&self.x11a, ia, ca),
            x12a: lerp(&self.x12a, ia, ca),
            y11a: lerp(&self.y11a, ia, ca),
            y12a: lerp(&self.y12a, ia, ca),
            y11b: lerp(&self.y11b, ia, ca),
            y12b: lerp(&self.y12b, ia, ca),
            x11c: lerp(&self.x11c, ia, ca),
            x12c: lerp(&self.x12c, ia, ca),
            y11c: lerp(&self.y11c, ia, ca),
            y12c: lerp(&self.y12c, ia, ca),
            x11g: lerp(&self.x11g, ig, cg),
            x12g: lerp(&self.x12g, ig, cg),
            y11g: lerp(&self.y11g, ig, cg),
            y12g: lerp(&self.y12g, ig, cg),
            y11h: lerp(&self.y11h, ig, cg),
            y12h: lerp(&self.y12h, ig, cg),
            xm: lerp(&self.xm, im, cm),
            ym: lerp(&self.ym, im, cm),
            zm: lerp(&self.zm, im, cm),
        }
    }

    /// Check shapes, node positions and finiteness.
    ///
    /// # Errors
    ///
    /// [`StokesianError::TableLoad`] naming the first offending field.
    pub fn validate(&self) -> Result<(), StokesianError> {
        check_grid("abc_grid", &self.abc_grid, ABC_NODES, abc_node)?;
        check_grid("gh_grid", &self.gh_grid, GH_NODES, gh_node)?;
        check_grid("m_grid", &self.m_grid, GH_NODES, gh_node)?;
        let columns: [(&str, &[f64], usize); 19] = [
            ("x11a", &self.x11a, ABC_NODES),
            ("x12a", &self.x12a, ABC_NODES),
            ("y11a", &self.y11a, ABC_NODES),
            ("y12a", &self.y12a, ABC_NODES),
            ("y11b", &self.y11b, ABC_NODES),
            ("y12b", &self.y12b, ABC_NODES),
            ("x11c", &self.x11c, ABC_NODES),
            ("x12c", &self.x12c, ABC_NODES),
            ("y11c", &self.y11c, ABC_NODES),
            ("y12c", &self.y12c, ABC_NODES),
            ("x11g", &self.x11g, GH_NODES),
            ("x12g", &self.x12g, GH_NODES),
            ("y11g", &self.y11g, GH_NODES),
            ("y12g", &self.y12g, GH_NODES),
            ("y11h", &self.y11h, GH_NODES),
            ("y12h", &self.y12h, GH_NODES),
            ("xm", &self.xm, GH_NODES),
            ("ym", &self.ym, GH_NODES),
            ("zm", &self.zm, GH_NODES),
        ];
        for (name, col, len) in columns {
            if col.len() != len {
                return Err(StokesianError::TableLoad(format!(
                    "{name}: expected {len} values, found {}",
                    col.len()
                )));
            }
            if let Some(k) = col.iter().position(|v| !v.is_finite()) {
                return Err(StokesianError::TableLoad(format!(
                    "{name}[{k}] is not finite"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON table.
    ///
    /// # Errors
    ///
    /// [`StokesianError::TableLoad`] on malformed JSON or a failed
    /// [`LubricationTable::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, StokesianError> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| StokesianError::TableLoad(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Load a JSON table from disk.
    ///
    /// # Errors
    ///
    /// As [`LubricationTable::from_json_str`], plus I/O failures.
    pub fn from_path(path: &Path) -> Result<Self, StokesianError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| StokesianError::TableLoad(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}

fn check_grid(
    name: &str,
    grid: &[f64],
    len: usize,
    node: fn(usize) -> f64,
) -> Result<(), StokesianError> {
    if grid.len() != len {
        return Err(StokesianError::TableLoad(format!(
            "{name}: expected {len} nodes, found {}",
            grid.len()
        )));
    }
    for (k, &r) in grid.iter().enumerate() {
        if !((r - node(k)).abs() < GRID_NODE_ABS) {
            return Err(StokesianError::TableLoad(format!(
                "{name}[{k}] = {r}, expected {}",
                node(k)
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grids_span_seam_to_cutoff() {
        assert!((abc_node(0) - 2.1).abs() < 1e-15);
        assert!((abc_node(ABC_NODES - 1) - 4.0).abs() < 1e-12);
        assert!((gh_node(10) - 2.2).abs() < 1e-12);
        assert!((gh_node(11) - 2.25).abs() < 1e-12);
        assert!((gh_node(GH_NODES - 1) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn default_table_validates() {
        LubricationTable::default().validate().unwrap();
    }

    #[test]
    fn default_table_vanishes_at_cutoff() {
        let t = LubricationTable::default();
        assert!(t.x11a[ABC_NODES - 1].abs() < 1e-20);
        assert!(t.xm[GH_NODES - 1].abs() < 1e-20);
    }

    #[test]
    fn default_table_is_tapered_asymptotics() {
        let t = LubricationTable::default();
        for k in [0, 8, 25] {
            let r = abc_node(k);
            let w = ((4.0 - r) / 1.9).powi(2);
            let f = LubricationFunctions::near_contact(r);
            assert!((t.y11a[k] - f.y11a * w).abs() <= 1e-14 * f.y11a.abs(), "node {k}");
        }
        for k in [0, 10, 33] {
            let r = gh_node(k);
            let w = ((4.0 - r) / 1.9).powi(2);
            let f = LubricationFunctions::near_contact(r);
            assert!((t.zm[k] - f.zm * w).abs() <= 1e-14 * f.zm.abs(), "node {k}");
        }
    }

    #[test]
    fn interpolation_reproduces_nodes() {
        let t = LubricationTable::default();
        for k in [3, 17, 30] {
            let r = abc_node(k) + 1e-12;
            let f = t.interpolate(r);
            assert!((f.x11a - t.x11a[k]).abs() < 1e-8, "node {k}");
        }
        for k in [2, 9, 12, 40] {
            let r = gh_node(k) + 1e-12;
            let f = t.interpolate(r);
            assert!((f.y12h - t.y12h[k]).abs() < 1e-8, "node {k}");
        }
    }

    #[test]
    fn interpolation_is_linear_between_nodes() {
        let t = LubricationTable::default();
        let mid = 0.5 * (abc_node(5) + abc_node(6));
        let f = t.interpolate(mid);
        let expected = 0.5 * (t.x11c[5] + t.x11c[6]);
        assert!((f.x11c - expected).abs() < 1e-12);
    }

    #[test]
    fn json_round_trip() {
        let t = LubricationTable::default();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(LubricationTable::from_json_str(&json).unwrap(), t);
    }

    #[test]
    fn short_column_rejected() {
        let mut t = LubricationTable::default();
        t.ym.pop();
        let err = t.validate().unwrap_err();
        assert!(matches!(err, StokesianError::TableLoad(msg) if msg.starts_with("ym")));
    }

    #[test]
    fn misplaced_node_rejected() {
        let mut t = LubricationTable::default();
        t.abc_grid[4] += 0.01;
        assert!(t.validate().is_err());
    }

    #[test]
    fn non_finite_value_rejected() {
        let mut t = LubricationTable::default();
        t.x12g[7] = f64::INFINITY;
        assert!(t.validate().is_err());
    }
}
