// SPDX-License-Identifier: AGPL-3.0-only

//! Pass/fail bookkeeping for the `validate_stokesian` binary.
//!
//! Each check records what was observed, what was expected, and the
//! tolerance from [`crate::tolerances`]. The run exits 0 only if every
//! check passes.

use std::fmt::{self, Write};
use std::process;

/// How a check compares observed against expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceMode {
    /// |observed − expected| < tolerance
    Absolute,
    /// |observed − expected| / |expected| < tolerance
    Relative,
    /// observed < threshold
    UpperBound,
    /// observed > threshold
    LowerBound,
    /// bit patterns equal
    Bitwise,
}

impl fmt::Display for ToleranceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute => write!(f, "abs"),
            Self::Relative => write!(f, "rel"),
            Self::UpperBound => write!(f, "<"),
            Self::LowerBound => write!(f, ">"),
            Self::Bitwise => write!(f, "bits"),
        }
    }
}

/// One recorded check.
#[derive(Debug, Clone)]
pub struct Check {
    /// Section the check was recorded under.
    pub section: String,
    pub label: String,
    pub passed: bool,
    pub observed: f64,
    pub expected: f64,
    pub tolerance: f64,
    pub mode: ToleranceMode,
}

/// Collects checks grouped by physical property.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    pub name: String,
    pub checks: Vec<Check>,
    section: String,
}

impl ValidationHarness {
    /// Harness for the named run.
    #[must_use = "validation harness must be used to run checks"]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
            section: String::new(),
        }
    }

    /// Start a new section; later checks are grouped under it.
    pub fn section(&mut self, title: &str) {
        self.section = title.to_string();
    }

    fn push(
        &mut self,
        label: &str,
        passed: bool,
        observed: f64,
        expected: f64,
        tolerance: f64,
        mode: ToleranceMode,
    ) {
        self.checks.push(Check {
            section: self.section.clone(),
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
            mode,
        });
    }

    /// |observed − expected| < tolerance
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = (observed - expected).abs() < tolerance;
        self.push(label, passed, observed, expected, tolerance, ToleranceMode::Absolute);
    }

    /// Relative error below `tolerance`; falls back to absolute for a zero
    /// expectation.
    pub fn check_rel(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = if expected.abs() > f64::EPSILON {
            ((observed - expected) / expected).abs() < tolerance
        } else {
            observed.abs() < tolerance
        };
        self.push(label, passed, observed, expected, tolerance, ToleranceMode::Relative);
    }

    /// observed < threshold
    pub fn check_upper(&mut self, label: &str, observed: f64, threshold: f64) {
        let passed = observed < threshold;
        self.push(label, passed, observed, threshold, threshold, ToleranceMode::UpperBound);
    }

    /// observed > threshold
    pub fn check_lower(&mut self, label: &str, observed: f64, threshold: f64) {
        let passed = observed > threshold;
        self.push(label, passed, observed, threshold, threshold, ToleranceMode::LowerBound);
    }

    /// Two vectors agree bit for bit. Records the largest absolute difference.
    pub fn check_bitwise(&mut self, label: &str, observed: &[f64], expected: &[f64]) {
        let same_len = observed.len() == expected.len();
        let passed = same_len
            && observed
                .iter()
                .zip(expected)
                .all(|(a, b)| a.to_bits() == b.to_bits());
        let max_diff = if same_len {
            observed
                .iter()
                .zip(expected)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        } else {
            f64::INFINITY
        };
        self.push(label, passed, max_diff, 0.0, 0.0, ToleranceMode::Bitwise);
    }

    /// Boolean pass/fail.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        let observed = f64::from(u8::from(passed));
        self.push(label, passed, observed, 1.0, 0.0, ToleranceMode::Absolute);
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Human-readable report, one block per section.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "═══ {} validation: {}/{} checks passed ═══",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        let mut current: Option<&str> = None;
        for check in &self.checks {
            if current != Some(check.section.as_str()) && !check.section.is_empty() {
                let _ = writeln!(s, "  ── {} ──", check.section);
            }
            current = Some(check.section.as_str());
            let icon = if check.passed { "✓" } else { "✗" };
            let _ = writeln!(
                s,
                "    {icon} {}: observed={:.6e}, expected={:.6e}, tol={:.2e} ({})",
                check.label, check.observed, check.expected, check.tolerance, check.mode
            );
        }
        if self.all_passed() {
            let _ = writeln!(s, "ALL CHECKS PASSED");
        } else {
            let failed: Vec<&str> = self
                .checks
                .iter()
                .filter(|c| !c.passed)
                .map(|c| c.label.as_str())
                .collect();
            let _ = writeln!(s, "FAILED CHECKS: {}", failed.join(", "));
        }
        s
    }

    /// Print the report and exit: 0 if every check passed, 1 otherwise.
    pub fn finish(&self) -> ! {
        println!();
        print!("{}", self.summary());
        process::exit(i32::from(!self.all_passed()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_tracks_pass_fail() {
        let mut h = ValidationHarness::new("test");
        h.check_abs("exact", 1.0, 1.0, 1e-10);
        h.check_abs("close", 1.0001, 1.0, 1e-3);
        h.check_abs("far", 2.0, 1.0, 1e-3);
        assert_eq!(h.passed_count(), 2);
        assert_eq!(h.total_count(), 3);
        assert!(!h.all_passed());
    }

    #[test]
    fn relative_check_handles_zero_expectation() {
        let mut h = ValidationHarness::new("test");
        h.check_rel("near_zero", 1e-15, 0.0, 1e-10);
        assert!(h.checks[0].passed);
    }

    #[test]
    fn bounds_are_strict() {
        let mut h = ValidationHarness::new("test");
        h.check_upper("at", 1.0, 1.0);
        h.check_lower("above", 1.5, 1.0);
        assert!(!h.checks[0].passed);
        assert!(h.checks[1].passed);
    }

    #[test]
    fn bitwise_distinguishes_signed_zero() {
        let mut h = ValidationHarness::new("test");
        h.check_bitwise("same", &[1.0, 2.0], &[1.0, 2.0]);
        h.check_bitwise("signed_zero", &[0.0], &[-0.0]);
        h.check_bitwise("length", &[1.0], &[1.0, 1.0]);
        assert!(h.checks[0].passed);
        assert!(!h.checks[1].passed);
        assert!(!h.checks[2].passed);
        assert!(h.checks[2].observed.is_infinite());
    }

    #[test]
    fn summary_groups_sections() {
        let mut h = ValidationHarness::new("stokesian");
        h.section("isolated sphere");
        h.check_abs("u_x", 1.0, 1.0, 1e-10);
        h.section("twin spheres");
        h.check_bool("symmetric", false);
        let s = h.summary();
        assert!(s.contains("1/2"));
        assert!(s.contains("── isolated sphere ──"));
        assert!(s.contains("── twin spheres ──"));
        assert!(s.contains("FAILED CHECKS: symmetric"));
        assert_eq!(h.checks[1].section, "twin spheres");
    }

    #[test]
    fn empty_harness_passes() {
        let h = ValidationHarness::new("empty");
        assert!(h.all_passed());
        assert!(h.summary().contains("ALL CHECKS PASSED"));
    }

    #[test]
    fn tolerance_mode_display() {
        assert_eq!(ToleranceMode::Absolute.to_string(), "abs");
        assert_eq!(ToleranceMode::Bitwise.to_string(), "bits");
    }
}
