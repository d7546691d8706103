// SPDX-License-Identifier: AGPL-3.0-only

//! Stokesian Dynamics validation.
//!
//! Exercises the full solve against closed-form limits and structural
//! identities, and exits non-zero on any failure.
//!
//! # Validation targets
//!
//! | Observable | Expected | Basis |
//! |-----------|----------|-------|
//! | Isolated sphere u/F | 1/(6πηa) | Stokes drag |
//! | Isolated sphere Ω/T | 1/(8πηa³) | Rotational Stokes drag |
//! | Twin spheres at r = 10 | +14.9% over Stokes | Rotne–Prager, 3/(2r) − 1/r³ |
//! | Mobility UF block | symmetric, PSD | Reciprocal theorem |
//! | R⁻¹ without FTS | = M | Double inversion |
//! | Lubrication at r = 4 | no effect | Cutoff |
//! | Lubrication across r = 2.1 | continuous | Asymptotic/tabulated seam |
//! | No mobility flag | ambient flow | Short circuit |
//! | Thermal noise | mean 0, variance 2s² | Uniform on (−√3, √3)·√2·s |
//! | Isolated thermal velocity | ψ/√(6πηa) | L = chol(R) is diagonal |
//! | Serial vs threaded | bit-identical | Ordered scatter |

use std::f64::consts::PI;
use std::time::Instant;

use nalgebra::SymmetricEigen;
use stokesian::lubrication::{lubrication_functions, LUBRICATION_CUTOFF, NEAR_CONTACT_SEAM};
use stokesian::thermal::ThermalSampler;
use stokesian::tolerances;
use stokesian::validation::ValidationHarness;
use stokesian::{
    Flags, LubricationTable, Serial, Solver, StokesianError, Thermalization, Threaded,
};

fn positions(centres: &[[f64; 3]]) -> Vec<f64> {
    centres
        .iter()
        .flat_map(|c| [c[0], c[1], c[2], 0.0, 0.0, 0.0])
        .collect()
}

fn cluster() -> (Vec<f64>, Vec<f64>) {
    let x = positions(&[
        [0.0, 0.0, 0.0],
        [3.0, 0.0, 0.0],
        [0.0, 3.5, 0.0],
        [1.0, 1.0, 3.0],
        [2.6, 2.4, 1.2],
    ]);
    (x, vec![1.0, 1.2, 0.8, 1.0, 0.7])
}

/// Closing speed of two unit spheres squeezed together along z.
fn squeeze_speed(solver: &Solver<Serial>, r: f64, flags: Flags) -> Result<f64, StokesianError> {
    let x = positions(&[[0.0, 0.0, 0.0], [0.0, 0.0, r]]);
    let f = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0];
    let u = solver.solve(&x, &f, &[1.0, 1.0], &Thermalization::athermal(), flags)?;
    Ok(u[2] - u[8])
}

fn main() -> Result<(), StokesianError> {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Stokesian Dynamics Validation                              ║");
    println!("║  Far-field mobility, lubrication, Brownian forcing          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("stokesian");
    let t_start = Instant::now();
    let athermal = Thermalization::athermal();

    // ═══ Isolated sphere ═══
    println!("═══ Isolated Sphere ═══");
    harness.section("isolated sphere");
    {
        let eta = 1.5;
        let a = 1.3;
        let solver = Solver::new(Serial, eta, 1)?;
        let f = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let u = solver.solve(&positions(&[[0.0; 3]]), &f, &[a], &athermal, Flags::default())?;
        let trans = 1.0 / (6.0 * PI * eta * a);
        let rot = 1.0 / (8.0 * PI * eta * a.powi(3));
        println!("  u_x = {:.15e} (expected {trans:.15e})", u[0]);
        println!("  Ω_z = {:.15e} (expected {rot:.15e})", u[5]);
        harness.check_rel("translational drag", u[0], trans, tolerances::STOKES_DRAG_REL);
        harness.check_rel("rotational drag", u[5], rot, tolerances::STOKES_DRAG_REL);
    }
    println!();

    // ═══ Twin spheres ═══
    println!("═══ Twin Spheres ═══");
    harness.section("twin spheres");
    {
        let solver = Solver::new(Serial, 1.0, 2)?;
        let x = positions(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        let f = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let u = solver.solve(&x, &f, &[1.0, 1.0], &athermal, Flags::default())?;
        let stokes = 1.0 / (6.0 * PI);
        let enhancement = u[0] / stokes - 1.0;
        let cross = [1, 2, 3, 4, 5, 7, 8, 9, 10, 11]
            .iter()
            .map(|&k| u[k].abs())
            .fold(0.0, f64::max);
        println!("  enhancement = {enhancement:.6} (Rotne–Prager 0.149)");
        harness.check_abs("equal velocities", u[0], u[6], tolerances::TWIN_VELOCITY_ABS);
        harness.check_upper("cross-axis velocity", cross, tolerances::TWIN_CROSS_AXIS_ABS);
        harness.check_lower("faster than Stokes", enhancement, 0.0);
        harness.check_upper("enhancement bound", enhancement, tolerances::TWIN_ENHANCEMENT_MAX);
    }
    println!();

    // ═══ Mobility structure ═══
    println!("═══ Mobility Structure ═══");
    harness.section("mobility structure");
    {
        let (x, a) = cluster();
        let solver = Solver::new(Serial, 0.8, a.len())?;
        let m = solver.mobility_tensor(&x, &a, Flags::default())?;
        let uf = &m.blocks().uf;
        let asymmetry = (uf - uf.transpose()).amax();
        let eig = SymmetricEigen::new(uf.clone());
        let min_eig = eig.eigenvalues.min() / eig.eigenvalues.amax();
        println!("  UF asymmetry      = {asymmetry:.3e}");
        println!("  min λ / max |λ|   = {min_eig:.6e}");
        harness.check_upper("UF symmetric", asymmetry, tolerances::MOBILITY_SYMMETRY_ABS);
        harness.check_lower("UF positive semidefinite", min_eig, tolerances::PSD_EIGEN_FLOOR);

        let ft = solver.mobility_tensor(&x, &a, Flags::SELF_MOBILITY | Flags::PAIR_MOBILITY)?;
        let original = ft.blocks().uf.clone();
        let resistance = ft.into_resistance()?;
        let err = match resistance.blocks().uf.clone().try_inverse() {
            Some(back) => (&back - &original).amax() / original.amax(),
            None => f64::INFINITY,
        };
        println!("  double inversion  = {err:.3e}");
        harness.check_upper("R⁻¹ = M (FT)", err, tolerances::DOUBLE_INVERSION_REL);
    }
    println!();

    // ═══ Lubrication ═══
    println!("═══ Lubrication ═══");
    harness.section("lubrication");
    {
        let table = LubricationTable::default();
        harness.check_bool(
            "no functions at cutoff",
            lubrication_functions(&table, LUBRICATION_CUTOFF).is_none(),
        );
        let below = lubrication_functions(&table, NEAR_CONTACT_SEAM - tolerances::SEAM_OFFSET);
        let above = lubrication_functions(&table, NEAR_CONTACT_SEAM + tolerances::SEAM_OFFSET);
        if let (Some(lo), Some(hi)) = (below, above) {
            println!("  X11A across seam: {:.9} | {:.9}", lo.x11a, hi.x11a);
            harness.check_abs("X11A seam", lo.x11a, hi.x11a, tolerances::LUBRICATION_SEAM_ABS);
            harness.check_abs("Y11A seam", lo.y11a, hi.y11a, tolerances::LUBRICATION_SEAM_ABS);
            harness.check_abs("XM seam", lo.xm, hi.xm, tolerances::LUBRICATION_SEAM_ABS);
        } else {
            harness.check_bool("functions defined at seam", false);
        }

        let solver = Solver::new(Serial, 1.0, 2)?;
        let lubricated = Flags::default() | Flags::LUBRICATION;
        for r in [2.05, 2.5, 3.5] {
            let dry = squeeze_speed(&solver, r, Flags::default())?;
            let wet = squeeze_speed(&solver, r, lubricated)?;
            println!("  r = {r:.2}: closing speed {dry:.6e} → {wet:.6e}");
            harness.check_upper(&format!("squeeze slowed at r = {r}"), wet / dry, 1.0);
        }
        let dry = squeeze_speed(&solver, 4.5, Flags::default())?;
        let wet = squeeze_speed(&solver, 4.5, lubricated)?;
        harness.check_rel("no effect beyond cutoff", wet, dry, tolerances::EXACT_F64);
    }
    println!();

    // ═══ Flags ═══
    println!("═══ Flags ═══");
    harness.section("flags");
    {
        let (x, a) = cluster();
        let solver = Solver::new(Serial, 1.0, a.len())?;
        let f = vec![1.0; 6 * a.len()];
        let u = solver.solve(&x, &f, &a, &athermal, Flags::LUBRICATION | Flags::FTS)?;
        let largest = u.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        harness.check_abs("no mobility → ambient", largest, 0.0, tolerances::EXACT_F64);
        let empty = solver_for_empty()?;
        harness.check_bool("N = 0 → empty", empty.is_empty());
    }
    println!();

    // ═══ Thermal forcing ═══
    println!("═══ Thermal Forcing ═══");
    harness.section("thermal");
    {
        let sampler = ThermalSampler::new(&Thermalization::new(1.0, 3, 2024));
        let psi = sampler.noise(&Serial, 200_000);
        let n = psi.len() as f64;
        let mean = psi.sum() / n;
        let variance = psi.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        println!("  mean = {mean:.5}, variance = {variance:.5} (expected 0, 2)");
        harness.check_abs("noise mean", mean, 0.0, tolerances::THERMAL_MEAN_ABS);
        harness.check_rel("noise variance", variance, 2.0, tolerances::THERMAL_VARIANCE_REL);

        let (x, a) = cluster();
        let solver = Solver::new(Serial, 1.0, a.len())?;
        let f = vec![0.0; 6 * a.len()];
        let thermal = Thermalization::new(0.5, 11, 77);
        let u1 = solver.solve(&x, &f, &a, &thermal, Flags::default())?;
        let u2 = solver.solve(&x, &f, &a, &thermal, Flags::default())?;
        harness.check_bitwise("repeatable draw", &u1, &u2);
        let other = Thermalization::new(0.5, 12, 77);
        let u3 = solver.solve(&x, &f, &a, &other, Flags::default())?;
        harness.check_bool("offset changes draw", u1 != u3);

        let (eta, radius) = (0.7, 1.3);
        let single = Solver::new(Serial, eta, 1)?;
        let thermal = Thermalization::new(0.5, 4, 8);
        let x = positions(&[[0.0; 3]]);
        let u = single.solve(&x, &[0.0; 6], &[radius], &thermal, Flags::default())?;
        let drag = 6.0 * PI * eta * radius;
        let expected = ThermalSampler::new(&thermal).sample(0) / drag.sqrt();
        println!("  isolated u_x = {:.15e} (ψ₀/√(6πηa) = {expected:.15e})", u[0]);
        harness.check_rel("force = L·ψ (N = 1)", u[0], expected, tolerances::STOKES_DRAG_REL);
    }
    println!();

    // ═══ Context parity ═══
    println!("═══ Context Parity ═══");
    harness.section("context parity");
    {
        let (x, a) = cluster();
        let f: Vec<f64> = (0..6 * a.len()).map(|k| (k as f64 * 0.37).cos()).collect();
        let thermal = Thermalization::new(0.3, 1, 9);
        let serial = Solver::new(Serial, 1.0, a.len())?;
        let threaded = Solver::new(Threaded::with_threads(4)?, 1.0, a.len())?;
        for flags in [Flags::default(), Flags::ALL] {
            let us = serial.solve(&x, &f, &a, &thermal, flags)?;
            let ut = threaded.solve(&x, &f, &a, &thermal, flags)?;
            harness.check_bitwise(&format!("serial = threaded ({flags})"), &us, &ut);
        }
    }
    println!();

    println!("  elapsed: {:.2?}", t_start.elapsed());
    harness.finish();
}

fn solver_for_empty() -> Result<Vec<f64>, StokesianError> {
    Solver::new(Serial, 1.0, 0)?.solve(&[], &[], &[], &Thermalization::athermal(), Flags::ALL)
}
