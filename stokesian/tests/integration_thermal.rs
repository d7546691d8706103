// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: Brownian forcing through the full solve.

use std::f64::consts::PI;

use nalgebra::{Cholesky, DMatrix, DVector};
use stokesian::lubrication;
use stokesian::pairs::{check_distances, PairList};
use stokesian::particles::ParticleSystem;
use stokesian::thermal::ThermalSampler;
use stokesian::tolerances::{STOKES_DRAG_REL, THERMAL_COVARIANCE_REL, THERMAL_OPERATOR_REL};
use stokesian::{
    compute_velocities, compute_velocities_thermal, Flags, Serial, Solver, Thermalization,
    Threaded,
};

fn three_spheres() -> (Vec<f64>, Vec<f64>) {
    let x = vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        3.0, 0.5, 0.0, 0.0, 0.0, 0.0, //
        -1.0, 2.5, 1.5, 0.0, 0.0, 0.0,
    ];
    (x, vec![1.0, 0.9, 1.1])
}

#[test]
fn repeated_calls_are_bit_identical() {
    let (x, a) = three_spheres();
    let f = vec![0.0; 18];
    let run = || {
        compute_velocities_thermal(&x, &f, &a, 1.0, 3, 0.7, 12, 987_654_321, Flags::default())
            .expect("thermal solve")
    };
    let first = run();
    let second = run();
    assert!(first.iter().any(|&v| v != 0.0));
    for (p, q) in first.iter().zip(&second) {
        assert_eq!(p.to_bits(), q.to_bits());
    }
}

#[test]
fn contexts_draw_identical_noise() {
    let (x, a) = three_spheres();
    let f = vec![0.0; 18];
    let thermal = Thermalization::new(1.0, 5, 42);
    let serial = Solver::new(Serial, 1.0, 3)
        .expect("serial")
        .solve(&x, &f, &a, &thermal, Flags::ALL)
        .expect("serial solve");
    let threaded = Solver::new(Threaded::with_threads(2).expect("pool"), 1.0, 3)
        .expect("threaded")
        .solve(&x, &f, &a, &thermal, Flags::ALL)
        .expect("threaded solve");
    assert_eq!(serial, threaded);
}

#[test]
fn offset_selects_a_new_realization() {
    let (x, a) = three_spheres();
    let f = vec![0.0; 18];
    let at = |offset| {
        compute_velocities_thermal(&x, &f, &a, 1.0, 3, 1.0, offset, 7, Flags::default())
            .expect("thermal solve")
    };
    assert_ne!(at(0), at(1));
}

#[test]
fn zero_temperature_matches_deterministic_solve() {
    let (x, a) = three_spheres();
    let f: Vec<f64> = (0..18).map(|k| (k as f64).sin()).collect();
    let cold = compute_velocities_thermal(&x, &f, &a, 1.0, 3, 0.0, 3, 99, Flags::default())
        .expect("cold solve");
    let plain = compute_velocities(&x, &f, &a, 1.0, 3).expect("plain solve");
    assert_eq!(cold, plain);
}

#[test]
fn thermal_velocity_scales_with_temperature() {
    let (x, a) = three_spheres();
    let f = vec![0.0; 18];
    let at = |s| {
        compute_velocities_thermal(&x, &f, &a, 1.0, 3, s, 4, 2, Flags::default())
            .expect("thermal solve")
    };
    let one = at(1.0);
    let two = at(2.0);
    for (u1, u2) in one.iter().zip(&two) {
        assert!((u2 - 2.0 * u1).abs() <= 1e-12 * u1.abs().max(1e-12));
    }
}

/// Two close spheres of unequal size, inside the lubrication range.
fn close_pair() -> (Vec<f64>, Vec<f64>) {
    let x = vec![
        0.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
        2.6, 0.4, 0.3, 0.0, 0.0, 0.0,
    ];
    (x, vec![1.0, 0.8])
}

/// Corrected resistance R_FU, rebuilt stage by stage outside the solver.
fn resistance_uf(solver: &Solver<Serial>, x: &[f64], a: &[f64], flags: Flags) -> DMatrix<f64> {
    let mut resistance = solver
        .mobility_tensor(x, a, flags)
        .expect("mobility")
        .into_resistance()
        .expect("resistance");
    if flags.contains(Flags::LUBRICATION) {
        let forces = vec![0.0; 6 * a.len()];
        let particles = ParticleSystem::new(x, &forces, a, a.len()).expect("particles");
        let pairs = PairList::all_pairs(a.len());
        let geometry = check_distances(&Serial, &particles, &pairs);
        lubrication::apply(
            &Serial,
            &mut resistance,
            &particles,
            &pairs,
            &geometry,
            solver.table(),
            solver.viscosity(),
        );
    }
    resistance.blocks().uf.clone()
}

#[test]
fn isolated_sphere_thermal_velocity_is_noise_over_root_drag() {
    let (eta, a, s) = (0.7, 1.3, 0.5);
    let thermal = Thermalization::new(s, 17, 31);
    let solver = Solver::new(Serial, eta, 1).expect("solver");
    let x = [4.0, -2.0, 1.0, 0.0, 0.0, 0.0];
    let u = solver
        .solve(&x, &[0.0; 6], &[a], &thermal, Flags::default())
        .expect("thermal solve");

    let sampler = ThermalSampler::new(&thermal);
    let drag = [6.0 * PI * eta * a, 8.0 * PI * eta * a.powi(3)];
    for k in 0..6 {
        let expected = sampler.sample(k as u64) / drag[k / 3].sqrt();
        assert!(
            (u[k] - expected).abs() <= STOKES_DRAG_REL * expected.abs(),
            "component {k}: {} vs {expected}",
            u[k]
        );
    }
}

#[test]
fn thermal_velocity_is_mobility_times_resistance_root() {
    let (x, a) = close_pair();
    let solver = Solver::new(Serial, 1.2, 2).expect("solver");
    let thermal = Thermalization::new(0.8, 5, 123);
    let psi = ThermalSampler::new(&thermal).noise(&Serial, 12);

    for flags in [Flags::SELF_MOBILITY | Flags::PAIR_MOBILITY, Flags::default(), Flags::ALL] {
        let r = resistance_uf(&solver, &x, &a, flags);
        let l = Cholesky::new(r.clone()).expect("positive definite").l();
        let m = r.try_inverse().expect("invertible");
        let expected = &m * (&l * &psi);

        let u = solver
            .solve(&x, &[0.0; 12], &a, &thermal, flags)
            .expect("thermal solve");
        let scale = expected.amax();
        for (k, (got, want)) in u.iter().zip(expected.iter()).enumerate() {
            assert!(
                (got - want).abs() <= THERMAL_OPERATOR_REL * scale,
                "{flags}, component {k}: {got} vs {want}"
            );
        }
    }
}

#[test]
fn thermal_velocity_covariance_matches_mobility() {
    let (x, a) = close_pair();
    let solver = Solver::new(Serial, 1.0, 2).expect("solver");
    let flags = Flags::ALL;
    let s = 0.5;
    let draws = 6000;

    let mut second_moment = DMatrix::<f64>::zeros(12, 12);
    for offset in 0..draws {
        let thermal = Thermalization::new(s, offset, 2718);
        let u = solver
            .solve(&x, &[0.0; 12], &a, &thermal, flags)
            .expect("thermal solve");
        let u = DVector::from_vec(u);
        second_moment += &u * u.transpose();
    }
    second_moment /= draws as f64;

    let m = resistance_uf(&solver, &x, &a, flags)
        .try_inverse()
        .expect("invertible");
    let target = m * (2.0 * s * s);
    for i in 0..12 {
        for j in 0..12 {
            let unit = (target[(i, i)] * target[(j, j)]).sqrt();
            let dev = (second_moment[(i, j)] - target[(i, j)]).abs() / unit;
            assert!(dev < THERMAL_COVARIANCE_REL, "entry ({i}, {j}): deviation {dev}");
        }
    }
}
