// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Property-Based Tests (proptest) for beam-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for beam-math using proptest.
//!
//! Covers: spline root extraction, secant refinement, complex linear solve,
//! 2x2 inversion.

use beam_math::linalg::{inverse_2x2, solve_complex};
use beam_math::roots::secant;
use beam_math::spline::CubicSpline;
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use proptest::prelude::*;
use std::convert::Infallible;

fn unit_samples(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
}

// ── Spline Properties ────────────────────────────────────────────────

proptest! {
    /// A linear function sampled on [0, 1] yields exactly its one root.
    #[test]
    fn spline_linear_root(root in 0.01f64..0.99, slope in prop_oneof![-5.0f64..-0.1, 0.1f64..5.0]) {
        let xs = unit_samples(100);
        let ys: Vec<f64> = xs.iter().map(|x| slope * (x - root)).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();
        let roots = spline.roots();
        prop_assert_eq!(roots.len(), 1);
        prop_assert!((roots[0] - root).abs() < 1e-10, "root {} vs {}", roots[0], root);
    }

    /// Roots come back sorted and every root evaluates to ~0.
    #[test]
    fn spline_roots_sorted_and_zero(freq in 1.0f64..6.0, phase in 0.0f64..3.0) {
        let xs = unit_samples(100);
        let ys: Vec<f64> = xs.iter().map(|x| (freq * x * 6.0 + phase).sin()).collect();
        let spline = CubicSpline::new(&xs, &ys).unwrap();
        let roots = spline.roots();
        for w in roots.windows(2) {
            prop_assert!(w[1] > w[0]);
        }
        for r in &roots {
            prop_assert!(spline.evaluate(*r).unwrap().abs() < 1e-9);
        }
    }
}

// ── Secant Properties ────────────────────────────────────────────────

proptest! {
    /// Secant from a nearby seed converges onto the root of a smooth monotone function.
    #[test]
    fn secant_converges_near_root(root in -2.0f64..2.0, offset in -0.05f64..0.05) {
        let f = |x: f64| -> Result<f64, Infallible> { Ok((x - root) * (1.0 + 0.1 * x * x)) };
        let r = secant(f, root + offset, root + offset + 1e-3, 1e-13, 0.0, 100).unwrap();
        prop_assert!(r.converged());
        prop_assert!((r.root - root).abs() < 1e-10);
    }
}

// ── Complex Linear Algebra ───────────────────────────────────────────

proptest! {
    /// Diagonally dominant complex systems are solved to round-off.
    #[test]
    fn solve_complex_diagonally_dominant(
        n in 2usize..7,
        seed in proptest::collection::vec(-1.0f64..1.0, 98),
    ) {
        let a = Array2::from_shape_fn((n, n), |(i, j)| {
            let k = (i * n + j) % 49;
            let off = Complex64::new(seed[k], seed[k + 49]);
            if i == j { off + Complex64::new(2.0 * n as f64, 0.0) } else { off }
        });
        let x_true = Array1::from_shape_fn(n, |i| Complex64::new(seed[i], -seed[i + 7]));
        let b = a.dot(&x_true);
        let x = solve_complex(a, b).unwrap();
        for i in 0..n {
            prop_assert!((x[i] - x_true[i]).norm() < 1e-10);
        }
    }

    /// Diagonal 2x2 inverse is element-wise reciprocal.
    #[test]
    fn inverse_2x2_diagonal(re in 0.1f64..10.0, im in 0.1f64..10.0) {
        let d = Complex64::new(re, im);
        let m = Array2::from_diag(&Array1::from_elem(2, d));
        let inv = inverse_2x2(&m).unwrap();
        prop_assert!((inv[[0, 0]] - d.inv()).norm() < 1e-14);
        prop_assert!(inv[[0, 1]].norm() < 1e-15);
    }
}
