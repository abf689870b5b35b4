// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Cubic Spline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Natural cubic spline with real-root extraction.
//!
//! The spline does not extrapolate: evaluation outside the knot range
//! returns `None`, and only roots inside the knot range are reported.

use crate::tridiag::thomas_solve;

/// Bisection steps used to polish a bracketed root of one spline piece.
const ROOT_BISECTION_STEPS: usize = 80;

/// Natural cubic spline through `(xs[i], ys[i])`.
///
/// Natural rather than not-a-knot ends on purpose: the entry search only
/// uses the roots as secant seeds, and the refined root does not depend on
/// the end condition.
///
/// Piece `i` is stored as `y = a + b t + c t² + d t³` with `t = x - xs[i]`.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    coeffs: Vec<[f64; 4]>,
}

impl CubicSpline {
    /// Build a natural spline. Returns `None` if fewer than 2 points are
    /// given, lengths differ, values are non-finite or `xs` is not
    /// strictly increasing.
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 2 || ys.len() != n {
            return None;
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        // Second derivatives M_i; natural ends M_0 = M_{n-1} = 0.
        let mut sub = vec![0.0; n];
        let mut diag = vec![1.0; n];
        let mut sup = vec![0.0; n];
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            sub[i] = h[i - 1];
            diag[i] = 2.0 * (h[i - 1] + h[i]);
            sup[i] = h[i];
            rhs[i] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        }
        let m = thomas_solve(&sub, &diag, &sup, &rhs)?;

        let coeffs = (0..n - 1)
            .map(|i| {
                let hi = h[i];
                [
                    ys[i],
                    (ys[i + 1] - ys[i]) / hi - hi * (2.0 * m[i] + m[i + 1]) / 6.0,
                    m[i] / 2.0,
                    (m[i + 1] - m[i]) / (6.0 * hi),
                ]
            })
            .collect();

        Some(CubicSpline {
            xs: xs.to_vec(),
            coeffs,
        })
    }

    pub fn x_min(&self) -> f64 {
        self.xs[0]
    }

    pub fn x_max(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Evaluate the spline; `None` outside `[x_min, x_max]`.
    pub fn evaluate(&self, x: f64) -> Option<f64> {
        if !(x >= self.x_min() && x <= self.x_max()) {
            return None;
        }
        let i = self.interval(x);
        Some(horner(&self.coeffs[i], x - self.xs[i]))
    }

    /// All real roots inside the knot range, ascending.
    pub fn roots(&self) -> Vec<f64> {
        let mut roots = Vec::new();
        let last = self.coeffs.len() - 1;
        for (i, piece) in self.coeffs.iter().enumerate() {
            let h = self.xs[i + 1] - self.xs[i];
            for t in piece_roots(piece, h, i == last) {
                let x = self.xs[i] + t;
                let duplicate = roots
                    .last()
                    .is_some_and(|&prev: &f64| (x - prev).abs() <= 1e-12 * h.max(1.0));
                if !duplicate {
                    roots.push(x);
                }
            }
        }
        roots
    }

    fn interval(&self, x: f64) -> usize {
        let mut lo = 0;
        let mut hi = self.xs.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        lo
    }
}

fn horner(c: &[f64; 4], t: f64) -> f64 {
    c[0] + t * (c[1] + t * (c[2] + t * c[3]))
}

/// Roots of one cubic piece on `[0, h)` (or `[0, h]` for the final piece).
///
/// The piece is split at the stationary points of its derivative so each
/// sub-interval is monotone, then sign changes are bisected.
fn piece_roots(c: &[f64; 4], h: f64, include_end: bool) -> Vec<f64> {
    let mut breaks = vec![0.0];
    let mut stationary = quadratic_roots(3.0 * c[3], 2.0 * c[2], c[1]);
    stationary.sort_by(f64::total_cmp);
    breaks.extend(stationary.into_iter().filter(|&t| t > 0.0 && t < h));
    breaks.push(h);

    let mut roots = Vec::new();
    for w in breaks.windows(2) {
        let (mut lo, mut hi) = (w[0], w[1]);
        let mut f_lo = horner(c, lo);
        let f_hi = horner(c, hi);
        if f_lo == 0.0 {
            roots.push(lo);
            continue;
        }
        if f_lo * f_hi >= 0.0 {
            continue;
        }
        for _ in 0..ROOT_BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            let f_mid = horner(c, mid);
            if f_mid == 0.0 {
                lo = mid;
                hi = mid;
                break;
            }
            if (f_mid < 0.0) == (f_lo < 0.0) {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        roots.push(0.5 * (lo + hi));
    }
    if include_end && horner(c, h) == 0.0 {
        roots.push(h);
    }
    roots
}

/// Real roots of `a t² + b t + c`.
fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    // Numerically stable form, avoids cancellation in -b ± sqrt(disc).
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    if q == 0.0 {
        return vec![0.0];
    }
    vec![q / a, c / q]
}
