// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Scalar Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-dimensional root finding and minimization.
//!
//! Both solvers take fallible closures so provider errors (e.g. a point
//! outside the flux map) surface unchanged to the caller.

/// Why a root search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootFlag {
    Converged,
    ConvergenceError,
    ZeroSlope,
    NonFinite,
}

impl RootFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootFlag::Converged => "converged",
            RootFlag::ConvergenceError => "convergence error",
            RootFlag::ZeroSlope => "secant slope vanished",
            RootFlag::NonFinite => "non-finite iterate",
        }
    }
}

/// Outcome of [`secant`].
#[derive(Debug, Clone, Copy)]
pub struct RootResult {
    pub root: f64,
    pub iterations: usize,
    pub flag: RootFlag,
}

impl RootResult {
    pub fn converged(&self) -> bool {
        self.flag == RootFlag::Converged
    }
}

/// Secant iteration from the two starting points `x0`, `x1`.
///
/// Converges when the step falls below `xtol + rtol·|x|` or `f` vanishes
/// exactly.
pub fn secant<E, F>(
    mut f: F,
    x0: f64,
    x1: f64,
    xtol: f64,
    rtol: f64,
    max_iter: usize,
) -> Result<RootResult, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let mut p0 = x0;
    let mut p1 = x1;
    let mut q0 = f(p0)?;
    let mut q1 = f(p1)?;
    if q0 == 0.0 {
        return Ok(RootResult { root: p0, iterations: 0, flag: RootFlag::Converged });
    }
    if q1.abs() > q0.abs() {
        std::mem::swap(&mut p0, &mut p1);
        std::mem::swap(&mut q0, &mut q1);
    }

    for iteration in 1..=max_iter {
        if q1 == 0.0 {
            return Ok(RootResult { root: p1, iterations: iteration, flag: RootFlag::Converged });
        }
        if q1 == q0 {
            return Ok(RootResult { root: p1, iterations: iteration, flag: RootFlag::ZeroSlope });
        }
        let p = p1 - q1 * (p1 - p0) / (q1 - q0);
        if !p.is_finite() {
            return Ok(RootResult { root: p1, iterations: iteration, flag: RootFlag::NonFinite });
        }
        if (p - p1).abs() <= xtol + rtol * p.abs() {
            return Ok(RootResult { root: p, iterations: iteration, flag: RootFlag::Converged });
        }
        p0 = p1;
        q0 = q1;
        p1 = p;
        q1 = f(p1)?;
    }

    Ok(RootResult {
        root: p1,
        iterations: max_iter,
        flag: RootFlag::ConvergenceError,
    })
}

/// Result of [`golden_section_minimize`].
#[derive(Debug, Clone, Copy)]
pub struct Minimum {
    pub x: f64,
    pub fun: f64,
}

/// Golden-section search for a minimum of `f` on `[a, b]`.
pub fn golden_section_minimize<E, F>(
    mut f: F,
    a: f64,
    b: f64,
    xtol: f64,
    max_iter: usize,
) -> Result<Minimum, E>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };

    let mut x1 = hi - inv_phi * (hi - lo);
    let mut x2 = lo + inv_phi * (hi - lo);
    let mut f1 = f(x1)?;
    let mut f2 = f(x2)?;

    for _ in 0..max_iter {
        if (hi - lo).abs() <= xtol {
            break;
        }
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - inv_phi * (hi - lo);
            f1 = f(x1)?;
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + inv_phi * (hi - lo);
            f2 = f(x2)?;
        }
    }

    let (x, fun) = if f1 < f2 { (x1, f1) } else { (x2, f2) };
    let f_lo = f(lo)?;
    let f_hi = f(hi)?;
    let best = [(x, fun), (lo, f_lo), (hi, f_hi)]
        .into_iter()
        .fold((x, fun), |acc, c| if c.1 < acc.1 { c } else { acc });
    Ok(Minimum { x: best.0, fun: best.1 })
}
