// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Plasma Entry Boundary Conditions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Vacuum → plasma matching of K and Psi on the boundary flux surface.
//!
//! The six independent entries of the plasma-side Psi are fixed by
//!
//! - three tangential phase-continuity conditions
//!   `t_aᵀ Psi_p t_b = t_aᵀ Psi_v t_b − α · t_aᵀ (∇∇psi) t_b`
//!   for `(t1, t1)`, `(t1, t2)`, `(t2, t2)`, and
//! - three ray conditions `Psi_p · ∂H/∂K = −∂H/∂q`, which keep the
//!   dispersion relation satisfied to first order off the ray.
//!
//! `α` is the jump of K along the flux gradient, `K_p = K_v − α∇psi`:
//! zero for the continuous condition, solved from `H(q, K_p) = 0` for the
//! discontinuous one.

use crate::dispersion::{DerivativeOrder, DispersionProvider};
use crate::field::BoundaryField;
use beam_math::linalg::solve_complex;
use beam_math::roots::secant;
use beam_types::config::{BoundaryCondition, CoordinateSystem, FiniteDifference};
use beam_types::constants::PSI_UPPER_TRIANGLE;
use beam_types::error::{BeamError, BeamResult};
use log::debug;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

const JUMP_XTOL: f64 = 1e-12;
const JUMP_RTOL: f64 = 1e-12;
const JUMP_MAX_ITER: usize = 100;

/// Beam state on the vacuum side of the boundary.
#[derive(Debug, Clone, Copy)]
pub struct VacuumSide<'a> {
    pub position: [f64; 3],
    pub wavevector: [f64; 3],
    pub psi: &'a Array2<Complex64>,
}

/// Beam state just inside the plasma.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaSide {
    pub wavevector: [f64; 3],
    pub psi: Array2<Complex64>,
}

/// Local shape of the boundary flux surface in the working coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySurface {
    /// ∇psi (covariant, same index placement as K).
    pub gradient: [f64; 3],
    /// Coordinate Hessian of psi.
    pub hessian: Array2<f64>,
    /// Poloidal-plane and toroidal tangent displacements.
    pub tangents: [[f64; 3]; 2],
}

impl BoundarySurface {
    pub fn at<F: BoundaryField>(
        field: &F,
        coordinate_system: CoordinateSystem,
        position: &[f64; 3],
        spacing: &FiniteDifference,
    ) -> BeamResult<Self> {
        let mut hessian = Array2::zeros((3, 3));
        let surface = match coordinate_system {
            CoordinateSystem::Cylindrical => {
                let d = field.flux_derivatives(position[0], position[2], spacing)?;
                hessian[[0, 0]] = d.d_rr;
                hessian[[0, 2]] = d.d_rz;
                hessian[[2, 0]] = d.d_rz;
                hessian[[2, 2]] = d.d_zz;
                BoundarySurface {
                    gradient: [d.d_r, 0.0, d.d_z],
                    hessian,
                    tangents: [[d.d_z, 0.0, -d.d_r], [0.0, 1.0, 0.0]],
                }
            }
            CoordinateSystem::Cartesian => {
                let (x, y) = (position[0], position[1]);
                let r = x.hypot(y);
                if r == 0.0 {
                    return Err(BeamError::Domain(
                        "boundary point lies on the symmetry axis".to_string(),
                    ));
                }
                let (c, s) = (x / r, y / r);
                let d = field.flux_derivatives(r, position[2], spacing)?;
                hessian[[0, 0]] = d.d_rr * c * c + d.d_r * s * s / r;
                hessian[[1, 1]] = d.d_rr * s * s + d.d_r * c * c / r;
                hessian[[2, 2]] = d.d_zz;
                hessian[[0, 1]] = (d.d_rr - d.d_r / r) * c * s;
                hessian[[0, 2]] = d.d_rz * c;
                hessian[[1, 2]] = d.d_rz * s;
                hessian[[1, 0]] = hessian[[0, 1]];
                hessian[[2, 0]] = hessian[[0, 2]];
                hessian[[2, 1]] = hessian[[1, 2]];
                BoundarySurface {
                    gradient: [d.d_r * c, d.d_r * s, d.d_z],
                    hessian,
                    tangents: [[d.d_z * c, d.d_z * s, -d.d_r], [-s, c, 0.0]],
                }
            }
        };
        if surface.gradient_norm() == 0.0 {
            return Err(BeamError::Domain(format!(
                "flux gradient vanishes at boundary point {position:?}"
            )));
        }
        Ok(surface)
    }

    pub fn gradient_norm(&self) -> f64 {
        let g = self.gradient;
        (g[0] * g[0] + g[1] * g[1] + g[2] * g[2]).sqrt()
    }

    /// `aᵀ · hessian · b`
    fn curvature(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                sum += a[i] * self.hessian[[i, j]] * b[j];
            }
        }
        sum
    }
}

fn shifted(k: &[f64; 3], gradient: &[f64; 3], alpha: f64) -> [f64; 3] {
    [
        k[0] - alpha * gradient[0],
        k[1] - alpha * gradient[1],
        k[2] - alpha * gradient[2],
    ]
}

/// Coefficients of the packed upper-triangle unknowns in `aᵀ Psi b`.
fn bilinear_row(a: &[f64; 3], b: &[f64; 3]) -> [f64; 6] {
    let mut row = [0.0; 6];
    for (slot, &(i, j)) in PSI_UPPER_TRIANGLE.iter().enumerate() {
        row[slot] = if i == j {
            a[i] * b[i]
        } else {
            a[i] * b[j] + a[j] * b[i]
        };
    }
    row
}

/// Coefficients of the packed unknowns in `(Psi g)_i`.
fn matvec_row(g: &[f64; 3], i: usize) -> [f64; 6] {
    let mut e = [0.0; 3];
    e[i] = 1.0;
    bilinear_row(&e, g)
}

fn bilinear(psi: &Array2<Complex64>, a: &[f64; 3], b: &[f64; 3]) -> Complex64 {
    let mut sum = Complex64::new(0.0, 0.0);
    for i in 0..3 {
        for j in 0..3 {
            sum += psi[[i, j]] * (a[i] * b[j]);
        }
    }
    sum
}

/// Solve the 6×6 matching system for the plasma-side Psi.
fn match_psi<D: DispersionProvider>(
    surface: &BoundarySurface,
    dispersion: &D,
    vacuum: &VacuumSide<'_>,
    k_plasma: &[f64; 3],
    alpha: f64,
) -> BeamResult<Array2<Complex64>> {
    let derivs = dispersion.derivatives(&vacuum.position, k_plasma, DerivativeOrder::First)?;
    let [t1, t2] = surface.tangents;
    let pairs = [(t1, t1), (t1, t2), (t2, t2)];

    let mut a = Array2::zeros((6, 6));
    let mut rhs = Array1::zeros(6);
    for (row, (ta, tb)) in pairs.iter().enumerate() {
        for (col, coef) in bilinear_row(ta, tb).into_iter().enumerate() {
            a[[row, col]] = Complex64::new(coef, 0.0);
        }
        rhs[row] = bilinear(vacuum.psi, ta, tb) - alpha * surface.curvature(ta, tb);
    }
    for i in 0..3 {
        for (col, coef) in matvec_row(&derivs.dh_dk, i).into_iter().enumerate() {
            a[[3 + i, col]] = Complex64::new(coef, 0.0);
        }
        rhs[3 + i] = Complex64::new(-derivs.dh_dq[i], 0.0);
    }

    let packed = solve_complex(a, rhs)?;
    let mut psi = Array2::zeros((3, 3));
    for (slot, &(i, j)) in PSI_UPPER_TRIANGLE.iter().enumerate() {
        psi[[i, j]] = packed[slot];
        psi[[j, i]] = packed[slot];
    }
    Ok(psi)
}

/// K unchanged across the boundary; Psi re-matched to the plasma dispersion.
pub fn apply_continuous_bc<D: DispersionProvider>(
    surface: &BoundarySurface,
    dispersion: &D,
    vacuum: &VacuumSide<'_>,
) -> BeamResult<PlasmaSide> {
    let psi = match_psi(surface, dispersion, vacuum, &vacuum.wavevector, 0.0)?;
    Ok(PlasmaSide {
        wavevector: vacuum.wavevector,
        psi,
    })
}

/// Tangential K kept, normal K jumps so that `H = 0` inside the plasma.
pub fn apply_discontinuous_bc<D: DispersionProvider>(
    surface: &BoundarySurface,
    dispersion: &D,
    vacuum: &VacuumSide<'_>,
) -> BeamResult<PlasmaSide> {
    let k = vacuum.wavevector;
    let k_norm = (k[0] * k[0] + k[1] * k[1] + k[2] * k[2]).sqrt();
    let first_step = 1e-3 * k_norm / surface.gradient_norm();

    let h_along_normal =
        |alpha: f64| dispersion.hamiltonian(&vacuum.position, &shifted(&k, &surface.gradient, alpha));
    let jump = secant(h_along_normal, 0.0, first_step, JUMP_XTOL, JUMP_RTOL, JUMP_MAX_ITER)?;
    if !jump.converged() {
        return Err(BeamError::RootRefinement {
            reason: format!("normal wavevector jump: {}", jump.flag.as_str()),
        });
    }
    let alpha = jump.root;
    let k_plasma = shifted(&k, &surface.gradient, alpha);
    debug!("discontinuous boundary: alpha = {alpha:.6e}, K = {k_plasma:?}");

    let psi = match_psi(surface, dispersion, vacuum, &k_plasma, alpha)?;
    Ok(PlasmaSide {
        wavevector: k_plasma,
        psi,
    })
}

/// Dispatch on the resolved boundary-condition policy.
///
/// `BoundaryCondition::None` returns the vacuum state without touching the
/// field or the dispersion provider.
pub fn apply_boundary_condition<F: BoundaryField, D: DispersionProvider>(
    condition: BoundaryCondition,
    field: &F,
    dispersion: &D,
    coordinate_system: CoordinateSystem,
    spacing: &FiniteDifference,
    vacuum: &VacuumSide<'_>,
) -> BeamResult<PlasmaSide> {
    match condition {
        BoundaryCondition::None => Ok(PlasmaSide {
            wavevector: vacuum.wavevector,
            psi: vacuum.psi.clone(),
        }),
        BoundaryCondition::Continuous => {
            let surface = BoundarySurface::at(field, coordinate_system, &vacuum.position, spacing)?;
            apply_continuous_bc(&surface, dispersion, vacuum)
        }
        BoundaryCondition::Discontinuous => {
            let surface = BoundarySurface::at(field, coordinate_system, &vacuum.position, spacing)?;
            apply_discontinuous_bc(&surface, dispersion, vacuum)
        }
    }
}
