// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Dispersion Providers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dispersion-relation contract consumed by the beam tracer.
//!
//! The plasma model (cold-plasma O/X mode, relativistic corrections, ...)
//! lives outside this crate. It is reached only through
//! [`DispersionProvider`]. [`VacuumDispersion`] is the reference model used
//! for free-space propagation and tests.

use beam_types::config::CoordinateSystem;
use beam_types::error::{BeamError, BeamResult};
use ndarray::Array2;

/// How many orders of derivatives the caller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeOrder {
    First,
    Second,
}

/// Second-partial tensors of H.
///
/// Index convention: `grad_k_grad[[i, j]] = ∂²H/∂K_i∂q_j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hessians {
    /// ∂²H/∂q_i∂q_j
    pub grad_grad: Array2<f64>,
    /// ∂²H/∂K_i∂q_j
    pub grad_k_grad: Array2<f64>,
    /// ∂²H/∂K_i∂K_j
    pub grad_k_grad_k: Array2<f64>,
}

/// First partials of H and, for [`DerivativeOrder::Second`], the Hessians.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionDerivatives {
    pub dh_dq: [f64; 3],
    pub dh_dk: [f64; 3],
    pub hessians: Option<Hessians>,
}

impl DispersionDerivatives {
    /// Hessians, or a domain error if the provider skipped them.
    pub fn require_hessians(&self) -> BeamResult<&Hessians> {
        self.hessians.as_ref().ok_or_else(|| {
            BeamError::Domain("dispersion provider returned no second derivatives".to_string())
        })
    }
}

/// Dispersion function H(q, K) and its partial derivatives.
///
/// Implementations return `BeamError::Domain` for points where H is not
/// defined; callers propagate the error unchanged.
pub trait DispersionProvider {
    fn hamiltonian(&self, q: &[f64; 3], k: &[f64; 3]) -> BeamResult<f64>;

    fn derivatives(
        &self,
        q: &[f64; 3],
        k: &[f64; 3],
        order: DerivativeOrder,
    ) -> BeamResult<DispersionDerivatives>;
}

impl<T: DispersionProvider + ?Sized> DispersionProvider for &T {
    fn hamiltonian(&self, q: &[f64; 3], k: &[f64; 3]) -> BeamResult<f64> {
        (**self).hamiltonian(q, k)
    }

    fn derivatives(
        &self,
        q: &[f64; 3],
        k: &[f64; 3],
        order: DerivativeOrder,
    ) -> BeamResult<DispersionDerivatives> {
        (**self).derivatives(q, k, order)
    }
}

/// Free-space dispersion `H = |K|²/K0² − 1` with analytic derivatives.
///
/// In cylindrical coordinates `|K|² = K_R² + K_zeta²/R² + K_Z²`, where
/// `K_zeta` is the angular momentum conjugate to zeta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VacuumDispersion {
    k0: f64,
    coordinate_system: CoordinateSystem,
}

impl VacuumDispersion {
    pub fn new(k0: f64, coordinate_system: CoordinateSystem) -> BeamResult<Self> {
        if !k0.is_finite() || k0 <= 0.0 {
            return Err(BeamError::InvalidInput(format!(
                "vacuum wavenumber must be finite and > 0, got {k0}"
            )));
        }
        Ok(VacuumDispersion {
            k0,
            coordinate_system,
        })
    }

    pub fn k0(&self) -> f64 {
        self.k0
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    fn major_radius(&self, q: &[f64; 3]) -> BeamResult<f64> {
        let r = q[0];
        if !r.is_finite() || r <= 0.0 {
            return Err(BeamError::Domain(format!(
                "major radius must be > 0 in cylindrical coordinates, got R = {r}"
            )));
        }
        Ok(r)
    }
}

impl DispersionProvider for VacuumDispersion {
    fn hamiltonian(&self, q: &[f64; 3], k: &[f64; 3]) -> BeamResult<f64> {
        let k0_sq = self.k0 * self.k0;
        let k_sq = match self.coordinate_system {
            CoordinateSystem::Cartesian => k[0] * k[0] + k[1] * k[1] + k[2] * k[2],
            CoordinateSystem::Cylindrical => {
                let r = self.major_radius(q)?;
                k[0] * k[0] + k[1] * k[1] / (r * r) + k[2] * k[2]
            }
        };
        Ok(k_sq / k0_sq - 1.0)
    }

    fn derivatives(
        &self,
        q: &[f64; 3],
        k: &[f64; 3],
        order: DerivativeOrder,
    ) -> BeamResult<DispersionDerivatives> {
        let inv_k0_sq = 1.0 / (self.k0 * self.k0);
        match self.coordinate_system {
            CoordinateSystem::Cartesian => {
                let hessians = (order == DerivativeOrder::Second).then(|| Hessians {
                    grad_grad: Array2::zeros((3, 3)),
                    grad_k_grad: Array2::zeros((3, 3)),
                    grad_k_grad_k: Array2::<f64>::eye(3) * (2.0 * inv_k0_sq),
                });
                Ok(DispersionDerivatives {
                    dh_dq: [0.0; 3],
                    dh_dk: [
                        2.0 * k[0] * inv_k0_sq,
                        2.0 * k[1] * inv_k0_sq,
                        2.0 * k[2] * inv_k0_sq,
                    ],
                    hessians,
                })
            }
            CoordinateSystem::Cylindrical => {
                let r = self.major_radius(q)?;
                let k_zeta = k[1];
                let hessians = (order == DerivativeOrder::Second).then(|| {
                    let mut grad_grad = Array2::zeros((3, 3));
                    grad_grad[[0, 0]] = 6.0 * k_zeta * k_zeta / r.powi(4) * inv_k0_sq;
                    let mut grad_k_grad = Array2::zeros((3, 3));
                    grad_k_grad[[1, 0]] = -4.0 * k_zeta / r.powi(3) * inv_k0_sq;
                    let mut grad_k_grad_k = Array2::zeros((3, 3));
                    grad_k_grad_k[[0, 0]] = 2.0 * inv_k0_sq;
                    grad_k_grad_k[[1, 1]] = 2.0 / (r * r) * inv_k0_sq;
                    grad_k_grad_k[[2, 2]] = 2.0 * inv_k0_sq;
                    Hessians {
                        grad_grad,
                        grad_k_grad,
                        grad_k_grad_k,
                    }
                });
                Ok(DispersionDerivatives {
                    dh_dq: [-2.0 * k_zeta * k_zeta / r.powi(3) * inv_k0_sq, 0.0, 0.0],
                    dh_dk: [
                        2.0 * k[0] * inv_k0_sq,
                        2.0 * k_zeta / (r * r) * inv_k0_sq,
                        2.0 * k[2] * inv_k0_sq,
                    ],
                    hessians,
                })
            }
        }
    }
}
