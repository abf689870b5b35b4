// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Beam Evolution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Right-hand side of the beam-tracing ODE system.
//!
//! Ray equations (Hamilton's equations in (q, K)):
//!
//! ```text
//! dq/dτ =  ∂H/∂K
//! dK/dτ = −∂H/∂q
//! ```
//!
//! and the Riccati equation for the beam matrix:
//!
//! ```text
//! dΨ/dτ = −H_qq − Ψ·H_Kq − H_qK·Ψ − Ψ·H_KK·Ψ,   H_qK = H_Kqᵗ
//! ```
//!
//! The system is autonomous; τ is accepted only to match integrator callbacks.

use crate::codec;
use crate::dispersion::{DerivativeOrder, DispersionProvider, Hessians};
use beam_math::linalg::to_complex;
use beam_types::constants::STATE_LEN;
use beam_types::error::{BeamError, BeamResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;

/// dΨ/dτ from the dispersion Hessians.
///
/// The result is symmetric whenever Ψ, H_qq and H_KK are.
pub fn psi_derivative(psi: &Array2<Complex64>, hessians: &Hessians) -> Array2<Complex64> {
    let hqq = to_complex(&hessians.grad_grad);
    let hkq = to_complex(&hessians.grad_k_grad);
    let hkk = to_complex(&hessians.grad_k_grad_k);
    let hqk = hkq.t().to_owned();

    -&hqq - psi.dot(&hkq) - hqk.dot(psi) - psi.dot(&hkk).dot(psi)
}

/// ODE right-hand side bound to one dispersion provider.
///
/// Holds no mutable state, so one instance can be shared by any number of
/// integrator calls.
#[derive(Debug, Clone)]
pub struct BeamEvolution<D> {
    dispersion: D,
}

impl<D: DispersionProvider> BeamEvolution<D> {
    pub fn new(dispersion: D) -> Self {
        BeamEvolution { dispersion }
    }

    pub fn dispersion(&self) -> &D {
        &self.dispersion
    }

    /// d(state)/dτ for one packed 18-slot state.
    pub fn rhs(&self, _tau: f64, state: ArrayView1<f64>) -> BeamResult<Array1<f64>> {
        let beam = codec::decode(state)?;
        let derivs =
            self.dispersion
                .derivatives(&beam.position, &beam.wavevector, DerivativeOrder::Second)?;
        let hessians = derivs.require_hessians()?;

        let dq = derivs.dh_dk;
        let dk = [-derivs.dh_dq[0], -derivs.dh_dq[1], -derivs.dh_dq[2]];
        let dpsi = psi_derivative(&beam.psi, hessians);
        codec::encode(&dq, &dk, &dpsi)
    }

    /// Column-wise [`rhs`](Self::rhs) over a `[18, n]` batch.
    pub fn rhs_batch(&self, tau: f64, states: ArrayView2<f64>) -> BeamResult<Array2<f64>> {
        if states.nrows() != STATE_LEN {
            return Err(BeamError::ShapeMismatch {
                what: "state batch".to_string(),
                expected: format!("[{STATE_LEN}, n]"),
                found: format!("{:?}", states.dim()),
            });
        }
        let mut out = Array2::zeros(states.raw_dim());
        for (p, column) in states.columns().into_iter().enumerate() {
            out.column_mut(p).assign(&self.rhs(tau, column)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispersion::{DispersionDerivatives, VacuumDispersion};
    use beam_math::linalg::symmetry_error;
    use beam_types::config::CoordinateSystem;
    use beam_types::constants::{K_OFFSET, PSI_RE_OFFSET, Q_OFFSET};
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn symmetric_psi() -> Array2<Complex64> {
        array![
            [c(3.0, 1.0), c(0.5, 0.1), c(-0.2, 0.0)],
            [c(0.5, 0.1), c(2.0, 2.0), c(0.3, -0.4)],
            [c(-0.2, 0.0), c(0.3, -0.4), c(1.0, 0.5)]
        ]
    }

    /// Provider with constant, deliberately asymmetric H_Kq.
    struct Quadratic;

    impl DispersionProvider for Quadratic {
        fn hamiltonian(&self, _q: &[f64; 3], _k: &[f64; 3]) -> BeamResult<f64> {
            Ok(0.0)
        }

        fn derivatives(
            &self,
            q: &[f64; 3],
            k: &[f64; 3],
            _order: DerivativeOrder,
        ) -> BeamResult<DispersionDerivatives> {
            Ok(DispersionDerivatives {
                dh_dq: [q[0], 2.0 * q[1], 3.0 * q[2]],
                dh_dk: [k[0], k[1], k[2]],
                hessians: Some(Hessians {
                    grad_grad: array![[1.0, 0.2, 0.0], [0.2, 2.0, 0.1], [0.0, 0.1, 3.0]],
                    grad_k_grad: array![[0.0, 0.7, -0.3], [0.1, 0.0, 0.4], [0.9, -0.5, 0.2]],
                    grad_k_grad_k: array![[1.0, 0.0, 0.3], [0.0, 1.0, 0.0], [0.3, 0.0, 1.0]],
                }),
            })
        }
    }

    struct Failing;

    impl DispersionProvider for Failing {
        fn hamiltonian(&self, _q: &[f64; 3], _k: &[f64; 3]) -> BeamResult<f64> {
            Err(BeamError::Domain("outside equilibrium".to_string()))
        }

        fn derivatives(
            &self,
            _q: &[f64; 3],
            _k: &[f64; 3],
            _order: DerivativeOrder,
        ) -> BeamResult<DispersionDerivatives> {
            Err(BeamError::Domain("outside equilibrium".to_string()))
        }
    }

    #[test]
    fn test_psi_derivative_symmetric_with_asymmetric_mixed_hessian() {
        let d = Quadratic
            .derivatives(&[0.0; 3], &[0.0; 3], DerivativeOrder::Second)
            .unwrap();
        let dpsi = psi_derivative(&symmetric_psi(), d.hessians.as_ref().unwrap());
        assert!(symmetry_error(&dpsi) < 1e-14, "asym = {}", symmetry_error(&dpsi));
    }

    #[test]
    fn test_ray_equations_signs() {
        let evo = BeamEvolution::new(Quadratic);
        let state = codec::encode(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &symmetric_psi()).unwrap();
        let rhs = evo.rhs(0.0, state.view()).unwrap();
        // dq/dτ = ∂H/∂K = K
        assert_eq!(rhs[Q_OFFSET], 4.0);
        assert_eq!(rhs[Q_OFFSET + 2], 6.0);
        // dK/dτ = −∂H/∂q
        assert_eq!(rhs[K_OFFSET], -1.0);
        assert_eq!(rhs[K_OFFSET + 1], -4.0);
        assert_eq!(rhs[K_OFFSET + 2], -9.0);
    }

    #[test]
    fn test_vacuum_cartesian_riccati() {
        let k0 = 10.0;
        let evo = BeamEvolution::new(VacuumDispersion::new(k0, CoordinateSystem::Cartesian).unwrap());
        let psi = Array2::from_diag(&array![c(2.0, 3.0), c(2.0, 3.0), c(0.0, 0.0)]);
        let state = codec::encode(&[0.0; 3], &[0.0, 0.0, k0], &psi).unwrap();
        let rhs = evo.rhs(0.0, state.view()).unwrap();
        // dΨ/dτ = −Ψ·(2/K0²)·Ψ for the free-space Hamiltonian
        let expected = -(c(2.0, 3.0) * c(2.0, 3.0)) * (2.0 / (k0 * k0));
        let decoded = codec::decode(rhs.view()).unwrap();
        assert!((decoded.psi[[0, 0]] - expected).norm() < 1e-15);
        assert_eq!(rhs[PSI_RE_OFFSET + 2], 0.0);
    }

    #[test]
    fn test_provider_error_propagates_verbatim() {
        let evo = BeamEvolution::new(Failing);
        let state = Array1::zeros(STATE_LEN);
        let err = evo.rhs(0.0, state.view()).unwrap_err();
        assert!(matches!(err, BeamError::Domain(ref m) if m == "outside equilibrium"));
    }

    #[test]
    fn test_rhs_batch_matches_columns() {
        let evo = BeamEvolution::new(Quadratic);
        let mut batch = Array2::zeros((STATE_LEN, 2));
        batch
            .column_mut(0)
            .assign(&codec::encode(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &symmetric_psi()).unwrap());
        batch
            .column_mut(1)
            .assign(&codec::encode(&[0.0, 2.0, 0.0], &[3.0, 0.0, 1.0], &symmetric_psi()).unwrap());
        let out = evo.rhs_batch(0.0, batch.view()).unwrap();
        for p in 0..2 {
            assert_eq!(out.column(p), evo.rhs(0.0, batch.column(p)).unwrap());
        }
        assert!(evo.rhs_batch(0.0, Array2::zeros((5, 2)).view()).is_err());
    }
}
