// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Vacuum Propagation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Gaussian beam in free space, in the 2×2 transverse beam frame.
//!
//! `Psi_w = K0/R_c + 2i/w²` per transverse axis. Free propagation over a
//! distance d adds `d/K0` to the inverse: `Psi_w⁻¹(d) = Psi_w⁻¹(0) + (d/K0)·I`.

use beam_math::linalg::inverse_2x2;
use beam_types::error::{BeamError, BeamResult};
use ndarray::Array2;
use num_complex::Complex64;

/// Diagonal entry of the antenna Psi_w.
pub fn launch_beam_matrix_entry(k0: f64, width: f64, curvature: f64) -> Complex64 {
    Complex64::new(k0 * curvature, 2.0 / (width * width))
}

/// 2×2 antenna Psi_w for a circular beam.
pub fn launch_beam_matrix(k0: f64, width: f64, curvature: f64) -> Array2<Complex64> {
    Array2::<Complex64>::eye(2) * launch_beam_matrix_entry(k0, width, curvature)
}

/// Psi_w after `distance` of free space.
pub fn propagate(
    psi_w: &Array2<Complex64>,
    distance: f64,
    k0: f64,
) -> BeamResult<Array2<Complex64>> {
    if !distance.is_finite() || distance < 0.0 {
        return Err(BeamError::InvalidInput(format!(
            "vacuum propagation distance must be finite and >= 0, got {distance}"
        )));
    }
    let mut inverse = inverse_2x2(psi_w)?;
    let shift = Complex64::new(distance / k0, 0.0);
    inverse[[0, 0]] += shift;
    inverse[[1, 1]] += shift;
    inverse_2x2(&inverse)
}

/// 1/e² width encoded in one Psi_w eigenvalue: `sqrt(2 / Im)`.
pub fn beam_width(psi: Complex64) -> f64 {
    (2.0 / psi.im).sqrt()
}

/// Phase-front radius of curvature: `K0 / Re`. Infinite for a flat front.
pub fn radius_of_curvature(psi: Complex64, k0: f64) -> f64 {
    if psi.re == 0.0 {
        f64::INFINITY
    } else {
        k0 / psi.re
    }
}
