// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Launch Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coordinate transforms, TORBEAM angle conventions and the beam frame.
//!
//! Cylindrical coordinates are (R, zeta, Z) with `zeta = atan2(Y, X)`;
//! `K_zeta` is the angular momentum `R·K_phi`.

use beam_math::linalg::{congruence, orthonormality_error, to_complex};
use beam_types::config::CoordinateSystem;
use beam_types::constants::SPEED_OF_LIGHT;
use beam_types::error::{BeamError, BeamResult};
use ndarray::{array, Array2};
use num_complex::Complex64;
use std::f64::consts::{FRAC_PI_2, PI};

pub fn cartesian_to_cylindrical(x: f64, y: f64, z: f64) -> [f64; 3] {
    [x.hypot(y), y.atan2(x), z]
}

pub fn cylindrical_to_cartesian(r: f64, zeta: f64, z: f64) -> [f64; 3] {
    [r * zeta.cos(), r * zeta.sin(), z]
}

/// Point at distance `r` along the direction given by elevation `poloidal`
/// and azimuth `toroidal`.
pub fn toroidal_to_cartesian(r: f64, poloidal: f64, toroidal: f64) -> [f64; 3] {
    [
        r * poloidal.cos() * toroidal.cos(),
        r * poloidal.cos() * toroidal.sin(),
        r * poloidal.sin(),
    ]
}

/// Vacuum wavenumber `K0 = ω / c`.
pub fn angular_frequency_to_wavenumber(angular_frequency: f64) -> f64 {
    angular_frequency / SPEED_OF_LIGHT
}

/// (K_R, K_zeta, K_Z) at cylindrical `position` → (K_X, K_Y, K_Z).
pub fn k_lab_to_cartesian(k: &[f64; 3], position: &[f64; 3]) -> [f64; 3] {
    let (r, zeta) = (position[0], position[1]);
    let (s, c) = zeta.sin_cos();
    let k_phi = k[1] / r;
    [k[0] * c - k_phi * s, k[0] * s + k_phi * c, k[2]]
}

/// (K_X, K_Y, K_Z) at Cartesian `position` → (K_R, K_zeta, K_Z).
pub fn k_cartesian_to_lab(k: &[f64; 3], position: &[f64; 3]) -> [f64; 3] {
    let [r, zeta, _] = cartesian_to_cylindrical(position[0], position[1], position[2]);
    let (s, c) = zeta.sin_cos();
    [k[0] * c + k[1] * s, (-k[0] * s + k[1] * c) * r, k[2]]
}

/// Lab-Cartesian Psi → cylindrical Psi at (R, zeta).
///
/// Psi is a second derivative of the phase, so the conversion picks up
/// connection terms from the first derivatives: `−K_R·R` on zeta-zeta and
/// `K_zeta/R` on R-zeta.
pub fn psi_cartesian_to_cylindrical(
    psi: &Array2<Complex64>,
    r: f64,
    zeta: f64,
    k_r: f64,
    k_zeta: f64,
) -> BeamResult<Array2<Complex64>> {
    if psi.dim() != (3, 3) {
        return Err(BeamError::ShapeMismatch {
            what: "Psi".to_string(),
            expected: "(3, 3)".to_string(),
            found: format!("{:?}", psi.dim()),
        });
    }
    let (s, c) = zeta.sin_cos();
    let (xx, yy, zz) = (psi[[0, 0]], psi[[1, 1]], psi[[2, 2]]);
    let (xy, xz, yz) = (psi[[0, 1]], psi[[0, 2]], psi[[1, 2]]);

    let rr = xx * c * c + xy * (2.0 * s * c) + yy * s * s;
    let zeta_zeta = (xx * s * s - xy * (2.0 * s * c) + yy * c * c) * (r * r) - k_r * r;
    let r_zeta = (-xx * s * c + xy * (c * c - s * s) + yy * s * c) * r + k_zeta / r;
    let r_z = xz * c + yz * s;
    let zeta_z = (-xz * s + yz * c) * r;

    Ok(array![
        [rr, r_zeta, r_z],
        [r_zeta, zeta_zeta, zeta_z],
        [r_z, zeta_z, zz]
    ])
}

/// Antenna angles in radians, TORBEAM sign convention.
///
/// TORBEAM measures the toroidal angle anti-clockwise from the negative
/// X axis and the poloidal angle clockwise from the horizontal. Converted
/// forms:
///
/// | quantity                 | value                          |
/// |--------------------------|--------------------------------|
/// | poloidal rotation angle  | `poloidal + π/2`               |
/// | beam elevation           | `−poloidal`                    |
/// | beam azimuth             | `toroidal + π`                 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchAngles {
    pub toroidal: f64,
    pub poloidal: f64,
}

impl LaunchAngles {
    pub fn from_torbeam_degrees(toroidal_deg: f64, poloidal_deg: f64) -> Self {
        LaunchAngles {
            toroidal: toroidal_deg.to_radians(),
            poloidal: poloidal_deg.to_radians(),
        }
    }

    pub fn poloidal_rotation_angle(&self) -> f64 {
        self.poloidal + FRAC_PI_2
    }

    pub fn beam_elevation(&self) -> f64 {
        -self.poloidal
    }

    pub fn beam_azimuth(&self) -> f64 {
        self.toroidal + PI
    }

    /// Cartesian vector of the given `length` along the beam, for an
    /// antenna sitting at toroidal angle `zeta_launch`.
    pub fn beam_direction(&self, length: f64, zeta_launch: f64) -> [f64; 3] {
        toroidal_to_cartesian(length, self.beam_elevation(), self.beam_azimuth() + zeta_launch)
    }

    /// Launch wavevector of magnitude `k0` in the working coordinates.
    ///
    /// `r_launch` scales K_zeta in cylindrical mode and is ignored in
    /// Cartesian mode.
    pub fn launch_wavevector(
        &self,
        k0: f64,
        coordinate_system: CoordinateSystem,
        r_launch: f64,
    ) -> [f64; 3] {
        let (sin_tor, cos_tor) = self.toroidal.sin_cos();
        let (sin_pol, cos_pol) = self.poloidal.sin_cos();
        let k_0 = -k0 * cos_tor * cos_pol;
        let k_1 = -k0 * sin_tor * cos_pol;
        let k_2 = -k0 * sin_pol;
        match coordinate_system {
            CoordinateSystem::Cylindrical => [k_0, k_1 * r_launch, k_2],
            CoordinateSystem::Cartesian => [k_0, k_1, k_2],
        }
    }
}

/// Orthogonal beam→lab rotation `R = R_pol · R_tor`.
///
/// Beam-frame quantities map to the lab as `Rᵗ·Psi·R`. The third row of
/// R is the propagation direction.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationFrame {
    matrix: Array2<f64>,
}

impl RotationFrame {
    pub fn new(poloidal_rotation_angle: f64, toroidal_angle: f64) -> Self {
        let (sa, ca) = poloidal_rotation_angle.sin_cos();
        let (sp, cp) = toroidal_angle.sin_cos();
        let pol = array![[ca, 0.0, sa], [0.0, 1.0, 0.0], [-sa, 0.0, ca]];
        let tor = array![[cp, sp, 0.0], [-sp, cp, 0.0], [0.0, 0.0, 1.0]];
        RotationFrame {
            matrix: pol.dot(&tor),
        }
    }

    /// Frame for an antenna at toroidal angle `zeta_launch`.
    pub fn from_launch_angles(angles: &LaunchAngles, zeta_launch: f64) -> Self {
        Self::new(angles.poloidal_rotation_angle(), angles.toroidal + zeta_launch)
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// The inverse rotation.
    pub fn transpose(&self) -> Array2<f64> {
        self.matrix.t().to_owned()
    }

    /// `Rᵗ · psi · R`
    pub fn beam_to_lab(&self, psi_beam: &Array2<Complex64>) -> Array2<Complex64> {
        congruence(&self.matrix, psi_beam)
    }

    /// `R · psi · Rᵗ`
    pub fn lab_to_beam(&self, psi_lab: &Array2<Complex64>) -> Array2<Complex64> {
        let r = to_complex(&self.matrix);
        r.dot(psi_lab).dot(&r.t())
    }

    pub fn orthonormality_error(&self) -> f64 {
        orthonormality_error(&self.matrix)
    }

    pub fn propagation_direction(&self) -> [f64; 3] {
        [self.matrix[[2, 0]], self.matrix[[2, 1]], self.matrix[[2, 2]]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &[f64; 3], b: &[f64; 3], tol: f64) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_torbeam_conversion_table() {
        let cases = [
            // (tor°, pol°) -> (tor rad, pol rad, rotation, elevation, azimuth)
            (0.0, 0.0, 0.0, 0.0, FRAC_PI_2, 0.0, PI),
            (90.0, 0.0, FRAC_PI_2, 0.0, FRAC_PI_2, 0.0, 1.5 * PI),
            (0.0, 6.0, 0.0, 6.0_f64.to_radians(), 96.0_f64.to_radians(), -6.0_f64.to_radians(), PI),
            (-10.0, -45.0, -10.0_f64.to_radians(), -0.25 * PI, 0.25 * PI, 0.25 * PI, 170.0_f64.to_radians()),
        ];
        for (tor_deg, pol_deg, tor, pol, rot, elev, azim) in cases {
            let a = LaunchAngles::from_torbeam_degrees(tor_deg, pol_deg);
            assert!((a.toroidal - tor).abs() < 1e-15);
            assert!((a.poloidal - pol).abs() < 1e-15);
            assert!((a.poloidal_rotation_angle() - rot).abs() < 1e-15);
            assert!((a.beam_elevation() - elev).abs() < 1e-15);
            assert!((a.beam_azimuth() - azim).abs() < 1e-14);
        }
    }

    #[test]
    fn test_horizontal_launch_points_inward() {
        let a = LaunchAngles::from_torbeam_degrees(0.0, 0.0);
        let d = a.beam_direction(2.0, 0.0);
        assert!(close(&d, &[-2.0, 0.0, 0.0], 1e-15));
        let k = a.launch_wavevector(100.0, CoordinateSystem::Cylindrical, 2.5);
        assert!(close(&k, &[-100.0, 0.0, 0.0], 1e-12));
    }

    #[test]
    fn test_launch_wavevector_cylindrical_scales_k_zeta() {
        let a = LaunchAngles::from_torbeam_degrees(10.0, 6.0);
        let cart = a.launch_wavevector(50.0, CoordinateSystem::Cartesian, 2.0);
        let cyl = a.launch_wavevector(50.0, CoordinateSystem::Cylindrical, 2.0);
        assert_eq!(cart[0], cyl[0]);
        assert!((cyl[1] - 2.0 * cart[1]).abs() < 1e-12);
        let norm = (cart[0] * cart[0] + cart[1] * cart[1] + cart[2] * cart[2]).sqrt();
        assert!((norm - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_propagation_direction_matches_beam_direction() {
        for (tor, pol, zeta) in [(0.0, 0.0, 0.0), (12.0, -7.0, 0.0), (-30.0, 20.0, 0.4)] {
            let a = LaunchAngles::from_torbeam_degrees(tor, pol);
            let frame = RotationFrame::from_launch_angles(&a, zeta);
            assert!(frame.orthonormality_error() < 1e-14);
            let g = frame.propagation_direction();
            assert!(close(&g, &a.beam_direction(1.0, zeta), 1e-14), "{g:?}");
        }
    }

    #[test]
    fn test_beam_lab_roundtrip() {
        let frame = RotationFrame::new(1.1, -0.3);
        let w = Complex64::new(4.0, 800.0);
        let psi_beam = Array2::from_diag(&array![w, w, Complex64::new(0.0, 0.0)]);
        let lab = frame.beam_to_lab(&psi_beam);
        let back = frame.lab_to_beam(&lab);
        for (a, b) in back.iter().zip(psi_beam.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
        // transverse projector: propagation direction is in the null space
        let g = frame.propagation_direction();
        for i in 0..3 {
            let row: Complex64 = (0..3).map(|j| lab[[i, j]] * g[j]).sum();
            assert!(row.norm() < 1e-12);
        }
    }

    #[test]
    fn test_coordinate_roundtrip() {
        let p = cylindrical_to_cartesian(2.0, 0.3, -0.5);
        let back = cartesian_to_cylindrical(p[0], p[1], p[2]);
        assert!(close(&back, &[2.0, 0.3, -0.5], 1e-15));
    }

    #[test]
    fn test_k_transforms_are_inverse() {
        let pos_cyl = [1.7, 0.45, 0.2];
        let pos_cart = cylindrical_to_cartesian(pos_cyl[0], pos_cyl[1], pos_cyl[2]);
        let k = [-120.0, 35.0, 8.0];
        let k_cart = k_lab_to_cartesian(&k, &pos_cyl);
        let back = k_cartesian_to_lab(&k_cart, &pos_cart);
        assert!(close(&back, &k, 1e-11), "{back:?}");
        // magnitude of the physical wavevector is preserved
        let phys = (k[0] * k[0] + (k[1] / pos_cyl[0]).powi(2) + k[2] * k[2]).sqrt();
        let cart = (k_cart[0] * k_cart[0] + k_cart[1] * k_cart[1] + k_cart[2] * k_cart[2]).sqrt();
        assert!((phys - cart).abs() < 1e-11);
    }

    #[test]
    fn test_psi_cartesian_to_cylindrical_at_zero_zeta() {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let psi = array![
            [c(1.0, 1.0), c(2.0, 0.5), c(3.0, 0.0)],
            [c(2.0, 0.5), c(4.0, 2.0), c(5.0, 0.0)],
            [c(3.0, 0.0), c(5.0, 0.0), c(6.0, 3.0)]
        ];
        let r = 2.0;
        let cyl = psi_cartesian_to_cylindrical(&psi, r, 0.0, -10.0, 4.0).unwrap();
        assert_eq!(cyl[[0, 0]], c(1.0, 1.0));
        assert_eq!(cyl[[1, 1]], c(4.0 * r * r + 10.0 * r, 2.0 * r * r));
        assert_eq!(cyl[[2, 2]], c(6.0, 3.0));
        assert_eq!(cyl[[0, 1]], c(2.0 * r + 4.0 / r, 0.5 * r));
        assert_eq!(cyl[[0, 2]], c(3.0, 0.0));
        assert_eq!(cyl[[1, 2]], c(5.0 * r, 0.0));
        assert_eq!(cyl[[1, 0]], cyl[[0, 1]]);
    }

    #[test]
    fn test_wavenumber() {
        let k0 = angular_frequency_to_wavenumber(2.0 * PI * 55e9);
        assert!((k0 - 1152.7148).abs() < 1e-3, "k0 = {k0}");
    }
}
