// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Rectangular (R, Z) region on which a flux map is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDomain {
    pub r_min: f64,
    pub r_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl FieldDomain {
    pub fn contains(&self, r: f64, z: f64) -> bool {
        r >= self.r_min && r <= self.r_max && z >= self.z_min && z <= self.z_max
    }
}

/// 2D (R, Z) grid for tabulated flux maps.
/// Field arrays on this grid are indexed `[iz, ir]`.
#[derive(Debug, Clone)]
pub struct Grid2D {
    pub nr: usize,
    pub nz: usize,
    pub r: Array1<f64>, // linspace(R_min, R_max, nr)
    pub z: Array1<f64>, // linspace(Z_min, Z_max, nz)
    pub dr: f64,
    pub dz: f64,
}

impl Grid2D {
    pub fn new(nr: usize, nz: usize, r_min: f64, r_max: f64, z_min: f64, z_max: f64) -> Self {
        let r = Array1::linspace(r_min, r_max, nr);
        let z = Array1::linspace(z_min, z_max, nz);
        let dr = if nr > 1 { r[1] - r[0] } else { r_max - r_min };
        let dz = if nz > 1 { z[1] - z[0] } else { z_max - z_min };
        Grid2D { nr, nz, r, z, dr, dz }
    }

    pub fn domain(&self) -> FieldDomain {
        FieldDomain {
            r_min: self.r[0],
            r_max: self.r[self.nr - 1],
            z_min: self.z[0],
            z_max: self.z[self.nz - 1],
        }
    }

    /// Tabulate `f(R, Z)` on the grid, `[nz, nr]`.
    pub fn tabulate<F: Fn(f64, f64) -> f64>(&self, f: F) -> Array2<f64> {
        Array2::from_shape_fn((self.nz, self.nr), |(iz, ir)| f(self.r[ir], self.z[iz]))
    }
}

/// Physical beam state at one point along the ray.
///
/// `psi` is the complex symmetric 3×3 beam matrix in the working coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamState {
    pub position: [f64; 3],
    pub wavevector: [f64; 3],
    pub psi: Array2<Complex64>,
}

/// Where the straight vacuum ray first crosses the plasma boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryPoint {
    /// Entry coordinates in the working coordinate system.
    pub position: [f64; 3],
    /// Ray parameter of the crossing, normalized to [0, 1] over the search length.
    pub tau: f64,
    /// Boundary flux at the entry point.
    pub poloidal_flux: f64,
}

/// Everything the integrator and the downstream analysis need about the launch.
#[derive(Debug, Clone)]
pub struct LaunchConditions {
    /// Wavevector just inside the plasma.
    pub k_initial: [f64; 3],
    /// Entry position (launch position if no vacuum propagation was done).
    pub initial_position: [f64; 3],
    /// Wavevector at the antenna.
    pub launch_k: [f64; 3],
    /// Psi just inside the plasma, after the boundary conditions.
    pub psi_initial: Array2<Complex64>,
    /// Psi at the antenna, working coordinates.
    pub psi_launch: Array2<Complex64>,
    /// Psi at the entry point before boundary conditions; `None` when not computed.
    pub psi_entry: Option<Array2<Complex64>>,
    /// Psi at the entry point in lab Cartesian coordinates; `None` when not computed.
    pub psi_entry_cartesian: Option<Array2<Complex64>>,
    /// Straight-line vacuum distance from antenna to entry; `None` when not computed.
    pub distance_from_launch_to_entry: Option<f64>,
}

impl LaunchConditions {
    pub fn initial_beam_state(&self) -> BeamState {
        BeamState {
            position: self.initial_position,
            wavevector: self.k_initial,
            psi: self.psi_initial.clone(),
        }
    }
}
