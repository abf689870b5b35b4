// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Boundary Field Providers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Normalised poloidal flux used to locate the plasma boundary.
//!
//! Axisymmetric: the flux depends on (R, Z) only.

use beam_math::interp::interp2d;
use beam_types::config::FiniteDifference;
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::{FieldDomain, Grid2D};
use ndarray::Array2;

/// Flux value with its first and second (R, Z) derivatives at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxDerivatives {
    pub psi: f64,
    pub d_r: f64,
    pub d_z: f64,
    pub d_rr: f64,
    pub d_rz: f64,
    pub d_zz: f64,
}

/// Scalar normalised-flux provider.
pub trait BoundaryField {
    fn poloidal_flux(&self, r: f64, z: f64) -> BeamResult<f64>;

    /// Bounding box of the region where the flux is known.
    fn domain(&self) -> FieldDomain;

    /// Central finite differences with the configured spacings.
    fn flux_derivatives(
        &self,
        r: f64,
        z: f64,
        spacing: &FiniteDifference,
    ) -> BeamResult<FluxDerivatives> {
        let (h, k) = (spacing.delta_r, spacing.delta_z);
        let f = |dr: f64, dz: f64| self.poloidal_flux(r + dr, z + dz);

        let f00 = f(0.0, 0.0)?;
        let fp0 = f(h, 0.0)?;
        let fm0 = f(-h, 0.0)?;
        let f0p = f(0.0, k)?;
        let f0m = f(0.0, -k)?;
        let fpp = f(h, k)?;
        let fpm = f(h, -k)?;
        let fmp = f(-h, k)?;
        let fmm = f(-h, -k)?;

        Ok(FluxDerivatives {
            psi: f00,
            d_r: (fp0 - fm0) / (2.0 * h),
            d_z: (f0p - f0m) / (2.0 * k),
            d_rr: (fp0 - 2.0 * f00 + fm0) / (h * h),
            d_rz: (fpp - fpm - fmp + fmm) / (4.0 * h * k),
            d_zz: (f0p - 2.0 * f00 + f0m) / (k * k),
        })
    }
}

impl<T: BoundaryField + ?Sized> BoundaryField for &T {
    fn poloidal_flux(&self, r: f64, z: f64) -> BeamResult<f64> {
        (**self).poloidal_flux(r, z)
    }

    fn domain(&self) -> FieldDomain {
        (**self).domain()
    }

    fn flux_derivatives(
        &self,
        r: f64,
        z: f64,
        spacing: &FiniteDifference,
    ) -> BeamResult<FluxDerivatives> {
        (**self).flux_derivatives(r, z, spacing)
    }
}

/// Concentric circular flux surfaces, `psi = ((R−R0)² + (Z−Z0)²) / a²`.
///
/// psi = 1 on the circle of radius `a`. Derivatives are analytic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularFlux {
    pub r0: f64,
    pub z0: f64,
    pub minor_radius: f64,
    domain: FieldDomain,
}

impl CircularFlux {
    /// Domain defaults to a box of half-width `2a` around the axis.
    pub fn new(r0: f64, z0: f64, minor_radius: f64) -> BeamResult<Self> {
        if !minor_radius.is_finite() || minor_radius <= 0.0 {
            return Err(BeamError::InvalidInput(format!(
                "minor_radius must be finite and > 0, got {minor_radius}"
            )));
        }
        if !r0.is_finite() || !z0.is_finite() || r0 <= minor_radius {
            return Err(BeamError::InvalidInput(format!(
                "magnetic axis must be finite with R0 > a, got R0 = {r0}, a = {minor_radius}"
            )));
        }
        let half = 2.0 * minor_radius;
        Ok(CircularFlux {
            r0,
            z0,
            minor_radius,
            domain: FieldDomain {
                r_min: (r0 - half).max(0.0),
                r_max: r0 + half,
                z_min: z0 - half,
                z_max: z0 + half,
            },
        })
    }

    pub fn with_domain(mut self, domain: FieldDomain) -> Self {
        self.domain = domain;
        self
    }
}

impl BoundaryField for CircularFlux {
    fn poloidal_flux(&self, r: f64, z: f64) -> BeamResult<f64> {
        let a2 = self.minor_radius * self.minor_radius;
        Ok(((r - self.r0).powi(2) + (z - self.z0).powi(2)) / a2)
    }

    fn domain(&self) -> FieldDomain {
        self.domain
    }

    fn flux_derivatives(
        &self,
        r: f64,
        z: f64,
        _spacing: &FiniteDifference,
    ) -> BeamResult<FluxDerivatives> {
        let a2 = self.minor_radius * self.minor_radius;
        Ok(FluxDerivatives {
            psi: self.poloidal_flux(r, z)?,
            d_r: 2.0 * (r - self.r0) / a2,
            d_z: 2.0 * (z - self.z0) / a2,
            d_rr: 2.0 / a2,
            d_rz: 0.0,
            d_zz: 2.0 / a2,
        })
    }
}

/// Flux map tabulated on a `Grid2D`, `values` shaped `[nz, nr]`.
///
/// Off-grid points take the value at the nearest grid edge.
#[derive(Debug, Clone)]
pub struct GriddedFlux {
    grid: Grid2D,
    values: Array2<f64>,
}

impl GriddedFlux {
    pub fn new(grid: Grid2D, values: Array2<f64>) -> BeamResult<Self> {
        if values.dim() != (grid.nz, grid.nr) {
            return Err(BeamError::ShapeMismatch {
                what: "flux map".to_string(),
                expected: format!("({}, {})", grid.nz, grid.nr),
                found: format!("{:?}", values.dim()),
            });
        }
        if grid.nr < 2 || grid.nz < 2 {
            return Err(BeamError::InvalidInput(format!(
                "flux grid needs at least 2 points per axis, got {}x{}",
                grid.nr, grid.nz
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BeamError::InvalidInput(
                "flux map contains non-finite values".to_string(),
            ));
        }
        Ok(GriddedFlux { grid, values })
    }

    /// Tabulate any other provider onto `grid`.
    pub fn sample<F: BoundaryField>(field: &F, grid: Grid2D) -> BeamResult<Self> {
        let mut values = Array2::zeros((grid.nz, grid.nr));
        for iz in 0..grid.nz {
            for ir in 0..grid.nr {
                values[[iz, ir]] = field.poloidal_flux(grid.r[ir], grid.z[iz])?;
            }
        }
        Self::new(grid, values)
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }
}

impl BoundaryField for GriddedFlux {
    fn poloidal_flux(&self, r: f64, z: f64) -> BeamResult<f64> {
        if !r.is_finite() || !z.is_finite() {
            return Err(BeamError::Domain(format!(
                "flux requested at non-finite point (R, Z) = ({r}, {z})"
            )));
        }
        Ok(interp2d(&self.values, &self.grid, r, z))
    }

    fn domain(&self) -> FieldDomain {
        self.grid.domain()
    }
}
