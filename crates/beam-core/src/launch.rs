// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Launch Conditions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Antenna → plasma initial conditions.
//!
//! 1. TORBEAM angles → launch K and the beam→lab rotation.
//! 2. Antenna Psi in the beam frame, rotated into the lab.
//! 3. Straight vacuum ray to the boundary flux surface.
//! 4. Free-space propagation of Psi over that distance.
//! 5. Boundary condition at the plasma edge.

use crate::boundary::{apply_boundary_condition, VacuumSide};
use crate::dispersion::DispersionProvider;
use crate::entry::BoundaryCrossingFinder;
use crate::field::BoundaryField;
use crate::geometry::{
    angular_frequency_to_wavenumber, cylindrical_to_cartesian, k_cartesian_to_lab,
    k_lab_to_cartesian, psi_cartesian_to_cylindrical, LaunchAngles, RotationFrame,
};
use crate::vacuum::{launch_beam_matrix, propagate};
use beam_math::linalg::embed_2x2;
use beam_types::config::{CoordinateSystem, LaunchConfig, LaunchGeometry, LaunchSettings};
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::{EntryPoint, LaunchConditions};
use log::debug;
use ndarray::Array2;
use num_complex::Complex64;

/// Builds [`LaunchConditions`] from the antenna geometry.
///
/// Flags are resolved before construction, so an invalid coordinate system
/// or boundary-condition value never reaches the field or dispersion
/// providers.
#[derive(Debug, Clone)]
pub struct LaunchConditionBuilder<F, D> {
    geometry: LaunchGeometry,
    settings: LaunchSettings,
    field: F,
    dispersion: D,
}

/// Straight-line distance between two cylindrical points.
///
/// The radicand can round slightly negative for coincident points; it is
/// clamped at zero.
fn law_of_cosines_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let radicand = a[0] * a[0] + b[0] * b[0] - 2.0 * a[0] * b[0] * (b[1] - a[1]).cos()
        + (a[2] - b[2]).powi(2);
    radicand.max(0.0).sqrt()
}

impl<F: BoundaryField, D: DispersionProvider> LaunchConditionBuilder<F, D> {
    pub fn new(
        geometry: LaunchGeometry,
        settings: LaunchSettings,
        field: F,
        dispersion: D,
    ) -> BeamResult<Self> {
        geometry.validate()?;
        if settings.coordinate_system == CoordinateSystem::Cylindrical
            && geometry.launch_position[0] <= 0.0
        {
            return Err(BeamError::InvalidInput(format!(
                "cylindrical launch needs R > 0, got R = {}",
                geometry.launch_position[0]
            )));
        }
        Ok(LaunchConditionBuilder {
            geometry,
            settings,
            field,
            dispersion,
        })
    }

    pub fn from_config(config: &LaunchConfig, field: F, dispersion: D) -> BeamResult<Self> {
        let settings = config.resolve()?;
        Self::new(config.geometry.clone(), settings, field, dispersion)
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    pub fn angles(&self) -> LaunchAngles {
        LaunchAngles::from_torbeam_degrees(
            self.geometry.toroidal_launch_angle_torbeam,
            self.geometry.poloidal_launch_angle_torbeam,
        )
    }

    pub fn wavenumber(&self) -> f64 {
        angular_frequency_to_wavenumber(self.geometry.launch_angular_frequency)
    }

    fn zeta_launch(&self) -> f64 {
        match self.settings.coordinate_system {
            CoordinateSystem::Cylindrical => self.geometry.launch_position[1],
            CoordinateSystem::Cartesian => 0.0,
        }
    }

    /// Lab-Cartesian Psi → working coordinates at `position` with wavevector `k`.
    fn to_working_psi(
        &self,
        psi_cartesian: &Array2<Complex64>,
        position: &[f64; 3],
        k: &[f64; 3],
    ) -> BeamResult<Array2<Complex64>> {
        match self.settings.coordinate_system {
            CoordinateSystem::Cylindrical => {
                psi_cartesian_to_cylindrical(psi_cartesian, position[0], position[1], k[0], k[1])
            }
            CoordinateSystem::Cartesian => Ok(psi_cartesian.clone()),
        }
    }

    fn launch_to_entry_distance(&self, entry: &EntryPoint) -> f64 {
        let l = self.geometry.launch_position;
        let e = entry.position;
        match self.settings.coordinate_system {
            CoordinateSystem::Cylindrical => law_of_cosines_distance(&l, &e),
            CoordinateSystem::Cartesian => {
                ((l[0] - e[0]).powi(2) + (l[1] - e[1]).powi(2) + (l[2] - e[2]).powi(2)).sqrt()
            }
        }
    }

    /// Vacuum K carried from the antenna to `entry`.
    fn entry_wavevector(&self, launch_k: &[f64; 3], entry: &EntryPoint) -> [f64; 3] {
        match self.settings.coordinate_system {
            CoordinateSystem::Cylindrical => {
                let k_cartesian = k_lab_to_cartesian(launch_k, &self.geometry.launch_position);
                let e = entry.position;
                k_cartesian_to_lab(&k_cartesian, &cylindrical_to_cartesian(e[0], e[1], e[2]))
            }
            CoordinateSystem::Cartesian => *launch_k,
        }
    }

    pub fn build(&self) -> BeamResult<LaunchConditions> {
        let coordinate_system = self.settings.coordinate_system;
        let launch_position = self.geometry.launch_position;
        let angles = self.angles();
        let k0 = self.wavenumber();
        let launch_k = angles.launch_wavevector(k0, coordinate_system, launch_position[0]);
        debug!(
            "K0 = {k0:.6e} /m, poloidal rotation angle = {:.6} rad, launch K = {launch_k:?}",
            angles.poloidal_rotation_angle()
        );

        let frame = RotationFrame::from_launch_angles(&angles, self.zeta_launch());
        let psi_w_launch = launch_beam_matrix(
            k0,
            self.geometry.launch_beam_width,
            self.geometry.launch_beam_curvature,
        );
        let psi_lab_launch_cartesian = frame.beam_to_lab(&embed_2x2(&psi_w_launch));
        let psi_launch =
            self.to_working_psi(&psi_lab_launch_cartesian, &launch_position, &launch_k)?;

        if !self.settings.vacuum_propagation || !self.settings.vacuum_launch {
            debug!("vacuum propagation skipped, launch quantities used as initial conditions");
            return Ok(LaunchConditions {
                k_initial: launch_k,
                initial_position: launch_position,
                launch_k,
                psi_initial: psi_launch.clone(),
                psi_launch,
                psi_entry: None,
                psi_entry_cartesian: None,
                distance_from_launch_to_entry: None,
            });
        }

        let entry = BoundaryCrossingFinder::new(&self.field, coordinate_system).find(
            &launch_position,
            &angles,
            self.geometry.poloidal_flux_enter,
        )?;
        let distance = self.launch_to_entry_distance(&entry);
        debug!("entry point {:?}, {distance:.6} m from the antenna", entry.position);

        let psi_w_entry = propagate(&psi_w_launch, distance, k0)?;
        let psi_entry_cartesian = frame.beam_to_lab(&embed_2x2(&psi_w_entry));
        let k_entry = self.entry_wavevector(&launch_k, &entry);
        let psi_entry = self.to_working_psi(&psi_entry_cartesian, &entry.position, &k_entry)?;

        let plasma = apply_boundary_condition(
            self.settings.boundary_condition,
            &self.field,
            &self.dispersion,
            coordinate_system,
            &self.settings.spacing,
            &VacuumSide {
                position: entry.position,
                wavevector: k_entry,
                psi: &psi_entry,
            },
        )?;

        Ok(LaunchConditions {
            k_initial: plasma.wavevector,
            initial_position: entry.position,
            launch_k,
            psi_initial: plasma.psi,
            psi_launch,
            psi_entry: Some(psi_entry),
            psi_entry_cartesian: Some(psi_entry_cartesian),
            distance_from_launch_to_entry: Some(distance),
        })
    }
}
