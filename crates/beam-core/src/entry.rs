// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Plasma Entry Search
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! First crossing of the straight vacuum ray with the plasma boundary.
//!
//! The ray is parameterised as `start + τ·step` for τ in [0, 1], where
//! `|step|` is long enough to cross the whole field domain. The signed
//! flux distance `psi(R, Z) − psi_enter` is sampled, splined, and its first
//! root refined with a secant iteration.

use crate::field::BoundaryField;
use crate::geometry::{cartesian_to_cylindrical, cylindrical_to_cartesian, LaunchAngles};
use beam_math::roots::{golden_section_minimize, secant};
use beam_math::spline::CubicSpline;
use beam_types::config::CoordinateSystem;
use beam_types::constants::{BOUNDARY_ADJUST, ENTRY_SAMPLES};
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::EntryPoint;
use log::debug;

/// Secant absolute tolerance on τ.
const REFINE_XTOL: f64 = 1e-12;
const REFINE_MAX_ITER: usize = 100;
/// Second secant seed, offset from the spline root.
const REFINE_SEED_OFFSET: f64 = 1e-3;
const CLOSEST_APPROACH_XTOL: f64 = 1e-10;
const CLOSEST_APPROACH_MAX_ITER: usize = 200;
const MAX_NUDGES: usize = 100;

/// Straight ray from the antenna, in lab Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamLine {
    pub start: [f64; 3],
    pub step: [f64; 3],
}

impl BeamLine {
    pub fn at(&self, tau: f64) -> [f64; 3] {
        [
            self.start[0] + tau * self.step[0],
            self.start[1] + tau * self.step[1],
            self.start[2] + tau * self.step[2],
        ]
    }

    pub fn length(&self) -> f64 {
        let s = self.step;
        (s[0] * s[0] + s[1] * s[1] + s[2] * s[2]).sqrt()
    }
}

/// Locates where a vacuum ray first reaches a target flux surface.
#[derive(Debug, Clone)]
pub struct BoundaryCrossingFinder<F> {
    field: F,
    coordinate_system: CoordinateSystem,
}

impl<F: BoundaryField> BoundaryCrossingFinder<F> {
    pub fn new(field: F, coordinate_system: CoordinateSystem) -> Self {
        BoundaryCrossingFinder {
            field,
            coordinate_system,
        }
    }

    /// Ray from `launch_position` (working coordinates) along the launch
    /// direction, long enough to traverse the field domain.
    pub fn beam_line(&self, launch_position: &[f64; 3], angles: &LaunchAngles) -> BeamLine {
        let (start, zeta_launch) = match self.coordinate_system {
            CoordinateSystem::Cylindrical => (
                cylindrical_to_cartesian(launch_position[0], launch_position[1], launch_position[2]),
                launch_position[1],
            ),
            CoordinateSystem::Cartesian => (*launch_position, 0.0),
        };
        let domain = self.field.domain();
        let horizontal = start[0].hypot(start[1]) + domain.r_max;
        let vertical = start[2].abs() + domain.z_max.abs().max(domain.z_min.abs());
        let max_length = horizontal.hypot(vertical);
        BeamLine {
            start,
            step: angles.beam_direction(max_length, zeta_launch),
        }
    }

    fn flux_distance(&self, line: &BeamLine, tau: f64, target: f64) -> BeamResult<f64> {
        let p = line.at(tau);
        let [r, _, z] = cartesian_to_cylindrical(p[0], p[1], p[2]);
        Ok(self.field.poloidal_flux(r, z)? - target)
    }

    fn to_working(&self, p: [f64; 3]) -> [f64; 3] {
        match self.coordinate_system {
            CoordinateSystem::Cylindrical => cartesian_to_cylindrical(p[0], p[1], p[2]),
            CoordinateSystem::Cartesian => p,
        }
    }

    /// First point on the ray with `psi <= poloidal_flux_enter`.
    ///
    /// Fails with `BeamMissesPlasma` if the ray never reaches the surface
    /// and with `InvalidInput` if the antenna is already inside it.
    pub fn find(
        &self,
        launch_position: &[f64; 3],
        angles: &LaunchAngles,
        poloidal_flux_enter: f64,
    ) -> BeamResult<EntryPoint> {
        let line = self.beam_line(launch_position, angles);
        let distance = |tau: f64| self.flux_distance(&line, tau, poloidal_flux_enter);

        let at_antenna = distance(0.0)?;
        if at_antenna <= 0.0 {
            return Err(BeamError::InvalidInput(format!(
                "antenna at {launch_position:?} is already inside the flux surface {poloidal_flux_enter} \
                 (flux distance {at_antenna}); launch from vacuum or disable vacuum_launch"
            )));
        }

        let n = ENTRY_SAMPLES;
        let taus: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
        let values = taus
            .iter()
            .map(|&t| distance(t))
            .collect::<BeamResult<Vec<f64>>>()?;
        let spline = CubicSpline::new(&taus, &values).ok_or_else(|| {
            BeamError::Domain("flux along the vacuum ray is not finite".to_string())
        })?;

        let roots = spline.roots();
        let Some(&seed) = roots.first() else {
            return Err(self.closest_approach(&line, &taus, &values, poloidal_flux_enter));
        };

        let refined = secant(
            |t| distance(t),
            seed,
            seed + REFINE_SEED_OFFSET,
            REFINE_XTOL,
            0.0,
            REFINE_MAX_ITER,
        )?;
        if !refined.converged() {
            return Err(BeamError::RootRefinement {
                reason: refined.flag.as_str().to_string(),
            });
        }

        let mut tau = refined.root;
        let mut residual = distance(tau)?;
        let mut nudges = 0;
        while residual > 0.0 {
            if nudges == MAX_NUDGES {
                return Err(BeamError::RootRefinement {
                    reason: format!(
                        "entry point still outside after {MAX_NUDGES} steps (flux distance {residual})"
                    ),
                });
            }
            tau += BOUNDARY_ADJUST;
            residual = distance(tau)?;
            nudges += 1;
        }

        let position = self.to_working(line.at(tau));
        debug!(
            "plasma entry at {:?} (tau = {tau:.6e}, {nudges} nudges, flux distance {residual:.3e})",
            position
        );
        Ok(EntryPoint {
            position,
            tau,
            poloidal_flux: poloidal_flux_enter + residual,
        })
    }

    /// Builds the miss error from the point of closest approach, bracketed
    /// around the best sample.
    fn closest_approach(
        &self,
        line: &BeamLine,
        taus: &[f64],
        values: &[f64],
        target: f64,
    ) -> BeamError {
        let best = values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i);
        let lo = taus[best.saturating_sub(1)];
        let hi = taus[(best + 1).min(taus.len() - 1)];
        let minimum = golden_section_minimize(
            |t| self.flux_distance(line, t, target),
            lo,
            hi,
            CLOSEST_APPROACH_XTOL,
            CLOSEST_APPROACH_MAX_ITER,
        );
        match minimum {
            Ok(m) => {
                let p = line.at(m.x);
                let [r, zeta, z] = cartesian_to_cylindrical(p[0], p[1], p[2]);
                BeamError::BeamMissesPlasma {
                    r,
                    zeta,
                    z,
                    flux_distance: m.fun,
                }
            }
            Err(e) => e,
        }
    }
}
