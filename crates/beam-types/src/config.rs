// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{BeamError, BeamResult};

/// Coordinate representation used for position, wavevector and Psi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// (R, zeta, Z) with conjugate momenta (K_R, K_zeta, K_Z).
    Cylindrical,
    /// (X, Y, Z) with conjugate momenta (K_X, K_Y, K_Z).
    Cartesian,
}

impl CoordinateSystem {
    pub const ACCEPTED: [&'static str; 2] = ["'cylindrical'", "'cartesian'"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateSystem::Cylindrical => "cylindrical",
            CoordinateSystem::Cartesian => "cartesian",
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = BeamError;

    fn from_str(value: &str) -> BeamResult<Self> {
        match value {
            "cylindrical" => Ok(CoordinateSystem::Cylindrical),
            "cartesian" => Ok(CoordinateSystem::Cartesian),
            other => Err(BeamError::config(
                "flag_coordinate_system",
                format!("'{other}'"),
                &Self::ACCEPTED,
            )),
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment of Psi (and K) where the beam crosses into the plasma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCondition {
    /// No special treatment at the plasma-vacuum boundary.
    None,
    /// Continuous n_e with a discontinuous gradient of n_e.
    Continuous,
    /// Discontinuous n_e.
    Discontinuous,
}

impl BoundaryCondition {
    pub const ACCEPTED: [&'static str; 3] = ["None", "'continuous'", "'discontinuous'"];

    /// Normalize a raw flag from configuration.
    ///
    /// Legacy booleans are still accepted: `true` maps to `Continuous`,
    /// `false` to `None`, each with a deprecation warning.
    pub fn from_flag(flag: Option<&PsiBcFlag>) -> BeamResult<Self> {
        match flag {
            None => Ok(BoundaryCondition::None),
            Some(PsiBcFlag::Legacy(true)) => {
                warn!(
                    "Boolean `Psi_BC_flag` is deprecated, please use None, 'continuous', or \
                     'discontinuous'; setting Psi_BC_flag = 'continuous' for backward compatibility"
                );
                Ok(BoundaryCondition::Continuous)
            }
            Some(PsiBcFlag::Legacy(false)) => {
                warn!(
                    "Boolean `Psi_BC_flag` is deprecated, please use None, 'continuous', or \
                     'discontinuous'; setting Psi_BC_flag = None for backward compatibility"
                );
                Ok(BoundaryCondition::None)
            }
            Some(PsiBcFlag::Named(name)) => name.parse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryCondition::None => "none",
            BoundaryCondition::Continuous => "continuous",
            BoundaryCondition::Discontinuous => "discontinuous",
        }
    }
}

impl FromStr for BoundaryCondition {
    type Err = BeamError;

    fn from_str(value: &str) -> BeamResult<Self> {
        match value {
            "none" | "None" => Ok(BoundaryCondition::None),
            "continuous" => Ok(BoundaryCondition::Continuous),
            "discontinuous" => Ok(BoundaryCondition::Discontinuous),
            other => Err(BeamError::config(
                "Psi_BC_flag",
                format!("'{other}'"),
                &Self::ACCEPTED,
            )),
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `Psi_BC_flag` as written in a JSON config: a name or a legacy boolean.
/// `null` is represented by the surrounding `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PsiBcFlag {
    Legacy(bool),
    Named(String),
}

impl From<&str> for PsiBcFlag {
    fn from(name: &str) -> Self {
        PsiBcFlag::Named(name.to_string())
    }
}

impl From<bool> for PsiBcFlag {
    fn from(value: bool) -> Self {
        PsiBcFlag::Legacy(value)
    }
}

/// Antenna pose and beam parameters at launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchGeometry {
    /// Toroidal launch angle, TORBEAM convention [deg].
    pub toroidal_launch_angle_torbeam: f64,
    /// Poloidal launch angle, TORBEAM convention [deg].
    pub poloidal_launch_angle_torbeam: f64,
    /// 1/e² beam width at the antenna [m].
    pub launch_beam_width: f64,
    /// Phase-front curvature at the antenna [1/m].
    pub launch_beam_curvature: f64,
    /// Antenna position, (R, zeta, Z) or (X, Y, Z) depending on the coordinate system.
    pub launch_position: [f64; 3],
    /// Angular frequency of the probe beam [rad/s].
    pub launch_angular_frequency: f64,
    /// Normalised poloidal flux label of the plasma boundary.
    #[serde(default = "default_poloidal_flux_enter")]
    pub poloidal_flux_enter: f64,
}

fn default_poloidal_flux_enter() -> f64 {
    1.0
}

impl LaunchGeometry {
    pub fn validate(&self) -> BeamResult<()> {
        let angles = [
            self.toroidal_launch_angle_torbeam,
            self.poloidal_launch_angle_torbeam,
            self.launch_beam_curvature,
            self.poloidal_flux_enter,
        ];
        if angles.iter().any(|v| !v.is_finite()) {
            return Err(BeamError::InvalidInput(
                "launch angles, curvature and poloidal_flux_enter must be finite".to_string(),
            ));
        }
        if !self.launch_beam_width.is_finite() || self.launch_beam_width <= 0.0 {
            return Err(BeamError::InvalidInput(format!(
                "launch_beam_width must be finite and > 0, got {}",
                self.launch_beam_width
            )));
        }
        if !self.launch_angular_frequency.is_finite() || self.launch_angular_frequency <= 0.0 {
            return Err(BeamError::InvalidInput(format!(
                "launch_angular_frequency must be finite and > 0, got {}",
                self.launch_angular_frequency
            )));
        }
        if self.launch_position.iter().any(|v| !v.is_finite()) {
            return Err(BeamError::InvalidInput(format!(
                "launch_position must be finite, got {:?}",
                self.launch_position
            )));
        }
        Ok(())
    }
}

/// Finite-difference spacings handed to numerical derivatives of the flux.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiniteDifference {
    #[serde(default = "default_delta_r")]
    pub delta_r: f64,
    #[serde(default = "default_delta_z")]
    pub delta_z: f64,
}

fn default_delta_r() -> f64 {
    -1e-4
}
fn default_delta_z() -> f64 {
    1e-4
}

impl Default for FiniteDifference {
    fn default() -> Self {
        FiniteDifference {
            delta_r: default_delta_r(),
            delta_z: default_delta_z(),
        }
    }
}

/// Launch configuration as read from JSON. Flags are kept raw here and
/// normalized once by [`LaunchConfig::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub geometry: LaunchGeometry,
    #[serde(default = "default_coordinate_system")]
    pub flag_coordinate_system: String,
    #[serde(rename = "Psi_BC_flag", default = "default_psi_bc_flag")]
    pub psi_bc_flag: Option<PsiBcFlag>,
    #[serde(default = "default_true")]
    pub vacuum_launch: bool,
    #[serde(default = "default_true")]
    pub vacuum_propagation: bool,
    #[serde(flatten)]
    pub spacing: FiniteDifference,
}

fn default_coordinate_system() -> String {
    "cylindrical".to_string()
}
fn default_psi_bc_flag() -> Option<PsiBcFlag> {
    Some(PsiBcFlag::Named("continuous".to_string()))
}
fn default_true() -> bool {
    true
}

/// Validated, closed-enum form of the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSettings {
    pub coordinate_system: CoordinateSystem,
    pub boundary_condition: BoundaryCondition,
    pub vacuum_launch: bool,
    pub vacuum_propagation: bool,
    pub spacing: FiniteDifference,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        LaunchSettings {
            coordinate_system: CoordinateSystem::Cylindrical,
            boundary_condition: BoundaryCondition::Continuous,
            vacuum_launch: true,
            vacuum_propagation: true,
            spacing: FiniteDifference::default(),
        }
    }
}

impl LaunchConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> BeamResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Normalize the raw flags. Runs before any geometry is computed.
    pub fn resolve(&self) -> BeamResult<LaunchSettings> {
        let coordinate_system: CoordinateSystem = self.flag_coordinate_system.parse()?;
        let boundary_condition = BoundaryCondition::from_flag(self.psi_bc_flag.as_ref())?;
        for (name, delta) in [("delta_R", self.spacing.delta_r), ("delta_Z", self.spacing.delta_z)] {
            if !delta.is_finite() || delta == 0.0 {
                return Err(BeamError::InvalidInput(format!(
                    "{name} must be finite and non-zero, got {delta}"
                )));
            }
        }
        Ok(LaunchSettings {
            coordinate_system,
            boundary_condition,
            vacuum_launch: self.vacuum_launch,
            vacuum_propagation: self.vacuum_propagation,
            spacing: self.spacing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mast_like_json(extra: &str) -> String {
        format!(
            r#"{{
                "geometry": {{
                    "toroidal_launch_angle_torbeam": 0.0,
                    "poloidal_launch_angle_torbeam": 6.0,
                    "launch_beam_width": 0.04,
                    "launch_beam_curvature": -0.25,
                    "launch_position": [2.587, 0.0, -0.0092],
                    "launch_angular_frequency": 3.267e11
                }}{extra}
            }}"#
        )
    }

    #[test]
    fn test_parse_defaults() {
        let cfg: LaunchConfig = serde_json::from_str(&mast_like_json("")).unwrap();
        assert!((cfg.geometry.poloidal_flux_enter - 1.0).abs() < 1e-15);
        assert!((cfg.spacing.delta_r + 1e-4).abs() < 1e-15);
        let settings = cfg.resolve().unwrap();
        assert_eq!(settings.coordinate_system, CoordinateSystem::Cylindrical);
        assert_eq!(settings.boundary_condition, BoundaryCondition::Continuous);
        assert!(settings.vacuum_propagation);
    }

    #[test]
    fn test_parse_named_and_null_flags() {
        let cfg: LaunchConfig =
            serde_json::from_str(&mast_like_json(r#", "Psi_BC_flag": "discontinuous""#)).unwrap();
        assert_eq!(
            cfg.resolve().unwrap().boundary_condition,
            BoundaryCondition::Discontinuous
        );

        let cfg: LaunchConfig =
            serde_json::from_str(&mast_like_json(r#", "Psi_BC_flag": null"#)).unwrap();
        assert_eq!(cfg.resolve().unwrap().boundary_condition, BoundaryCondition::None);
    }

    #[test]
    fn test_legacy_boolean_flags_map_to_canonical_values() {
        let cfg: LaunchConfig =
            serde_json::from_str(&mast_like_json(r#", "Psi_BC_flag": true"#)).unwrap();
        assert_eq!(cfg.psi_bc_flag, Some(PsiBcFlag::Legacy(true)));
        assert_eq!(
            cfg.resolve().unwrap().boundary_condition,
            BoundaryCondition::Continuous
        );
        assert_eq!(
            BoundaryCondition::from_flag(Some(&PsiBcFlag::Legacy(false))).unwrap(),
            BoundaryCondition::None
        );
    }

    #[test]
    fn test_bogus_flags_rejected() {
        let err = BoundaryCondition::from_flag(Some(&"bogus".into())).unwrap_err();
        match err {
            BeamError::Config { parameter, value, accepted } => {
                assert_eq!(parameter, "Psi_BC_flag");
                assert_eq!(value, "'bogus'");
                assert!(accepted.contains("'discontinuous'"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = "toroidal".parse::<CoordinateSystem>().unwrap_err();
        assert!(err.to_string().contains("'cylindrical', 'cartesian'"));
    }

    #[test]
    fn test_invalid_spacing() {
        let cfg: LaunchConfig =
            serde_json::from_str(&mast_like_json(r#", "delta_z": 0.0"#)).unwrap();
        assert!(cfg.resolve().is_err());
    }

    #[test]
    fn test_geometry_validation() {
        let cfg: LaunchConfig = serde_json::from_str(&mast_like_json("")).unwrap();
        assert!(cfg.geometry.validate().is_ok());

        let mut geometry = cfg.geometry.clone();
        geometry.launch_beam_width = 0.0;
        assert!(geometry.validate().is_err());

        let mut geometry = cfg.geometry;
        geometry.launch_position[2] = f64::NAN;
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg: LaunchConfig =
            serde_json::from_str(&mast_like_json(r#", "flag_coordinate_system": "cartesian""#))
                .unwrap();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: LaunchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.flag_coordinate_system, cfg2.flag_coordinate_system);
        assert_eq!(cfg.psi_bc_flag, cfg2.psi_bc_flag);
        assert_eq!(cfg.geometry.launch_position, cfg2.geometry.launch_position);
    }
}
