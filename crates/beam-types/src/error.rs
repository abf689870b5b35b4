// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamError {
    #[error("Configuration error: unexpected value for `{parameter}` ({value}), expected one of {accepted}")]
    Config {
        parameter: String,
        value: String,
        accepted: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "Beam does not hit plasma. Closest point is at (R={r}, zeta={zeta}, Z={z}), \
         distance in poloidal flux to boundary={flux_distance}"
    )]
    BeamMissesPlasma {
        r: f64,
        zeta: f64,
        z: f64,
        flux_distance: f64,
    },

    #[error("Could not find plasma boundary, root finding failed with '{reason}'")]
    RootRefinement { reason: String },

    #[error("Point outside provider domain: {0}")]
    Domain(String),

    #[error("Shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: String,
        found: String,
    },

    #[error("Linear algebra error: {0}")]
    LinAlg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BeamError {
    /// Configuration error for a flag that only accepts a closed set of values.
    pub fn config(parameter: &str, value: impl std::fmt::Display, accepted: &[&str]) -> Self {
        BeamError::Config {
            parameter: parameter.to_string(),
            value: value.to_string(),
            accepted: accepted.join(", "),
        }
    }
}

pub type BeamResult<T> = Result<T, BeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_accepted_values() {
        let err = BeamError::config("coordinate_system", "polar", &["'cylindrical'", "'cartesian'"]);
        let msg = err.to_string();
        assert!(msg.contains("polar"), "{msg}");
        assert!(msg.contains("'cylindrical', 'cartesian'"), "{msg}");
    }

    #[test]
    fn test_miss_error_reports_closest_approach() {
        let err = BeamError::BeamMissesPlasma {
            r: 2.5,
            zeta: 0.0,
            z: 0.1,
            flux_distance: 0.3,
        };
        let msg = err.to_string();
        assert!(msg.contains("R=2.5"));
        assert!(msg.contains("distance in poloidal flux to boundary=0.3"));
    }
}
