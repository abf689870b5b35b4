// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Trajectory Hand-off
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Decoded integrator output handed to downstream analysis.

use crate::codec;
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::{BeamState, LaunchConditions};
use ndarray::{Array1, Array2, ArrayView2};

/// Packed initial vector for the integrator.
pub fn initial_state(conditions: &LaunchConditions) -> BeamResult<Array1<f64>> {
    codec::encode_state(&conditions.initial_beam_state())
}

/// Beam states along the ray, one per integrator output point.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub tau: Vec<f64>,
    pub states: Vec<BeamState>,
}

impl Trajectory {
    /// `states` is the integrator's `[18, n]` output at the `n` values of `taus`.
    pub fn from_states(taus: &[f64], states: ArrayView2<f64>) -> BeamResult<Self> {
        if states.ncols() != taus.len() {
            return Err(BeamError::ShapeMismatch {
                what: "trajectory".to_string(),
                expected: format!("[18, {}]", taus.len()),
                found: format!("{:?}", states.dim()),
            });
        }
        Ok(Trajectory {
            tau: taus.to_vec(),
            states: codec::decode_batch(states)?,
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&BeamState> {
        self.states.last()
    }

    /// `[n, 3]` positions.
    pub fn positions(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), 3), |(p, i)| self.states[p].position[i])
    }

    /// `[n, 3]` wavevectors.
    pub fn wavevectors(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), 3), |(p, i)| self.states[p].wavevector[i])
    }
}

/// Launch bundle plus the traced ray, as consumed by post-processing.
#[derive(Debug, Clone)]
pub struct BeamTrace {
    pub launch: LaunchConditions,
    pub trajectory: Trajectory,
}

impl BeamTrace {
    pub fn new(launch: LaunchConditions, trajectory: Trajectory) -> BeamResult<Self> {
        if let Some(first) = trajectory.states.first() {
            if first.position != launch.initial_position {
                return Err(BeamError::InvalidInput(format!(
                    "trajectory starts at {:?}, launch conditions at {:?}",
                    first.position, launch.initial_position
                )));
            }
        }
        Ok(BeamTrace { launch, trajectory })
    }
}
