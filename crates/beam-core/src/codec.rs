// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — State Codec
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Flat real-valued state layout for the ODE integrator.
//!
//! | slots  | content                                         |
//! |--------|-------------------------------------------------|
//! | 0..3   | q_0, q_1, q_2                                   |
//! | 3..6   | K_0, K_1, K_2                                   |
//! | 6..12  | Re Psi_00, Psi_11, Psi_22, Psi_01, Psi_02, Psi_12 |
//! | 12..18 | Im Psi_00, Psi_11, Psi_22, Psi_01, Psi_02, Psi_12 |
//!
//! Batched states are `[18, n]` with the slot on the leading axis.

use beam_types::constants::{K_OFFSET, PSI_IM_OFFSET, PSI_RE_OFFSET, PSI_UPPER_TRIANGLE, Q_OFFSET, STATE_LEN};
use beam_types::error::{BeamError, BeamResult};
use beam_types::state::BeamState;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayView3, ArrayViewMut1};
use num_complex::Complex64;

fn shape_error(what: &str, expected: String, found: String) -> BeamError {
    BeamError::ShapeMismatch {
        what: what.to_string(),
        expected,
        found,
    }
}

fn write_slots(
    mut out: ArrayViewMut1<f64>,
    position: &[f64; 3],
    wavevector: &[f64; 3],
    psi: impl Fn(usize, usize) -> Complex64,
) {
    for i in 0..3 {
        out[Q_OFFSET + i] = position[i];
        out[K_OFFSET + i] = wavevector[i];
    }
    for (slot, &(i, j)) in PSI_UPPER_TRIANGLE.iter().enumerate() {
        let value = psi(i, j);
        out[PSI_RE_OFFSET + slot] = value.re;
        out[PSI_IM_OFFSET + slot] = value.im;
    }
}

fn read_slots(state: ArrayView1<f64>) -> BeamState {
    let position = [state[Q_OFFSET], state[Q_OFFSET + 1], state[Q_OFFSET + 2]];
    let wavevector = [state[K_OFFSET], state[K_OFFSET + 1], state[K_OFFSET + 2]];
    let mut psi = Array2::zeros((3, 3));
    for (slot, &(i, j)) in PSI_UPPER_TRIANGLE.iter().enumerate() {
        let value = Complex64::new(state[PSI_RE_OFFSET + slot], state[PSI_IM_OFFSET + slot]);
        psi[[i, j]] = value;
        psi[[j, i]] = value;
    }
    BeamState {
        position,
        wavevector,
        psi,
    }
}

/// Pack one ray point. Only the upper triangle of `psi` is read.
pub fn encode(
    position: &[f64; 3],
    wavevector: &[f64; 3],
    psi: &Array2<Complex64>,
) -> BeamResult<Array1<f64>> {
    if psi.dim() != (3, 3) {
        return Err(shape_error("Psi", "(3, 3)".to_string(), format!("{:?}", psi.dim())));
    }
    let mut out = Array1::zeros(STATE_LEN);
    write_slots(out.view_mut(), position, wavevector, |i, j| psi[[i, j]]);
    Ok(out)
}

pub fn encode_state(state: &BeamState) -> BeamResult<Array1<f64>> {
    encode(&state.position, &state.wavevector, &state.psi)
}

/// Unpack one ray point; Psi is rebuilt exactly symmetric from the upper triangle.
pub fn decode(state: ArrayView1<f64>) -> BeamResult<BeamState> {
    if state.len() != STATE_LEN {
        return Err(shape_error(
            "state vector",
            format!("[{STATE_LEN}]"),
            format!("[{}]", state.len()),
        ));
    }
    Ok(read_slots(state))
}

/// Pack `n` ray points into `[18, n]`.
///
/// `positions` and `wavevectors` are `[n, 3]`, `psi` is `[n, 3, 3]`.
pub fn encode_batch(
    positions: ArrayView2<f64>,
    wavevectors: ArrayView2<f64>,
    psi: ArrayView3<Complex64>,
) -> BeamResult<Array2<f64>> {
    let n = positions.nrows();
    if positions.dim() != (n, 3) {
        return Err(shape_error("positions", format!("({n}, 3)"), format!("{:?}", positions.dim())));
    }
    if wavevectors.dim() != (n, 3) {
        return Err(shape_error(
            "wavevectors",
            format!("({n}, 3)"),
            format!("{:?}", wavevectors.dim()),
        ));
    }
    if psi.dim() != (n, 3, 3) {
        return Err(shape_error("Psi", format!("({n}, 3, 3)"), format!("{:?}", psi.dim())));
    }

    let mut out = Array2::zeros((STATE_LEN, n));
    for p in 0..n {
        let q = [positions[[p, 0]], positions[[p, 1]], positions[[p, 2]]];
        let k = [wavevectors[[p, 0]], wavevectors[[p, 1]], wavevectors[[p, 2]]];
        write_slots(out.column_mut(p), &q, &k, |i, j| psi[[p, i, j]]);
    }
    Ok(out)
}

/// Unpack a `[18, n]` batch into per-point states.
pub fn decode_batch(states: ArrayView2<f64>) -> BeamResult<Vec<BeamState>> {
    if states.nrows() != STATE_LEN {
        return Err(shape_error(
            "state batch",
            format!("[{STATE_LEN}, n]"),
            format!("{:?}", states.dim()),
        ));
    }
    Ok(states.columns().into_iter().map(read_slots).collect())
}
