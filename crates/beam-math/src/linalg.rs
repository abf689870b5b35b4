//! Small dense linear algebra on 3×3 beam matrices.
//!
//! Real rotation matrices, complex symmetric Psi matrices and the complex
//! linear solve used by the plasma-entry boundary conditions.

use beam_types::error::{BeamError, BeamResult};
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Promote a real matrix to complex.
pub fn to_complex(a: &Array2<f64>) -> Array2<Complex64> {
    a.mapv(|v| Complex64::new(v, 0.0))
}

/// `aᵗ · m · a` for a real `a` and complex `m`.
pub fn congruence(a: &Array2<f64>, m: &Array2<Complex64>) -> Array2<Complex64> {
    let ac = to_complex(a);
    ac.t().dot(m).dot(&ac)
}

/// Inverse of a complex 2×2 matrix.
pub fn inverse_2x2(m: &Array2<Complex64>) -> BeamResult<Array2<Complex64>> {
    if m.dim() != (2, 2) {
        return Err(BeamError::ShapeMismatch {
            what: "inverse_2x2".to_string(),
            expected: "(2, 2)".to_string(),
            found: format!("{:?}", m.dim()),
        });
    }
    let det = m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]];
    if det.norm() == 0.0 || !det.is_finite() {
        return Err(BeamError::LinAlg(format!("singular 2x2 matrix, det = {det}")));
    }
    let mut inv = Array2::zeros((2, 2));
    inv[[0, 0]] = m[[1, 1]] / det;
    inv[[0, 1]] = -m[[0, 1]] / det;
    inv[[1, 0]] = -m[[1, 0]] / det;
    inv[[1, 1]] = m[[0, 0]] / det;
    Ok(inv)
}

/// Embed a 2×2 block in the top-left of a 3×3 matrix with zero third row and column.
pub fn embed_2x2(m: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = Array2::zeros((3, 3));
    for i in 0..2 {
        for j in 0..2 {
            out[[i, j]] = m[[i, j]];
        }
    }
    out
}

/// Largest `|m_ij - m_ji|`.
pub fn symmetry_error(m: &Array2<Complex64>) -> f64 {
    let (n, _) = m.dim();
    let mut err = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            err = err.max((m[[i, j]] - m[[j, i]]).norm());
        }
    }
    err
}

/// Largest entry of `|aᵗa - I|`.
pub fn orthonormality_error(a: &Array2<f64>) -> f64 {
    let ata = a.t().dot(a);
    let (n, _) = ata.dim();
    let mut err = 0.0_f64;
    for i in 0..n {
        for j in 0..n {
            let target = if i == j { 1.0 } else { 0.0 };
            err = err.max((ata[[i, j]] - target).abs());
        }
    }
    err
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
pub fn solve_complex(
    mut a: Array2<Complex64>,
    mut b: Array1<Complex64>,
) -> BeamResult<Array1<Complex64>> {
    let n = b.len();
    if a.dim() != (n, n) {
        return Err(BeamError::ShapeMismatch {
            what: "solve_complex".to_string(),
            expected: format!("({n}, {n})"),
            found: format!("{:?}", a.dim()),
        });
    }
    let scale = a.iter().map(|v| v.norm()).fold(0.0_f64, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return Err(BeamError::LinAlg("matrix is zero or non-finite".to_string()));
    }

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].norm().total_cmp(&a[[j, col]].norm()))
            .unwrap_or(col);
        if a[[pivot, col]].norm() <= 1e-14 * scale {
            return Err(BeamError::LinAlg(format!(
                "singular system: no pivot in column {col}"
            )));
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }
        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor.norm() == 0.0 {
                continue;
            }
            for k in col..n {
                let v = a[[col, k]];
                a[[row, k]] -= factor * v;
            }
            let v = b[col];
            b[row] -= factor * v;
        }
    }

    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in (row + 1)..n {
            sum -= a[[row, k]] * x[k];
        }
        x[row] = sum / a[[row, row]];
    }
    Ok(x)
}
