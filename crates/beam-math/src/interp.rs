//! Bicubic (Catmull-Rom) interpolation on Grid2D.
//!
//! Used for tabulated flux maps. Unlike bilinear interpolation the result
//! has a continuous first derivative, which keeps finite-difference
//! gradients of the flux smooth across cell edges.

use beam_types::state::Grid2D;
use ndarray::Array2;

/// Catmull-Rom weights for the four stencil points at fractional offset `t`.
fn catmull_rom_weights(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

/// Interpolated value of `field` (`[nz, nr]`) at `(r, z)`.
///
/// Stencil indices are clamped at the grid edges; points outside the grid
/// are clamped onto it. Grids need at least 2 points per axis.
pub fn interp2d(field: &Array2<f64>, grid: &Grid2D, r: f64, z: f64) -> f64 {
    let fr = ((r - grid.r[0]) / grid.dr).clamp(0.0, (grid.nr - 1) as f64);
    let fz = ((z - grid.z[0]) / grid.dz).clamp(0.0, (grid.nz - 1) as f64);

    let ir = (fr.floor() as usize).min(grid.nr - 2);
    let iz = (fz.floor() as usize).min(grid.nz - 2);
    let wr = catmull_rom_weights(fr - ir as f64);
    let wz = catmull_rom_weights(fz - iz as f64);

    let clamp_r = |k: isize| (ir as isize + k).clamp(0, grid.nr as isize - 1) as usize;
    let clamp_z = |k: isize| (iz as isize + k).clamp(0, grid.nz as isize - 1) as usize;

    let mut value = 0.0;
    for (a, wza) in wz.iter().enumerate() {
        let jz = clamp_z(a as isize - 1);
        let mut row = 0.0;
        for (b, wrb) in wr.iter().enumerate() {
            row += wrb * field[[jz, clamp_r(b as isize - 1)]];
        }
        value += wza * row;
    }
    value
}
