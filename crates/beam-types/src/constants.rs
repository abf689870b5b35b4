// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Number of real slots in one packed beam state.
pub const STATE_LEN: usize = 18;

/// Slot of the first position component (q_R or q_X).
pub const Q_OFFSET: usize = 0;

/// Slot of the first wavevector component (K_R or K_X).
pub const K_OFFSET: usize = 3;

/// Slot of Re(Psi_00); followed by Re of Psi_11, Psi_22, Psi_01, Psi_02, Psi_12.
pub const PSI_RE_OFFSET: usize = 6;

/// Slot of Im(Psi_00); same component order as the real block.
pub const PSI_IM_OFFSET: usize = 12;

/// (row, col) of the six independent Psi entries, in packing order.
pub const PSI_UPPER_TRIANGLE: [(usize, usize); 6] = [(0, 0), (1, 1), (2, 2), (0, 1), (0, 2), (1, 2)];

/// Number of samples along the vacuum ray used to seed the entry search.
pub const ENTRY_SAMPLES: usize = 100;

/// Parameter step used to push the entry point just inside the plasma.
/// Deliberately 1e-10 rather than 1e-8: the secant root is already good to
/// 1e-12, and a coarser step overshoots the boundary by ~1e-8 of the ray.
pub const BOUNDARY_ADJUST: f64 = 1e-10;
