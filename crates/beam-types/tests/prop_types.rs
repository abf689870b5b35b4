// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Property-Based Tests (proptest) for beam-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for beam-types using proptest.
//!
//! Covers: Grid2D construction invariants, flag normalization.

use beam_types::config::{BoundaryCondition, CoordinateSystem, PsiBcFlag};
use beam_types::error::BeamError;
use beam_types::state::Grid2D;
use proptest::prelude::*;

proptest! {
    /// Grid boundary values and domain agree with constructor arguments.
    #[test]
    fn grid_domain_matches(
        nr in 3usize..64,
        nz in 3usize..64,
        r_min in 0.1f64..5.0,
        z_min in -10.0f64..0.0,
    ) {
        let r_max = r_min + 2.0;
        let z_max = z_min + 4.0;
        let grid = Grid2D::new(nr, nz, r_min, r_max, z_min, z_max);
        let domain = grid.domain();

        prop_assert_eq!(grid.r.len(), nr);
        prop_assert_eq!(grid.z.len(), nz);
        prop_assert!((domain.r_min - r_min).abs() < 1e-12);
        prop_assert!((domain.r_max - r_max).abs() < 1e-12);
        prop_assert!((domain.z_min - z_min).abs() < 1e-12);
        prop_assert!((domain.z_max - z_max).abs() < 1e-12);
    }

    /// Any name outside the accepted set is a configuration error naming the value.
    #[test]
    fn unknown_bc_names_rejected(name in "[a-z]{1,12}") {
        prop_assume!(!["none", "continuous", "discontinuous"].contains(&name.as_str()));
        let flag = PsiBcFlag::Named(name.clone());
        match BoundaryCondition::from_flag(Some(&flag)) {
            Err(BeamError::Config { value, .. }) => prop_assert!(value.contains(&name)),
            other => prop_assert!(false, "expected config error, got {:?}", other),
        }
    }

    /// Coordinate flags other than the two recognised values are rejected.
    #[test]
    fn unknown_coordinate_names_rejected(name in "[a-z]{1,12}") {
        prop_assume!(name != "cylindrical" && name != "cartesian");
        prop_assert!(name.parse::<CoordinateSystem>().is_err());
    }
}

#[test]
fn canonical_names_roundtrip() {
    for bc in [
        BoundaryCondition::None,
        BoundaryCondition::Continuous,
        BoundaryCondition::Discontinuous,
    ] {
        assert_eq!(bc.as_str().parse::<BoundaryCondition>().unwrap(), bc);
    }
    for cs in [CoordinateSystem::Cylindrical, CoordinateSystem::Cartesian] {
        assert_eq!(cs.to_string().parse::<CoordinateSystem>().unwrap(), cs);
    }
}
