// ─────────────────────────────────────────────────────────────────────
// SCPN Beam Tracing — Plasma Entry Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use beam_core::entry::BoundaryCrossingFinder;
use beam_core::field::{CircularFlux, GriddedFlux};
use beam_core::geometry::LaunchAngles;
use beam_types::config::CoordinateSystem;
use beam_types::state::Grid2D;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_entry(c: &mut Criterion) {
    let circular = CircularFlux::new(1.5, 0.0, 0.5).expect("valid circular flux");
    let angles = LaunchAngles::from_torbeam_degrees(0.0, 6.0);
    let launch = [2.587, 0.0, -0.0092];
    let mut group = c.benchmark_group("plasma_entry");

    let finder = BoundaryCrossingFinder::new(circular, CoordinateSystem::Cylindrical);
    group.bench_function("circular_analytic", |b| {
        b.iter(|| {
            let entry = finder.find(&launch, &angles, 1.0).expect("beam should enter");
            black_box(entry.tau);
        })
    });

    for &(nr, nz) in &[(65, 65), (257, 257)] {
        let grid = Grid2D::new(nr, nz, 0.5, 2.5, -1.0, 1.0);
        let gridded = GriddedFlux::sample(&circular, grid).expect("sampling should succeed");
        let finder = BoundaryCrossingFinder::new(gridded, CoordinateSystem::Cylindrical);
        group.bench_function(format!("gridded_{}x{}", nr, nz), |b| {
            b.iter(|| {
                let entry = finder.find(&launch, &angles, 1.0).expect("beam should enter");
                black_box(entry.tau);
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_entry);
criterion_main!(benches);
