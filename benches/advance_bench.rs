//! Benchmarks for operator assembly and time stepping.
//!
//! Run with: `cargo bench --bench advance_bench`
//!
//! Add `--features parallel` to measure the rayon cell phase.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dg_advection::boundary::BoundaryTable;
use dg_advection::fe::NodalBasis;
use dg_advection::mesh::QuadMesh;
use dg_advection::operators::OperatorArena;
use dg_advection::solver::Solution;
use dg_advection::time::{AdvectionRhsConfig, advance, ssp_rk3_step};
use dg_advection::wind::UniformWind;

/// Setup a test problem on the unit square.
fn setup_problem(refinements: u32, order: usize) -> (QuadMesh, NodalBasis, OperatorArena, Solution) {
    let mesh = QuadMesh::unit_square(refinements).unwrap();
    let basis = NodalBasis::new(order).unwrap();
    let arena = OperatorArena::build(&mesh, &basis, &UniformWind::new(1.0, 0.5)).unwrap();
    let u = Solution::interpolate(&mesh, &basis, |x, y| (-40.0 * ((x - 0.3).powi(2) + (y - 0.4).powi(2))).exp());
    (mesh, basis, arena, u)
}

/// Benchmark operator assembly.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("operator_build");
    let wind = UniformWind::new(1.0, 0.5);

    for order in [1, 2, 4] {
        let mesh = QuadMesh::unit_square(4).unwrap();
        let basis = NodalBasis::new(order).unwrap();
        group.bench_with_input(BenchmarkId::new("unit_square_16x16", order), &order, |b, _| {
            b.iter(|| OperatorArena::build(black_box(&mesh), &basis, &wind).unwrap())
        });
    }

    group.finish();
}

/// Benchmark one forward-Euler update.
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    let boundaries = BoundaryTable::unit_square_default();

    for (refinements, order) in [(3, 1), (5, 1), (4, 3)] {
        let (mesh, _basis, arena, u) = setup_problem(refinements, order);
        let config = AdvectionRhsConfig::new(&arena, &boundaries);
        let n_cells = mesh.n_cells();

        group.bench_with_input(
            BenchmarkId::new(format!("p{}", order), format!("{}_cells", n_cells)),
            &n_cells,
            |b, _| b.iter(|| advance(black_box(&u), &mesh, &config, 1e-4).unwrap()),
        );
    }

    group.finish();
}

/// Benchmark one SSP-RK3 step.
fn bench_ssp_rk3(c: &mut Criterion) {
    let mut group = c.benchmark_group("ssp_rk3");
    let boundaries = BoundaryTable::unit_square_default();

    let (mesh, _basis, arena, u) = setup_problem(4, 2);
    let config = AdvectionRhsConfig::new(&arena, &boundaries);
    group.bench_function("p2_256_cells", |b| {
        b.iter(|| ssp_rk3_step(black_box(&u), &mesh, &config, 1e-4).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_advance, bench_ssp_rk3);
criterion_main!(benches);
