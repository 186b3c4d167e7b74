//! Benchmarks for grid floor-plan generation.
//!
//! Measures the placement search, the reachability filter and the full
//! solver at various program sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_floorplan_grid::{
    distance_field, Boundary2D, CellState, Grid, GridSolver, HouseProgram, Solver, SolverConfig,
};

fn chain_program(n: usize) -> HouseProgram {
    let mut program = HouseProgram::new().with_entrance_point(0.5, 0.5);
    for i in 0..n {
        program = program.with_room(12.0 + (i as f64 * 5.0) % 20.0);
    }
    for id in 1..n {
        program = program.with_adjacency(id, id + 1);
    }
    program
}

fn bench_grid_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_solver");
    group.sample_size(10);

    for &n in &[3, 6, 10] {
        let program = chain_program(n);
        let boundary = Boundary2D::rectangle(30.0, 24.0);
        let solver = GridSolver::new(SolverConfig::new().with_iterations(20).with_seed(42));

        group.bench_with_input(
            BenchmarkId::new("rooms", n),
            &(program, boundary, solver),
            |b, (p, bd, s)| {
                b.iter(|| {
                    let result = s.solve(black_box(p), black_box(bd));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_distance_field(c: &mut Criterion) {
    let mut grid = Grid::new(60, 60);
    for x in 0..60 {
        grid.set(x, 30, CellState::Corridor);
    }
    for y in 0..60 {
        grid.set(30, y, CellState::Corridor);
    }
    c.bench_function("distance_field_60x60", |b| {
        b.iter(|| distance_field(black_box(&grid), black_box((30, 31)), black_box(8.0)))
    });
}

criterion_group!(benches, bench_grid_solver, bench_distance_field);
criterion_main!(benches);
