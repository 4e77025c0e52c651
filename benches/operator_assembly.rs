//! Benchmarks for sparse operator assembly: the real mu-side operators and
//! the link-phase-carrying complex psi-side operators.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tdgl::mesh::Mesh;
use tdgl::operators::{self, OperatorConfig, OperatorKind};

fn grid_mesh(n: usize) -> Mesh {
    let verts = n + 1;
    let mut x = Vec::with_capacity(verts * verts);
    let mut y = Vec::with_capacity(verts * verts);
    for j in 0..verts {
        for i in 0..verts {
            x.push(i as f64);
            y.push(j as f64);
        }
    }

    let idx = |i: usize, j: usize| j * verts + i;
    let mut elements = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let a = idx(i, j);
            let b = idx(i + 1, j);
            let c = idx(i, j + 1);
            let d = idx(i + 1, j + 1);
            elements.push([a, b, c]);
            elements.push([b, d, c]);
        }
    }

    Mesh::from_triangulation(x, y, elements).unwrap()
}

fn bench_real_laplacian(c: &mut Criterion) {
    let mesh = grid_mesh(24);
    let config = OperatorConfig::new();
    c.bench_function("real_laplacian_24x24", |b| {
        b.iter(|| black_box(operators::build(&mesh, &config, OperatorKind::Laplacian).unwrap()))
    });
}

fn bench_gradient_and_divergence(c: &mut Criterion) {
    let mesh = grid_mesh(24);
    let config = OperatorConfig::new();
    let mut group = c.benchmark_group("real_operators_24x24");
    group.bench_function("gradient", |b| {
        b.iter(|| black_box(operators::build(&mesh, &config, OperatorKind::Gradient).unwrap()))
    });
    group.bench_function("divergence", |b| {
        b.iter(|| black_box(operators::build(&mesh, &config, OperatorKind::Divergence).unwrap()))
    });
    group.finish();
}

fn bench_psi_operators(c: &mut Criterion) {
    let mesh = grid_mesh(24);
    let link_exponents = vec![(0.01, -0.02); mesh.edge_mesh.len()];
    let config = OperatorConfig::new().with_link_exponents(link_exponents);

    let mut group = c.benchmark_group("psi_operators_24x24");
    group.bench_function("psi_laplacian", |b| {
        b.iter(|| black_box(operators::build_psi_laplacian(&mesh, &config).unwrap()))
    });
    group.bench_function("psi_gradient", |b| {
        b.iter(|| black_box(operators::build_psi_gradient(&mesh, &config).unwrap()))
    });
    group.finish();
}

criterion_group!(
    operator_assembly,
    bench_real_laplacian,
    bench_gradient_and_divergence,
    bench_psi_operators,
);
criterion_main!(operator_assembly);
