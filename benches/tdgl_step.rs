//! Benchmark for a single semi-implicit TDGL time step, the per-iteration
//! hot path of `simulate`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tdgl::mesh::Mesh;
use tdgl::tdgl::{step, StepParams, TdglOperators, TdglState};

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

    let mut mesh = Mesh::from_triangulation(x, y, elements).unwrap();
    mesh.voltage_points = Some([0, verts * verts - 1]);
    mesh
}

fn bench_step(c: &mut Criterion) {
    let mesh = grid_mesh(20);
    let vector_potential = vec![(0.0, 0.0); mesh.edge_mesh.len()];
    let mut operators = TdglOperators::build(&mesh, &[], &vector_potential).unwrap();
    let state = TdglState::initial(mesh.num_sites(), mesh.edge_mesh.len(), &[]);
    let params = StepParams {
        dt: 1e-4,
        complex_time_scale: 5.79,
        gamma: 10.0,
        alpha: vec![1.0; mesh.num_sites()],
    };
    let mu_boundary = vec![0.0; mesh.edge_mesh.boundary_edge_indices.len()];

    c.bench_function("tdgl_step_20x20", |b| {
        b.iter(|| {
            black_box(step(&mesh, &mut operators, &state, &params, &mu_boundary, [0, mesh.num_sites() - 1]).unwrap())
        })
    });
}

criterion_group!(tdgl_step, bench_step);
criterion_main!(tdgl_step);
