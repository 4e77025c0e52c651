//! Benchmarks for deriving dual mesh, edge mesh, and Voronoi areas from a
//! raw triangulation, at a few representative grid sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tdgl::Mesh;

/// Structured `n x n` grid of unit cells, two triangles per cell.
fn grid_triangulation(n: usize) -> (Vec<f64>, Vec<f64>, Vec<[usize; 3]>) {
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

    (x, y, elements)
}

fn bench_from_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_from_triangulation");

    for n in [8usize, 16, 32] {
        let (x, y, elements) = grid_triangulation(n);
        let num_sites = x.len();
        group.throughput(Throughput::Elements(num_sites as u64));

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let mesh = Mesh::from_triangulation(
                    black_box(x.clone()),
                    black_box(y.clone()),
                    black_box(elements.clone()),
                )
                .unwrap();
                black_box(mesh.num_sites())
            })
        });
    }

    group.finish();
}

criterion_group!(mesh_construction, bench_from_triangulation);
criterion_main!(mesh_construction);
