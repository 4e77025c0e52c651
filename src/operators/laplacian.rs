use crate::error::Result;
use crate::mesh::Mesh;
use crate::operators::OperatorConfig;
use crate::sparse::{ComplexSparseMatrix, ComplexTriplets, SparseMatrix, Triplets};
use num_complex::Complex64;

/// Real-valued Voronoi-box discrete Laplacian (no link phases). Used for
/// the electrochemical-potential system. Dirichlet fixation overwrites the
/// corresponding rows with `config.fixed_sites_eigenvalue` on the diagonal.
pub fn build_real(mesh: &Mesh, config: &OperatorConfig) -> Result<SparseMatrix> {
    let n = mesh.num_sites();
    let edge_mesh = &mesh.edge_mesh;
    let mut triplets = Triplets::new();

    for (k, &(u, v)) in edge_mesh.edges.iter().enumerate() {
        let weight = edge_mesh.dual_edge_lengths[k] / edge_mesh.edge_lengths[k];
        triplets.push(u, v, weight / mesh.areas[u]);
        triplets.push(v, u, weight / mesh.areas[v]);
        triplets.push(u, u, -weight / mesh.areas[u]);
        triplets.push(v, v, -weight / mesh.areas[v]);
    }

    if let Some(fixed) = &config.fixed_sites {
        for &s in fixed {
            triplets.zero_row_and_set_diagonal(s, config.fixed_sites_eigenvalue);
        }
    }

    triplets.into_matrix(n, n)
}

/// Gauge-invariant (complex) Laplacian: each edge contributes a Peierls
/// phase `exp(-i a.dir)`, conjugated on the transposed entry.
pub fn build_complex(mesh: &Mesh, config: &OperatorConfig) -> Result<ComplexSparseMatrix> {
    let n = mesh.num_sites();
    let edge_mesh = &mesh.edge_mesh;
    let a = config.link_exponents.as_ref().expect("validated by caller");
    let mut triplets = ComplexTriplets::new();

    for (k, &(u, v)) in edge_mesh.edges.iter().enumerate() {
        let weight = edge_mesh.dual_edge_lengths[k] / edge_mesh.edge_lengths[k];
        let z = link_phase(a[k], edge_mesh.directions[k]);

        triplets.push(u, v, weight * z / mesh.areas[u]);
        triplets.push(v, u, weight * z.conj() / mesh.areas[v]);
        triplets.push(u, u, Complex64::new(-weight / mesh.areas[u], 0.0));
        triplets.push(v, v, Complex64::new(-weight / mesh.areas[v], 0.0));
    }

    if let Some(fixed) = &config.fixed_sites {
        for &s in fixed {
            triplets.zero_row_and_set_diagonal(s, Complex64::new(config.fixed_sites_eigenvalue, 0.0));
        }
    }

    Ok(triplets.into_matrix(n, n))
}

fn link_phase(a: (f64, f64), direction: (f64, f64)) -> Complex64 {
    let phase = -(a.0 * direction.0 + a.1 * direction.1);
    Complex64::new(0.0, phase).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn unit_square_mesh() -> Mesh {
        let x = vec![0.0, 1.0, 0.0, 1.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let elements = vec![[0, 1, 2], [1, 3, 2]];
        Mesh::from_triangulation(x, y, elements).unwrap()
    }

    #[test]
    fn constant_field_is_in_null_space_without_fixation() {
        let mesh = unit_square_mesh();
        let config = OperatorConfig::new();
        let laplacian = build_real(&mesh, &config).unwrap();
        let ones = vec![1.0; mesh.num_sites()];
        let result = laplacian.matvec(&ones).unwrap();
        for v in result {
            assert!(v.abs() < 1e-9, "constant field should be in the null space, got {}", v);
        }
    }

    #[test]
    fn dirichlet_fixation_sets_identity_row() {
        let mesh = unit_square_mesh();
        let config = OperatorConfig::new().with_dirichlet_boundary(vec![0], 1.0);
        let laplacian = build_real(&mesh, &config).unwrap();
        let mut probe = vec![0.0; mesh.num_sites()];
        probe[0] = 1.0;
        let result = laplacian.matvec(&probe).unwrap();
        assert!((result[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_link_exponents_match_real_laplacian() {
        let mesh = unit_square_mesh();
        let zero_a = vec![(0.0, 0.0); mesh.edge_mesh.len()];
        let config = OperatorConfig::new().with_link_exponents(zero_a);
        let complex_laplacian = build_complex(&mesh, &config).unwrap();
        let probe: Vec<Complex64> = (0..mesh.num_sites()).map(|i| Complex64::new(i as f64, 0.0)).collect();
        let result = complex_laplacian.matvec(&probe);
        let real_config = OperatorConfig::new();
        let real_laplacian = build_real(&mesh, &real_config).unwrap();
        let real_probe: Vec<f64> = (0..mesh.num_sites()).map(|i| i as f64).collect();
        let real_result = real_laplacian.matvec(&real_probe).unwrap();
        for (c, r) in result.iter().zip(real_result.iter()) {
            assert!((c.re - r).abs() < 1e-9);
            assert!(c.im.abs() < 1e-9);
        }
    }
}
