use crate::error::Result;
use crate::mesh::Mesh;
use crate::operators::OperatorConfig;
use crate::sparse::{SparseMatrix, Triplets};

/// Maps a prescribed outward flux on boundary edges onto the right-hand
/// side contribution for the Poisson solve. Columns are indexed by position
/// within `mesh.edge_mesh.boundary_edge_indices`, not by global edge index.
pub fn build(mesh: &Mesh, config: &OperatorConfig) -> Result<SparseMatrix> {
    let edge_mesh = &mesh.edge_mesh;
    let num_boundary_edges = edge_mesh.boundary_edge_indices.len();
    let mut triplets = Triplets::new();

    for (col, &edge_idx) in edge_mesh.boundary_edge_indices.iter().enumerate() {
        let (u, v) = edge_mesh.edges[edge_idx];
        let length = edge_mesh.edge_lengths[edge_idx];
        triplets.push(u, col, length / (2.0 * mesh.areas[u]));
        triplets.push(v, col, length / (2.0 * mesh.areas[v]));
    }

    if let Some(fixed) = &config.fixed_sites {
        for &s in fixed {
            triplets.zero_row(s);
        }
    }

    triplets.into_matrix(mesh.num_sites(), num_boundary_edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_mesh() -> Mesh {
        let x = vec![0.0, 1.0, 0.0, 1.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let elements = vec![[0, 1, 2], [1, 3, 2]];
        Mesh::from_triangulation(x, y, elements).unwrap()
    }

    #[test]
    fn fixed_site_row_is_zeroed() {
        let mesh = unit_square_mesh();
        let config = OperatorConfig::new().with_dirichlet_boundary(vec![0], 1.0);
        let nb = build(&mesh, &config).unwrap();
        let probe = vec![1.0; nb.cols()];
        let result = nb.matvec(&probe).unwrap();
        assert_eq!(result[0], 0.0);
    }
}
