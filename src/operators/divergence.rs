use crate::error::Result;
use crate::mesh::Mesh;
use crate::sparse::{SparseMatrix, Triplets};

/// Divergence (edges -> sites), weighted by dual-edge length and per-site
/// Voronoi area. No Dirichlet fixation is ever applied to the divergence
/// operator; it only ever feeds the right-hand side of the mu solve.
pub fn build(mesh: &Mesh) -> Result<SparseMatrix> {
    let edge_mesh = &mesh.edge_mesh;
    let mut triplets = Triplets::new();

    for (k, &(u, v)) in edge_mesh.edges.iter().enumerate() {
        let weight = edge_mesh.dual_edge_lengths[k];
        triplets.push(u, k, weight / mesh.areas[u]);
        triplets.push(v, k, -weight / mesh.areas[v]);
    }

    triplets.into_matrix(mesh.num_sites(), edge_mesh.len())
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
    fn divergence_shape_matches_sites_and_edges() {
        let mesh = unit_square_mesh();
        let divergence = build(&mesh).unwrap();
        assert_eq!(divergence.rows(), mesh.num_sites());
        assert_eq!(divergence.cols(), mesh.edge_mesh.len());
    }
}
