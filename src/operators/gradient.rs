use crate::error::Result;
use crate::mesh::Mesh;
use crate::operators::OperatorConfig;
use crate::sparse::{ComplexSparseMatrix, ComplexTriplets, SparseMatrix, Triplets};
use num_complex::Complex64;

/// Real-valued gradient (sites -> edges), with no link phases.
pub fn build_real(mesh: &Mesh) -> Result<SparseMatrix> {
    let edge_mesh = &mesh.edge_mesh;
    let mut triplets = Triplets::new();

    for (k, &(u, v)) in edge_mesh.edges.iter().enumerate() {
        let weight = 1.0 / edge_mesh.edge_lengths[k];
        triplets.push(k, v, weight);
        triplets.push(k, u, -weight);
    }

    triplets.into_matrix(edge_mesh.len(), mesh.num_sites())
}

/// Gauge-invariant (complex) gradient, used to compute supercurrent from psi.
pub fn build_complex(mesh: &Mesh, config: &OperatorConfig) -> Result<ComplexSparseMatrix> {
    let edge_mesh = &mesh.edge_mesh;
    let a = config.link_exponents.as_ref().expect("validated by caller");
    let mut triplets = ComplexTriplets::new();

    for (k, &(u, v)) in edge_mesh.edges.iter().enumerate() {
        let weight = 1.0 / edge_mesh.edge_lengths[k];
        let phase = -(a[k].0 * edge_mesh.directions[k].0 + a[k].1 * edge_mesh.directions[k].1);
        let z = Complex64::new(0.0, phase).exp();

        triplets.push(k, v, z * weight);
        triplets.push(k, u, Complex64::new(-weight, 0.0));
    }

    Ok(triplets.into_matrix(edge_mesh.len(), mesh.num_sites()))
}
