use crate::error::Result;
use crate::mesh::Mesh;
use crate::operators::{self, OperatorConfig, OperatorKind};
use crate::sparse::{ComplexSparseMatrix, SparseMatrix, SparseSolver};

/// Every sparse operator the integrator needs, precomputed once per run.
/// The mu-Laplacian is kept factorized so each step only does a triangular
/// solve, not a refactorization.
pub struct TdglOperators {
    pub mu_laplacian_lu: SparseSolver,
    pub mu_boundary_laplacian: SparseMatrix,
    pub mu_gradient: SparseMatrix,
    pub divergence: SparseMatrix,
    pub psi_laplacian: ComplexSparseMatrix,
    pub psi_gradient: ComplexSparseMatrix,
}

impl TdglOperators {
    pub fn build(mesh: &Mesh, metal_contacts: &[usize], vector_potential: &[(f64, f64)]) -> Result<Self> {
        let mu_config = OperatorConfig::new().with_dirichlet_boundary(metal_contacts.to_vec(), 1.0);
        let mu_laplacian = operators::build(mesh, &mu_config, OperatorKind::Laplacian)?;
        let mu_laplacian_lu = mu_laplacian.factorize()?;
        let mu_boundary_laplacian = operators::build(mesh, &mu_config, OperatorKind::NeumannBoundaryLaplacian)?;
        let mu_gradient = operators::build(mesh, &mu_config, OperatorKind::Gradient)?;
        let divergence = operators::build(mesh, &mu_config, OperatorKind::Divergence)?;

        let psi_config = OperatorConfig::new()
            .with_dirichlet_boundary(metal_contacts.to_vec(), 1.0)
            .with_link_exponents(vector_potential.to_vec());
        let psi_laplacian = operators::build_psi_laplacian(mesh, &psi_config)?;
        let psi_gradient = operators::build_psi_gradient(mesh, &psi_config)?;

        Ok(Self {
            mu_laplacian_lu,
            mu_boundary_laplacian,
            mu_gradient,
            divergence,
            psi_laplacian,
            psi_gradient,
        })
    }
}

/// Symmetric-gauge vector potential sample `a = (B/2)(-y, x)` at every edge
/// midpoint, for a uniform perpendicular magnetic field `b`.
pub fn symmetric_gauge_vector_potential(mesh: &Mesh, b: f64) -> Vec<(f64, f64)> {
    mesh.edge_mesh
        .x
        .iter()
        .zip(mesh.edge_mesh.y.iter())
        .map(|(&xe, &ye)| (-b * ye / 2.0, b * xe / 2.0))
        .collect()
}
