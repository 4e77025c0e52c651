use crate::error::Result;
use crate::mesh::triangulation;
use serde::{Deserialize, Serialize};

/// The Voronoi lattice dual to the primal triangulation: one circumcenter
/// per triangle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DualMesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DualMesh {
    pub fn new(x: &[f64], y: &[f64], elements: &[[usize; 3]]) -> Result<Self> {
        let (xc, yc) = triangulation::circumcenters(x, y, elements)?;
        Ok(Self { x: xc, y: yc })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_mesh_has_one_site_per_triangle() {
        let x = vec![0.0, 1.0, 0.0, 1.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let elements = vec![[0, 1, 2], [1, 3, 2]];
        let dual = DualMesh::new(&x, &y, &elements).unwrap();
        assert_eq!(dual.len(), 2);
    }
}
