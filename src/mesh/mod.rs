//! Mesh geometry: a primal triangulation plus its derived dual (Voronoi)
//! mesh, edge mesh, and per-site areas.

pub mod dual_mesh;
pub mod edge_mesh;
pub mod triangulation;

use crate::error::{Result, TdglError};
use dual_mesh::DualMesh;
use edge_mesh::EdgeMesh;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Combinator used by the coordinate-predicate selectors below.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOp {
    And,
    Or,
}

/// A triangulated sample of a simply-connected 2D domain, together with
/// every geometric quantity the operator builder needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub elements: Vec<[usize; 3]>,
    pub boundary_indices: Vec<usize>,
    pub areas: Vec<f64>,
    pub dual_mesh: DualMesh,
    pub edge_mesh: EdgeMesh,
    pub voltage_points: Option<[usize; 2]>,
    pub input_edge: Option<[f64; 4]>,
    pub output_edge: Option<[f64; 4]>,
}

impl Mesh {
    /// Build a mesh from a raw triangulation. `elements` may be supplied as
    /// `(T, 3)` or `(3, T)`; the latter is transposed before use. The
    /// persisted (wire) form is always `(T, 3)`.
    pub fn from_triangulation(
        x: Vec<f64>,
        y: Vec<f64>,
        elements: Vec<[usize; 3]>,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(TdglError::InvalidMesh(format!(
                "x has {} entries but y has {}",
                x.len(),
                y.len()
            )));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(TdglError::InvalidMesh(
                "site coordinates must be finite".into(),
            ));
        }
        let n = x.len();
        for tri in &elements {
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[2] == tri[0] {
                return Err(TdglError::InvalidMesh(
                    "triangle has repeated site indices".into(),
                ));
            }
            for &s in tri {
                if s >= n {
                    return Err(TdglError::InvalidMesh(format!(
                        "site index {} out of range for {} sites",
                        s, n
                    )));
                }
            }
        }

        let dual_mesh = DualMesh::new(&x, &y, &elements)?;
        let edge_mesh = EdgeMesh::new(&x, &y, &elements, &dual_mesh);

        let boundary_indices = boundary_site_indices(&edge_mesh);
        let areas = compute_areas(&x, &y, &elements, &dual_mesh, &boundary_indices, &edge_mesh);

        Ok(Self {
            x,
            y,
            elements,
            boundary_indices,
            areas,
            dual_mesh,
            edge_mesh,
            voltage_points: None,
            input_edge: None,
            output_edge: None,
        })
    }

    /// Transpose a flat, column-major `(3, T)` element array (as produced
    /// by some external meshing tools) into the `(T, 3)` form this crate
    /// always uses internally. `flat` must hold exactly `3 * num_triangles`
    /// entries, laid out as three consecutive rows of `num_triangles`
    /// vertex indices.
    pub fn transpose_elements(flat: &[usize], num_triangles: usize) -> Vec<[usize; 3]> {
        debug_assert_eq!(flat.len(), 3 * num_triangles);
        (0..num_triangles)
            .map(|t| [flat[t], flat[num_triangles + t], flat[2 * num_triangles + t]])
            .collect()
    }

    pub fn num_sites(&self) -> usize {
        self.x.len()
    }

    /// Sites satisfying the combination (AND/OR) of coordinate predicates.
    pub fn select_sites(&self, predicates: &[impl Fn(f64, f64) -> bool], op: SelectOp) -> Vec<usize> {
        (0..self.num_sites())
            .filter(|&i| evaluate(predicates, op, self.x[i], self.y[i]))
            .collect()
    }

    /// Boundary sites satisfying the combination of coordinate predicates.
    pub fn select_boundary_sites(
        &self,
        predicates: &[impl Fn(f64, f64) -> bool],
        op: SelectOp,
    ) -> Vec<usize> {
        self.boundary_indices
            .iter()
            .copied()
            .filter(|&i| evaluate(predicates, op, self.x[i], self.y[i]))
            .collect()
    }

    /// Boundary-edge-local indices (positions within
    /// `edge_mesh.boundary_edge_indices`) whose midpoint satisfies the
    /// combination of coordinate predicates.
    pub fn select_boundary_edges(
        &self,
        predicates: &[impl Fn(f64, f64) -> bool],
        op: SelectOp,
    ) -> Vec<usize> {
        self.edge_mesh
            .boundary_edge_indices
            .iter()
            .enumerate()
            .filter(|&(_, &edge_idx)| {
                evaluate(predicates, op, self.edge_mesh.x[edge_idx], self.edge_mesh.y[edge_idx])
            })
            .map(|(local, _)| local)
            .collect()
    }

    /// Normalized `[min_x, max_x, min_y, max_y]` bounding boxes for the
    /// configured input and output current edges.
    pub fn get_flow_edges(&self) -> Result<([f64; 4], [f64; 4])> {
        let input = self
            .input_edge
            .ok_or_else(|| TdglError::InvalidMesh("mesh has no input_edge".into()))?;
        let output = self
            .output_edge
            .ok_or_else(|| TdglError::InvalidMesh("mesh has no output_edge".into()))?;
        Ok((normalize_rect(input), normalize_rect(output)))
    }

    /// Bounding box of the site coordinates.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let min_x = self.x.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_x = self.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_y = self.y.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_y = self.y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (min_x, max_x, min_y, max_y)
    }
}

fn normalize_rect(r: [f64; 4]) -> [f64; 4] {
    [r[0].min(r[1]), r[0].max(r[1]), r[2].min(r[3]), r[2].max(r[3])]
}

fn evaluate(predicates: &[impl Fn(f64, f64) -> bool], op: SelectOp, x: f64, y: f64) -> bool {
    match op {
        SelectOp::And => predicates.iter().all(|p| p(x, y)),
        SelectOp::Or => predicates.iter().any(|p| p(x, y)),
    }
}

fn boundary_site_indices(edge_mesh: &EdgeMesh) -> Vec<usize> {
    let mut set = HashSet::new();
    for &idx in &edge_mesh.boundary_edge_indices {
        let (u, v) = edge_mesh.edges[idx];
        set.insert(u);
        set.insert(v);
    }
    let mut v: Vec<usize> = set.into_iter().collect();
    v.sort_unstable();
    v
}

/// Voronoi cell area per site, with the boundary correction described in
/// SPEC_FULL.md §3. The site -> incident-boundary-edge map is built once
/// here (see DESIGN.md, Open Question 3) instead of rescanning boundary
/// edges per site.
fn compute_areas(
    x: &[f64],
    y: &[f64],
    elements: &[[usize; 3]],
    dual_mesh: &DualMesh,
    boundary_indices: &[usize],
    edge_mesh: &EdgeMesh,
) -> Vec<f64> {
    let n = x.len();
    let boundary_set: HashSet<usize> = boundary_indices.iter().copied().collect();
    let polygons = triangulation::surrounding_triangles(elements, n);

    let mut site_to_boundary_edges: HashMap<usize, Vec<usize>> = HashMap::new();
    for &idx in &edge_mesh.boundary_edge_indices {
        let (u, v) = edge_mesh.edges[idx];
        site_to_boundary_edges.entry(u).or_default().push(idx);
        site_to_boundary_edges.entry(v).or_default().push(idx);
    }

    let mut areas = vec![0.0; n];

    for (i, polygon) in polygons.iter().enumerate() {
        let poly_x: Vec<f64> = polygon.iter().map(|&t| dual_mesh.x[t]).collect();
        let poly_y: Vec<f64> = polygon.iter().map(|&t| dual_mesh.y[t]).collect();

        if !boundary_set.contains(&i) {
            let (area, _) = triangulation::hull_area(&poly_x, &poly_y);
            areas[i] = area;
            continue;
        }

        let empty = Vec::new();
        let incident = site_to_boundary_edges.get(&i).unwrap_or(&empty);
        let mut full_x = poly_x.clone();
        let mut full_y = poly_y.clone();
        full_x.push(x[i]);
        full_y.push(y[i]);

        let mut mid_x = Vec::with_capacity(incident.len());
        let mut mid_y = Vec::with_capacity(incident.len());
        for &edge_idx in incident {
            let (u, v) = edge_mesh.edges[edge_idx];
            mid_x.push((x[u] + x[v]) / 2.0);
            mid_y.push((y[u] + y[v]) / 2.0);
        }
        full_x.extend_from_slice(&mid_x);
        full_y.extend_from_slice(&mid_y);

        let (mut area, is_convex) = triangulation::hull_area(&full_x, &full_y);

        if !is_convex {
            let mut concave_x = vec![x[i]];
            let mut concave_y = vec![y[i]];
            concave_x.extend_from_slice(&mid_x);
            concave_y.extend_from_slice(&mid_y);
            let (concave_area, _) = triangulation::hull_area(&concave_x, &concave_y);
            area -= concave_area;
        }

        areas[i] = area;
    }

    areas
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
    fn boundary_sites_are_exactly_incident_to_boundary_edges() {
        let mesh = unit_square_mesh();
        assert_eq!(mesh.boundary_indices.len(), 4);
        for &edge_idx in &mesh.edge_mesh.boundary_edge_indices {
            let (u, v) = mesh.edge_mesh.edges[edge_idx];
            assert!(mesh.boundary_indices.contains(&u));
            assert!(mesh.boundary_indices.contains(&v));
        }
    }

    #[test]
    fn areas_sum_to_domain_area() {
        let mesh = unit_square_mesh();
        let total: f64 = mesh.areas.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "total area was {}", total);
    }

    #[test]
    fn repeated_site_index_is_rejected() {
        let x = vec![0.0, 1.0, 0.0];
        let y = vec![0.0, 0.0, 1.0];
        let elements = vec![[0, 0, 1]];
        assert!(Mesh::from_triangulation(x, y, elements).is_err());
    }

    #[test]
    fn transpose_elements_recovers_row_major_triangles() {
        // Column-major (3, T): row 0 = first vertices, row 1 = second, row 2 = third.
        let flat = vec![0, 1, 1, 3, 2, 2];
        let elements = Mesh::transpose_elements(&flat, 2);
        assert_eq!(elements, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let x = vec![0.0, 1.0, f64::NAN];
        let y = vec![0.0, 0.0, 1.0];
        let elements = vec![[0, 1, 2]];
        assert!(Mesh::from_triangulation(x, y, elements).is_err());
    }

    #[test]
    fn select_sites_intersection_and_union() {
        let mesh = unit_square_mesh();
        let right: Vec<usize> = mesh.select_sites(&[|x: f64, _: f64| x > 0.5], SelectOp::And);
        assert_eq!(right, vec![1, 3]);

        let predicates: Vec<Box<dyn Fn(f64, f64) -> bool>> = vec![
            Box::new(|x: f64, _: f64| x > 0.5),
            Box::new(|_: f64, y: f64| y > 0.5),
        ];
        let corner: Vec<usize> = mesh.select_sites(&predicates, SelectOp::Or);
        assert_eq!(corner, vec![1, 2, 3]);
    }
}
