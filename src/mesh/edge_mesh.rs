use crate::mesh::dual_mesh::DualMesh;
use crate::mesh::triangulation::get_edges;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The edge graph of the primal mesh, plus everything the operator builder
/// needs to assemble against it: midpoints, directions, lengths, and the
/// corresponding dual (Voronoi) edge lengths.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeMesh {
    /// `(u, v)` with `u < v`, boundary edges first.
    pub edges: Vec<(usize, usize)>,
    pub boundary_edge_indices: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub directions: Vec<(f64, f64)>,
    pub edge_lengths: Vec<f64>,
    pub dual_edge_lengths: Vec<f64>,
}

impl EdgeMesh {
    pub fn new(x: &[f64], y: &[f64], elements: &[[usize; 3]], dual_mesh: &DualMesh) -> Self {
        let (raw_edges, raw_is_boundary) = get_edges(elements);

        // Boundary edges first, matching the wire layout the Neumann
        // boundary operator relies on (its columns are indexed by position
        // within `boundary_edge_indices`).
        let mut order: Vec<usize> = (0..raw_edges.len()).collect();
        order.sort_by_key(|&i| !raw_is_boundary[i]);

        let edges: Vec<(usize, usize)> = order.iter().map(|&i| raw_edges[i]).collect();
        let boundary_edge_indices: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(i, _)| raw_is_boundary[order[*i]])
            .map(|(i, _)| i)
            .collect();

        let mut mx = Vec::with_capacity(edges.len());
        let mut my = Vec::with_capacity(edges.len());
        let mut directions = Vec::with_capacity(edges.len());
        let mut edge_lengths = Vec::with_capacity(edges.len());

        for &(u, v) in &edges {
            mx.push((x[u] + x[v]) / 2.0);
            my.push((y[u] + y[v]) / 2.0);
            let dx = x[v] - x[u];
            let dy = y[v] - y[u];
            directions.push((dx, dy));
            edge_lengths.push((dx * dx + dy * dy).sqrt());
        }

        let edge_to_triangles = edge_to_triangle_map(elements);
        let dual_edge_lengths = edges
            .iter()
            .enumerate()
            .map(|(k, &(u, v))| {
                let tris = &edge_to_triangles[&(u.min(v), u.max(v))];
                match tris.as_slice() {
                    [t0] => {
                        let dx = dual_mesh.x[*t0] - mx[k];
                        let dy = dual_mesh.y[*t0] - my[k];
                        (dx * dx + dy * dy).sqrt()
                    }
                    [t0, t1] => {
                        let dx = dual_mesh.x[*t0] - dual_mesh.x[*t1];
                        let dy = dual_mesh.y[*t0] - dual_mesh.y[*t1];
                        (dx * dx + dy * dy).sqrt()
                    }
                    _ => unreachable!("an edge belongs to one or two triangles"),
                }
            })
            .collect();

        Self {
            edges,
            boundary_edge_indices,
            x: mx,
            y: my,
            directions,
            edge_lengths,
            dual_edge_lengths,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Keyed by the sorted endpoint pair, not the source's string-hashed edge
/// representation, which was an accident of its host language.
fn edge_to_triangle_map(elements: &[[usize; 3]]) -> HashMap<(usize, usize), Vec<usize>> {
    let mut map: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (t, tri) in elements.iter().enumerate() {
        for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            map.entry(key).or_default().push(t);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> (Vec<f64>, Vec<f64>, Vec<[usize; 3]>) {
        let x = vec![0.0, 1.0, 0.0, 1.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let elements = vec![[0, 1, 2], [1, 3, 2]];
        (x, y, elements)
    }

    #[test]
    fn interior_edge_dual_length_uses_both_circumcenters() {
        let (x, y, elements) = unit_square();
        let dual = DualMesh::new(&x, &y, &elements).unwrap();
        let edge_mesh = EdgeMesh::new(&x, &y, &elements, &dual);

        assert_eq!(edge_mesh.len(), 5);
        assert_eq!(edge_mesh.boundary_edge_indices.len(), 4);

        let interior_idx = edge_mesh
            .edges
            .iter()
            .position(|&(u, v)| (u, v) == (1, 2))
            .unwrap();
        assert!(!edge_mesh.boundary_edge_indices.contains(&interior_idx));
        assert!(edge_mesh.dual_edge_lengths[interior_idx] > 0.0);
    }

    #[test]
    fn edges_are_unique_and_sorted_pairs() {
        let (x, y, elements) = unit_square();
        let dual = DualMesh::new(&x, &y, &elements).unwrap();
        let edge_mesh = EdgeMesh::new(&x, &y, &elements, &dual);

        let mut seen = std::collections::HashSet::new();
        for &(u, v) in &edge_mesh.edges {
            assert!(u < v);
            assert!(seen.insert((u, v)));
        }
    }
}
