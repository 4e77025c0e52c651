//! Geometry helpers operating directly on a raw triangulation: edges,
//! circumcenters, and convex-hull polygon areas.

use crate::error::{Result, TdglError};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Every edge of a triangulation, sorted `(min, max)`, and whether each edge
/// belongs to exactly one triangle.
pub fn get_edges(elements: &[[usize; 3]]) -> (Vec<(usize, usize)>, Vec<bool>) {
    let mut counts: HashMap<(usize, usize), usize> = HashMap::new();
    let mut order: Vec<(usize, usize)> = Vec::with_capacity(elements.len() * 3);

    for tri in elements {
        for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            let entry = counts.entry(key).or_insert(0);
            if *entry == 0 {
                order.push(key);
            }
            *entry += 1;
        }
    }

    let is_boundary = order.iter().map(|k| counts[k] == 1).collect();
    (order, is_boundary)
}

/// Circumcenter of every triangle, via the planar circumcenter formula in a
/// coordinate frame centered on the triangle's first vertex.
pub fn circumcenters(x: &[f64], y: &[f64], elements: &[[usize; 3]]) -> Result<(Vec<f64>, Vec<f64>)> {
    let mut xc = Vec::with_capacity(elements.len());
    let mut yc = Vec::with_capacity(elements.len());

    for tri in elements {
        let ax = x[tri[0]];
        let ay = y[tri[0]];
        let bpx = x[tri[1]] - ax;
        let bpy = y[tri[1]] - ay;
        let cpx = x[tri[2]] - ax;
        let cpy = y[tri[2]] - ay;

        let denom = 2.0 * (bpx * cpy - bpy * cpx);
        if denom == 0.0 {
            return Err(TdglError::InvalidMesh(
                "degenerate triangle with zero circumcenter denominator".into(),
            ));
        }

        let b2 = bpx * bpx + bpy * bpy;
        let c2 = cpx * cpx + cpy * cpy;

        let xcp = (cpy * b2 - bpy * c2) / denom;
        let ycp = (bpx * c2 - cpx * b2) / denom;

        xc.push(xcp + ax);
        yc.push(ycp + ay);
    }

    Ok((xc, yc))
}

/// For every site, the indices of the triangles it belongs to.
pub fn surrounding_triangles(elements: &[[usize; 3]], num_sites: usize) -> Vec<Vec<usize>> {
    let mut polygons = vec![Vec::new(); num_sites];
    for (t, tri) in elements.iter().enumerate() {
        for &s in tri {
            polygons[s].push(t);
        }
    }
    polygons
}

/// Area of the convex hull of a (possibly unordered) point set, via a plain
/// gift-wrapping scan. Returns `(area, is_convex)`, where `is_convex` is
/// `true` when every input point sits on the hull. Fully collinear input
/// yields `(0.0, true)`.
pub fn hull_area(x: &[f64], y: &[f64]) -> (f64, bool) {
    let n = x.len();
    if n < 3 {
        return (0.0, true);
    }

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let hull = convex_hull(&points);

    if hull.len() < 3 {
        return (0.0, true);
    }

    let area = polygon_area(&hull);
    (area, hull.len() == n)
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Andrew's monotone chain convex hull.
fn convex_hull(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    pts.dedup();

    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<(f64, f64)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f64, f64)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn polygon_area(hull: &[(f64, f64)]) -> f64 {
    let n = hull.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x0, y0) = hull[i];
        let (x1, y1) = hull[(i + 1) % n];
        sum += x0 * y1 - x1 * y0;
    }
    (sum / 2.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_triangles_share_one_interior_edge() {
        let elements = vec![[0, 1, 2], [1, 3, 2]];
        let (edges, is_boundary) = get_edges(&elements);
        assert_eq!(edges.len(), 5);
        let boundary_count = is_boundary.iter().filter(|&&b| b).count();
        assert_eq!(boundary_count, 4);
        let interior = edges
            .iter()
            .zip(is_boundary.iter())
            .find(|(_, &b)| !b)
            .unwrap()
            .0;
        assert_eq!(*interior, (1, 2));
    }

    #[test]
    fn circumcenter_of_right_triangle() {
        let x = vec![0.0, 1.0, 0.0];
        let y = vec![0.0, 0.0, 1.0];
        let elements = vec![[0, 1, 2]];
        let (xc, yc) = circumcenters(&x, &y, &elements).unwrap();
        assert!((xc[0] - 0.5).abs() < 1e-12);
        assert!((yc[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 0.0];
        let elements = vec![[0, 1, 2]];
        assert!(circumcenters(&x, &y, &elements).is_err());
    }

    #[test]
    fn unit_square_hull_area_is_one() {
        let x = vec![0.0, 1.0, 1.0, 0.0];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let (area, is_convex) = hull_area(&x, &y);
        assert!((area - 1.0).abs() < 1e-12);
        assert!(is_convex);
    }

    #[test]
    fn collinear_points_have_zero_area() {
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 0.0];
        let (area, is_convex) = hull_area(&x, &y);
        assert_eq!(area, 0.0);
        assert!(is_convex);
    }
}
