//! Convex hull (Andrew's monotone chain)
//!
//! Reference:
//! Andrew, A.M. (1979). Another efficient algorithm for convex hulls in two
//! dimensions. Information Processing Letters, 9(5).

use fieldsurf_core::LatLng;
use geo::{Intersects, LineString, Point, Polygon};

/// z-component of (a - o) x (b - o) with lng as x and lat as y.
///
/// Positive when o -> a -> b turns counter-clockwise.
#[inline]
fn cross(o: &LatLng, a: &LatLng, b: &LatLng) -> f64 {
    (a.lng - o.lng) * (b.lat - o.lat) - (a.lat - o.lat) * (b.lng - o.lng)
}

fn push_strict_left(chain: &mut Vec<LatLng>, p: LatLng) {
    while chain.len() >= 2 && cross(&chain[chain.len() - 2], &chain[chain.len() - 1], &p) <= 0.0 {
        chain.pop();
    }
    chain.push(p);
}

/// Convex hull of a point set, counter-clockwise, without a closing vertex.
///
/// Collinear boundary points are dropped. Fewer than 3 inputs are returned
/// unchanged.
pub fn convex_hull(points: &[LatLng]) -> Vec<LatLng> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.lng.total_cmp(&b.lng).then(a.lat.total_cmp(&b.lat)));

    let mut lower: Vec<LatLng> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        push_strict_left(&mut lower, *p);
    }

    let mut upper: Vec<LatLng> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        push_strict_left(&mut upper, *p);
    }

    // Each chain ends where the other starts
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Hull as a closed `geo` polygon (x = lng, y = lat).
///
/// `None` for degenerate hulls with fewer than 3 vertices.
pub fn hull_polygon(hull: &[LatLng]) -> Option<Polygon<f64>> {
    if hull.len() < 3 {
        return None;
    }
    let ring: Vec<(f64, f64)> = hull.iter().map(|p| (p.lng, p.lat)).collect();
    Some(Polygon::new(LineString::from(ring), vec![]))
}

/// Exact containment; points on the boundary count as inside.
pub fn polygon_contains(polygon: &Polygon<f64>, p: &LatLng) -> bool {
    polygon.intersects(&Point::new(p.lng, p.lat))
}
