//! Planar geometry helpers
//!
//! - Convex hull (monotone chain) and exact polygon containment
//! - Degree-unit Euclidean distance
//! - Buffered bounding boxes
//!
//! All distances are planar in degrees. 1 degree is taken as 111.32 km
//! everywhere, with no latitude correction.

mod hull;

pub use hull::{convex_hull, hull_polygon, polygon_contains};

use fieldsurf_core::{Bounds, LatLng};

/// Meters per degree at the equator
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Kilometers per degree at the equator
pub const KM_PER_DEGREE: f64 = 111.32;

/// Default bounding-box buffer as a fraction of the larger range
pub const BUFFER_FRACTION: f64 = 0.05;

/// Default upper limit on the bounding-box buffer, in degrees
pub const BUFFER_CAP: f64 = 0.1;

/// Euclidean distance in degree-units. Not geodesic.
#[inline]
pub fn planar_distance(a: &LatLng, b: &LatLng) -> f64 {
    a.dist(b)
}

/// Distance from `p` to the closest of `points`, `None` when there are none.
pub fn nearest_distance(p: &LatLng, points: &[LatLng]) -> Option<f64> {
    points
        .iter()
        .map(|q| p.dist_sq(q))
        .min_by(f64::total_cmp)
        .map(f64::sqrt)
}

pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

pub fn meters_to_degrees(m: f64) -> f64 {
    m / METERS_PER_DEGREE
}

/// Bounding box grown on all sides by
/// `min(buffer_fraction * max(lat_range, lng_range), buffer_cap)`.
pub fn buffered_bounds(points: &[LatLng], buffer_fraction: f64, buffer_cap: f64) -> Option<Bounds> {
    let bounds = Bounds::of(points)?;
    let max_range = bounds.lat_range().max(bounds.lng_range());
    let buffer = (buffer_fraction * max_range).min(buffer_cap);
    Some(bounds.expand(buffer))
}

/// [`buffered_bounds`] with the default 5% / 0.1 degree buffer
pub fn bounding_box(points: &[LatLng]) -> Option<Bounds> {
    buffered_bounds(points, BUFFER_FRACTION, BUFFER_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_distance() {
        let d = planar_distance(&LatLng::new(0.0, 0.0), &LatLng::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_distance() {
        let pts = [LatLng::new(0.0, 0.0), LatLng::new(0.0, 2.0)];
        let d = nearest_distance(&LatLng::new(0.0, 1.5), &pts).unwrap();
        assert!((d - 0.5).abs() < 1e-12);
        assert!(nearest_distance(&LatLng::new(0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_buffer_is_fraction_of_larger_range() {
        let pts = [LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.5)];
        let b = bounding_box(&pts).unwrap();
        // 5% of max(1.0, 0.5)
        assert!((b.south + 0.05).abs() < 1e-12);
        assert!((b.west + 0.05).abs() < 1e-12);
        assert!((b.north - 1.05).abs() < 1e-12);
        assert!((b.east - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_buffer_is_capped() {
        let pts = [LatLng::new(0.0, 0.0), LatLng::new(10.0, 4.0)];
        let b = bounding_box(&pts).unwrap();
        assert!((b.south + 0.1).abs() < 1e-12);
        assert!((b.north - 10.1).abs() < 1e-12);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((km_to_degrees(111.32) - 1.0).abs() < 1e-12);
        assert!((meters_to_degrees(111_320.0) - 1.0).abs() < 1e-12);
    }
}
