//! Combined reliable prediction extent
//!
//! A cell is reliable when it passes every applicable criterion:
//! 1. Hull: inside the sample convex hull (padded hull bounds by default)
//! 2. Distance: nearest sample within `max_distance_km`
//! 3. Uncertainty: at most `uncertainty_threshold` (predictor-based only)

use fieldsurf_core::{
    AnalysisType, Bounds, Dataset, Error, GridCell, HullTest, LatLng, NoProgress, Progress,
    Result, RpeParams,
};
use geo::Polygon;
use tracing::info;

use crate::geometry::{convex_hull, hull_polygon, km_to_degrees, nearest_distance, polygon_contains};
use crate::maybe_rayon::*;

/// The hull criterion, prepared once per run
#[derive(Debug, Clone)]
pub struct HullRegion {
    padded: Bounds,
    polygon: Option<Polygon<f64>>,
    test: HullTest,
}

impl HullRegion {
    /// Hull of `locations`. `None` when there are no locations.
    pub fn new(locations: &[LatLng], padding: f64, test: HullTest) -> Option<Self> {
        let hull = convex_hull(locations);
        let padded = Bounds::of(&hull)?.pad(padding);
        let polygon = match test {
            HullTest::Polygon => hull_polygon(&hull),
            HullTest::PaddedBounds => None,
        };
        Some(Self { padded, polygon, test })
    }

    /// Exact mode falls back to the padded bounds for a degenerate hull.
    pub fn contains(&self, p: &LatLng) -> bool {
        match (self.test, &self.polygon) {
            (HullTest::Polygon, Some(poly)) => polygon_contains(poly, p),
            _ => self.padded.contains(p),
        }
    }
}

/// Cells passing the hull, distance and (when applicable) uncertainty tests.
///
/// `uncertainty` must be index-aligned with `cells`. It is consulted only for
/// predictor-based analyses; cells without an uncertainty value pass.
/// Output cells are copies with `reliable = Some(true)`.
///
/// # Errors
/// - `NoNeighbors` when the dataset is empty
/// - `LengthMismatch` when `uncertainty` and `cells` differ in length
pub fn compute_rpe(
    cells: &[GridCell],
    dataset: &Dataset,
    uncertainty: Option<&[GridCell]>,
    analysis_type: AnalysisType,
    params: &RpeParams,
) -> Result<Vec<GridCell>> {
    compute_rpe_with_progress(cells, dataset, uncertainty, analysis_type, params, &NoProgress)
}

/// [`compute_rpe`] with a per-cell cancellation checkpoint
pub fn compute_rpe_with_progress(
    cells: &[GridCell],
    dataset: &Dataset,
    uncertainty: Option<&[GridCell]>,
    analysis_type: AnalysisType,
    params: &RpeParams,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    let locations = dataset.locations();
    let hull = HullRegion::new(&locations, params.hull_padding, params.hull_test)
        .ok_or(Error::NoNeighbors("compute the reliable extent"))?;

    let uncertainty = match (analysis_type, uncertainty) {
        (AnalysisType::PredictorBased, Some(u)) => {
            if u.len() != cells.len() {
                return Err(Error::LengthMismatch {
                    what: "uncertainty grid",
                    expected: cells.len(),
                    actual: u.len(),
                });
            }
            Some(u)
        }
        _ => None,
    };
    let max_distance = km_to_degrees(params.max_distance_km);

    let kept: Vec<Option<GridCell>> = (0..cells.len())
        .into_par_iter()
        .map(|idx| {
            progress.checkpoint()?;
            let cell = &cells[idx];
            let here = cell.location();

            let in_hull = hull.contains(&here);
            let near_sample = nearest_distance(&here, &locations).is_some_and(|d| d <= max_distance);
            let low_uncertainty = uncertainty
                .and_then(|u| u[idx].uncertainty)
                .map_or(true, |u| u <= params.uncertainty_threshold);

            Ok((in_hull && near_sample && low_uncertainty).then(|| {
                let mut out = cell.clone();
                out.reliable = Some(true);
                out
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let rpe: Vec<GridCell> = kept.into_iter().flatten().collect();
    info!(
        "RPE ({}): {} reliable cells out of {}",
        analysis_type,
        rpe.len(),
        cells.len()
    );
    Ok(rpe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsurf_core::SamplePoint;

    fn triangle() -> Dataset {
        Dataset::new(
            vec![
                SamplePoint::new(0.0, 0.0).with("v", 1.0),
                SamplePoint::new(0.0, 0.05).with("v", 2.0),
                SamplePoint::new(0.05, 0.0).with("v", 3.0),
            ],
            "v",
        )
    }

    fn cells(coords: &[(f64, f64)]) -> Vec<GridCell> {
        coords.iter().map(|&(lat, lng)| GridCell::new(lat, lng, 0.0)).collect()
    }

    #[test]
    fn test_padded_bounds_accepts_outside_triangle_corner() {
        // (0.04, 0.04) is outside the triangle but inside its bounding box
        let c = cells(&[(0.04, 0.04)]);
        let rpe = compute_rpe(&c, &triangle(), None, AnalysisType::SingleVariable, &RpeParams::default()).unwrap();
        assert_eq!(rpe.len(), 1);
        assert_eq!(rpe[0].reliable, Some(true));

        let exact = RpeParams {
            hull_test: HullTest::Polygon,
            ..Default::default()
        };
        let rpe = compute_rpe(&c, &triangle(), None, AnalysisType::SingleVariable, &exact).unwrap();
        assert!(rpe.is_empty());
    }

    #[test]
    fn test_padding_extends_bounds() {
        // Hull bounds 0..0.05, padded by 10% -> -0.005..0.055
        let c = cells(&[(-0.004, 0.01), (-0.006, 0.01)]);
        let rpe = compute_rpe(&c, &triangle(), None, AnalysisType::SingleVariable, &RpeParams::default()).unwrap();
        assert_eq!(rpe.len(), 1);
        assert_eq!(rpe[0].lat, -0.004);
    }

    #[test]
    fn test_distance_criterion() {
        // Wide triangle: the centroid is far (> 10 km) from every vertex
        let ds = Dataset::new(
            vec![
                SamplePoint::new(0.0, 0.0).with("v", 1.0),
                SamplePoint::new(0.0, 1.0).with("v", 2.0),
                SamplePoint::new(1.0, 0.0).with("v", 3.0),
            ],
            "v",
        );
        let c = cells(&[(0.3, 0.3), (0.01, 0.01)]);
        let rpe = compute_rpe(&c, &ds, None, AnalysisType::SingleVariable, &RpeParams::default()).unwrap();
        assert_eq!(rpe.len(), 1);
        assert_eq!(rpe[0].lat, 0.01);
    }

    #[test]
    fn test_uncertainty_only_for_predictor_based() {
        let c = cells(&[(0.01, 0.01), (0.02, 0.01)]);
        let mut u = c.clone();
        u[0].uncertainty = Some(0.9);
        u[1].uncertainty = Some(0.1);

        let single = compute_rpe(&c, &triangle(), Some(&u), AnalysisType::SingleVariable, &RpeParams::default()).unwrap();
        assert_eq!(single.len(), 2);

        let pred = compute_rpe(&c, &triangle(), Some(&u), AnalysisType::PredictorBased, &RpeParams::default()).unwrap();
        assert_eq!(pred.len(), 1);
        assert_eq!(pred[0].lat, 0.02);
    }

    #[test]
    fn test_uncertainty_length_mismatch() {
        let c = cells(&[(0.01, 0.01), (0.02, 0.01)]);
        let u = cells(&[(0.01, 0.01)]);
        let err = compute_rpe(&c, &triangle(), Some(&u), AnalysisType::PredictorBased, &RpeParams::default()).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { .. }));
    }

    #[test]
    fn test_degenerate_hull_falls_back_to_bounds() {
        let ds = Dataset::new(
            vec![
                SamplePoint::new(0.0, 0.0).with("v", 1.0),
                SamplePoint::new(0.01, 0.01).with("v", 2.0),
                SamplePoint::new(0.02, 0.02).with("v", 3.0),
            ],
            "v",
        );
        let exact = RpeParams {
            hull_test: HullTest::Polygon,
            ..Default::default()
        };
        let rpe = compute_rpe(&cells(&[(0.0, 0.02)]), &ds, None, AnalysisType::SingleVariable, &exact).unwrap();
        assert_eq!(rpe.len(), 1);
    }
}
