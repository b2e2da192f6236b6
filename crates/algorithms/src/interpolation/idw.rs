//! Inverse Distance Weighting (IDW) interpolation
//!
//! Estimates values at unknown locations as a weighted average of nearby
//! sample points, where weights are inversely proportional to distance
//! raised to a power parameter.
//!
//! Reference:
//! Shepard, D. (1968). A two-dimensional interpolation function for
//! irregularly-spaced data. ACM National Conference.

use fieldsurf_core::{
    ContinuousSurface, Dataset, Error, Grid, GridCell, LatLng, NoProgress, Progress, Result,
};
use tracing::debug;

use crate::maybe_rayon::*;

/// Samples closer than this (degrees) count as coincident with the target
pub const COINCIDENT_DISTANCE: f64 = 1e-4;

/// Parameters for IDW interpolation
#[derive(Debug, Clone)]
pub struct IdwParams {
    /// Power parameter (default: 2.0).
    /// Higher values give more weight to nearby points.
    pub power: f64,
    /// Coincidence threshold in degrees. A sample closer than this to the
    /// target cell supplies the cell's value outright.
    pub snap_distance: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            snap_distance: COINCIDENT_DISTANCE,
        }
    }
}

impl IdwParams {
    pub fn with_power(power: f64) -> Self {
        Self {
            power,
            ..Default::default()
        }
    }
}

/// What to do with a sample inside the snap distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Coincident {
    /// The first such sample's value is the estimate
    Snap,
    /// Such samples are ignored
    Skip,
}

/// Weighted average of `samples` at `at`, `None` when nothing contributes.
pub(crate) fn weighted_estimate<'a, I>(
    at: &LatLng,
    samples: I,
    power: f64,
    snap_distance: f64,
    coincident: Coincident,
) -> Option<f64>
where
    I: IntoIterator<Item = &'a (LatLng, f64)>,
{
    let mut sum_w = 0.0;
    let mut sum_wz = 0.0;

    for (loc, value) in samples {
        let d = at.dist(loc);
        if d < snap_distance {
            match coincident {
                Coincident::Snap => return Some(*value),
                Coincident::Skip => continue,
            }
        }
        let w = 1.0 / d.powf(power);
        sum_w += w;
        sum_wz += w * value;
    }

    (sum_w > 0.0).then(|| sum_wz / sum_w)
}

/// IDW estimate at a single location.
///
/// `None` when `samples` is empty.
pub fn idw_at(at: &LatLng, samples: &[(LatLng, f64)], params: &IdwParams) -> Option<f64> {
    weighted_estimate(at, samples, params.power, params.snap_distance, Coincident::Snap)
}

/// Interpolate the dataset's target variable onto every grid node.
///
/// # Algorithm
///
/// For each node:
///
/// ```text
/// z = Σ(wi * zi) / Σ(wi)
/// where wi = 1 / d^p
/// ```
///
/// A sample within `snap_distance` of the node supplies the value outright.
/// Samples whose target is not numeric are skipped; a node no sample
/// contributes to is left out of the output.
///
/// # Errors
/// - `MissingVariable` when no point carries the target attribute
/// - `NonNumericVariable` when no point carries a numeric target
/// - `EmptyResult` when no node receives a value
pub fn idw(grid: &Grid, dataset: &Dataset, params: &IdwParams) -> Result<ContinuousSurface> {
    idw_with_progress(grid, dataset, params, &NoProgress)
}

/// [`idw`] with a per-cell cancellation checkpoint
pub fn idw_with_progress(
    grid: &Grid,
    dataset: &Dataset,
    params: &IdwParams,
    progress: &dyn Progress,
) -> Result<ContinuousSurface> {
    let target = &dataset.target_variable;
    if !dataset.has_variable(target) {
        return Err(Error::MissingVariable(target.clone()));
    }
    if !(params.power.is_finite() && params.power > 0.0) {
        return Err(Error::invalid("power", params.power, "must be finite and > 0"));
    }

    let samples: Vec<(LatLng, f64)> = dataset.numeric_samples().collect();
    if samples.is_empty() {
        return Err(Error::NonNumericVariable(target.clone()));
    }

    let estimates: Vec<Option<GridCell>> = grid
        .nodes()
        .into_par_iter()
        .map(|node| {
            progress.checkpoint()?;
            Ok(idw_at(node, &samples, params).map(|v| GridCell::new(node.lat, node.lng, v)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cells: Vec<GridCell> = estimates.into_iter().flatten().collect();
    if cells.is_empty() {
        return Err(Error::EmptyResult(
            "check the data and cell size".to_string(),
        ));
    }

    let surface = ContinuousSurface::from_cells(cells);
    debug!(
        "IDW: {} cells, range {:.4} to {:.4}",
        surface.len(),
        surface.min_val,
        surface.max_val
    );
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldsurf_core::{Bounds, CancelFlag, SamplePoint};

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                SamplePoint::new(0.0, 0.0).with("v", 10.0),
                SamplePoint::new(0.0, 1.0).with("v", 20.0),
                SamplePoint::new(1.0, 0.0).with("v", 30.0),
                SamplePoint::new(1.0, 1.0).with("v", 40.0),
            ],
            "v",
        )
    }

    fn grid(nodes: Vec<LatLng>) -> Grid {
        let n = nodes.len();
        Grid {
            bounds: Bounds::new(0.0, 0.0, 1.0, 1.0),
            cell_size: 0.5,
            rows: 1,
            cols: n,
            nodes,
        }
    }

    #[test]
    fn test_idw_center_is_average() {
        let g = grid(vec![LatLng::new(0.5, 0.5)]);
        let s = idw(&g, &dataset(), &IdwParams::default()).unwrap();
        assert!((s.grid[0].value - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_idw_coincident_snaps_exactly() {
        let g = grid(vec![LatLng::new(0.00005, 1.0), LatLng::new(1.0, 1.0)]);
        let s = idw(&g, &dataset(), &IdwParams::default()).unwrap();
        assert_eq!(s.grid[0].value, 20.0);
        assert_eq!(s.grid[1].value, 40.0);
    }

    #[test]
    fn test_idw_power_effect() {
        let g = grid(vec![LatLng::new(0.1, 0.1)]);
        let low = idw(&g, &dataset(), &IdwParams::with_power(1.0)).unwrap();
        let high = idw(&g, &dataset(), &IdwParams::with_power(4.0)).unwrap();
        assert!((high.grid[0].value - 10.0).abs() < (low.grid[0].value - 10.0).abs());
    }

    #[test]
    fn test_idw_skips_non_numeric_samples() {
        let mut ds = dataset();
        ds.points[3] = SamplePoint::new(1.0, 1.0).with("v", "missing");
        let g = grid(vec![LatLng::new(1.0, 1.0)]);
        let s = idw(&g, &ds, &IdwParams::default()).unwrap();
        assert!(s.grid[0].value < 40.0);
    }

    #[test]
    fn test_idw_missing_variable() {
        let ds = Dataset::new(dataset().points, "yield");
        let g = grid(vec![LatLng::new(0.5, 0.5)]);
        assert_eq!(
            idw(&g, &ds, &IdwParams::default()).unwrap_err(),
            Error::MissingVariable("yield".into())
        );
    }

    #[test]
    fn test_idw_empty_grid() {
        let g = grid(vec![]);
        assert!(matches!(
            idw(&g, &dataset(), &IdwParams::default()),
            Err(Error::EmptyResult(_))
        ));
    }

    #[test]
    fn test_idw_cancelled() {
        let flag = CancelFlag::new();
        flag.cancel();
        let g = grid(vec![LatLng::new(0.5, 0.5)]);
        assert_eq!(
            idw_with_progress(&g, &dataset(), &IdwParams::default(), &flag).unwrap_err(),
            Error::Cancelled
        );
    }

    #[test]
    fn test_weighted_estimate_skip_mode() {
        let samples = vec![(LatLng::new(0.0, 0.0), 100.0), (LatLng::new(0.0, 1.0), 5.0)];
        let at = LatLng::new(0.0, 0.0);
        let v = weighted_estimate(&at, &samples, 2.0, COINCIDENT_DISTANCE, Coincident::Skip);
        assert_eq!(v, Some(5.0));
        let none = weighted_estimate(&at, &samples[..1], 2.0, COINCIDENT_DISTANCE, Coincident::Skip);
        assert_eq!(none, None);
    }
}
