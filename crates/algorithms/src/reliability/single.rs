//! Single-criterion reliability extents
//!
//! Each keeps the cells passing one test: distance to the nearest sample,
//! an uncertainty ceiling, or a Gaussian kernel density floor.

use std::f64::consts::PI;

use fieldsurf_core::{Dataset, Error, GridCell, LatLng, NoProgress, Progress, Result};

use crate::geometry::{km_to_degrees, nearest_distance};
use crate::maybe_rayon::*;

fn mark_reliable(cell: &GridCell) -> GridCell {
    let mut out = cell.clone();
    out.reliable = Some(true);
    out
}

fn keep_where<F>(cells: &[GridCell], progress: &dyn Progress, test: F) -> Result<Vec<GridCell>>
where
    F: Fn(&GridCell) -> bool + Sync + Send,
{
    let kept: Vec<Option<GridCell>> = cells
        .into_par_iter()
        .map(|cell| {
            progress.checkpoint()?;
            Ok(test(cell).then(|| mark_reliable(cell)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(kept.into_iter().flatten().collect())
}

/// Cells whose nearest sample is within `max_distance_km`.
pub fn distance_extent(cells: &[GridCell], dataset: &Dataset, max_distance_km: f64) -> Result<Vec<GridCell>> {
    distance_extent_with_progress(cells, dataset, max_distance_km, &NoProgress)
}

/// [`distance_extent`] with a per-cell cancellation checkpoint
pub fn distance_extent_with_progress(
    cells: &[GridCell],
    dataset: &Dataset,
    max_distance_km: f64,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    if dataset.is_empty() {
        return Err(Error::NoNeighbors("compute the distance extent"));
    }
    let locations = dataset.locations();
    let max_distance = km_to_degrees(max_distance_km);
    keep_where(cells, progress, |cell| {
        nearest_distance(&cell.location(), &locations).is_some_and(|d| d <= max_distance)
    })
}

/// Cells whose `uncertainty` is at most `threshold`.
///
/// Cells without an uncertainty value pass.
pub fn uncertainty_extent(cells: &[GridCell], threshold: f64) -> Vec<GridCell> {
    cells
        .iter()
        .filter(|c| c.uncertainty.map_or(true, |u| u <= threshold))
        .map(mark_reliable)
        .collect()
}

/// Gaussian kernel density of the samples at `at`, normalized by
/// `n * bandwidth * sqrt(2π)`.
pub fn kernel_density(at: &LatLng, locations: &[LatLng], bandwidth: f64) -> f64 {
    if locations.is_empty() {
        return 0.0;
    }
    let sum: f64 = locations
        .iter()
        .map(|p| {
            let z = at.dist(p) / bandwidth;
            (-z * z / 2.0).exp()
        })
        .sum();
    sum / (locations.len() as f64 * bandwidth * (2.0 * PI).sqrt())
}

/// Cells where the sample kernel density is at least `threshold`.
pub fn kernel_density_extent(
    cells: &[GridCell],
    dataset: &Dataset,
    bandwidth: f64,
    threshold: f64,
) -> Result<Vec<GridCell>> {
    kernel_density_extent_with_progress(cells, dataset, bandwidth, threshold, &NoProgress)
}

/// [`kernel_density_extent`] with a per-cell cancellation checkpoint
pub fn kernel_density_extent_with_progress(
    cells: &[GridCell],
    dataset: &Dataset,
    bandwidth: f64,
    threshold: f64,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    if !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Err(Error::invalid("density_bandwidth", bandwidth, "must be > 0"));
    }
    if dataset.is_empty() {
        return Err(Error::NoNeighbors("compute the kernel density extent"));
    }
    let locations = dataset.locations();
    keep_where(cells, progress, |cell| {
        kernel_density(&cell.location(), &locations, bandwidth) >= threshold
    })
}
