//! Local prediction uncertainty
//!
//! For each cell, the inverse-distance weighted mean of
//! `|observed - cell value|` over all samples, divided by the standard
//! deviation of the target and clipped to [0, 1]. Used for predictor-based
//! analyses only.

use fieldsurf_core::{Dataset, Error, GridCell, LatLng, NoProgress, Progress, Result};

use crate::maybe_rayon::*;

/// Added to every distance so a coincident sample gets a large finite weight
pub const UNCERTAINTY_EPSILON: f64 = 0.001;

/// Population mean and standard deviation
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Uncertainty of one cell given the samples and the target's spread.
fn cell_uncertainty(at: &LatLng, value: f64, samples: &[(LatLng, f64)], std: f64) -> f64 {
    if std <= 0.0 {
        // Every sample agrees; nothing to normalize against
        return 0.0;
    }
    let mut sum_w = 0.0;
    let mut sum_err = 0.0;
    for (loc, observed) in samples {
        let w = 1.0 / (at.dist(loc) + UNCERTAINTY_EPSILON);
        sum_w += w;
        sum_err += w * (observed - value).abs();
    }
    (sum_err / sum_w / std).clamp(0.0, 1.0)
}

/// Attach an `uncertainty` in [0, 1] to every cell.
///
/// # Errors
/// `NonNumericVariable` when the dataset has no numeric target values.
pub fn estimate_uncertainty(cells: &[GridCell], dataset: &Dataset) -> Result<Vec<GridCell>> {
    estimate_uncertainty_with_progress(cells, dataset, &NoProgress)
}

/// [`estimate_uncertainty`] with a per-cell cancellation checkpoint
pub fn estimate_uncertainty_with_progress(
    cells: &[GridCell],
    dataset: &Dataset,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    let samples: Vec<(LatLng, f64)> = dataset.numeric_samples().collect();
    if samples.is_empty() {
        return Err(Error::NonNumericVariable(dataset.target_variable.clone()));
    }
    let values: Vec<f64> = samples.iter().map(|(_, v)| *v).collect();
    let (_, std) = mean_std(&values);

    cells
        .into_par_iter()
        .map(|cell| {
            progress.checkpoint()?;
            let mut out = cell.clone();
            out.uncertainty = Some(cell_uncertainty(&cell.location(), cell.value, &samples, std));
            Ok(out)
        })
        .collect()
}
