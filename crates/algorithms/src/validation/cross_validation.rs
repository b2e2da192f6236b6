//! k-fold cross-validation of IDW
//!
//! The dataset is cut into contiguous folds in input order. Each held-out
//! point is re-estimated from the points outside its fold, and the per-point
//! error is later copied onto the grid by nearest sample.

use std::collections::HashMap;
use std::ops::Range;

use fieldsurf_core::{AnalysisType, Dataset, Error, GridCell, LatLng, NoProgress, Progress, Result};
use tracing::debug;

use crate::interpolation::{weighted_estimate, Coincident, COINCIDENT_DISTANCE};
use crate::maybe_rayon::*;

/// Which error a run stores per point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// `|observed - predicted|`
    Accuracy,
    /// `observed - predicted`; positive means underprediction
    Residual,
}

impl From<AnalysisType> for ErrorMode {
    fn from(t: AnalysisType) -> Self {
        match t {
            AnalysisType::SingleVariable => ErrorMode::Accuracy,
            AnalysisType::PredictorBased => ErrorMode::Residual,
        }
    }
}

/// A sample location rounded to 4 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    lat_e4: i64,
    lng_e4: i64,
}

impl PointKey {
    pub fn of(p: &LatLng) -> Self {
        Self {
            lat_e4: (p.lat * 1e4).round() as i64,
            lng_e4: (p.lng * 1e4).round() as i64,
        }
    }
}

impl std::fmt::Display for PointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.4}_{:.4}",
            self.lat_e4 as f64 / 1e4,
            self.lng_e4 as f64 / 1e4
        )
    }
}

/// Parameters for cross-validation
#[derive(Debug, Clone)]
pub struct CvParams {
    /// IDW power used for the held-out estimates
    pub power: f64,
    /// Number of folds, `2 <= folds < n`
    pub folds: usize,
    pub mode: ErrorMode,
}

impl Default for CvParams {
    fn default() -> Self {
        Self {
            power: 2.0,
            folds: 5,
            mode: ErrorMode::Accuracy,
        }
    }
}

/// One held-out prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvRecord {
    /// Position of the point in the dataset
    pub index: usize,
    pub key: PointKey,
    pub observed: f64,
    pub predicted: f64,
}

impl CvRecord {
    pub fn residual(&self) -> f64 {
        self.observed - self.predicted
    }
}

/// All held-out predictions of one run
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidation {
    pub mode: ErrorMode,
    pub records: Vec<CvRecord>,
}

impl CrossValidation {
    /// The stored error for a record under this run's mode
    pub fn error(&self, record: &CvRecord) -> f64 {
        match self.mode {
            ErrorMode::Accuracy => record.residual().abs(),
            ErrorMode::Residual => record.residual(),
        }
    }

    /// Error per rounded location. Later points overwrite earlier ones that
    /// round to the same key.
    pub fn errors(&self) -> HashMap<PointKey, f64> {
        self.records.iter().map(|r| (r.key, self.error(r))).collect()
    }
}

/// Contiguous fold ranges over `n` items.
///
/// Each fold holds `n / folds` items; the last fold absorbs the remainder.
///
/// # Errors
/// `InvalidFolds` unless `2 <= folds < n`.
pub fn fold_ranges(n: usize, folds: usize) -> Result<Vec<Range<usize>>> {
    if folds < 2 || folds >= n {
        return Err(Error::InvalidFolds { folds, points: n });
    }
    let size = n / folds;
    Ok((0..folds)
        .map(|f| {
            let start = f * size;
            let end = if f == folds - 1 { n } else { start + size };
            start..end
        })
        .collect())
}

/// Run k-fold cross-validation of IDW on the dataset's target variable.
///
/// Training points within 1e-4 degrees of the held-out point are ignored. A
/// held-out point with no usable training neighbor is predicted as its own
/// observed value. Points without a numeric target are neither held out nor
/// used for training.
pub fn cross_validate(dataset: &Dataset, params: &CvParams) -> Result<CrossValidation> {
    cross_validate_with_progress(dataset, params, &NoProgress)
}

/// [`cross_validate`] with a per-fold cancellation checkpoint
pub fn cross_validate_with_progress(
    dataset: &Dataset,
    params: &CvParams,
    progress: &dyn Progress,
) -> Result<CrossValidation> {
    let folds = fold_ranges(dataset.len(), params.folds)?;
    let values: Vec<Option<f64>> = (0..dataset.len()).map(|i| dataset.numeric_value(i)).collect();
    let locations = dataset.locations();

    let per_fold: Vec<Vec<CvRecord>> = folds
        .into_par_iter()
        .map(|test| {
            progress.checkpoint()?;

            let training: Vec<(LatLng, f64)> = (0..dataset.len())
                .filter(|i| !test.contains(i))
                .filter_map(|i| values[i].map(|v| (locations[i], v)))
                .collect();

            Ok(test
                .filter_map(|i| {
                    let observed = values[i]?;
                    let at = locations[i];
                    let predicted = weighted_estimate(
                        &at,
                        &training,
                        params.power,
                        COINCIDENT_DISTANCE,
                        Coincident::Skip,
                    )
                    .unwrap_or(observed);
                    Some(CvRecord {
                        index: i,
                        key: PointKey::of(&at),
                        observed,
                        predicted,
                    })
                })
                .collect())
        })
        .collect::<Result<Vec<_>>>()?;

    let records: Vec<CvRecord> = per_fold.into_iter().flatten().collect();
    debug!("Cross-validation: {} held-out predictions", records.len());

    Ok(CrossValidation {
        mode: params.mode,
        records,
    })
}

/// Copy each point's stored error onto the grid by nearest sample.
///
/// Every cell takes the error of the dataset point closest to it (first one
/// on ties). Points with no stored error contribute 0. The error lands in
/// `accuracy` or `residual` depending on the run's mode.
///
/// # Errors
/// `NoNeighbors` when the dataset is empty.
pub fn project_onto_grid(
    cells: &[GridCell],
    dataset: &Dataset,
    cv: &CrossValidation,
) -> Result<Vec<GridCell>> {
    project_onto_grid_with_progress(cells, dataset, cv, &NoProgress)
}

/// [`project_onto_grid`] with a per-cell cancellation checkpoint
pub fn project_onto_grid_with_progress(
    cells: &[GridCell],
    dataset: &Dataset,
    cv: &CrossValidation,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    if dataset.is_empty() {
        return Err(Error::NoNeighbors("project cross-validation errors"));
    }
    let errors = cv.errors();
    let locations = dataset.locations();

    cells
        .into_par_iter()
        .map(|cell| {
            progress.checkpoint()?;
            let here = cell.location();

            let mut min_dist = f64::INFINITY;
            let mut nearest = &locations[0];
            for loc in &locations {
                let d = here.dist_sq(loc);
                if d < min_dist {
                    min_dist = d;
                    nearest = loc;
                }
            }
            let error = errors.get(&PointKey::of(nearest)).copied().unwrap_or(0.0);

            let mut out = cell.clone();
            match cv.mode {
                ErrorMode::Accuracy => out.accuracy = Some(error),
                ErrorMode::Residual => out.residual = Some(error),
            }
            Ok(out)
        })
        .collect()
}
