//! End-to-end analysis pipeline
//!
//! Sequences the stages over one immutable configuration:
//! grid → IDW → classification → cross-validation → uncertainty → RPE →
//! metrics. Every stage consumes the previous stage's output and returns a
//! fresh vector; nothing is patched in place.

use fieldsurf_core::{
    AnalysisConfig, AnalysisResult, AnalysisType, Algorithm, Dataset, Error, NoProgress, Progress,
    Result, Stage,
};
use tracing::{debug, info, warn};

use crate::classification::classify;
use crate::grid::{analysis_extent, build_grid, GridParams};
use crate::interpolation::{idw_with_progress, IdwParams};
use crate::reliability::reliable_extent;
use crate::uncertainty::estimate_uncertainty_with_progress;
use crate::validation::{
    cross_validate_with_progress, cv_metrics, fold_ranges, project_onto_grid_with_progress,
    CvParams, ErrorMode,
};

/// Full spatial analysis of a dataset's target variable
#[derive(Debug, Clone, Default)]
pub struct SpatialAnalysis;

impl Algorithm for SpatialAnalysis {
    type Input = Dataset;
    type Output = AnalysisResult;
    type Params = AnalysisConfig;
    type Error = Error;

    fn name(&self) -> &'static str {
        "SpatialAnalysis"
    }

    fn description(&self) -> &'static str {
        "IDW surface with cross-validated accuracy, uncertainty and reliable prediction extent"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        run_analysis(&input, &params)
    }
}

/// Run the whole pipeline without progress reporting.
pub fn run_analysis(dataset: &Dataset, config: &AnalysisConfig) -> Result<AnalysisResult> {
    run_analysis_with_progress(dataset, config, &NoProgress)
}

/// Run the whole pipeline, reporting each stage to `progress`.
///
/// The analysis type follows from whether any predictor variable was
/// selected. Single-variable runs cross-validate in accuracy mode,
/// predictor-based runs in residual mode and additionally estimate
/// uncertainty, which then feeds the reliable extent.
///
/// # Errors
/// Any stage error aborts the run and is returned unchanged, including
/// `Cancelled` when `progress` requests it.
pub fn run_analysis_with_progress(
    dataset: &Dataset,
    config: &AnalysisConfig,
    progress: &dyn Progress,
) -> Result<AnalysisResult> {
    progress.stage(Stage::Validate);
    config.validate()?;
    dataset.validate()?;
    fold_ranges(dataset.len(), config.cv_folds)?;
    for name in &dataset.predictor_variables {
        if !dataset.has_variable(name) {
            warn!("Predictor '{}' is not present in the dataset", name);
        }
    }
    let analysis_type = dataset.analysis_type();
    info!(
        "Analysing '{}' ({}) over {} points",
        dataset.target_variable,
        analysis_type,
        dataset.len()
    );
    progress.checkpoint()?;

    progress.stage(Stage::BuildGrid);
    let extent = analysis_extent(dataset, config)?;
    let grid = build_grid(extent, &GridParams::from(config))?;
    progress.checkpoint()?;

    progress.stage(Stage::Interpolate);
    let continuous = idw_with_progress(&grid, dataset, &IdwParams::with_power(config.idw_power), progress)?;
    debug!(
        "Surface range: {:.3} .. {:.3}",
        continuous.min_val, continuous.max_val
    );

    let classified = if config.classify {
        progress.stage(Stage::Classify);
        Some(classify(&continuous.grid, config.num_classes, config.class_method)?)
    } else {
        None
    };
    progress.checkpoint()?;

    progress.stage(Stage::CrossValidate);
    let cv_params = CvParams {
        power: config.idw_power,
        folds: config.cv_folds,
        mode: ErrorMode::from(analysis_type),
    };
    let cv = cross_validate_with_progress(dataset, &cv_params, progress)?;
    let projected = project_onto_grid_with_progress(&continuous.grid, dataset, &cv, progress)?;
    let (accuracy, residuals) = match cv.mode {
        ErrorMode::Accuracy => (Some(projected), None),
        ErrorMode::Residual => (None, Some(projected)),
    };

    let uncertainty = match analysis_type {
        AnalysisType::PredictorBased => {
            progress.stage(Stage::Uncertainty);
            Some(estimate_uncertainty_with_progress(&continuous.grid, dataset, progress)?)
        }
        AnalysisType::SingleVariable => None,
    };

    progress.stage(Stage::ReliableExtent);
    let rpe = reliable_extent(
        &continuous.grid,
        dataset,
        uncertainty.as_deref(),
        analysis_type,
        &config.rpe,
        progress,
    )?;

    progress.stage(Stage::Assemble);
    let metrics = cv_metrics(&cv);
    info!(
        "Cross-validation: RMSE {:.4}, MAE {:.4}, R² {:.4}, bias {:.4} (n = {})",
        metrics.rmse, metrics.mae, metrics.r2, metrics.bias, metrics.n
    );

    let result = AnalysisResult {
        continuous,
        classified,
        accuracy,
        residuals,
        uncertainty,
        rpe,
        metrics,
        target_variable: dataset.target_variable.clone(),
        analysis_type,
    };
    progress.stage(Stage::Done);
    Ok(result)
}
