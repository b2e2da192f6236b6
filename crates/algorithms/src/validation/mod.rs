//! Accuracy assessment
//!
//! - **cross_validation**: k-fold hold-out of IDW and nearest-sample
//!   projection of per-point error onto the grid
//! - **metrics**: RMSE, MAE, R² and bias over the held-out predictions

pub mod cross_validation;
pub mod metrics;

pub use cross_validation::{
    cross_validate, cross_validate_with_progress, fold_ranges, project_onto_grid,
    project_onto_grid_with_progress, CrossValidation, CvParams, CvRecord, ErrorMode, PointKey,
};
pub use metrics::{cv_metrics, summarize};
