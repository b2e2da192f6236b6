//! # fieldsurf Algorithms
//!
//! Spatial analysis of geotagged field samples.
//!
//! ## Available Algorithm Categories
//!
//! - **geometry**: planar distance, buffered bounding box, convex hull
//! - **grid**: prediction lattice under a node cap
//! - **interpolation**: inverse distance weighting
//! - **validation**: k-fold cross-validation, projection onto the grid, metrics
//! - **uncertainty**: local normalized prediction uncertainty
//! - **classification**: equal-interval, quantile and Jenks-style breaks
//! - **reliability**: reliable prediction extent (RPE)
//! - **analysis**: the end-to-end pipeline

pub mod analysis;
pub mod classification;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub(crate) mod maybe_rayon;
pub mod reliability;
pub mod uncertainty;
pub mod validation;

pub use analysis::{run_analysis, run_analysis_with_progress, SpatialAnalysis};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{run_analysis, run_analysis_with_progress, SpatialAnalysis};
    pub use crate::classification::{class_breaks, classify};
    pub use crate::geometry::{bounding_box, convex_hull, planar_distance};
    pub use crate::grid::{analysis_extent, build_grid, GridParams};
    pub use crate::interpolation::{idw, idw_at, IdwParams};
    pub use crate::reliability::{compute_rpe, reliable_extent};
    pub use crate::uncertainty::estimate_uncertainty;
    pub use crate::validation::{cross_validate, cv_metrics, project_onto_grid, CvParams, ErrorMode};
    pub use fieldsurf_core::prelude::*;
}
