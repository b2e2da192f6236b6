//! Reliable Prediction Extent (RPE)
//!
//! Decides which grid cells are trustworthy:
//! - **combined**: hull, nearest-sample distance and uncertainty together
//! - **single**: one criterion at a time (distance, uncertainty, kernel density)

mod combined;
mod single;

pub use combined::{compute_rpe, compute_rpe_with_progress, HullRegion};
pub use single::{
    distance_extent, distance_extent_with_progress, kernel_density, kernel_density_extent,
    kernel_density_extent_with_progress, uncertainty_extent,
};

use fieldsurf_core::{AnalysisType, Dataset, GridCell, Progress, Result, RpeMethod, RpeParams};

/// Reliable extent under the configured [`RpeMethod`].
pub fn reliable_extent(
    cells: &[GridCell],
    dataset: &Dataset,
    uncertainty: Option<&[GridCell]>,
    analysis_type: AnalysisType,
    params: &RpeParams,
    progress: &dyn Progress,
) -> Result<Vec<GridCell>> {
    match params.method {
        RpeMethod::Combined => {
            compute_rpe_with_progress(cells, dataset, uncertainty, analysis_type, params, progress)
        }
        RpeMethod::Distance => {
            distance_extent_with_progress(cells, dataset, params.max_distance_km, progress)
        }
        RpeMethod::KernelDensity => kernel_density_extent_with_progress(
            cells,
            dataset,
            params.density_bandwidth,
            params.density_threshold,
            progress,
        ),
    }
}
