//! Prediction lattice construction
//!
//! Lays a square-celled lattice over an extent. The requested cell size is
//! grown, never the lattice truncated, until the node count fits the cap.

use fieldsurf_core::{AnalysisConfig, Bounds, Dataset, Error, ExtentMode, Grid, LatLng, Result};
use tracing::debug;

use crate::geometry::{bounding_box, meters_to_degrees};

/// Growth factor applied while the lattice is still over the cap
const STEP_GROWTH: f64 = 1.01;

/// Parameters for lattice construction
#[derive(Debug, Clone)]
pub struct GridParams {
    /// Requested cell size in meters (converted at 111320 m per degree)
    pub cell_size_meters: f64,
    /// Upper bound on the number of nodes
    pub max_cells: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cell_size_meters: 100.0,
            max_cells: fieldsurf_core::config::DEFAULT_MAX_CELLS,
        }
    }
}

impl From<&AnalysisConfig> for GridParams {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            cell_size_meters: cfg.cell_size_meters,
            max_cells: cfg.max_cells,
        }
    }
}

/// Prediction extent for a dataset under the configured extent mode.
pub fn analysis_extent(dataset: &Dataset, config: &AnalysisConfig) -> Result<Bounds> {
    match config.extent_mode {
        ExtentMode::Auto | ExtentMode::Manual => bounding_box(&dataset.locations())
            .ok_or(Error::TooFewPoints { found: 0, required: 1 }),
        ExtentMode::Upload => config
            .bounds
            .ok_or_else(|| Error::invalid("bounds", "none", "required when extent_mode is upload")),
    }
}

/// Nodes the accumulation loop visits on one axis: `start, start+step, ...`
/// while `<= end`.
///
/// # Errors
/// `InvalidParameter` when `step` is too small to advance past a coordinate.
fn axis_count(start: f64, end: f64, step: f64) -> Result<usize> {
    let mut n = 0;
    let mut v = start;
    while v <= end {
        n += 1;
        let next = v + step;
        if next <= v {
            return Err(Error::invalid(
                "cell_size",
                step,
                format!("step does not advance past coordinate {}", v),
            ));
        }
        v = next;
    }
    Ok(n)
}

/// Closed-form node estimate, one per step plus the starting node.
fn estimated_nodes(lat_range: f64, lng_range: f64, step: f64) -> f64 {
    ((lat_range / step).floor() + 1.0) * ((lng_range / step).floor() + 1.0)
}

/// Build the lattice over `bounds`.
///
/// # Algorithm
///
/// 1. Cell size in degrees = `cell_size_meters / 111320`.
/// 2. If `(lat_range / size) * (lng_range / size)` exceeds `max_cells`, the
///    size becomes `sqrt(lat_range * lng_range / max_cells)`.
/// 3. While the inclusive node count still exceeds `max_cells`, the size
///    grows by 1%.
/// 4. Nodes are enumerated row-major from south-west, inclusive of both
///    bounds, by repeated addition of the step.
///
/// Step accumulation can leave the last row or column a hair short of the
/// north or east bound; that row is simply absent.
///
/// # Errors
/// - `EmptyExtent` when either range is zero (or negative)
/// - `InvalidParameter` when the step cannot advance past the extent's
///   coordinates at f64 precision
pub fn build_grid(bounds: Bounds, params: &GridParams) -> Result<Grid> {
    let lat_range = bounds.lat_range();
    let lng_range = bounds.lng_range();

    if !(lat_range.is_finite() && lng_range.is_finite()) {
        return Err(Error::invalid(
            "bounds",
            format!("{:?}", bounds),
            "must be finite",
        ));
    }
    if lat_range <= 0.0 || lng_range <= 0.0 {
        return Err(Error::EmptyExtent { lat_range, lng_range });
    }
    if !(params.cell_size_meters.is_finite() && params.cell_size_meters > 0.0) {
        return Err(Error::invalid(
            "cell_size_meters",
            params.cell_size_meters,
            "must be finite and > 0",
        ));
    }
    if params.max_cells == 0 {
        return Err(Error::invalid("max_cells", 0, "must be at least 1"));
    }

    let max_cells = params.max_cells as f64;
    let mut step = meters_to_degrees(params.cell_size_meters);

    let estimated = (lat_range / step) * (lng_range / step);
    if estimated > max_cells {
        step = (lat_range * lng_range / max_cells).sqrt();
        debug!("Cell size adjusted to {:.6} degrees", step);
    }
    while estimated_nodes(lat_range, lng_range, step) > max_cells {
        step *= STEP_GROWTH;
    }

    loop {
        let rows = axis_count(bounds.south, bounds.north, step)?;
        let cols = axis_count(bounds.west, bounds.east, step)?;
        if rows * cols <= params.max_cells {
            let nodes = enumerate(&bounds, step, rows * cols);
            debug!(
                "Grid: {} x {} = {} cells, step {:.6} degrees",
                rows,
                cols,
                nodes.len(),
                step
            );
            return Ok(Grid {
                bounds,
                cell_size: step,
                rows,
                cols,
                nodes,
            });
        }
        step *= STEP_GROWTH;
    }
}

fn enumerate(bounds: &Bounds, step: f64, capacity: usize) -> Vec<LatLng> {
    let mut nodes = Vec::with_capacity(capacity);
    let mut lat = bounds.south;
    while lat <= bounds.north {
        let mut lng = bounds.west;
        while lng <= bounds.east {
            nodes.push(LatLng::new(lat, lng));
            lng += step;
        }
        lat += step;
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(cell_size_meters: f64) -> GridParams {
        GridParams {
            cell_size_meters,
            ..Default::default()
        }
    }

    #[test]
    fn test_small_extent_keeps_requested_size() {
        // 0.01 degree square, 1113.2 m cells -> 0.01 degree step
        let b = Bounds::new(0.0, 0.0, 0.1, 0.1);
        let grid = build_grid(b, &params(1113.2)).unwrap();
        assert!((grid.cell_size - 0.01).abs() < 1e-12);
        assert_eq!(grid.len(), grid.rows * grid.cols);
        assert!(grid.rows >= 10 && grid.rows <= 11);
    }

    #[test]
    fn test_large_extent_capped() {
        let b = Bounds::new(-10.0, -20.0, 10.0, 20.0);
        let grid = build_grid(b, &params(10.0)).unwrap();
        assert!(grid.len() <= 2500, "got {}", grid.len());
        assert!(grid.len() > 2000, "cap should be approached, got {}", grid.len());
    }

    #[test]
    fn test_elongated_extent_capped() {
        let b = Bounds::new(0.0, 0.0, 0.001, 10.0);
        let grid = build_grid(b, &params(1.0)).unwrap();
        assert!(grid.len() <= 2500);
        assert!(grid.rows >= 1);
    }

    #[test]
    fn test_row_major_from_south_west() {
        let b = Bounds::new(0.0, 0.0, 1.0, 2.0);
        let grid = build_grid(b, &params(111_320.0)).unwrap();
        assert_eq!((grid.rows, grid.cols), (2, 3));
        assert_eq!(grid.nodes[0], LatLng::new(0.0, 0.0));
        assert_eq!(grid.nodes[1], LatLng::new(0.0, 1.0));
        assert_eq!(grid.nodes[3], LatLng::new(1.0, 0.0));
        assert!(grid.nodes.iter().all(|p| b.contains(p)));
    }

    #[test]
    fn test_zero_area_extent() {
        let b = Bounds::new(1.0, 0.0, 1.0, 5.0);
        assert!(matches!(
            build_grid(b, &params(100.0)),
            Err(Error::EmptyExtent { .. })
        ));
    }

    #[test]
    fn test_bad_cell_size() {
        let b = Bounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            build_grid(b, &params(0.0)),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_step_below_coordinate_precision() {
        // Spacing between f64 values near 1e16 is 2, far above the step
        let b = Bounds::new(1e16, 0.0, 1e16 + 4.0, 1.0);
        assert!(matches!(
            build_grid(b, &params(100.0)),
            Err(Error::InvalidParameter { name: "cell_size", .. })
        ));
    }

    #[test]
    fn test_custom_cap() {
        let b = Bounds::new(0.0, 0.0, 1.0, 1.0);
        let p = GridParams {
            cell_size_meters: 10.0,
            max_cells: 16,
        };
        let grid = build_grid(b, &p).unwrap();
        assert!(grid.len() <= 16);
    }

    #[test]
    fn test_upload_extent_requires_bounds() {
        let ds = fieldsurf_core::demo_dataset();
        let cfg = AnalysisConfig {
            extent_mode: ExtentMode::Upload,
            ..Default::default()
        };
        assert!(analysis_extent(&ds, &cfg).is_err());

        let bounds = Bounds::new(9.0, 8.6, 9.2, 8.8);
        let cfg = AnalysisConfig {
            bounds: Some(bounds),
            ..cfg
        };
        assert_eq!(analysis_extent(&ds, &cfg).unwrap(), bounds);
    }
}
