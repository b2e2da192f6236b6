//! Analysis configuration
//!
//! One immutable value threaded through every stage. Field names follow the
//! snake_case JSON form accepted by the CLI `--config` flag.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::Bounds;

/// Default cap on lattice size
pub const DEFAULT_MAX_CELLS: usize = 2500;

/// Class break strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassMethod {
    /// Evenly spaced breaks between min and max
    Equal,
    /// Breaks at evenly spaced ranks of the sorted values
    #[default]
    Quantile,
    /// Fixed-step rank breaks, an approximation of natural breaks
    Jenks,
}

impl std::str::FromStr for ClassMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "equal" | "equal-interval" => Ok(ClassMethod::Equal),
            "quantile" => Ok(ClassMethod::Quantile),
            "jenks" | "natural" => Ok(ClassMethod::Jenks),
            _ => Err(Error::invalid("class_method", s, "use equal, quantile or jenks")),
        }
    }
}

/// Where the prediction extent comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtentMode {
    /// Buffered bounding box of the dataset
    #[default]
    Auto,
    /// Same extent as `Auto`
    Manual,
    /// Caller-supplied `bounds`
    Upload,
}

impl std::str::FromStr for ExtentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ExtentMode::Auto),
            "manual" => Ok(ExtentMode::Manual),
            "upload" => Ok(ExtentMode::Upload),
            _ => Err(Error::invalid("extent_mode", s, "use auto, manual or upload")),
        }
    }
}

/// How the hull criterion tests containment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HullTest {
    /// Hull bounding box padded by `hull_padding` of its range
    #[default]
    PaddedBounds,
    /// Exact point-in-polygon (boundary counts as inside)
    Polygon,
}

/// Which reliability rule produces the RPE layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpeMethod {
    /// Hull, distance and (predictor-based only) uncertainty together
    #[default]
    Combined,
    /// Distance to the nearest sample only
    Distance,
    /// Gaussian kernel density of the samples
    KernelDensity,
}

/// Thresholds for the reliable prediction extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpeParams {
    pub max_distance_km: f64,
    pub uncertainty_threshold: f64,
    pub hull_padding: f64,
    pub hull_test: HullTest,
    pub method: RpeMethod,
    /// Kernel bandwidth in degrees
    pub density_bandwidth: f64,
    pub density_threshold: f64,
}

impl Default for RpeParams {
    fn default() -> Self {
        Self {
            max_distance_km: 10.0,
            uncertainty_threshold: 0.3,
            hull_padding: 0.1,
            hull_test: HullTest::PaddedBounds,
            method: RpeMethod::Combined,
            density_bandwidth: 0.1,
            density_threshold: 0.5,
        }
    }
}

/// Complete configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub idw_power: f64,
    pub cell_size_meters: f64,
    pub max_cells: usize,
    pub cv_folds: usize,
    pub classify: bool,
    pub class_method: ClassMethod,
    pub num_classes: usize,
    pub extent_mode: ExtentMode,
    pub bounds: Option<Bounds>,
    pub rpe: RpeParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            idw_power: 2.0,
            cell_size_meters: 100.0,
            max_cells: DEFAULT_MAX_CELLS,
            cv_folds: 5,
            classify: true,
            class_method: ClassMethod::Quantile,
            num_classes: 5,
            extent_mode: ExtentMode::Auto,
            bounds: None,
            rpe: RpeParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Check every option that does not depend on the dataset.
    pub fn validate(&self) -> Result<()> {
        if !(self.idw_power.is_finite() && self.idw_power > 0.0) {
            return Err(Error::invalid("idw_power", self.idw_power, "must be finite and > 0"));
        }
        if !(self.cell_size_meters.is_finite() && self.cell_size_meters > 0.0) {
            return Err(Error::invalid(
                "cell_size_meters",
                self.cell_size_meters,
                "must be finite and > 0",
            ));
        }
        if self.max_cells == 0 {
            return Err(Error::invalid("max_cells", 0, "must be at least 1"));
        }
        if self.cv_folds < 2 {
            return Err(Error::invalid("cv_folds", self.cv_folds, "must be at least 2"));
        }
        if self.num_classes < 2 {
            return Err(Error::invalid("num_classes", self.num_classes, "must be at least 2"));
        }
        if self.extent_mode == ExtentMode::Upload && self.bounds.is_none() {
            return Err(Error::invalid("bounds", "none", "required when extent_mode is upload"));
        }
        if let Some(b) = self.bounds.filter(|b| !b.in_range()) {
            return Err(Error::invalid(
                "bounds",
                format!("{:?}", b),
                "corners must be finite with |lat| <= 90 and |lng| <= 180",
            ));
        }
        let rpe = &self.rpe;
        if !(rpe.max_distance_km.is_finite() && rpe.max_distance_km >= 0.0) {
            return Err(Error::invalid("rpe.max_distance_km", rpe.max_distance_km, "must be >= 0"));
        }
        if !(rpe.hull_padding.is_finite() && rpe.hull_padding >= 0.0) {
            return Err(Error::invalid("rpe.hull_padding", rpe.hull_padding, "must be >= 0"));
        }
        if !(rpe.density_bandwidth.is_finite() && rpe.density_bandwidth > 0.0) {
            return Err(Error::invalid(
                "rpe.density_bandwidth",
                rpe.density_bandwidth,
                "must be > 0",
            ));
        }
        Ok(())
    }
}
