//! # fieldsurf Core
//!
//! Core types, configuration and errors for the fieldsurf spatial-analysis
//! engine.
//!
//! This crate provides:
//! - `Dataset` / `SamplePoint`: geotagged samples with named attributes
//! - `Grid` / `GridCell`: the prediction lattice and its evaluated cells
//! - `AnalysisConfig`: the single configuration value every stage reads
//! - `AnalysisResult` / `Metrics`: what a run hands back to its caller
//! - `Progress`: cooperative progress and cancellation
//! - Algorithm trait for consistent API

pub mod config;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod progress;
pub mod result;

pub use config::{AnalysisConfig, ClassMethod, ExtentMode, HullTest, RpeMethod, RpeParams};
pub use dataset::{demo_dataset, AttributeValue, Dataset, DatasetSummary, SamplePoint};
pub use error::{Error, ErrorKind, Result};
pub use grid::{Bounds, Grid, GridCell, LatLng};
pub use progress::{CancelFlag, NoProgress, Progress, Stage};
pub use result::{AnalysisResult, AnalysisType, ContinuousSurface, Metrics};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{AnalysisConfig, ClassMethod, ExtentMode, HullTest, RpeMethod, RpeParams};
    pub use crate::dataset::{Dataset, SamplePoint};
    pub use crate::error::{Error, Result};
    pub use crate::grid::{Bounds, Grid, GridCell, LatLng};
    pub use crate::progress::{NoProgress, Progress};
    pub use crate::result::{AnalysisResult, AnalysisType, Metrics};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in fieldsurf.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
