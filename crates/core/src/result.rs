//! Analysis outputs

use serde::{Deserialize, Serialize};

use crate::grid::GridCell;

/// Kind of analysis, derived from the predictor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    SingleVariable,
    PredictorBased,
}

impl AnalysisType {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::SingleVariable => "single-variable",
            AnalysisType::PredictorBased => "predictor-based",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Summary accuracy statistics from cross-validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    /// Mean of (predicted - observed); positive means overprediction.
    ///
    /// The sign is opposite to the per-cell `GridCell::residual` layer,
    /// which stores observed - predicted.
    pub bias: f64,
    /// Number of held-out predictions the statistics cover
    pub n: usize,
}

/// Interpolated surface and its value range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSurface {
    pub grid: Vec<GridCell>,
    pub min_val: f64,
    pub max_val: f64,
}

impl ContinuousSurface {
    /// Wrap cells, computing the value range.
    ///
    /// An empty grid yields an inverted infinite range.
    pub fn from_cells(grid: Vec<GridCell>) -> Self {
        let (min_val, max_val) = grid
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
                (lo.min(c.value), hi.max(c.value))
            });
        Self { grid, min_val, max_val }
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.grid.iter().map(|c| c.value).collect()
    }
}

/// Everything one run produces. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub continuous: ContinuousSurface,
    pub classified: Option<Vec<GridCell>>,
    pub accuracy: Option<Vec<GridCell>>,
    pub residuals: Option<Vec<GridCell>>,
    pub uncertainty: Option<Vec<GridCell>>,
    pub rpe: Vec<GridCell>,
    pub metrics: Metrics,
    pub target_variable: String,
    pub analysis_type: AnalysisType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_range() {
        let s = ContinuousSurface::from_cells(vec![
            GridCell::new(0.0, 0.0, 3.0),
            GridCell::new(0.0, 1.0, -1.0),
            GridCell::new(1.0, 0.0, 7.5),
        ]);
        assert_eq!(s.min_val, -1.0);
        assert_eq!(s.max_val, 7.5);
        assert_eq!(s.values(), vec![3.0, -1.0, 7.5]);
    }

    #[test]
    fn test_analysis_type_serde() {
        let json = serde_json::to_string(&AnalysisType::PredictorBased).unwrap();
        assert_eq!(json, "\"predictor-based\"");
        assert_eq!(AnalysisType::SingleVariable.to_string(), "single-variable");
    }
}
