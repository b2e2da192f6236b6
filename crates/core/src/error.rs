//! Error types for fieldsurf

use thiserror::Error;

/// Broad failure family of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inputs or configuration cannot produce a meaningful run.
    Validation,
    /// The inputs were accepted but a stage produced nothing usable.
    Computation,
    /// The caller aborted the run.
    Cancelled,
}

/// Main error type for fieldsurf operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Dataset has {found} points, at least {required} are required")]
    TooFewPoints { found: usize, required: usize },

    #[error("Target variable '{0}' not found in dataset")]
    MissingVariable(String),

    #[error("Variable '{0}' has no numeric values")]
    NonNumericVariable(String),

    #[error("Invalid fold count: {folds} folds for {points} points (need 2 <= folds < points)")]
    InvalidFolds { folds: usize, points: usize },

    #[error("Extent has zero area: lat range {lat_range}, lng range {lng_range}")]
    EmptyExtent { lat_range: f64, lng_range: f64 },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("No valid grid cells generated ({0})")]
    EmptyResult(String),

    #[error("No sample points available to {0}")]
    NoNeighbors(&'static str),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Which family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TooFewPoints { .. }
            | Error::MissingVariable(_)
            | Error::NonNumericVariable(_)
            | Error::InvalidFolds { .. }
            | Error::EmptyExtent { .. }
            | Error::InvalidParameter { .. }
            | Error::LengthMismatch { .. } => ErrorKind::Validation,
            Error::EmptyResult(_) | Error::NoNeighbors(_) => ErrorKind::Computation,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Result type alias for fieldsurf operations
pub type Result<T> = std::result::Result<T, Error>;
