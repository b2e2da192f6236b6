//! Progress reporting and cooperative cancellation
//!
//! Long grid and fold loops poll [`Progress::is_cancelled`] between units of
//! work. A cancelled stage returns [`Error::Cancelled`] and its partial output
//! is dropped.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Validate,
    BuildGrid,
    Interpolate,
    Classify,
    CrossValidate,
    Uncertainty,
    ReliableExtent,
    Assemble,
    Done,
}

impl Stage {
    /// Approximate completion when the stage starts
    pub fn percent(&self) -> u8 {
        match self {
            Stage::Validate => 10,
            Stage::BuildGrid => 20,
            Stage::Interpolate => 40,
            Stage::Classify => 55,
            Stage::CrossValidate => 65,
            Stage::Uncertainty => 72,
            Stage::ReliableExtent => 80,
            Stage::Assemble => 95,
            Stage::Done => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Validate => "Validating data",
            Stage::BuildGrid => "Preparing interpolation grid",
            Stage::Interpolate => "Running interpolation",
            Stage::Classify => "Classifying surface",
            Stage::CrossValidate => "Cross-validating",
            Stage::Uncertainty => "Estimating prediction uncertainty",
            Stage::ReliableExtent => "Computing reliable prediction extent",
            Stage::Assemble => "Assembling results",
            Stage::Done => "Complete",
        }
    }
}

/// Observer of a running analysis.
///
/// Implementations must be cheap to poll: `is_cancelled` is called once per
/// grid cell.
pub trait Progress: Send + Sync {
    fn stage(&self, _stage: Stage) {}

    fn is_cancelled(&self) -> bool {
        false
    }

    /// `Err(Cancelled)` once cancellation was requested
    fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Ignores notifications and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// A cancellation switch another thread can flip
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

impl Progress for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
