//! Spatial interpolation
//!
//! Interpolate scattered sample values onto the prediction lattice:
//! - IDW: Inverse Distance Weighting with a coincident-point snap

mod idw;

pub use idw::{idw, idw_at, idw_with_progress, IdwParams, COINCIDENT_DISTANCE};

pub(crate) use idw::{weighted_estimate, Coincident};
