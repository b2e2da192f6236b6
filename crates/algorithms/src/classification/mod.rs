//! Classification of interpolated surfaces
//!
//! Buckets continuous values into ordered classes using equal-interval,
//! quantile or approximate natural (Jenks) breaks.

mod breaks;

pub use breaks::{assign_classes, class_breaks, class_of, classify};
