//! Filter operations
//!
//! Smoothing filters used ahead of thresholding and edge detection.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
