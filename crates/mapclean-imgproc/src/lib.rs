#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border handling for neighbourhood operations.
pub mod border;

/// color transformations module.
pub mod color;

/// connected component labelling of occupancy grids.
pub mod connected_components;

/// utilities to draw on images.
pub mod draw;

/// canny edge detection.
pub mod edges;

/// image filtering module.
pub mod filter;

/// size-gated filling of small gaps in occupancy grids.
pub mod gap_fill;

/// probabilistic hough transform.
pub mod hough;

/// binary morphology on occupancy grids.
pub mod morphology;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

mod union_find;
