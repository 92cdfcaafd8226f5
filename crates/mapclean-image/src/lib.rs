#![deny(missing_docs)]
//! Image and occupancy grid types for map cleaning

/// image representation for map processing purposes.
pub mod image;

/// binary occupancy grid helpers.
pub mod binary;

/// Error types for the image module.
pub mod error;

pub use crate::binary::{BinaryImage, FREE, OCCUPIED};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
