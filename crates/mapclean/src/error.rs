use std::path::PathBuf;

use mapclean_image::ImageError;
use mapclean_io::IoError;

/// An error type for the map cleaning pipeline.
///
/// Every variant is terminal for the current map.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The input map is missing or cannot be decoded.
    #[error("Cannot load input map {path}. {source}")]
    InputNotFound {
        /// The input path.
        path: PathBuf,
        /// The underlying read or decode error.
        #[source]
        source: IoError,
    },

    /// The input path has no file name to derive output names from.
    #[error("Input path has no file name: {0}")]
    InvalidInputPath(PathBuf),

    /// A processing parameter or the input layout was rejected.
    #[error("Invalid argument. {0}")]
    InvalidArgument(#[from] ImageError),

    /// The configuration file cannot be read.
    #[error("Cannot read configuration {path}. {source}")]
    ConfigRead {
        /// The configuration path.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::PipelineConfig`].
    #[error("Invalid configuration {path}. {source}")]
    InvalidConfig {
        /// The configuration path.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// An output could not be written.
    #[error("Failed to write {path}. {source}")]
    IoFailure {
        /// The output path.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: IoError,
    },
}
