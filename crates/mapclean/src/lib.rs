#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use mapclean_image as image;

#[doc(inline)]
pub use mapclean_imgproc as imgproc;

#[doc(inline)]
pub use mapclean_io as io;

/// Pipeline configuration, loadable from JSON.
pub mod config;

/// Error type of the map cleaning pipeline.
pub mod error;

/// Map cleaning and edge extraction stages, and the file level driver.
pub mod pipeline;

pub use config::{CleanConfig, EdgeConfig, PipelineConfig};
pub use error::PipelineError;
pub use pipeline::{
    clean_map, extract_edges, output_paths, process_map_file, EdgeExtraction, OutputPaths,
};
