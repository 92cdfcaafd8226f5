use std::path::{Path, PathBuf};

use mapclean_image::{BinaryImage, Image, ImageError};
use mapclean_imgproc::{
    color, draw, edges,
    filter::{gaussian_blur, median_blur},
    gap_fill::{fill_gaps, max_gap_pixels},
    hough::{hough_lines_p, LineSegment},
    morphology::{self, Kernel},
    threshold::threshold_binary_inverse,
};
use mapclean_io::{
    functional::{read_image_any, GenericImage},
    png::{write_image_png_mono8, write_image_png_rgb8},
};

use crate::{
    config::{CleanConfig, EdgeConfig, PipelineConfig},
    error::PipelineError,
};

/// The products of the edge and line extraction.
#[derive(Debug, Clone)]
pub struct EdgeExtraction {
    /// Canny edge map, `255` on edges.
    pub edges: Image<u8, 1>,
    /// Detected line segments, possibly none.
    pub lines: Vec<LineSegment>,
    /// The edge map in RGB with the segments drawn on top.
    pub overlay: Image<u8, 3>,
}

/// Where [`process_map_file`] writes its two images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The cleaned map, `<stem>_processed.png`.
    pub processed: PathBuf,
    /// The edge overlay, `<stem>_edges.png`.
    pub edges: PathBuf,
}

/// Clean a grayscale map: median denoise, inverse threshold, closing and gap filling.
///
/// Dark cells, below `binarize_threshold`, are obstacles and come back as
/// OCCUPIED (`true`) in the returned grid.
///
/// # Errors
///
/// Fails on an invalid kernel size or resolution in `config`.
pub fn clean_map(gray: &Image<u8, 1>, config: &CleanConfig) -> Result<BinaryImage, ImageError> {
    let mut denoised = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    median_blur(gray, &mut denoised, config.median_kernel)?;

    let mut binary = BinaryImage::from_size_val(gray.size(), false)?;
    threshold_binary_inverse(&denoised, &mut binary, config.binarize_threshold)?;

    let [close_h, close_w] = config.close_kernel;
    let mut closed = BinaryImage::from_size_val(gray.size(), false)?;
    morphology::close(&binary, &mut closed, &Kernel::rect(close_h, close_w)?)?;

    let mut filled = BinaryImage::from_size_val(gray.size(), false)?;
    fill_gaps(&closed, &mut filled, &config.fill)?;

    log::debug!(
        "occupied cells: {} thresholded, {} closed, {} filled",
        binary.count_occupied(),
        closed.count_occupied(),
        filled.count_occupied()
    );

    Ok(filled)
}

/// Extract edges and line segments from a map and draw them as an overlay.
///
/// The map is reduced to grayscale, blurred, passed through Canny and then
/// through the probabilistic Hough transform.
///
/// # Errors
///
/// Fails on an unsupported channel count or invalid parameters in `config`.
pub fn extract_edges<const C: usize>(
    grid: &Image<u8, C>,
    config: &EdgeConfig,
) -> Result<EdgeExtraction, ImageError> {
    let mut gray = Image::<u8, 1>::from_size_val(grid.size(), 0)?;
    color::gray_from_u8(grid, &mut gray)?;

    let mut blurred = Image::<u8, 1>::from_size_val(grid.size(), 0)?;
    gaussian_blur(&gray, &mut blurred, config.blur_kernel, 0.0)?;

    let mut edge_map = Image::<u8, 1>::from_size_val(grid.size(), 0)?;
    edges::canny(&blurred, &mut edge_map, config.canny_low, config.canny_high)?;

    let lines = hough_lines_p(&edge_map, &config.hough)?;
    match lines.iter().map(LineSegment::length).reduce(f32::max) {
        Some(longest) => log::debug!("detected {} lines, longest {longest:.1} px", lines.len()),
        None => log::debug!("no lines detected"),
    }

    let mut overlay = Image::<u8, 3>::from_size_val(grid.size(), 0)?;
    color::rgb_from_gray(&edge_map, &mut overlay)?;
    draw::draw_segments(
        &mut overlay,
        &lines,
        config.line_color,
        config.line_thickness,
    );

    Ok(EdgeExtraction {
        edges: edge_map,
        lines,
        overlay,
    })
}

/// Derive the output file names for `input`.
///
/// Without `output_dir` the images go next to the input.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mapclean::output_paths;
///
/// let paths = output_paths(Path::new("maps/map1.png"), None).unwrap();
/// assert_eq!(paths.processed, Path::new("maps/map1_processed.png"));
/// assert_eq!(paths.edges, Path::new("maps/map1_edges.png"));
/// ```
pub fn output_paths(input: &Path, output_dir: Option<&Path>) -> Result<OutputPaths, PipelineError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| PipelineError::InvalidInputPath(input.to_path_buf()))?
        .to_string_lossy();

    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };

    Ok(OutputPaths {
        processed: dir.join(format!("{stem}_processed.png")),
        edges: dir.join(format!("{stem}_edges.png")),
    })
}

fn to_gray(image: &GenericImage) -> Result<Image<u8, 1>, ImageError> {
    let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
    match image {
        GenericImage::L8(img) => color::gray_from_u8(img, &mut gray)?,
        GenericImage::Rgb8(img) => color::gray_from_u8(img, &mut gray)?,
        GenericImage::Rgba8(img) => color::gray_from_u8(img, &mut gray)?,
    }
    Ok(gray)
}

/// Clean the map stored at `input` and write the cleaned map and its edge overlay.
///
/// Both images are computed before anything is written. The output directory
/// is created when missing, and if the second image cannot be written the
/// first one is removed again.
///
/// # Arguments
///
/// * `input` - The map image, any format the decoder understands.
/// * `output_dir` - Where to write, defaults to the directory of `input`.
/// * `config` - The pipeline parameters.
///
/// # Returns
///
/// The paths of the written images.
pub fn process_map_file(
    input: &Path,
    output_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Result<OutputPaths, PipelineError> {
    let paths = output_paths(input, output_dir)?;

    let image = read_image_any(input).map_err(|source| PipelineError::InputNotFound {
        path: input.to_path_buf(),
        source,
    })?;
    log::info!(
        "loaded {} with size {} and {} channels",
        input.display(),
        image.size(),
        image.num_channels()
    );

    log::debug!("max gap pixels: {}", max_gap_pixels(&config.clean.fill)?);

    let gray = to_gray(&image)?;
    let cleaned = clean_map(&gray, &config.clean)?;
    let processed = cleaned.to_mono8(config.clean.occupied_value);
    let extraction = extract_edges(&processed, &config.edges)?;
    log::info!("detected {} line segments", extraction.lines.len());

    if let Some(dir) = paths.processed.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| PipelineError::IoFailure {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
        }
    }

    write_image_png_mono8(&paths.processed, &processed).map_err(|source| {
        PipelineError::IoFailure {
            path: paths.processed.clone(),
            source,
        }
    })?;

    if let Err(source) = write_image_png_rgb8(&paths.edges, &extraction.overlay) {
        if let Err(e) = std::fs::remove_file(&paths.processed) {
            log::warn!("failed to remove {}: {e}", paths.processed.display());
        }
        return Err(PipelineError::IoFailure {
            path: paths.edges.clone(),
            source,
        });
    }

    log::info!("processed map saved to: {}", paths.processed.display());
    log::info!("edges image saved to: {}", paths.edges.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_next_to_input() -> Result<(), PipelineError> {
        let paths = output_paths(Path::new("/data/maps/map1.png"), None)?;
        assert_eq!(paths.processed, Path::new("/data/maps/map1_processed.png"));
        assert_eq!(paths.edges, Path::new("/data/maps/map1_edges.png"));

        let paths = output_paths(Path::new("map1.pgm"), None)?;
        assert_eq!(paths.processed, Path::new("map1_processed.png"));
        Ok(())
    }

    #[test]
    fn output_paths_in_output_dir() -> Result<(), PipelineError> {
        let paths = output_paths(Path::new("maps/floor.2.png"), Some(Path::new("out")))?;
        assert_eq!(paths.processed, Path::new("out/floor.2_processed.png"));
        assert_eq!(paths.edges, Path::new("out/floor.2_edges.png"));
        Ok(())
    }

    #[test]
    fn output_paths_without_file_name() {
        let res = output_paths(Path::new("/"), None);
        assert!(matches!(res, Err(PipelineError::InvalidInputPath(_))));
    }

    #[test]
    fn clean_map_marks_dark_cells() -> Result<(), ImageError> {
        let mut gray = Image::<u8, 1>::from_size_val([20, 12].into(), 255)?;
        for y in 4..8 {
            for x in 3..17 {
                gray.set_pixel(x, y, 0, 0)?;
            }
        }

        let cleaned = clean_map(&gray, &CleanConfig::default())?;
        // the median filter rounds off the four corners
        assert_eq!(cleaned.count_occupied(), 4 * 14 - 4);
        assert!(!*cleaned.get_pixel(3, 4, 0)?);
        assert!(*cleaned.get_pixel(10, 5, 0)?);
        assert!(!*cleaned.get_pixel(10, 1, 0)?);

        Ok(())
    }

    #[test]
    fn clean_map_rejects_even_median() -> Result<(), ImageError> {
        let gray = Image::<u8, 1>::from_size_val([8, 8].into(), 255)?;
        let config = CleanConfig {
            median_kernel: 4,
            ..Default::default()
        };
        assert_eq!(
            clean_map(&gray, &config),
            Err(ImageError::InvalidKernelSize(4, 4))
        );
        Ok(())
    }
}
