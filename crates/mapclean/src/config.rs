use std::path::Path;

use mapclean_imgproc::{gap_fill::GapFillParams, hough::HoughParams};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Parameters of the cleaning stages: denoise, binarize, close and fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Side of the median filter window, odd and at least 3.
    pub median_kernel: usize,
    /// Intensities strictly below this value are obstacles.
    pub binarize_threshold: u8,
    /// Intensity written for obstacles in the cleaned map.
    pub occupied_value: u8,
    /// Closing structuring element as `[height, width]`, both odd.
    pub close_kernel: [usize; 2],
    /// Gap filler parameters.
    pub fill: GapFillParams,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            median_kernel: 3,
            binarize_threshold: 1,
            occupied_value: 255,
            close_kernel: [3, 5],
            fill: GapFillParams::default(),
        }
    }
}

/// Parameters of the edge and line extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Side of the gaussian blur window, odd.
    pub blur_kernel: usize,
    /// Canny hysteresis lower bound.
    pub canny_low: f32,
    /// Canny hysteresis upper bound.
    pub canny_high: f32,
    /// Probabilistic hough transform parameters.
    pub hough: HoughParams,
    /// RGB color of the drawn segments.
    pub line_color: [u8; 3],
    /// Thickness of the drawn segments, in pixels.
    pub line_thickness: usize,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 30.0,
            canny_high: 100.0,
            hough: HoughParams::default(),
            line_color: [0, 255, 0],
            line_thickness: 2,
        }
    }
}

/// Full configuration of the map cleaning pipeline.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```
/// use mapclean::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{ "clean": { "fill": { "max_gap_size_cm": 40 } } }"#).unwrap();
/// assert_eq!(config.clean.fill.max_gap_size_cm, 40.0);
/// assert_eq!(config.clean.fill.resolution_cm_per_pixel, 5.0);
/// assert_eq!(config.edges.hough.threshold, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Cleaning stages.
    pub clean: CleanConfig,
    /// Edge and line extraction.
    pub edges: EdgeConfig,
    /// Verbose diagnostics.
    pub debug: bool,
}

impl PipelineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ConfigRead`] if the file cannot be read and
    /// [`PipelineError::InvalidConfig`] if it does not parse.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json).map_err(|source| PipelineError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.clean.median_kernel, 3);
        assert_eq!(config.clean.close_kernel, [3, 5]);
        assert_eq!(config.clean.fill.kernel_width, 5);
        assert_eq!(config.edges.blur_kernel, 5);
        assert_eq!(config.edges.hough.max_line_gap, 20);
        assert_eq!(config.edges.line_color, [0, 255, 0]);
        assert!(!config.debug);
    }

    #[test]
    fn empty_json_is_default() -> Result<(), serde_json::Error> {
        assert_eq!(PipelineConfig::from_json_str("{}")?, PipelineConfig::default());
        Ok(())
    }

    #[test]
    fn json_round_trip() -> Result<(), serde_json::Error> {
        let mut config = PipelineConfig::default();
        config.edges.canny_low = 12.5;
        config.debug = true;

        let json = serde_json::to_string(&config)?;
        assert_eq!(PipelineConfig::from_json_str(&json)?, config);
        Ok(())
    }

    #[test]
    fn config_file_errors() -> Result<(), std::io::Error> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = PipelineConfig::from_json_file(tmp_dir.path().join("missing.json"));
        assert!(matches!(missing, Err(PipelineError::ConfigRead { .. })));

        let path = tmp_dir.path().join("bad.json");
        std::fs::write(&path, "{ \"clean\": 3 }")?;
        let bad = PipelineConfig::from_json_file(&path);
        assert!(matches!(bad, Err(PipelineError::InvalidConfig { .. })));

        Ok(())
    }
}
