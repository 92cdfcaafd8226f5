use mapclean_image::{BinaryImage, ImageError};

use crate::{
    connected_components::connected_components,
    morphology::{self, Kernel},
    parallel,
};

/// Parameters of the size-gated gap filler.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GapFillParams {
    /// Largest gap to close, in centimetres.
    pub max_gap_size_cm: f32,
    /// Map scale, in centimetres per pixel.
    pub resolution_cm_per_pixel: f32,
    /// Width of the structuring element, odd. Its height grows during the sweep.
    pub kernel_width: usize,
}

impl Default for GapFillParams {
    fn default() -> Self {
        Self {
            max_gap_size_cm: 20.0,
            resolution_cm_per_pixel: 5.0,
            kernel_width: 5,
        }
    }
}

/// The largest gap, in pixels, that [`fill_gaps`] will close.
///
/// Computed as `floor(max_gap_size_cm / resolution_cm_per_pixel)`; a
/// non-positive or NaN gap size gives zero.
///
/// # Errors
///
/// Returns [`ImageError::InvalidResolution`] if the resolution is not finite or not positive.
///
/// # Examples
///
/// ```
/// use mapclean_imgproc::gap_fill::{max_gap_pixels, GapFillParams};
///
/// assert_eq!(max_gap_pixels(&GapFillParams::default()).unwrap(), 4);
/// ```
pub fn max_gap_pixels(params: &GapFillParams) -> Result<usize, ImageError> {
    let resolution = params.resolution_cm_per_pixel;
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(ImageError::InvalidResolution(resolution));
    }

    let pixels = (params.max_gap_size_cm / resolution).floor();
    if pixels.is_nan() || pixels <= 0.0 {
        return Ok(0);
    }

    Ok(pixels as usize)
}

/// Fill the small gaps of an occupancy grid.
///
/// The grid is inverted so that FREE space is the foreground. The inverted
/// grid is dilated with `k x kernel_width` rectangles for `k = 3, 5, 7, ...`
/// while `k < 2 * max_gap + 1`. At each height the OCCUPIED cells reached by the
/// dilation are labelled with 8-connectivity, and every component whose
/// bounding box fits in `max_gap x max_gap` and whose area is at most
/// `max_gap²` is added to the free space. Larger structures are left untouched.
///
/// `dst` starts as a copy of `src` and only ever gains FREE cells. A `max_gap`
/// below 2 runs no sweep and copies `src`.
///
/// # Arguments
///
/// * `src` - The occupancy grid, `true` for OCCUPIED.
/// * `dst` - The filled grid (will be overwritten).
/// * `params` - Gap size, resolution and kernel width.
///
/// # Errors
///
/// Fails on a size mismatch, an invalid resolution or an even kernel width.
pub fn fill_gaps(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    params: &GapFillParams,
) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    // the kernel width is checked even when no sweep runs
    Kernel::rect(1, params.kernel_width)?;

    // gaps can never be larger than the grid itself
    let max_gap = max_gap_pixels(params)?.min(src.rows().max(src.cols()));
    log::debug!("filling gaps of up to {max_gap} px");

    dst.as_slice_mut().copy_from_slice(src.as_slice());

    let mut free = BinaryImage::from_size_val(src.size(), false)?;
    parallel::par_iter_rows_val(src, &mut free, |&s, f| *f = !s);

    let mut dilated = BinaryImage::from_size_val(src.size(), false)?;
    let mut candidates = BinaryImage::from_size_val(src.size(), false)?;

    let mut k = 3;
    while k < 2 * max_gap + 1 {
        let kernel = Kernel::rect(k, params.kernel_width)?;
        morphology::dilate(&free, &mut dilated, &kernel)?;

        // occupied cells the free space reaches across
        parallel::par_iter_rows_val_two(&dilated, src, &mut candidates, |&d, &s, c| {
            *c = d && s;
        });

        let components = connected_components(&candidates)?;
        let accepted = components
            .stats
            .iter()
            .map(|s| s.max_side() <= max_gap && s.area <= max_gap * max_gap)
            .collect::<Vec<_>>();

        if !components.is_empty() {
            parallel::par_iter_rows_val(&components.labels, dst, |&label, out| {
                if label > 0 && accepted[label as usize - 1] {
                    *out = false;
                }
            });
        }

        log::trace!(
            "kernel {k}x{}: {} of {} components cleared",
            params.kernel_width,
            accepted.iter().filter(|&&a| a).count(),
            components.len()
        );

        if k >= 2 * max_gap {
            break;
        }
        k += 2;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, rows: &[&str]) -> Result<BinaryImage, ImageError> {
        let data = rows
            .iter()
            .flat_map(|row| row.chars().map(|ch| ch == '#'))
            .collect();
        BinaryImage::new([width, rows.len()].into(), data)
    }

    #[test]
    fn max_gap_pixels_floor() -> Result<(), ImageError> {
        let mut params = GapFillParams::default();
        assert_eq!(max_gap_pixels(&params)?, 4);

        params.max_gap_size_cm = 24.9;
        assert_eq!(max_gap_pixels(&params)?, 4);

        params.max_gap_size_cm = -3.0;
        assert_eq!(max_gap_pixels(&params)?, 0);

        params.resolution_cm_per_pixel = 0.0;
        assert_eq!(
            max_gap_pixels(&params),
            Err(ImageError::InvalidResolution(0.0))
        );

        Ok(())
    }

    #[test]
    fn fill_clears_small_speck() -> Result<(), ImageError> {
        let src = grid(
            12,
            &[
                "............",
                ".##.........",
                ".##.........",
                "............",
                "..########..",
                "..########..",
                "............",
            ],
        )?;
        let mut dst = BinaryImage::from_size_val(src.size(), false)?;

        fill_gaps(&src, &mut dst, &GapFillParams::default())?;

        let expected = grid(
            12,
            &[
                "............",
                "............",
                "............",
                "............",
                "..########..",
                "..########..",
                "............",
            ],
        )?;
        assert_eq!(dst, expected);

        Ok(())
    }

    #[test]
    fn fill_keeps_wide_obstacle() -> Result<(), ImageError> {
        let src = grid(
            12,
            &[
                "............",
                ".######.....",
                ".######.....",
                ".######.....",
                "............",
                "..........#.",
                "............",
            ],
        )?;
        let mut dst = BinaryImage::from_size_val(src.size(), false)?;

        fill_gaps(&src, &mut dst, &GapFillParams::default())?;

        let mut expected = src.clone();
        expected.set_pixel(10, 5, 0, false)?;
        assert_eq!(dst, expected);

        Ok(())
    }

    #[test]
    fn fill_small_max_gap_is_copy() -> Result<(), ImageError> {
        let src = grid(5, &["#####", "#.#.#", "#####"])?;
        let mut dst = BinaryImage::from_size_val(src.size(), true)?;

        let params = GapFillParams {
            max_gap_size_cm: 9.0,
            ..Default::default()
        };
        fill_gaps(&src, &mut dst, &params)?;
        assert_eq!(dst, src);

        Ok(())
    }

    #[test]
    fn fill_rejects_even_kernel_width() -> Result<(), ImageError> {
        let src = BinaryImage::from_size_val([5, 5].into(), false)?;
        let mut dst = src.clone();

        let params = GapFillParams {
            kernel_width: 4,
            ..Default::default()
        };
        assert_eq!(
            fill_gaps(&src, &mut dst, &params),
            Err(ImageError::InvalidKernelSize(1, 4))
        );

        Ok(())
    }
}
