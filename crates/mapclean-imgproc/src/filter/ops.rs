use mapclean_image::{Image, ImageError};

use super::{kernels, separable_filter_u8};
use crate::{border::BorderMode, parallel};

/// Blur an image using a median filter
///
/// Each output pixel is the median of the `kernel_size` x `kernel_size`
/// window centred on it. Pixels outside the image repeat the nearest edge.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The side of the square window, odd and at least 3.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn median_blur(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
) -> Result<(), ImageError> {
    if kernel_size < 3 || kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size, kernel_size));
    }

    src.ensure_same_size(dst)?;

    let rows = src.rows();
    let cols = src.cols();
    let half = (kernel_size / 2) as isize;
    let mid = kernel_size * kernel_size / 2;
    let src_data = src.as_slice();

    parallel::par_rows_mut(dst, |r, row_dst| {
        let mut window = Vec::with_capacity(kernel_size * kernel_size);
        for (c, dst_pixel) in row_dst.iter_mut().enumerate() {
            window.clear();
            for dy in -half..=half {
                let y = BorderMode::Replicate.map_index(r as isize + dy, rows);
                let row_offset = y * cols;
                for dx in -half..=half {
                    let x = BorderMode::Replicate.map_index(c as isize + dx, cols);
                    window.push(src_data[row_offset + x]);
                }
            }
            let (_, median, _) = window.select_nth_unstable(mid);
            *dst_pixel = *median;
        }
    });

    Ok(())
}

/// Blur an image using a gaussian blur filter
///
/// The border is reflected around the edge pixel (`dcb|abcd|cba` style).
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dst` - The destination image with shape (H, W, 1).
/// * `kernel_size` - The size of the square kernel.
/// * `sigma` - The sigma of the gaussian kernel, non-positive derives it from the size.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_blur(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    kernel_size: usize,
    sigma: f32,
) -> Result<(), ImageError> {
    if kernel_size % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(kernel_size, kernel_size));
    }
    let kernel = kernels::gaussian_kernel_1d(kernel_size, sigma);
    separable_filter_u8(src, dst, &kernel, &kernel, BorderMode::Reflect101)
}

/// Compute the 3x3 sobel derivatives of an image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 1).
/// * `dx` - The horizontal derivative.
/// * `dy` - The vertical derivative.
///
/// PRECONDITION: all images must have the same shape.
pub fn sobel_gradients(
    src: &Image<u8, 1>,
    dx: &mut Image<i16, 1>,
    dy: &mut Image<i16, 1>,
) -> Result<(), ImageError> {
    src.ensure_same_size(dx)?;
    src.ensure_same_size(dy)?;

    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();
    let (deriv, smooth) = kernels::sobel_kernel_1d();

    let sample = |y: isize, x: isize| -> i32 {
        let y = BorderMode::Replicate.map_index(y, rows);
        let x = BorderMode::Replicate.map_index(x, cols);
        src_data[y * cols + x] as i32
    };

    parallel::par_rows_mut(dx, |r, row_dx| {
        for (c, out) in row_dx.iter_mut().enumerate() {
            let mut acc = 0i32;
            for (i, &s) in smooth.iter().enumerate() {
                for (j, &d) in deriv.iter().enumerate() {
                    acc += s * d * sample(r as isize + i as isize - 1, c as isize + j as isize - 1);
                }
            }
            *out = acc as i16;
        }
    });

    parallel::par_rows_mut(dy, |r, row_dy| {
        for (c, out) in row_dy.iter_mut().enumerate() {
            let mut acc = 0i32;
            for (i, &d) in deriv.iter().enumerate() {
                for (j, &s) in smooth.iter().enumerate() {
                    acc += d * s * sample(r as isize + i as isize - 1, c as isize + j as isize - 1);
                }
            }
            *out = acc as i16;
        }
    });

    Ok(())
}
