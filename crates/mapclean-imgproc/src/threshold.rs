use mapclean_image::{BinaryImage, Image, ImageError};

use crate::parallel;

/// Apply an inverse binary threshold, producing an occupancy grid.
///
/// Pixels strictly below `threshold` become OCCUPIED (`true`), all others FREE.
/// On a map where obstacles are dark this marks the obstacles.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output occupancy grid.
/// * `threshold` - The lowest intensity that counts as free space.
///
/// # Examples
///
/// ```
/// use mapclean_image::{BinaryImage, Image};
/// use mapclean_imgproc::threshold::threshold_binary_inverse;
///
/// let image = Image::<u8, 1>::new([3, 1].into(), vec![0, 1, 200]).unwrap();
/// let mut grid = BinaryImage::from_size_val(image.size(), false).unwrap();
///
/// threshold_binary_inverse(&image, &mut grid, 1).unwrap();
/// assert_eq!(grid.as_slice(), &[true, false, false]);
/// ```
pub fn threshold_binary_inverse(
    src: &Image<u8, 1>,
    dst: &mut BinaryImage,
    threshold: u8,
) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = *src_pixel < threshold;
    });

    Ok(())
}
