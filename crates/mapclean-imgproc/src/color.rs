use crate::parallel;
use mapclean_image::{Image, ImageError};

/// Convert an 8-bit image with 1, 3 or 4 channels to grayscale.
///
/// Colour images use the integer formula `Y = (77 * R + 150 * G + 29 * B) >> 8`,
/// the alpha channel of 4-channel images is ignored and single channel images
/// are copied as they are.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output grayscale image.
///
/// # Errors
///
/// Fails when the sizes differ or the channel count is not 1, 3 or 4.
///
/// # Example
///
/// ```
/// use mapclean_image::{Image, ImageSize};
/// use mapclean_imgproc::color::gray_from_u8;
///
/// let image = Image::<u8, 3>::new([1, 1].into(), vec![255, 255, 255]).unwrap();
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255]);
/// ```
pub fn gray_from_u8<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, 1>,
) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    match C {
        1 => dst.as_slice_mut().copy_from_slice(src.as_slice()),
        3 | 4 => {
            parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
                let r = src_pixel[0] as u32;
                let g = src_pixel[1] as u32;
                let b = src_pixel[2] as u32;
                dst_pixel[0] = ((77 * r + 150 * g + 29 * b) >> 8) as u8;
            });
        }
        _ => return Err(ImageError::UnsupportedChannels(C)),
    }

    Ok(())
}

/// Promote a grayscale image to three identical RGB channels.
pub fn rgb_from_gray(src: &Image<u8, 1>, dst: &mut Image<u8, 3>) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel.fill(src_pixel[0]);
    });

    Ok(())
}
