use mapclean_image::{Image, ImageError};
use rayon::prelude::*;

use crate::border::BorderMode;

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
///
/// This struct caches the kernel data and precomputed offsets for efficient filtering.
struct SeparableFilter {
    kernel_x: Vec<f32>,
    kernel_y: Vec<f32>,
    offsets_x: Vec<isize>,
    offsets_y: Vec<isize>,
}

impl SeparableFilter {
    fn new(kernel_x: &[f32], kernel_y: &[f32]) -> Self {
        let half_x = kernel_x.len() / 2;
        let half_y = kernel_y.len() / 2;

        let offsets_x = (0..kernel_x.len())
            .map(|i| i as isize - half_x as isize)
            .collect();

        let offsets_y = (0..kernel_y.len())
            .map(|i| i as isize - half_y as isize)
            .collect();

        Self {
            kernel_x: kernel_x.to_vec(),
            kernel_y: kernel_y.to_vec(),
            offsets_x,
            offsets_y,
        }
    }

    fn apply<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: &mut Image<u8, C>,
        border: BorderMode,
    ) {
        let rows = src.rows();
        let cols = src.cols();
        if rows == 0 || cols == 0 {
            return;
        }

        let src_data = src.as_slice();
        let mut temp = vec![0.0f32; src_data.len()];

        // Horizontal
        temp.par_chunks_mut(cols * C)
            .enumerate()
            .for_each(|(r, row_temp)| {
                let row_offset = r * cols * C;

                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_x.iter().zip(self.offsets_x.iter()) {
                        let x = border.map_index(c as isize + off, cols);
                        let idx = row_offset + x * C;
                        for (ch, acc_val) in acc.iter_mut().enumerate() {
                            *acc_val += src_data[idx + ch] as f32 * k;
                        }
                    }
                    row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
                }
            });

        // Vertical
        dst.as_slice_mut()
            .par_chunks_mut(cols * C)
            .enumerate()
            .for_each(|(r, row_dst)| {
                for c in 0..cols {
                    let mut acc = [0.0f32; C];
                    for (&k, &off) in self.kernel_y.iter().zip(self.offsets_y.iter()) {
                        let y = border.map_index(r as isize + off, rows);
                        let idx = y * cols * C + c * C;
                        for (ch, acc_val) in acc.iter_mut().enumerate() {
                            *acc_val += temp[idx + ch] * k;
                        }
                    }

                    for (ch, &acc_val) in acc.iter().enumerate() {
                        row_dst[c * C + ch] = acc_val.round().clamp(0.0, 255.0) as u8;
                    }
                }
            });
    }
}

/// Apply a separable filter to an 8-bit image.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel, odd length.
/// * `kernel_y` - The vertical kernel, odd length.
/// * `border` - How pixels outside the image are sampled.
pub fn separable_filter_u8<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
    border: BorderMode,
) -> Result<(), ImageError> {
    if kernel_x.len() % 2 == 0 || kernel_y.len() % 2 == 0 {
        return Err(ImageError::InvalidKernelSize(
            kernel_y.len(),
            kernel_x.len(),
        ));
    }

    src.ensure_same_size(dst)?;

    SeparableFilter::new(kernel_x, kernel_y).apply(src, dst, border);

    Ok(())
}
