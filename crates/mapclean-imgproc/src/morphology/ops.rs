use mapclean_image::{BinaryImage, ImageError};

use super::Kernel;
use crate::parallel;

#[derive(Clone, Copy)]
enum Reduce {
    Any,
    All,
}

impl Reduce {
    #[inline]
    fn apply(self, occupied: usize, window: usize) -> bool {
        match self {
            Reduce::Any => occupied > 0,
            Reduce::All => occupied == window,
        }
    }
}

// Rectangular structuring elements are separable: reduce along each row,
// then along each column. Windows are clipped at the image border.
fn rect_reduce(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    kernel: &Kernel,
    reduce: Reduce,
) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    let rows = src.rows();
    let cols = src.cols();
    let (pad_h, pad_w) = kernel.pad();
    let src_data = src.as_slice();

    let mut horizontal = BinaryImage::from_size_val(src.size(), false)?;

    parallel::par_rows_mut(&mut horizontal, |r, row_dst| {
        let row_src = &src_data[r * cols..(r + 1) * cols];

        let mut prefix = Vec::with_capacity(cols + 1);
        prefix.push(0usize);
        for &v in row_src {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + v as usize);
        }

        for (c, out) in row_dst.iter_mut().enumerate() {
            let lo = c.saturating_sub(pad_w);
            let hi = (c + pad_w + 1).min(cols);
            *out = reduce.apply(prefix[hi] - prefix[lo], hi - lo);
        }
    });

    let h_data = horizontal.as_slice();

    parallel::par_rows_mut(dst, |r, row_dst| {
        let lo = r.saturating_sub(pad_h);
        let hi = (r + pad_h + 1).min(rows);

        for (c, out) in row_dst.iter_mut().enumerate() {
            let occupied = (lo..hi).filter(|&y| h_data[y * cols + c]).count();
            *out = reduce.apply(occupied, hi - lo);
        }
    });

    Ok(())
}

/// Dilate an occupancy grid using a rectangular [`Kernel`].
///
/// A cell becomes OCCUPIED when any in-bounds cell under the kernel centred on
/// it is OCCUPIED.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid (will be overwritten).
/// * `kernel` - The structuring element.
pub fn dilate(src: &BinaryImage, dst: &mut BinaryImage, kernel: &Kernel) -> Result<(), ImageError> {
    rect_reduce(src, dst, kernel, Reduce::Any)
}

/// Erode an occupancy grid using a rectangular [`Kernel`].
///
/// A cell stays OCCUPIED only when every in-bounds cell under the kernel
/// centred on it is OCCUPIED.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid (will be overwritten).
/// * `kernel` - The structuring element.
pub fn erode(src: &BinaryImage, dst: &mut BinaryImage, kernel: &Kernel) -> Result<(), ImageError> {
    rect_reduce(src, dst, kernel, Reduce::All)
}

/// Morphological closing, a dilation followed by an erosion.
///
/// Bridges gaps narrower than the kernel while keeping the outline of larger
/// structures.
pub fn close(src: &BinaryImage, dst: &mut BinaryImage, kernel: &Kernel) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    let mut dilated = BinaryImage::from_size_val(src.size(), false)?;
    dilate(src, &mut dilated, kernel)?;
    erode(&dilated, dst, kernel)?;

    Ok(())
}
