use mapclean_image::{Image, ImageError};

use crate::{filter::sobel_gradients, parallel};

// tan(22.5°) in Q15 fixed point
const TG22: i32 = 13573;

const NOT_EDGE: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Detect edges with the Canny algorithm.
///
/// Gradients come from 3x3 sobel kernels and their strength is the L1 norm
/// `|dx| + |dy|`. Pixels that are not a local maximum along the gradient
/// direction (quantized to 0°, 45°, 90° or 135°) are suppressed. Remaining
/// pixels above `high_threshold` seed the edges, which then grow through
/// 8-connected pixels above `low_threshold`.
///
/// # Arguments
///
/// * `src` - The grayscale input image.
/// * `dst` - The edge map, `255` on edges and `0` elsewhere.
/// * `low_threshold` - Hysteresis lower bound.
/// * `high_threshold` - Hysteresis upper bound.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn canny(
    src: &Image<u8, 1>,
    dst: &mut Image<u8, 1>,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<(), ImageError> {
    src.ensure_same_size(dst)?;

    let (low, high) = if low_threshold > high_threshold {
        (high_threshold, low_threshold)
    } else {
        (low_threshold, high_threshold)
    };
    // magnitudes are integers, so `m > t` is `m > floor(t)`
    let low = low.floor() as i32;
    let high = high.floor() as i32;

    let rows = src.rows();
    let cols = src.cols();

    let mut dx = Image::<i16, 1>::from_size_val(src.size(), 0)?;
    let mut dy = Image::<i16, 1>::from_size_val(src.size(), 0)?;
    sobel_gradients(src, &mut dx, &mut dy)?;

    let mut magnitude = Image::<i32, 1>::from_size_val(src.size(), 0)?;
    parallel::par_iter_rows_val_two(&dx, &dy, &mut magnitude, |&gx, &gy, m| {
        *m = (gx as i32).abs() + (gy as i32).abs();
    });

    let mag = magnitude.as_slice();
    let dx_data = dx.as_slice();
    let dy_data = dy.as_slice();

    let mag_at = |y: isize, x: isize| -> i32 {
        if y < 0 || x < 0 || y as usize >= rows || x as usize >= cols {
            return 0;
        }
        mag[y as usize * cols + x as usize]
    };

    // non-maximum suppression
    let mut state = Image::<u8, 1>::from_size_val(src.size(), NOT_EDGE)?;
    parallel::par_rows_mut(&mut state, |r, row_state| {
        let y = r as isize;
        for (c, out) in row_state.iter_mut().enumerate() {
            let idx = r * cols + c;
            let m = mag[idx];
            if m <= low {
                continue;
            }

            let x = c as isize;
            let gx = dx_data[idx] as i32;
            let gy = dy_data[idx] as i32;
            let xs = gx.abs();
            let ys = gy.abs() << 15;
            let tg22x = xs * TG22;

            let is_max = if ys < tg22x {
                m > mag_at(y, x - 1) && m >= mag_at(y, x + 1)
            } else if ys > tg22x + (xs << 16) {
                m > mag_at(y - 1, x) && m >= mag_at(y + 1, x)
            } else {
                let s = if (gx ^ gy) < 0 { -1 } else { 1 };
                m > mag_at(y - 1, x - s) && m > mag_at(y + 1, x + s)
            };

            if is_max {
                *out = if m > high { STRONG } else { WEAK };
            }
        }
    });

    // hysteresis
    let state = state.as_slice_mut();
    let mut stack: Vec<usize> = state
        .iter()
        .enumerate()
        .filter_map(|(idx, &s)| (s == STRONG).then_some(idx))
        .collect();

    while let Some(idx) = stack.pop() {
        let (y, x) = ((idx / cols) as isize, (idx % cols) as isize);
        for ny in y - 1..=y + 1 {
            for nx in x - 1..=x + 1 {
                if ny < 0 || nx < 0 || ny as usize >= rows || nx as usize >= cols {
                    continue;
                }
                let n = ny as usize * cols + nx as usize;
                if state[n] == WEAK {
                    state[n] = STRONG;
                    stack.push(n);
                }
            }
        }
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(state.iter())
        .for_each(|(d, &s)| *d = if s == STRONG { 255 } else { 0 });

    Ok(())
}
