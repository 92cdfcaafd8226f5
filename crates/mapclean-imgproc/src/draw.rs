use mapclean_image::Image;

use crate::hough::LineSegment;

#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// Every point of the line is stamped with a `thickness` x `thickness` square,
/// so a thickness of 2 covers two pixels across. Pixels outside the image are skipped.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line, `0` draws nothing.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    if thickness == 0 {
        return;
    }

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let t = thickness as i64;
    let lo = -(t - 1) / 2;
    let hi = t / 2;

    loop {
        for oy in lo..=hi {
            for ox in lo..=hi {
                set_pixel(img, x0 + ox, y0 + oy, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws every segment of `lines` with the same color and thickness.
pub fn draw_segments<const C: usize>(
    img: &mut Image<u8, C>,
    lines: &[LineSegment],
    color: [u8; C],
    thickness: usize,
) {
    for line in lines {
        draw_line(
            img,
            (line.x1 as i64, line.y1 as i64),
            (line.x2 as i64, line.y2 as i64),
            color,
            thickness,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapclean_image::ImageError;

    #[rustfmt::skip]
    #[test]
    fn test_draw_line() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::new(
            [5, 5].into(),
            vec![0u8; 25],
        )?;
        draw_line(&mut img, (0, 0), (4, 4), [255], 1);
        assert_eq!(
            img.as_slice(),
            vec![
                255,   0,   0,   0,   0,
                  0, 255,   0,   0,   0,
                  0,   0, 255,   0,   0,
                  0,   0,   0, 255,   0,
                  0,   0,   0,   0, 255,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_draw_thick_line_clipped() -> Result<(), ImageError> {
        let mut img = Image::<u8, 1>::new([5, 4].into(), vec![0u8; 20])?;
        draw_line(&mut img, (1, 3), (3, 3), [9], 2);
        assert_eq!(
            img.as_slice(),
            vec![
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 9, 9, 9, 9,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_draw_segments_rgb() -> Result<(), ImageError> {
        let mut img = Image::<u8, 3>::from_size_val([4, 4].into(), 0)?;
        let lines = [LineSegment {
            x1: 0,
            y1: 1,
            x2: 3,
            y2: 1,
        }];
        draw_segments(&mut img, &lines, [0, 255, 0], 2);

        assert_eq!(*img.get_pixel(2, 1, 1)?, 255);
        assert_eq!(*img.get_pixel(2, 2, 1)?, 255);
        assert_eq!(*img.get_pixel(2, 0, 1)?, 0);
        assert_eq!(*img.get_pixel(2, 1, 0)?, 0);
        Ok(())
    }
}
