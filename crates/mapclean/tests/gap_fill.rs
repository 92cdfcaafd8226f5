use mapclean::image::{BinaryImage, Image, ImageError};
use mapclean::imgproc::gap_fill::{fill_gaps, GapFillParams};
use mapclean::imgproc::morphology::{close, Kernel};
use mapclean::{clean_map, CleanConfig};

// (left, top, width, height)
type Rect = (usize, usize, usize, usize);

// free space with the given rectangles marked as obstacles
fn free_with_obstacles(obstacles: &[Rect]) -> Result<BinaryImage, ImageError> {
    let mut grid = BinaryImage::from_size_val([60, 50].into(), false)?;
    for &(left, top, width, height) in obstacles {
        for y in top..top + height {
            for x in left..left + width {
                grid.set_pixel(x, y, 0, true)?;
            }
        }
    }
    Ok(grid)
}

fn all_cells(grid: &BinaryImage, rect: Rect, occupied: bool) -> Result<bool, ImageError> {
    let (left, top, width, height) = rect;
    for y in top..top + height {
        for x in left..left + width {
            if *grid.get_pixel(x, y, 0)? != occupied {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn fill(src: &BinaryImage, params: &GapFillParams) -> Result<BinaryImage, ImageError> {
    let mut dst = BinaryImage::from_size_val(src.size(), false)?;
    fill_gaps(src, &mut dst, params)?;
    Ok(dst)
}

const SMALL: Rect = (8, 8, 3, 2);
const SQUARE: Rect = (16, 8, 4, 4);
const WIDE: Rect = (26, 8, 6, 3);
const SLIT: Rect = (38, 8, 5, 1);
const ROOM: Rect = (8, 20, 6, 6);
const WALL: Rect = (20, 30, 35, 4);

#[test]
fn small_obstacle_cleared() -> Result<(), ImageError> {
    let mut src = BinaryImage::from_size_val([20, 20].into(), false)?;
    for y in 8..11 {
        for x in 8..11 {
            src.set_pixel(x, y, 0, true)?;
        }
    }

    let dst = fill(&src, &GapFillParams::default())?;
    assert_eq!(dst.count_occupied(), 0);

    Ok(())
}

#[test]
fn large_obstacle_kept() -> Result<(), ImageError> {
    let src = free_with_obstacles(&[WALL])?;
    let dst = fill(&src, &GapFillParams::default())?;
    assert_eq!(dst, src);

    Ok(())
}

#[test]
fn size_gate() -> Result<(), ImageError> {
    let src = free_with_obstacles(&[SMALL, SQUARE, WIDE, SLIT, ROOM, WALL])?;
    let dst = fill(&src, &GapFillParams::default())?;

    assert!(all_cells(&dst, SMALL, false)?);
    assert!(all_cells(&dst, SQUARE, false)?);

    assert!(all_cells(&dst, WIDE, true)?);
    assert!(all_cells(&dst, SLIT, true)?);
    assert!(all_cells(&dst, ROOM, true)?);
    assert!(all_cells(&dst, WALL, true)?);

    // nothing outside the two cleared obstacles changed
    let expected = free_with_obstacles(&[WIDE, SLIT, ROOM, WALL])?;
    assert_eq!(dst, expected);

    Ok(())
}

#[test]
fn refill_is_idempotent() -> Result<(), ImageError> {
    let src = free_with_obstacles(&[SMALL, SQUARE, WIDE, SLIT, ROOM, WALL])?;
    let params = GapFillParams::default();

    let once = fill(&src, &params)?;
    let twice = fill(&once, &params)?;
    assert_eq!(once, twice);

    Ok(())
}

#[test]
fn free_cells_only_grow() -> Result<(), ImageError> {
    let data = (0..80 * 64)
        .map(|idx| {
            let (x, y) = (idx % 80, idx / 80);
            (x * 7 + y * 13) % 11 < 4
        })
        .collect();
    let src = BinaryImage::new([80, 64].into(), data)?;

    for max_gap_size_cm in [5.0, 10.0, 20.0, 35.0] {
        let params = GapFillParams {
            max_gap_size_cm,
            ..Default::default()
        };
        let dst = fill(&src, &params)?;

        assert!(src
            .as_slice()
            .iter()
            .zip(dst.as_slice())
            .all(|(&s, &d)| s || !d));
        assert!(dst.count_occupied() <= src.count_occupied());
    }

    Ok(())
}

#[test]
fn zero_gap_is_noop() -> Result<(), ImageError> {
    let src = free_with_obstacles(&[SMALL, SQUARE, WIDE])?;

    let no_gap = GapFillParams {
        max_gap_size_cm: 0.0,
        ..Default::default()
    };
    assert_eq!(fill(&src, &no_gap)?, src);

    // 20 cm at 30 cm per pixel rounds down to zero pixels
    let coarse = GapFillParams {
        resolution_cm_per_pixel: 30.0,
        ..Default::default()
    };
    assert_eq!(fill(&src, &coarse)?, src);

    Ok(())
}

#[test]
fn zero_gap_returns_closed_map() -> Result<(), ImageError> {
    let mut gray = Image::<u8, 1>::from_size_val([40, 30].into(), 255)?;
    for y in 10..20 {
        for x in 5..35 {
            if !(18..21).contains(&x) && !(14..16).contains(&y) {
                gray.set_pixel(x, y, 0, 0)?;
            }
        }
    }

    let config = CleanConfig {
        fill: GapFillParams {
            max_gap_size_cm: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let cleaned = clean_map(&gray, &config)?;

    let mut denoised = Image::<u8, 1>::from_size_val(gray.size(), 0)?;
    mapclean::imgproc::filter::median_blur(&gray, &mut denoised, 3)?;
    let mut binary = BinaryImage::from_size_val(gray.size(), false)?;
    mapclean::imgproc::threshold::threshold_binary_inverse(&denoised, &mut binary, 1)?;
    let mut closed = BinaryImage::from_size_val(gray.size(), false)?;
    close(&binary, &mut closed, &Kernel::rect(3, 5)?)?;

    assert_eq!(cleaned, closed);

    Ok(())
}

#[test]
fn invalid_resolution() -> Result<(), ImageError> {
    let src = free_with_obstacles(&[WALL])?;
    for resolution_cm_per_pixel in [0.0, -5.0, f32::INFINITY] {
        let params = GapFillParams {
            resolution_cm_per_pixel,
            ..Default::default()
        };
        let res = fill(&src, &params);
        assert!(matches!(res, Err(ImageError::InvalidResolution(_))));
    }
    Ok(())
}
