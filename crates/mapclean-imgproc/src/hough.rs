use mapclean_image::{Image, ImageError};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

// fixed seed so that the visiting order, and the detected lines, are reproducible
const HOUGH_SEED: u64 = 0x6d61_7063_6c65_616e;

// fixed point precision of the line walk
const SHIFT: i64 = 16;

// finest angle resolution accepted, 0.01 degrees
const MAX_ANGLE_BINS: usize = 18_000;

/// Parameters of the probabilistic Hough transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoughParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f32,
    /// Angle resolution of the accumulator, in degrees.
    pub theta_deg: f32,
    /// Minimum number of votes for a line to be considered.
    pub threshold: u32,
    /// Minimum extent, along x or y, of an accepted segment.
    pub min_line_length: u32,
    /// Maximum number of consecutive missing pixels inside a segment.
    pub max_line_gap: u32,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_deg: 1.0,
            threshold: 50,
            min_line_length: 30,
            max_line_gap: 20,
        }
    }
}

/// A line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineSegment {
    /// x of the first endpoint.
    pub x1: i32,
    /// y of the first endpoint.
    pub y1: i32,
    /// x of the second endpoint.
    pub x2: i32,
    /// y of the second endpoint.
    pub y2: i32,
}

impl LineSegment {
    /// Euclidean length of the segment.
    pub fn length(&self) -> f32 {
        let dx = (self.x2 - self.x1) as f32;
        let dy = (self.y2 - self.y1) as f32;
        dx.hypot(dy)
    }
}

struct Accumulator {
    votes: Vec<i32>,
    trig: Vec<(f64, f64)>,
    num_rho: usize,
}

impl Accumulator {
    fn new(num_angle: usize, num_rho: usize, rho: f64, theta: f64) -> Self {
        let trig = (0..num_angle)
            .map(|n| {
                let angle = n as f64 * theta;
                (angle.cos() / rho, angle.sin() / rho)
            })
            .collect();
        Self {
            votes: vec![0; num_angle * num_rho],
            trig,
            num_rho,
        }
    }

    #[inline]
    fn bin(&self, n: usize, x: usize, y: usize) -> usize {
        let (cos, sin) = self.trig[n];
        let r = (x as f64 * cos + y as f64 * sin).round() as i64 + (self.num_rho as i64 - 1) / 2;
        n * self.num_rho + r.clamp(0, self.num_rho as i64 - 1) as usize
    }

    /// Add the votes of a point and return the strongest angle with its count.
    fn vote(&mut self, x: usize, y: usize) -> (usize, i32) {
        let mut best = (0, 0);
        for n in 0..self.trig.len() {
            let idx = self.bin(n, x, y);
            self.votes[idx] += 1;
            if self.votes[idx] > best.1 {
                best = (n, self.votes[idx]);
            }
        }
        best
    }

    fn unvote(&mut self, x: usize, y: usize) {
        for n in 0..self.trig.len() {
            let idx = self.bin(n, x, y);
            self.votes[idx] -= 1;
        }
    }
}

/// Find line segments with the progressive probabilistic Hough transform.
///
/// Edge pixels are visited in a pseudo random order. Each pixel votes in the
/// (rho, theta) accumulator; once a bin reaches `threshold` the image is walked
/// along that direction from the pixel, tolerating up to `max_line_gap`
/// missing pixels. The walked pixels are removed from further voting and the
/// segment is kept when it spans at least `min_line_length` along x or y.
///
/// The visiting order comes from a fixed seed, so the same edge map always
/// yields the same segments.
///
/// # Arguments
///
/// * `src` - The edge map, any non-zero pixel is an edge.
/// * `params` - Accumulator resolution and segment constraints.
///
/// # Errors
///
/// Returns [`ImageError::InvalidParameter`] for a non-positive `rho` or
/// `theta_deg`, for a `rho` coarser than the image diagonal range, or for a
/// `theta_deg` finer than 0.01 degrees.
pub fn hough_lines_p(
    src: &Image<u8, 1>,
    params: &HoughParams,
) -> Result<Vec<LineSegment>, ImageError> {
    if !params.rho.is_finite() || params.rho <= 0.0 {
        return Err(ImageError::InvalidParameter("rho", params.rho));
    }
    if !params.theta_deg.is_finite() || params.theta_deg <= 0.0 {
        return Err(ImageError::InvalidParameter("theta_deg", params.theta_deg));
    }

    let rows = src.rows();
    let cols = src.cols();
    let rho = params.rho as f64;
    let theta = (params.theta_deg as f64).to_radians();

    let num_angle = ((std::f64::consts::PI / theta).round() as usize).max(1);
    if num_angle > MAX_ANGLE_BINS {
        return Err(ImageError::InvalidParameter("theta_deg", params.theta_deg));
    }
    let num_rho = (((cols + rows) * 2 + 1) as f64 / rho).round() as usize;
    if num_rho == 0 {
        return Err(ImageError::InvalidParameter("rho", params.rho));
    }
    let mut accumulator = Accumulator::new(num_angle, num_rho, rho, theta);

    let mut mask: Vec<bool> = src.as_slice().iter().map(|&v| v != 0).collect();
    let mut points: Vec<(usize, usize)> = mask
        .iter()
        .enumerate()
        .filter_map(|(idx, &m)| m.then_some((idx % cols, idx / cols)))
        .collect();

    let mut rng = StdRng::seed_from_u64(HOUGH_SEED);
    points.shuffle(&mut rng);

    let threshold = params.threshold as i32;
    let max_gap = params.max_line_gap as i64;
    let min_length = params.min_line_length as i64;
    let in_bounds = |x: i64, y: i64| x >= 0 && y >= 0 && (x as usize) < cols && (y as usize) < rows;

    let mut lines = Vec::new();

    for (px, py) in points {
        // already consumed by a previous segment
        if !mask[py * cols + px] {
            continue;
        }

        let (best_n, best_votes) = accumulator.vote(px, py);
        if best_votes < threshold {
            continue;
        }

        // walk along the line direction in fixed point on the minor axis
        let (cos, sin) = accumulator.trig[best_n];
        let a = -sin;
        let b = cos;
        let (x_major, x0, y0, dx0, dy0) = if a.abs() > b.abs() {
            let dy0 = (b * (1i64 << SHIFT) as f64 / a.abs()).round() as i64;
            let y0 = ((py as i64) << SHIFT) + (1 << (SHIFT - 1));
            (true, px as i64, y0, if a > 0.0 { 1 } else { -1 }, dy0)
        } else {
            let dx0 = (a * (1i64 << SHIFT) as f64 / b.abs()).round() as i64;
            let x0 = ((px as i64) << SHIFT) + (1 << (SHIFT - 1));
            (false, x0, py as i64, dx0, if b > 0.0 { 1 } else { -1 })
        };
        let to_pixel = |x: i64, y: i64| {
            if x_major {
                (x, y >> SHIFT)
            } else {
                (x >> SHIFT, y)
            }
        };

        let mut line_end = [(px as i64, py as i64); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            let mut gap = 0;
            loop {
                let (j, i) = to_pixel(x, y);
                if !in_bounds(j, i) {
                    break;
                }
                if mask[i as usize * cols + j as usize] {
                    gap = 0;
                    *end = (j, i);
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
                x += dx;
                y += dy;
            }
        }

        let good_line = (line_end[1].0 - line_end[0].0).abs() >= min_length
            || (line_end[1].1 - line_end[0].1).abs() >= min_length;

        // clear the walked pixels, taking back their votes for accepted lines
        for (k, end) in line_end.iter().enumerate() {
            let (dx, dy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (x0, y0);
            loop {
                let (j, i) = to_pixel(x, y);
                if !in_bounds(j, i) {
                    break;
                }
                let idx = i as usize * cols + j as usize;
                if mask[idx] {
                    if good_line {
                        accumulator.unvote(j as usize, i as usize);
                    }
                    mask[idx] = false;
                }
                if (j, i) == *end {
                    break;
                }
                x += dx;
                y += dy;
            }
        }

        if good_line {
            lines.push(LineSegment {
                x1: line_end[0].0 as i32,
                y1: line_end[0].1 as i32,
                x2: line_end[1].0 as i32,
                y2: line_end[1].1 as i32,
            });
        }
    }

    log::debug!("hough transform found {} segments", lines.len());

    Ok(lines)
}
