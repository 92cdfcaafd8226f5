use mapclean_image::{BinaryImage, Image, ImageError};

use crate::union_find::UnionFind;

/// Bounding box and pixel count of one connected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStats {
    /// Leftmost column.
    pub left: usize,
    /// Topmost row.
    pub top: usize,
    /// Bounding box width.
    pub width: usize,
    /// Bounding box height.
    pub height: usize,
    /// Number of pixels.
    pub area: usize,
}

impl ComponentStats {
    fn new(x: usize, y: usize) -> Self {
        Self {
            left: x,
            top: y,
            width: 1,
            height: 1,
            area: 0,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        let right = (self.left + self.width).max(x + 1);
        let bottom = (self.top + self.height).max(y + 1);
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.width = right - self.left;
        self.height = bottom - self.top;
        self.area += 1;
    }

    /// The longer side of the bounding box.
    pub fn max_side(&self) -> usize {
        self.width.max(self.height)
    }
}

/// The result of labelling the OCCUPIED cells of a grid.
#[derive(Debug, Clone)]
pub struct ConnectedComponents {
    /// Per-cell label, `0` for FREE cells and `1..=len()` for components.
    pub labels: Image<u32, 1>,
    /// Statistics of component `i + 1` at index `i`.
    pub stats: Vec<ComponentStats>,
}

impl ConnectedComponents {
    /// Number of components, the background excluded.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether no cell is OCCUPIED.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

const UNLABELLED: u32 = u32::MAX;

/// Label the 8-connected components of the OCCUPIED cells.
///
/// Labels are numbered from 1 in raster order of each component's first cell.
///
/// # Arguments
///
/// * `src` - The occupancy grid to label.
///
/// # Returns
///
/// The label image and one [`ComponentStats`] per component.
///
/// # Examples
///
/// ```
/// use mapclean_image::BinaryImage;
/// use mapclean_imgproc::connected_components::connected_components;
///
/// let grid = BinaryImage::new([3, 1].into(), vec![true, false, true]).unwrap();
/// let components = connected_components(&grid).unwrap();
///
/// assert_eq!(components.len(), 2);
/// assert_eq!(components.labels.as_slice(), &[1, 0, 2]);
/// ```
pub fn connected_components(src: &BinaryImage) -> Result<ConnectedComponents, ImageError> {
    let rows = src.rows();
    let cols = src.cols();
    let src_data = src.as_slice();

    let mut provisional = vec![UNLABELLED; src_data.len()];
    let mut uf = UnionFind::new();

    // first pass, link with the already visited neighbours: W, NW, N, NE
    for y in 0..rows {
        for x in 0..cols {
            let idx = y * cols + x;
            if !src_data[idx] {
                continue;
            }

            let mut label = UNLABELLED;
            let mut visit = |n: u32, uf: &mut UnionFind| {
                if n == UNLABELLED {
                    return;
                }
                label = if label == UNLABELLED {
                    uf.find(n)
                } else {
                    uf.union(label, n)
                };
            };

            if x > 0 {
                visit(provisional[idx - 1], &mut uf);
            }
            if y > 0 {
                let up = idx - cols;
                if x > 0 {
                    visit(provisional[up - 1], &mut uf);
                }
                visit(provisional[up], &mut uf);
                if x + 1 < cols {
                    visit(provisional[up + 1], &mut uf);
                }
            }

            provisional[idx] = if label == UNLABELLED {
                uf.make_set()
            } else {
                label
            };
        }
    }

    // roots are the smallest provisional label of their set, which belongs to
    // the set's first cell in raster order
    let mut compact = vec![0u32; uf.len()];
    let mut stats: Vec<ComponentStats> = Vec::new();
    let mut labels = vec![0u32; src_data.len()];

    for (idx, &p) in provisional.iter().enumerate() {
        if p == UNLABELLED {
            continue;
        }
        let root = uf.find(p) as usize;
        let (x, y) = (idx % cols, idx / cols);

        if compact[root] == 0 {
            stats.push(ComponentStats::new(x, y));
            compact[root] = stats.len() as u32;
        }
        let label = compact[root];

        stats[label as usize - 1].include(x, y);
        labels[idx] = label;
    }

    Ok(ConnectedComponents {
        labels: Image::new(src.size(), labels)?,
        stats,
    })
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

    #[rustfmt::skip]
    #[test]
    fn label_eight_connected() -> Result<(), ImageError> {
        let src = grid(6, &[
            "#...#.",
            ".#..#.",
            "..#...",
            "......",
            "##..##",
        ])?;

        let components = connected_components(&src)?;
        assert_eq!(components.len(), 4);
        assert_eq!(
            components.labels.as_slice(),
            &[
                1, 0, 0, 0, 2, 0,
                0, 1, 0, 0, 2, 0,
                0, 0, 1, 0, 0, 0,
                0, 0, 0, 0, 0, 0,
                3, 3, 0, 0, 4, 4,
            ]
        );

        assert_eq!(
            components.stats[0],
            ComponentStats { left: 0, top: 0, width: 3, height: 3, area: 3 }
        );
        assert_eq!(
            components.stats[1],
            ComponentStats { left: 4, top: 0, width: 1, height: 2, area: 2 }
        );

        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn label_merges_u_shape() -> Result<(), ImageError> {
        let src = grid(5, &[
            "#...#",
            "#...#",
            "#####",
        ])?;

        let components = connected_components(&src)?;
        assert_eq!(components.len(), 1);
        assert_eq!(
            components.stats[0],
            ComponentStats { left: 0, top: 0, width: 5, height: 3, area: 9 }
        );
        assert!(components.labels.as_slice().iter().all(|&l| l <= 1));

        Ok(())
    }

    #[test]
    fn label_empty_grid() -> Result<(), ImageError> {
        let src = BinaryImage::from_size_val([8, 8].into(), false)?;

        let components = connected_components(&src)?;
        assert!(components.is_empty());
        assert!(components.labels.as_slice().iter().all(|&l| l == 0));

        Ok(())
    }
}
